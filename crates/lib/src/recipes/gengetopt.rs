use crate::BuildError;
use crate::layout::BIN_DIR;

use super::Recipe;

/// Host tool, built natively with a clean environment.
pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("gengetopt-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("ftp://ftp.gnu.org/gnu/gengetopt/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.execute_clean("./configure");
  // parallel build is broken
  r.make_serial();

  r.install_files("src/gengetopt", BIN_DIR);
  Ok(())
}
