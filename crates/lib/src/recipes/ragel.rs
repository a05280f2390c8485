use crate::BuildError;
use crate::layout::BIN_DIR;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("ragel-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("https://www.colm.net/files/ragel/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.execute_clean("./configure");
  r.make();

  r.install_files("ragel/ragel", BIN_DIR);
  Ok(())
}
