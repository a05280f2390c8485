use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR, RPATH_DIR};
use crate::step::TreeFilter;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("openssl-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("https://www.openssl.org/source/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.execute("./Configure");
  r.make();

  r.install_tree("include", INCLUDE_DIR, TreeFilter::All);
  for lib in ["libssl", "libcrypto"] {
    r.install_files(&format!("{lib}.a"), LIB_DIR);
    r.install_files(&format!("{lib}.so"), LIB_DIR);
    r.install_files(&format!("{lib}.so.*"), RPATH_DIR);
  }
  Ok(())
}
