use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR, RPATH_DIR};
use crate::step::TreeFilter;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("libtool-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("ftp://ftp.gnu.org/gnu/libtool/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.configure("", &["--enable-shared", "--disable-static"]);
  r.make();

  r.install_files("libltdl/ltdl.h", INCLUDE_DIR);
  r.install_tree("libltdl/libltdl", "include/libltdl", TreeFilter::All);
  r.install_files("libltdl/.libs/libltdl.so", LIB_DIR);
  r.install_files("libltdl/.libs/libltdl.so.*", RPATH_DIR);
  Ok(())
}
