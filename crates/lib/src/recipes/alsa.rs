use crate::BuildError;
use crate::layout::{LIB_DIR, RPATH_DIR};
use crate::step::TreeFilter;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("alsa-lib-{}", r.version());
  let archive = format!("{dir}.tar.bz2");

  r.download(format!("ftp://ftp.alsa-project.org/pub/lib/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.configure("", &["--enable-shared", "--disable-static", "--disable-python"]);
  r.make();

  // the source tree has an `alsa -> .` symlink
  r.install_tree("include/alsa", "include/alsa", TreeFilter::Ignore(vec!["alsa".into()]));
  r.install_files("src/.libs/libasound.so", LIB_DIR);
  r.install_files("src/.libs/libasound.so.*", RPATH_DIR);
  Ok(())
}
