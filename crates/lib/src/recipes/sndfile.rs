use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("libsndfile-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("http://www.mega-nerd.com/libsndfile/files/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let program = if r.triple().is_empty() {
    "./configure".to_string()
  } else {
    format!("ac_cv_host={} ./configure", r.triple())
  };
  // libtool does not add -pthread on some platforms
  let flags = r.make_flags().cflags("-fPIC -fvisibility=hidden").pthread().render();
  r.configure_with(
    &program,
    &flags,
    &["--enable-static", "--disable-shared", "--disable-external-libs"],
  );
  r.make();

  r.install_files("src/sndfile.h", INCLUDE_DIR);
  r.install_files("src/.libs/libsndfile.a", LIB_DIR);
  Ok(())
}
