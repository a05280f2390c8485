use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};
use crate::step::TreeFilter;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let dir = format!("cpputest-{ver}");
  let archive = format!("{dir}.tar.gz");

  r.download(
    format!("https://github.com/cpputest/cpputest/releases/download/v{ver}/{archive}"),
    &archive,
  );
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  // CppUTest builds with -Werror, which trips on old compilers
  let flags = r.make_flags().cflags("-w").render();
  r.configure(&flags, &["--enable-static", "--disable-memory-leak-detection"]);
  r.make();

  r.install_tree("include", INCLUDE_DIR, TreeFilter::All);
  r.install_files("lib/libCppUTest.a", LIB_DIR);
  Ok(())
}
