use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("libunwind-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("http://download.savannah.nongnu.org/releases/libunwind/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let flags = r
    .make_flags()
    .deps(r.deps())
    .cflags("-fcommon -fPIC")
    .variant(r.variant())
    .render();
  r.configure(
    &flags,
    &[
      "--enable-static",
      "--disable-shared",
      "--disable-coredump",
      "--disable-ptrace",
      "--disable-setjmp",
      "--disable-minidebuginfo",
    ],
  );
  r.make();

  r.install_files("include/*.h", INCLUDE_DIR);
  r.install_files("src/.libs/libunwind.a", LIB_DIR);
  Ok(())
}
