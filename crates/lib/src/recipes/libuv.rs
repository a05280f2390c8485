use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};
use crate::step::TreeFilter;

use super::Recipe;

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let dir = format!("libuv-v{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("https://dist.libuv.org/dist/v{}/{archive}", r.version()), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);
  r.replace_in_file("include/uv.h", r#"__attribute__((visibility("default")))"#, "");

  if r.is_android() {
    r.mkdir("build");
    r.enter("build");
    r.cmake("..", &["-DLIBUV_BUILD_TESTS=OFF", "-DANDROID_PLATFORM=android-21"]);
    r.make();
    r.copy_file("libuv_a.a", "libuv.a");
    r.leave();
    r.install_files("build/libuv.a", LIB_DIR);
  } else {
    r.execute("./autogen.sh");
    let flags = r.make_flags().cflags("-fvisibility=hidden").render();
    r.configure(&flags, &["--with-pic", "--enable-static"]);
    r.make();
    r.install_files(".libs/libuv.a", LIB_DIR);
  }

  r.install_tree("include", INCLUDE_DIR, TreeFilter::All);
  Ok(())
}
