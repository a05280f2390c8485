use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::{Recipe, only};

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let debug = r.variant().is_debug();
  let dist = if debug { "bin/Debug" } else { "bin/Release" };
  let dir = format!("openfec-{ver}");
  let archive = format!("openfec_v{ver}.tar.gz");

  r.download(format!("https://github.com/roc-streaming/openfec/archive/v{ver}.tar.gz"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.mkdir("build");
  r.enter("build");
  let debug_flag = format!("-DDEBUG:STRING={}", if debug { "ON" } else { "OFF" });
  r.cmake("..", &["-DBUILD_STATIC_LIBS=ON", &debug_flag]);
  r.make();
  r.leave();

  r.install_tree("src", INCLUDE_DIR, only(&["*.h"]));
  r.install_files(&format!("{dist}/libopenfec.a"), LIB_DIR);
  Ok(())
}
