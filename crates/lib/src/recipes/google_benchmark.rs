use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::{Recipe, only};

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let dir = format!("benchmark-{ver}");
  let archive = format!("benchmark_v{ver}.tar.gz");

  r.download(format!("https://github.com/google/benchmark/archive/v{ver}.tar.gz"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  r.mkdir("build");
  r.enter("build");
  r.cmake("..", &["-DBENCHMARK_ENABLE_GTEST_TESTS=OFF", "-DCMAKE_CXX_FLAGS=-w"]);
  r.make();
  r.leave();

  r.install_tree("include", INCLUDE_DIR, only(&["*.h"]));
  r.install_files("build/src/libbenchmark.a", LIB_DIR);
  Ok(())
}
