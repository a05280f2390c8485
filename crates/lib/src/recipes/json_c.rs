use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::{Recipe, only};

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let dir = format!("json-c-json-c-{ver}");
  let archive = format!("json-c-{ver}.tar.gz");

  r.download(format!("https://github.com/json-c/json-c/archive/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let mut program = Vec::new();
  // config.sub in json-c releases is too old for some triples
  if !r.triple().is_empty() {
    program.push(format!("ac_cv_host={}", r.triple()));
  }
  // no rpl_malloc and rpl_realloc
  program.push("ac_cv_func_malloc_0_nonnull=yes".into());
  program.push("ac_cv_func_realloc_0_nonnull=yes".into());
  program.push("./configure".into());

  let flags = r.make_flags().cflags("-w -fPIC -fvisibility=hidden").render();
  r.configure_with(&program.join(" "), &flags, &["--enable-static", "--disable-shared"]);
  // parallel build is broken
  r.make_serial();

  r.install_tree(".", INCLUDE_DIR, only(&["*.h"]));
  r.install_files(".libs/libjson-c.a", LIB_DIR);
  Ok(())
}
