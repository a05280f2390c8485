use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::{Recipe, only};

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let dir = format!("libatomic_ops-{ver}");
  let archive = format!("{dir}.tar.gz");

  r.download(
    format!("https://github.com/ivmai/libatomic_ops/releases/download/v{ver}/{archive}"),
    &archive,
  );
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let flags = r.make_flags().deps(r.deps()).cflags("-fPIC").variant(r.variant()).render();
  r.configure(&flags, &["--enable-static", "--disable-shared", "--disable-docs"]);
  r.make();

  r.install_tree("src", INCLUDE_DIR, only(&["*.h"]));
  r.install_files("src/.libs/libatomic_ops.a", LIB_DIR);
  Ok(())
}
