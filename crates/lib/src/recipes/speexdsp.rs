use std::sync::LazyLock;

use regex::Regex;

use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};
use crate::step::TreeFilter;

use super::Recipe;

static PRE_RELEASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1.2[a-z]").expect("valid regex"));

/// Releases after 1.2 ship as `speexdsp`, earlier ones and the 1.2 betas as
/// `speex`. 1.2rc3 is the first pre-release published under the new name.
fn project_name(ver: &str) -> &'static str {
  let parts: Vec<&str> = ver.splitn(2, '.').collect();
  if parts > vec!["1", "2"] && (!PRE_RELEASE.is_match(ver) || ver == "1.2rc3") {
    "speexdsp"
  } else {
    "speex"
  }
}

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let speex = project_name(r.version());
  let dir = format!("{speex}-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("http://downloads.xiph.org/releases/speex/{archive}"), &archive);
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let flags = r.make_flags().deps(r.deps()).cflags("-fPIC").variant(r.variant()).render();
  r.configure(&flags, &["--enable-static", "--disable-shared", "--disable-examples"]);
  r.make();

  r.install_tree("include", INCLUDE_DIR, TreeFilter::All);
  r.install_files(&format!("lib{speex}/.libs/libspeexdsp.a"), LIB_DIR);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::step::Step;

  use super::super::tests::plan_for;

  #[test]
  fn modern_releases_are_speexdsp() {
    assert_eq!(project_name("1.2.0"), "speexdsp");
    assert_eq!(project_name("1.2rc3"), "speexdsp");
    assert_eq!(project_name("1.2.1"), "speexdsp");
  }

  #[test]
  fn old_releases_are_speex() {
    assert_eq!(project_name("1.2beta3"), "speex");
    assert_eq!(project_name("1.2rc2"), "speex");
    assert_eq!(project_name("1.1.12"), "speex");
  }

  #[test]
  fn archive_follows_project_name() {
    let steps = plan_for("speexdsp-1.2beta3", "", &[]);
    assert_eq!(
      steps[0],
      Step::Download {
        url: "http://downloads.xiph.org/releases/speex/speex-1.2beta3.tar.gz".into(),
        name: "speex-1.2beta3.tar.gz".into(),
      }
    );
  }
}
