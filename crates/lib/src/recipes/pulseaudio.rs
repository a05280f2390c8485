use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR, RPATH_DIR};

use super::{Recipe, only};

const MEMFD_PATCH_URL: &str = "https://bugs.freedesktop.org/attachment.cgi?id=136927";
const MEMFD_PATCH: &str = "0001-memfd-wrappers-only-define-memfd_create-if-not-alrea.patch";

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.spec().require_version_tuple()?;
  let dir = format!("pulseaudio-{}", r.version());
  let archive = format!("{dir}.tar.gz");

  r.download(format!("https://freedesktop.org/software/pulseaudio/releases/{archive}"), &archive);
  r.unpack(&archive, &dir);

  if (vec![8, 99, 1]..vec![11, 99, 1]).contains(&ver) {
    r.try_patch(&dir, MEMFD_PATCH_URL, MEMFD_PATCH);
  }
  if ver < vec![12, 99, 1] {
    r.replace_in_tree(
      &format!("src/{dir}"),
      &["*.h", "*.c"],
      "#include <asoundlib.h>",
      "#include <alsa/asoundlib.h>",
    );
  }

  r.enter_source(&dir);
  if ver < vec![14, 99, 1] {
    autotools(r);
  } else {
    meson(r);
  }
  Ok(())
}

fn autotools(r: &mut Recipe<'_>) {
  // autotools files are not modified, so a missing aclocal/automake of the
  // exact release version must not be invoked
  r.replace_in_file_if_exists("Makefile.in", "@ACLOCAL@", "true");
  r.replace_in_file_if_exists("Makefile.in", "@AUTOMAKE@", "true");

  let flags = r.make_flags().deps(r.deps()).cflags("-w -fomit-frame-pointer -O2").render();
  r.configure(
    &flags,
    &[
      r#"LIBJSON_CFLAGS=" ""#,
      r#"LIBJSON_LIBS="-ljson-c""#,
      r#"LIBSNDFILE_CFLAGS=" ""#,
      r#"LIBSNDFILE_LIBS="-lsndfile""#,
      "--enable-shared",
      "--disable-static",
      "--disable-tests",
      "--disable-manpages",
      "--disable-orc",
      "--disable-webrtc-aec",
      "--disable-openssl",
      "--disable-neon-opt",
      "--without-caps",
    ],
  );
  r.make();

  r.install_files("config.h", INCLUDE_DIR);
  r.install_tree("src/pulse", "include/pulse", only(&["*.h"]));
  r.install_files("src/.libs/libpulse.so", LIB_DIR);
  r.install_files("src/.libs/libpulse.so.0", RPATH_DIR);
  r.install_files("src/.libs/libpulse-simple.so", LIB_DIR);
  r.install_files("src/.libs/libpulse-simple.so.0", RPATH_DIR);
  r.install_files("src/.libs/libpulsecommon-*.so", LIB_DIR);
  r.install_files("src/.libs/libpulsecommon-*.so", RPATH_DIR);
}

fn meson(r: &mut Recipe<'_>) {
  r.mkdir("builddir");
  r.enter("builddir");

  let env = r.env_args();
  let flags = r.make_flags().deps(r.deps()).render();
  let options = [
    "-Ddoxygen=false",
    "-Dman=false",
    "-Dgcov=false",
    "-Dtests=false",
    "-Ddatabase=simple",
    "-Dorc=disabled",
    "-Dwebrtc-aec=disabled",
    "-Dopenssl=disabled",
  ]
  .join(" ");
  let cmd = [env.as_str(), flags.as_str(), "meson ..", options.as_str()]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
  r.execute(cmd);
  r.execute("ninja");
  r.execute("DESTDIR=../instdir ninja install");
  r.leave();

  r.install_tree("instdir/usr/local/include/pulse", "include/pulse", only(&["*.h"]));
  r.install_files("builddir/src/pulse/libpulse.so", LIB_DIR);
  r.install_files("builddir/src/pulse/libpulse.so.0", RPATH_DIR);
  r.install_files("builddir/src/pulse/libpulse-simple.so", LIB_DIR);
  r.install_files("builddir/src/pulse/libpulse-simple.so.0", RPATH_DIR);
  r.install_files("builddir/src/libpulsecommon-*.so", LIB_DIR);
  r.install_files("builddir/src/libpulsecommon-*.so", RPATH_DIR);
}
