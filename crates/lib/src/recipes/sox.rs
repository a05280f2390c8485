use crate::BuildError;
use crate::layout::{INCLUDE_DIR, LIB_DIR};

use super::Recipe;

const OPTIONS: &[&str] = &[
  "--enable-static",
  "--disable-shared",
  "--disable-openmp",
  "--without-libltdl",
  "--without-magic",
  "--without-png",
  "--without-ladspa",
  "--without-mad",
  "--without-id3tag",
  "--without-lame",
  "--without-twolame",
  "--without-ao",
  "--without-opus",
  "--with-oggvorbis=no",
  "--with-opus=no",
  "--with-flac=no",
  "--with-amrwb=no",
  "--with-amrnb=no",
  "--with-wavpack=no",
  "--with-ao=no",
  "--with-pulseaudio=no",
  "--with-sndfile=no",
  "--with-mp3=no",
  "--with-gsm=no",
  "--with-lpc10=no",
];

pub(super) fn recipe(r: &mut Recipe<'_>) -> Result<(), BuildError> {
  let ver = r.version();
  let dir = format!("sox-{ver}");
  let archive = format!("{dir}.tar.gz");

  r.download(
    format!("https://downloads.sourceforge.net/project/sox/sox/{ver}/{archive}"),
    &archive,
  );
  r.unpack(&archive, &dir);
  r.enter_source(&dir);

  let flags = r
    .make_flags()
    .deps(r.deps())
    .cflags("-fvisibility=hidden")
    .variant(r.variant())
    .render();
  r.configure(&flags, OPTIONS);
  r.make();

  r.install_files("src/sox.h", INCLUDE_DIR);
  r.install_files("src/.libs/libsox.a", LIB_DIR);
  Ok(())
}
