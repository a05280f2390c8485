//! Archive extraction into `src/`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use xz2::read::XzDecoder;

use crate::layout::{BuildDir, remove_empty_dir, remove_path};
use crate::progress::stage;
use crate::BuildError;

/// Extract `src/<archive>` so that it provides `src/<dir>`.
///
/// Does nothing when `src/<dir>` already exists. Extraction happens in
/// `tmp/` and the directory is renamed into place only once complete. A
/// failed extraction leaves no staging behind.
pub fn unpack(layout: &BuildDir, archive: &str, dir: &str) -> Result<(), BuildError> {
  let dest = layout.src_dir().join(dir);

  if dest.exists() {
    stage("found unpacked", dir);
    return Ok(());
  }

  stage("unpack", archive);

  let tmp_dir = layout.tmp_dir();
  let staged = tmp_dir.join(dir);
  remove_path(&staged)?;
  std::fs::create_dir_all(&tmp_dir).map_err(BuildError::at(&tmp_dir))?;

  let archive_path = layout.src_dir().join(archive);
  let extracted = extract(&archive_path, &tmp_dir).and_then(|()| {
    if staged.is_dir() {
      Ok(())
    } else {
      Err(BuildError::MissingUnpackDir {
        archive: archive.to_string(),
        dir: dir.to_string(),
      })
    }
  });

  if let Err(err) = extracted {
    remove_path(&tmp_dir)?;
    return Err(err);
  }

  std::fs::rename(&staged, &dest).map_err(BuildError::at(&dest))?;
  remove_empty_dir(&tmp_dir);

  debug!(path = %dest.display(), "unpacked");
  Ok(())
}

/// Extract a (possibly compressed) tarball into `into`, keeping file modes.
fn extract(archive: &Path, into: &Path) -> Result<(), BuildError> {
  let kind = infer::get_from_path(archive).map_err(BuildError::at(archive))?;
  let file = BufReader::new(File::open(archive).map_err(BuildError::at(archive))?);

  let reader: Box<dyn Read> = match kind.map(|k| k.mime_type()) {
    Some("application/gzip") => Box::new(GzDecoder::new(file)),
    Some("application/x-bzip2") => Box::new(BzDecoder::new(file)),
    Some("application/x-xz") => Box::new(XzDecoder::new(file)),
    Some("application/x-tar") => Box::new(file),
    _ => return Err(BuildError::UnsupportedArchive(archive.to_path_buf())),
  };

  let mut tar = Archive::new(reader);
  tar.set_preserve_permissions(true);
  tar.set_overwrite(true);
  tar.unpack(into).map_err(BuildError::at(archive))
}
