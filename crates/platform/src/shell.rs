//! Shell command construction.
//!
//! Recipes are expressed as `/bin/sh` command lines, so every interpolated
//! value that may contain spaces goes through [`quote`].

use std::borrow::Cow;

/// Quote a single word for a POSIX shell.
///
/// Words that need no quoting are returned unchanged. A shell word cannot
/// carry NUL bytes, so they are dropped.
pub fn quote(word: &str) -> Cow<'_, str> {
  if word.contains('\0') {
    let cleaned = word.replace('\0', "");
    return Cow::Owned(shlex::try_quote(&cleaned).map(Cow::into_owned).unwrap_or(cleaned));
  }
  shlex::try_quote(word).unwrap_or(Cow::Borrowed(word))
}

/// Quote every word and join them with spaces.
pub fn join<I, S>(words: I) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  words
    .into_iter()
    .map(|w| quote(w.as_ref()).into_owned())
    .collect::<Vec<_>>()
    .join(" ")
}

/// The shell used to run recipe command lines, with its command flag.
pub fn system_shell() -> (&'static str, &'static str) {
  #[cfg(unix)]
  {
    ("/bin/sh", "-c")
  }

  #[cfg(windows)]
  {
    ("cmd.exe", "/C")
  }
}
