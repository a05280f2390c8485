//! pkg-config output merged into a compiler/linker flag set.

use serde::Serialize;
use tracing::{debug, warn};
use tpbuild_platform::CommandRunner;

/// Accumulated compile and link settings.
///
/// Every list is deduplicated on insertion and keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnv {
  pub cpppath: Vec<String>,
  pub cppdefines: Vec<String>,
  pub libpath: Vec<String>,
  pub libs: Vec<String>,
  pub ccflags: Vec<String>,
  pub linkflags: Vec<String>,
}

/// Options that take the following word as their argument.
const PAIRED_CCFLAGS: &[&str] = &["-isystem", "-include", "-iquote", "-idirafter", "-imacros"];

fn push_unique(list: &mut Vec<String>, value: &str) {
  if !list.iter().any(|existing| existing == value) {
    list.push(value.to_string());
  }
}

impl BuildEnv {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sort a compiler/linker command line into the matching lists.
  ///
  /// Returns `false` when `flags` cannot be split into words.
  pub fn merge_flags(&mut self, flags: &str) -> bool {
    let Some(words) = shlex::split(flags) else {
      return false;
    };

    let mut words = words.iter().map(String::as_str);

    while let Some(word) = words.next() {
      match word {
        "-I" | "-L" | "-l" | "-D" | "-framework" => {
          let Some(value) = words.next() else { break };
          self.merge_option(word, value);
        }
        "-pthread" | "-fopenmp" => {
          push_unique(&mut self.ccflags, word);
          push_unique(&mut self.linkflags, word);
        }
        "-rdynamic" => push_unique(&mut self.linkflags, word),
        _ if PAIRED_CCFLAGS.contains(&word) => {
          let Some(value) = words.next() else { break };
          let pair = format!("{word} {}", shlex::try_quote(value).unwrap_or_default());
          push_unique(&mut self.ccflags, &pair);
        }
        _ if word.starts_with("-Wl,") => push_unique(&mut self.linkflags, word),
        _ if word.len() > 2 && matches!(word.get(..2), Some("-I" | "-L" | "-l" | "-D")) => {
          self.merge_option(&word[..2], &word[2..]);
        }
        _ if word.starts_with('-') => push_unique(&mut self.ccflags, word),
        _ => push_unique(&mut self.libs, word),
      }
    }

    true
  }

  fn merge_option(&mut self, option: &str, value: &str) {
    match option {
      "-I" => push_unique(&mut self.cpppath, value),
      "-L" => push_unique(&mut self.libpath, value),
      "-l" => push_unique(&mut self.libs, value),
      "-D" => push_unique(&mut self.cppdefines, value),
      _ => push_unique(&mut self.linkflags, &format!("{option} {value}")),
    }
  }
}

/// Run pkg-config with `args` and merge what it prints into `env`.
///
/// `pkg_config` names the binary to use; when `None` it must be found on
/// `PATH`. Returns `false` if the tool is missing, fails, or prints
/// something that is not a flag list.
pub fn parse_pkg_config(
  runner: &impl CommandRunner,
  env: &mut BuildEnv,
  pkg_config: Option<&str>,
  args: &[&str],
) -> bool {
  let program = match pkg_config {
    Some(program) => program.to_string(),
    None => match runner.which("pkg-config") {
      Some(_) => "pkg-config".to_string(),
      None => {
        debug!("pkg-config not found on PATH");
        return false;
      }
    },
  };

  let output = match runner.run(&program, args) {
    Ok(output) => output,
    Err(err) => {
      warn!(program = %program, error = %err, "can't run pkg-config");
      return false;
    }
  };

  if !output.success() {
    debug!(program = %program, code = ?output.code, "pkg-config failed");
    return false;
  }

  env.merge_flags(output.stdout.trim())
}
