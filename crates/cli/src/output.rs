//! Output formatting shared by both binaries.

use std::fmt::Display;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// `error: <message>` on stderr, the prefix in red when supported.
pub fn print_error(message: impl Display) {
  eprintln!("{} {}", "error:".if_supports_color(Stream::Stderr, |s| s.red()), message);
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print `value` as text or JSON.
pub fn print_value<T: Serialize + Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    print_json(value)
  } else {
    println!("{}", value);
    Ok(())
  }
}

/// Print one item per line, or a JSON array.
pub fn print_lines<T: Serialize + Display>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(&items);
  }
  for item in items {
    println!("{}", item);
  }
  Ok(())
}
