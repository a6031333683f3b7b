//! Terminal reporting for stagekit commands.
//!
//! Text mode prints one status line per outcome, followed by right-aligned
//! `label value` fields. JSON mode prints the command's report object instead.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

/// Label column width, wide enough for "exelinkflags".
const LABEL_WIDTH: usize = 12;

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

/// Outcome class of a status line. Warnings and failures go to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Note,
  Warn,
  Failed,
}

impl Status {
  fn marker(self) -> &'static str {
    match self {
      Status::Done => "==>",
      Status::Note => "-->",
      Status::Warn => "warning:",
      Status::Failed => "error:",
    }
  }

  fn stream(self) -> Stream {
    match self {
      Status::Done | Status::Note => Stream::Stdout,
      Status::Warn | Status::Failed => Stream::Stderr,
    }
  }
}

pub fn status(kind: Status, message: &str) {
  let stream = kind.stream();
  let marker_text = kind.marker();
  let marker = marker_text.if_supports_color(stream, |m| match kind {
    Status::Done => m.green().bold().to_string(),
    Status::Note => m.cyan().to_string(),
    Status::Warn => m.yellow().bold().to_string(),
    Status::Failed => m.red().bold().to_string(),
  });
  match stream {
    Stream::Stderr => eprintln!("{} {}", marker, message),
    _ => println!("{} {}", marker, message),
  }
}

/// Section title for grouped fields, e.g. the dependency listing.
pub fn heading(title: &str) {
  println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
}

pub fn field(label: &str, value: impl Display) {
  let label = format!("{:>width$}", label, width = LABEL_WIDTH);
  println!("{} {}", label.if_supports_color(Stream::Stdout, |l| l.dimmed()), value);
}

/// Wall-clock time of a build: tenths of a second, minutes past one minute.
pub fn elapsed(duration: Duration) -> String {
  let secs = duration.as_secs();
  if secs >= 60 {
    format!("{}m{:02}s", secs / 60, secs % 60)
  } else {
    format!("{:.1}s", duration.as_secs_f64())
  }
}

/// Space-separated flags or patterns; `(none)` for an empty list.
pub fn flag_list(items: &[String]) -> String {
  if items.is_empty() {
    "(none)".to_string()
  } else {
    items.join(" ")
  }
}

pub fn emit_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to encode report as JSON")?;
  println!("{}", json);
  Ok(())
}
