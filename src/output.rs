//! What the CLI prints to stdout and stderr.

use std::borrow::Cow;
use std::path::Path;

use crate::colors::Colors;

/// What the CLI prints when no output file is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// The input format's own syntax
    Native,
    /// The canonical JSON interchange string
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Native
        }
    }
}

/// Print resolved content to stdout, ending with exactly one newline.
pub fn print_content(content: &str) {
    print!("{}", with_trailing_newline(content));
}

fn with_trailing_newline(content: &str) -> Cow<'_, str> {
    if content.ends_with('\n') {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(format!("{content}\n"))
    }
}

pub fn print_written(path: &Path, colors: &Colors) {
    println!(
        "{}Wrote:{} {}",
        colors.success,
        colors.reset(),
        path.display()
    );
}

pub fn print_created(path: &Path, colors: &Colors) {
    println!(
        "{}Created:{} {}",
        colors.success,
        colors.reset(),
        path.display()
    );
}

pub fn print_error(err: &dyn std::fmt::Display, colors: &Colors) {
    eprintln!("{}Error:{} {err}", colors.error, colors.reset());
}
