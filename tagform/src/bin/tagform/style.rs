//! Terminal colors for report output.

use colored::{Color, Colorize};

/// Kind of a one-line message printed around a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The form or submission passed.
    Valid,
    /// The command failed or the form did not validate.
    Failed,
    /// Input was accepted but is probably not what was meant.
    Warning,
    Note,
    /// Progress shown with `--verbose`.
    Detail,
}

impl Status {
    pub fn mark(self) -> &'static str {
        match self {
            Status::Valid => "✓",
            Status::Failed => "✗",
            Status::Warning => "⚠",
            Status::Note => "ℹ",
            Status::Detail => "→",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Status::Valid => Color::Green,
            Status::Failed => Color::Red,
            Status::Warning => Color::Yellow,
            Status::Note => Color::Blue,
            Status::Detail => Color::BrightBlack,
        }
    }

    /// Diagnostics are written to stderr.
    pub fn to_stderr(self) -> bool {
        matches!(self, Status::Failed | Status::Warning | Status::Detail)
    }
}

pub const HEADING: Color = Color::BrightBlue;
pub const PROPERTY: Color = Color::BrightCyan;
pub const TABLE_HEADER: comfy_table::Color = comfy_table::Color::Cyan;

pub fn paint(text: &str, color: Color, plain: bool) -> String {
    if plain { text.to_string() } else { text.color(color).to_string() }
}

pub fn paint_bold(text: &str, color: Color, plain: bool) -> String {
    if plain {
        text.to_string()
    } else {
        text.color(color).bold().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_use_stderr() {
        assert!(Status::Failed.to_stderr());
        assert!(Status::Warning.to_stderr());
        assert!(!Status::Valid.to_stderr());
        assert!(!Status::Note.to_stderr());
    }

    #[test]
    fn plain_text_is_left_alone() {
        assert_eq!(paint("email", PROPERTY, true), "email");
        assert_eq!(paint_bold("Signup", HEADING, true), "Signup");
    }
}
