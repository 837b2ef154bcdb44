//! Console styling for conversion reports
//!
//! Colors are only used when stdout is a terminal. Human-readable output can
//! be silenced with `--quiet` or `GBK_TO_SQLITE_QUIET=1`; errors and
//! warnings still go to stderr.

use owo_colors::Style;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();
static PALETTE: OnceLock<Palette> = OnceLock::new();

fn quiet_from_env() -> bool {
    std::env::var("GBK_TO_SQLITE_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Fix the quiet setting for the process. Only the first call has effect.
pub fn set_quiet(flag: bool) {
    let _ = QUIET.set(flag || quiet_from_env());
}

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(quiet_from_env)
}

/// Leading glyph of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Convert,
    Done,
    Failed,
    Fallback,
    Detail,
    File,
    Database,
    Batch,
    Tables,
    Elapsed,
}

impl Marker {
    pub fn glyph(self) -> &'static str {
        match self {
            Marker::Convert => "🧬",
            Marker::Done => "✅",
            Marker::Failed => "❌",
            Marker::Fallback => "⚠️",
            Marker::Detail => "ℹ️",
            Marker::File => "📄",
            Marker::Database => "🗄️",
            Marker::Batch => "📦",
            Marker::Tables => "📊",
            Marker::Elapsed => "⏱️",
        }
    }
}

/// What a piece of report text means, which decides its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Ok,
    Failure,
    Caution,
    Label,
    Note,
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn detect() -> Self {
        Self::new(console::Term::stdout().is_term())
    }

    pub fn style(&self, tone: Tone) -> Style {
        if !self.colored {
            return Style::new();
        }
        match tone {
            Tone::Heading => Style::new().cyan().bold(),
            Tone::Ok => Style::new().green().bold(),
            Tone::Failure => Style::new().red().bold(),
            Tone::Caution => Style::new().yellow().bold(),
            Tone::Label => Style::new().white().dimmed(),
            Tone::Note => Style::new().magenta(),
        }
    }
}

pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(Palette::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_palette_adds_no_escapes() {
        let palette = Palette::new(false);
        let text = "records".style(palette.style(Tone::Heading)).to_string();
        assert_eq!(text, "records");
    }

    #[test]
    fn test_colored_palette_styles_text() {
        let palette = Palette::new(true);
        let text = "failed".style(palette.style(Tone::Failure)).to_string();
        assert!(text.contains("failed"));
        assert_ne!(text, "failed");
    }
}
