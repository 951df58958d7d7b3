//! Two-line display rendering
//!
//! The station uses a 16x2 character LCD. Every row written to it is exactly
//! 16 characters: shorter text is padded with spaces so leftovers from the
//! previous frame are overwritten, longer text is cut.
//!
//! ```text
//! Score mode          Stats mode, fine      Stats mode, uncomfortable
//! +----------------+  +----------------+    +----------------+
//! |Study Env Score |  |T:22.50C L: 50% |    |Discomfort:     |
//! |Score:  75/100  |  |Sound: 20%      |    |cold,dark,loud  |
//! +----------------+  +----------------+    +----------------+
//! ```

use core::fmt::{self, Write};

use crate::classifier::Reason;

/// Characters per display row
pub const DISPLAY_WIDTH: usize = 16;

/// Number of display rows
pub const DISPLAY_ROWS: usize = 2;

/// One display row, always exactly `DISPLAY_WIDTH` characters
///
/// Sized in bytes for the worst case of four-byte characters.
pub type DisplayLine = heapless::String<{ DISPLAY_WIDTH * 4 }>;

/// What the display shows, toggled by the button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Readings, or the discomfort reasons when there are any
    #[default]
    Stats,
    /// The study score
    Score,
}

impl DisplayMode {
    /// Name printed when the mode changes
    pub const fn label(self) -> &'static str {
        match self {
            DisplayMode::Stats => "STATS",
            DisplayMode::Score => "SCORE",
        }
    }

    /// The other mode
    pub const fn toggled(self) -> Self {
        match self {
            DisplayMode::Stats => DisplayMode::Score,
            DisplayMode::Score => DisplayMode::Stats,
        }
    }
}

/// Right-pad or truncate `text` to exactly `DISPLAY_WIDTH` characters
pub fn pad16(text: &str) -> DisplayLine {
    let mut line = DisplayLine::new();
    let mut width = 0;
    for ch in text.chars().chain(core::iter::repeat(' ')) {
        if width == DISPLAY_WIDTH || line.push(ch).is_err() {
            break;
        }
        width += 1;
    }
    line
}

/// Format into a row; anything past the buffer is dropped, then padded
fn format_line(args: fmt::Arguments<'_>) -> DisplayLine {
    let mut scratch: heapless::String<64> = heapless::String::new();
    // Overflow only loses characters that truncation would drop anyway
    let _ = scratch.write_fmt(args);
    pad16(&scratch)
}

/// Temperature as shown on the console and display: `23.12C` or `N/A`
pub fn format_temperature(temp_c: Option<f32>) -> heapless::String<16> {
    let mut text = heapless::String::new();
    match temp_c {
        Some(t) => {
            let _ = write!(text, "{:.2}C", t);
        }
        None => {
            let _ = text.push_str("N/A");
        }
    }
    text
}

/// A full display frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Rows, top first, each exactly `DISPLAY_WIDTH` characters
    pub lines: [DisplayLine; DISPLAY_ROWS],
}

impl DisplayFrame {
    /// Score screen
    pub fn score(score: u8) -> Self {
        Self {
            lines: [
                pad16("Study Env Score"),
                format_line(format_args!("Score: {:3}/100", score)),
            ],
        }
    }

    /// Stats screen; lists the reasons instead when there are any
    pub fn stats(temp_c: Option<f32>, light_pct: u8, sound_pct: u8, reasons: &[Reason]) -> Self {
        if reasons.is_empty() {
            let temp = format_temperature(temp_c);
            Self {
                lines: [
                    format_line(format_args!("T:{} L:{:3}%", temp, light_pct)),
                    format_line(format_args!("Sound:{:3}%", sound_pct)),
                ],
            }
        } else {
            Self {
                lines: [pad16("Discomfort:"), format_line(format_args!("{}", JoinedReasons(reasons, ",")))],
            }
        }
    }

    /// Row `row` as text; empty past the last row
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }
}

/// Displays reasons joined by a separator without allocating
pub struct JoinedReasons<'a>(pub &'a [Reason], pub &'a str);

impl fmt::Display for JoinedReasons<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            f.write_str(reason.as_str())?;
        }
        Ok(())
    }
}
