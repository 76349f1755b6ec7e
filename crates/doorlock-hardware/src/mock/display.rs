//! Mock two-line character display.
//!
//! # Character Encoding - ASCII Only
//!
//! The character LCD on the UI node only has glyphs for printable ASCII
//! (0x20-0x7E). The mock rejects anything else so that screens which would
//! not render on the device fail in tests too.

use doorlock_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use tokio::time::Instant;

use super::recorder::Recorder;
use crate::{HardwareError, Result, traits::DisplayDevice};

/// One full screen as it appeared on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Each line padded to the display width.
    pub lines: [String; DISPLAY_LINES],

    /// When the screen was drawn.
    pub at: Instant,
}

impl DisplayFrame {
    /// Line `index` with the padding removed.
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", |l| l.trim_end())
    }

    /// Returns `true` if any line contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|l| l.contains(text))
    }
}

/// Fit `text` to one display line: truncate to the width, pad with spaces.
///
/// # Errors
///
/// Returns an error if `text` contains non-printable or non-ASCII characters.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::display::fit_line;
///
/// assert_eq!(fit_line("Door is Open").unwrap(), "Door is Open    ");
/// assert_eq!(fit_line("0123456789ABCDEFGH").unwrap(), "0123456789ABCDEF");
/// assert!(fit_line("Senha inválida").is_err());
/// ```
pub fn fit_line(text: &str) -> Result<String> {
    if let Some(c) = text.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(HardwareError::invalid_data(format!(
            "Display accepts printable ASCII only, got {c:?}"
        )));
    }

    Ok(format!(
        "{:<width$.width$}",
        text,
        width = DISPLAY_COLUMNS
    ))
}

/// Mock display recording every screen it is asked to show.
#[derive(Debug)]
pub struct MockDisplay {
    frames: Recorder<DisplayFrame>,
}

impl MockDisplay {
    /// Create a new mock display and its inspection handle.
    pub fn new() -> (Self, MockDisplayHandle) {
        let frames = Recorder::new();
        (
            Self {
                frames: frames.clone(),
            },
            MockDisplayHandle { frames },
        )
    }
}

impl DisplayDevice for MockDisplay {
    async fn show(&mut self, lines: [&str; DISPLAY_LINES]) -> Result<()> {
        let mut fitted: [String; DISPLAY_LINES] = Default::default();
        for (slot, text) in fitted.iter_mut().zip(lines) {
            *slot = fit_line(text)?;
        }

        self.frames.push(DisplayFrame {
            lines: fitted,
            at: Instant::now(),
        });
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.show([""; DISPLAY_LINES]).await
    }
}

/// Handle for inspecting what a mock display has shown.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    frames: Recorder<DisplayFrame>,
}

impl MockDisplayHandle {
    /// Every frame shown so far, oldest first.
    pub fn frames(&self) -> Vec<DisplayFrame> {
        self.frames.snapshot()
    }

    /// The screen currently displayed.
    pub fn current(&self) -> Option<DisplayFrame> {
        self.frames.last()
    }

    /// Number of frames whose any line contains `text`.
    pub fn count_containing(&self, text: &str) -> usize {
        self.frames().iter().filter(|f| f.contains(text)).count()
    }

    /// First frame containing `text`.
    pub fn find(&self, text: &str) -> Option<DisplayFrame> {
        self.frames().into_iter().find(|f| f.contains(text))
    }

    pub fn clear_history(&self) {
        self.frames.clear();
    }
}
