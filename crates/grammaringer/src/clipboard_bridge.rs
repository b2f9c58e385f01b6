//! Selected-text capture via simulated copy and clipboard read.
//!
//! # Known limitation
//!
//! The foreground application handles the copy asynchronously and there is
//! no way to observe when it has finished writing the clipboard. The settle
//! delay makes a stale read unlikely, not impossible: a slow application
//! can still leave the previous clipboard contents in place.

use crate::{AppError, AppResult, copy_keystroke::CopyKeystroke};

use std::{panic::Location, thread, time::Duration};

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Capability: produce the text currently selected in the foreground app.
///
/// Implementations block for a bounded, sub-second time and are called from
/// a blocking worker, never from the async runtime directly.
pub trait SelectionSource: Send + Sync + 'static {
    /// Capture the current selection. An empty clipboard yields `""`.
    fn capture_selection(&self) -> AppResult<String>;
}

/// Captures selections by simulating Cmd/Ctrl+C and reading the clipboard.
#[derive(Debug, Clone)]
pub struct ClipboardBridge {
    settle_delay: Duration,
}

impl ClipboardBridge {
    /// Create a bridge that waits `settle_delay` between copy and read.
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

impl SelectionSource for ClipboardBridge {
    #[instrument(skip(self), fields(settle_delay_ms = self.settle_delay.as_millis()))]
    fn capture_selection(&self) -> AppResult<String> {
        CopyKeystroke::system()?.send()?;

        thread::sleep(self.settle_delay);

        let text = read_clipboard_text()?;

        debug!(text_len = text.len(), "Selection captured");

        Ok(text)
    }
}

/// Read plain text from the system clipboard, `""` when it holds none.
#[track_caller]
pub(crate) fn read_clipboard_text() -> AppResult<String> {
    let mut clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
        reason: format!("Failed to initialize clipboard: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    match clipboard.get_text() {
        Ok(text) => Ok(text),
        Err(arboard::Error::ContentNotAvailable) => {
            debug!("Clipboard holds no text");
            Ok(String::new())
        }
        Err(e) => Err(AppError::ClipboardError {
            reason: format!("Failed to read clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
