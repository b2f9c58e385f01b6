//! Simulated copy chord sent to the foreground application.
//!
//! The chord is sent while the user may still be holding the hotkey, so
//! chord keys that would turn Cmd/Ctrl+C into a different shortcut are
//! released first.

use crate::{AppError, AppResult};

use std::{panic::Location, thread, time::Duration};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;
use tracing::{debug, warn};

/// Delay between key events in the copy chord.
pub(crate) const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Hotkey modifiers that must be up for the copy chord to read as copy.
const INTERFERING_KEYS: [Key; 1] = [Key::Shift];

/// The platform copy modifier: Cmd on macOS, Ctrl elsewhere.
pub(crate) fn copy_modifier() -> Key {
    #[cfg(target_os = "macos")]
    {
        Key::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        Key::Control
    }
}

/// Sends Cmd/Ctrl+C through a keyboard backend.
pub(crate) struct CopyKeystroke<K: Keyboard> {
    keyboard: K,
    key_delay: Duration,
}

impl CopyKeystroke<Enigo> {
    /// Copy chord on the system keyboard.
    ///
    /// `Enigo` is not `Send`, so build one per capture on the thread that
    /// sends the chord.
    #[track_caller]
    pub(crate) fn system() -> AppResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| AppError::CopySimulationFailed {
            reason: format!("Failed to open keyboard simulation: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self::new(enigo, KEY_EVENT_DELAY))
    }
}

impl<K: Keyboard> CopyKeystroke<K> {
    pub(crate) fn new(keyboard: K, key_delay: Duration) -> Self {
        Self {
            keyboard,
            key_delay,
        }
    }

    /// Release interfering keys, then press, click and release the chord.
    ///
    /// The copy modifier is released even when the `c` click fails.
    #[track_caller]
    pub(crate) fn send(&mut self) -> AppResult<()> {
        self.release_interfering_keys();

        let delay = self.key_delay;
        let mut held = HeldModifier::press(&mut self.keyboard, copy_modifier())?;

        thread::sleep(delay);
        held.click_c()?;
        thread::sleep(delay);

        debug!("Copy chord sent");

        Ok(())
    }

    /// A failed release is not fatal: the chord is still sent, but the
    /// application may see it as a different shortcut.
    fn release_interfering_keys(&mut self) {
        for key in INTERFERING_KEYS {
            if let Err(e) = self.keyboard.key(key, Direction::Release) {
                warn!(
                    key = ?key,
                    error = %e,
                    "Failed to release hotkey modifier, copy may capture stale text"
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn keyboard(&self) -> &K {
        &self.keyboard
    }
}

/// Holds the copy modifier down until dropped.
struct HeldModifier<'a, K: Keyboard> {
    keyboard: &'a mut K,
    modifier: Key,
}

impl<'a, K: Keyboard> HeldModifier<'a, K> {
    #[track_caller]
    fn press(keyboard: &'a mut K, modifier: Key) -> AppResult<Self> {
        keyboard
            .key(modifier, Direction::Press)
            .map_err(|e| AppError::CopySimulationFailed {
                reason: format!("Failed to press {:?}: {}", modifier, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { keyboard, modifier })
    }

    #[track_caller]
    fn click_c(&mut self) -> AppResult<()> {
        self.keyboard
            .key(Key::Unicode('c'), Direction::Click)
            .map_err(|e| AppError::CopySimulationFailed {
                reason: format!("Failed to click C: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl<K: Keyboard> Drop for HeldModifier<'_, K> {
    fn drop(&mut self) {
        if let Err(e) = self.keyboard.key(self.modifier, Direction::Release) {
            warn!(
                modifier = ?self.modifier,
                error = %e,
                "Failed to release copy modifier"
            );
        }
    }
}
