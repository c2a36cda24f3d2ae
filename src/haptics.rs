//! Haptic feedback via the Vibration API
//!
//! Best-effort: unsupported platforms (desktop browsers, the native driver)
//! silently skip the pulse. Nothing here can fail loudly.

/// Pulse length for a smashed fly (milliseconds)
const SMASH_PULSE_MS: u32 = 30;

pub struct Haptics {
    enabled: bool,
}

impl Haptics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire a short pulse. Fire-and-forget.
    #[cfg(target_arch = "wasm32")]
    pub fn pulse(&self) {
        if !self.enabled {
            return;
        }
        if let Some(window) = web_sys::window() {
            // Returns false where vibration is unsupported; nothing to do
            let _ = window.navigator().vibrate_with_duration(SMASH_PULSE_MS);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn pulse(&self) {
        if self.enabled {
            log::trace!("haptic pulse (native no-op, {}ms)", SMASH_PULSE_MS);
        }
    }
}
