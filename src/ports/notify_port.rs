//! Notification sink port trait.

use crate::domain::error::SigscanError;

/// Human-readable event delivery. Fire-and-forget from the engine's
/// perspective: failures are logged and swallowed, never rolled back into
/// position state.
pub trait NotifyPort {
    fn send(&self, text: &str) -> Result<(), SigscanError>;
}
