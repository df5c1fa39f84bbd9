//! DOM markers published by the widget vendor.
//!
//! These are external and brittle. If the vendor changes its markup,
//! detection quietly degrades to [`Classification::Pending`](crate::Classification::Pending).

/// Source substring identifying the checkbox ("I'm not a robot") frame.
pub const CHECKBOX_FRAME_PATTERN: &str = "api2/anchor";

/// Source substring identifying the challenge (puzzle) frame.
pub const CHALLENGE_FRAME_PATTERN: &str = "api2/bframe";

/// Header shown in the challenge frame once the session is flagged as automated.
pub const BOT_HEADER_SELECTOR: &str = ".rc-doscaptcha-header-text";
/// Phrase in [`BOT_HEADER_SELECTOR`] marking a blocked session.
pub const BOT_HEADER_MARKER: &str = "Try again later";

/// Error line under the audio challenge.
pub const AUDIO_ERROR_SELECTOR: &str = ".rc-audiochallenge-error-message";
/// Phrase in [`AUDIO_ERROR_SELECTOR`] asking for another attempt.
pub const AUDIO_ERROR_MARKER: &str = "please solve more";
/// Text written over the audio error once a retry has been observed.
pub const RETRY_IN_PROGRESS_TEXT: &str = "Trying again...";

/// Checkbox anchor inside the checkbox frame.
pub const CHECKBOX_ANCHOR_SELECTOR: &str = "#recaptcha-anchor";
/// Accessibility attribute carrying the checked state.
pub const CHECKED_ATTRIBUTE: &str = "aria-checked";
/// Exact attribute value meaning the checkbox is verified.
pub const CHECKED_VALUE: &str = "true";
