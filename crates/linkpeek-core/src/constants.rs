//! Engine-wide timing and layout constants.
//!
//! Timing values define the interaction feel: a dwell must outlive the open
//! delay before any network traffic happens, and an abandon only hides the
//! preview after a short grace period so the pointer can travel onto it.

use std::time::Duration;

/// Delay between a dwell and the earliest fetch dispatch, in milliseconds.
pub const FETCH_START_DELAY_MS: u64 = 150;

/// Target time between a dwell and a fully fetched preview, in milliseconds.
pub const FETCH_COMPLETE_TARGET_DELAY_MS: u64 = 350 + FETCH_START_DELAY_MS;

/// The open timer: time from dwell to fetch dispatch, sized so a typical
/// response lands near [`FETCH_COMPLETE_TARGET_DELAY_MS`].
pub const OPEN_DELAY: Duration =
    Duration::from_millis(FETCH_COMPLETE_TARGET_DELAY_MS - FETCH_START_DELAY_MS);

/// Grace period between pointer leave and actually hiding the preview.
pub const ABANDON_END_DELAY: Duration = Duration::from_millis(300);

/// Time a preview must stay up before it counts as seen.
pub const PREVIEW_SEEN_DURATION: Duration = Duration::from_millis(1000);

/// Delay after attach before interaction handlers are bound to the surface
/// and the shown signal is emitted.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Fade-out duration; the surface is detached once it elapses.
pub const HIDE_ANIMATION_DELAY: Duration = Duration::from_millis(150);

/// Width of a landscape-layout popup (tall thumbnail beside the text).
pub const LANDSCAPE_POPUP_WIDTH: f64 = 450.0;

/// Width of a portrait-layout popup (landscape thumbnail above the text).
pub const PORTRAIT_POPUP_WIDTH: f64 = 320.0;

/// Height of the rendered pointer/arrow, reserved above or below the popup.
pub const POINTER_SIZE: f64 = 8.0;

/// Links at most this wide (roughly under four characters) get the pointer
/// centered on them instead of under the pointer position.
pub const MAX_LINK_WIDTH_FOR_CENTERED_POINTER: f64 = 28.0;

/// Horizontal nudge that keeps the pointer arrow over the pointer position.
pub const POINTER_NUDGE: f64 = 18.0;

/// Default width of the extract column.
pub const DEFAULT_EXTRACT_WIDTH: f64 = 215.0;
