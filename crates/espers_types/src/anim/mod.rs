//! Frame sequencing and playback.
//!
//! An [`AnimationSequence`] is an editable list of sprite frames with
//! per-frame durations and a [`PlaybackMode`]. An [`AnimationController`]
//! plays one sequence, mapping accumulated time to a frame index:
//!
//! - **Once**: time is clamped to the sequence length; reaching the end stops
//!   on the last frame
//! - **Loop**: time wraps modulo the sequence length
//! - **PingPong**: time wraps modulo twice the length, the second half
//!   mirrored so playback runs back to the first frame
//!
//! The controller is single-threaded and has no clock; callers drive it with
//! [`AnimationController::advance`] and listen through [`PlaybackObserver`]s.

use std::fmt;

use serde::{Deserialize, Serialize};

mod controller;
mod error;
mod event;
mod sequence;

pub use controller::{AnimationController, MAX_SPEED, MIN_SPEED, PlaybackCursor};
pub use error::AnimationError;
pub use event::{PlaybackEvent, PlaybackObserver};
pub use sequence::AnimationSequence;

/// Looping policy for a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
	/// Play through once and stop on the last frame
	Once,
	/// Wrap back to the first frame
	#[default]
	Loop,
	/// Play forward, then backward, then forward again
	PingPong,
}

impl fmt::Display for PlaybackMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Once => write!(f, "once"),
			Self::Loop => write!(f, "loop"),
			Self::PingPong => write!(f, "ping-pong"),
		}
	}
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
	/// At rest; `advance` has no effect
	#[default]
	Stopped,
	/// `advance` moves the cursor
	Playing,
	/// Holding position until resumed
	Paused,
}

/// Which half of a `PingPong` cycle is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
	/// Toward the last frame
	#[default]
	Forward,
	/// Toward the first frame
	Backward,
}
