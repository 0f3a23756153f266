//! Error types for animation editing and playback.

use thiserror::Error;

/// Errors that can occur when editing or playing an animation sequence
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnimationError {
	/// The sequence holds no frames
	#[error("Animation sequence has no frames")]
	EmptySequence,

	/// Frame and duration lists disagree in length
	#[error("Animation sequence has {frames} frames but {durations} durations")]
	LengthMismatch {
		/// Number of frames
		frames: usize,
		/// Number of durations
		durations: usize,
	},

	/// A frame duration of zero milliseconds
	#[error("Frame {index} has zero duration")]
	ZeroDuration {
		/// Offending frame
		index: usize,
	},

	/// Frame index past the end of the sequence
	#[error("Frame {index} out of range (sequence has {count} frames)")]
	FrameOutOfRange {
		/// Requested frame
		index: usize,
		/// Number of frames in the sequence
		count: usize,
	},

	/// Speed multiplier outside the accepted range
	#[error("Playback speed {0} out of range (0.5-2.0)")]
	SpeedOutOfRange(f64),

	/// Removing the frame would leave the sequence empty
	#[error("Cannot remove the only frame of a sequence")]
	LastFrame,
}
