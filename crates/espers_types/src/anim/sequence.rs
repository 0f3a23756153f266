//! Ordered frames with per-frame durations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::file::Sprite;

use super::{AnimationError, PlaybackMode};

/// An ordered list of shared sprite frames, each shown for a fixed number of
/// milliseconds.
///
/// Frames are reference counted so one sprite can appear in several
/// sequences. Editing operations keep `frames` and `durations` the same
/// length and refresh the modified timestamp. [`AnimationSequence::validate`]
/// is not run automatically; call it before handing a sequence to
/// something that needs a playable one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use espers_types::anim::{AnimationSequence, PlaybackMode};
/// use espers_types::file::{Palette, Sprite, SpriteKind};
///
/// let frame = Arc::new(Sprite::new(SpriteKind::Overworld, 1, vec![0; 128], Palette::new())?);
///
/// let mut seq = AnimationSequence::new("walk");
/// seq.add_frame(Arc::clone(&frame), 100)?;
/// seq.add_frame(frame, 150)?;
/// seq.set_mode(PlaybackMode::PingPong);
///
/// assert_eq!(seq.total_duration(), 250);
/// assert_eq!(seq.frame_at(120.0), 1);
/// assert!(seq.validate().is_ok());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSequence {
	name: String,
	frames: Vec<Arc<Sprite>>,
	durations: Vec<u32>,
	mode: PlaybackMode,
	created: DateTime<Utc>,
	modified: DateTime<Utc>,
}

impl AnimationSequence {
	/// Creates an empty sequence in [`PlaybackMode::Loop`].
	pub fn new(name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			name: name.into(),
			frames: Vec::new(),
			durations: Vec::new(),
			mode: PlaybackMode::default(),
			created: now,
			modified: now,
		}
	}

	/// Creates a sequence from parallel frame and duration lists.
	///
	/// # Errors
	///
	/// Returns an error if the lists are empty, differ in length or contain a
	/// zero duration.
	pub fn from_frames(
		name: impl Into<String>,
		frames: Vec<Arc<Sprite>>,
		durations: Vec<u32>,
		mode: PlaybackMode,
	) -> Result<Self, AnimationError> {
		let mut seq = Self::new(name);
		seq.frames = frames;
		seq.durations = durations;
		seq.mode = mode;
		seq.validate()?;
		Ok(seq)
	}

	/// Checks that the sequence is playable.
	///
	/// # Errors
	///
	/// Returns the first problem found: no frames, mismatched list lengths or a
	/// zero duration.
	pub fn validate(&self) -> Result<(), AnimationError> {
		if self.frames.len() != self.durations.len() {
			return Err(AnimationError::LengthMismatch {
				frames: self.frames.len(),
				durations: self.durations.len(),
			});
		}
		if self.frames.is_empty() {
			return Err(AnimationError::EmptySequence);
		}
		if let Some(index) = self.durations.iter().position(|&d| d == 0) {
			return Err(AnimationError::ZeroDuration {
				index,
			});
		}
		Ok(())
	}

	/// Returns the display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Renames the sequence.
	pub fn rename(&mut self, name: impl Into<String>) {
		self.name = name.into();
		self.touch();
	}

	/// Returns the playback mode.
	pub fn mode(&self) -> PlaybackMode {
		self.mode
	}

	/// Sets the playback mode.
	pub fn set_mode(&mut self, mode: PlaybackMode) {
		self.mode = mode;
		self.touch();
	}

	/// Returns the number of frames.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns true if the sequence has no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns the frames in order.
	pub fn frames(&self) -> &[Arc<Sprite>] {
		&self.frames
	}

	/// Returns the per-frame durations in milliseconds.
	pub fn durations(&self) -> &[u32] {
		&self.durations
	}

	/// Returns the frame at `index`.
	pub fn frame(&self, index: usize) -> Option<&Arc<Sprite>> {
		self.frames.get(index)
	}

	/// Returns the duration of the frame at `index`.
	pub fn duration(&self, index: usize) -> Option<u32> {
		self.durations.get(index).copied()
	}

	/// Sum of all frame durations in milliseconds.
	pub fn total_duration(&self) -> u64 {
		self.durations.iter().map(|&d| u64::from(d)).sum()
	}

	/// Creation timestamp.
	pub fn created(&self) -> DateTime<Utc> {
		self.created
	}

	/// Timestamp of the last edit.
	pub fn modified(&self) -> DateTime<Utc> {
		self.modified
	}

	/// Appends a frame.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::ZeroDuration`] if `duration` is zero.
	pub fn add_frame(&mut self, frame: Arc<Sprite>, duration: u32) -> Result<(), AnimationError> {
		self.insert_frame(self.frames.len(), frame, duration)
	}

	/// Inserts a frame before `index`; `index == len()` appends.
	///
	/// # Errors
	///
	/// Returns an error if `index > len()` or `duration` is zero.
	pub fn insert_frame(
		&mut self,
		index: usize,
		frame: Arc<Sprite>,
		duration: u32,
	) -> Result<(), AnimationError> {
		if index > self.frames.len() {
			return Err(self.out_of_range(index));
		}
		if duration == 0 {
			return Err(AnimationError::ZeroDuration {
				index,
			});
		}
		self.frames.insert(index, frame);
		self.durations.insert(index, duration);
		self.touch();
		Ok(())
	}

	/// Removes and returns the frame at `index` with its duration.
	///
	/// # Errors
	///
	/// Returns an error if `index` is out of range or it is the only frame.
	pub fn remove_frame(&mut self, index: usize) -> Result<(Arc<Sprite>, u32), AnimationError> {
		self.check_index(index)?;
		if self.frames.len() == 1 {
			return Err(AnimationError::LastFrame);
		}
		let frame = self.frames.remove(index);
		let duration = self.durations.remove(index);
		self.touch();
		Ok((frame, duration))
	}

	/// Moves the frame at `from` so it ends up at index `to`.
	///
	/// # Errors
	///
	/// Returns an error if either index is out of range.
	pub fn move_frame(&mut self, from: usize, to: usize) -> Result<(), AnimationError> {
		self.check_index(from)?;
		self.check_index(to)?;
		if from != to {
			let frame = self.frames.remove(from);
			let duration = self.durations.remove(from);
			self.frames.insert(to, frame);
			self.durations.insert(to, duration);
			self.touch();
		}
		Ok(())
	}

	/// Sets the duration of one frame.
	///
	/// # Errors
	///
	/// Returns an error if `index` is out of range or `duration` is zero.
	pub fn set_duration(&mut self, index: usize, duration: u32) -> Result<(), AnimationError> {
		self.check_index(index)?;
		if duration == 0 {
			return Err(AnimationError::ZeroDuration {
				index,
			});
		}
		self.durations[index] = duration;
		self.touch();
		Ok(())
	}

	/// Sets every frame to the same duration.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::ZeroDuration`] if `duration` is zero.
	pub fn set_all_durations(&mut self, duration: u32) -> Result<(), AnimationError> {
		if duration == 0 {
			return Err(AnimationError::ZeroDuration {
				index: 0,
			});
		}
		self.durations.fill(duration);
		self.touch();
		Ok(())
	}

	/// Time in milliseconds at which the frame at `index` starts.
	pub fn frame_start(&self, index: usize) -> Option<u64> {
		(index < self.durations.len())
			.then(|| self.durations[..index].iter().map(|&d| u64::from(d)).sum())
	}

	/// Index of the first frame whose cumulative end exceeds `u` milliseconds.
	///
	/// Times past the end resolve to the last frame; an empty sequence
	/// resolves to 0.
	pub fn frame_at(&self, u: f64) -> usize {
		let mut end = 0u64;
		for (index, &duration) in self.durations.iter().enumerate() {
			end += u64::from(duration);
			if u < end as f64 {
				return index;
			}
		}
		self.durations.len().saturating_sub(1)
	}

	/// Resolves elapsed time `t` to a frame index under the playback mode.
	///
	/// - `Once` clamps `t` to `[0, total]`
	/// - `Loop` wraps `t` into `[0, total)`, negative times included
	/// - `PingPong` wraps into a cycle of `2 * total` and plays the second half
	///   backwards
	pub fn frame_at_time(&self, t: f64) -> usize {
		let total = self.total_duration() as f64;
		if total <= 0.0 {
			return 0;
		}
		match self.mode {
			PlaybackMode::Once => self.frame_at(t.clamp(0.0, total)),
			PlaybackMode::Loop => self.frame_at(t.rem_euclid(total)),
			PlaybackMode::PingPong => {
				let cycle = 2.0 * total;
				let u = t.rem_euclid(cycle);
				if u < total {
					self.frame_at(u)
				} else {
					self.frame_at(cycle - u - 1.0)
				}
			}
		}
	}

	fn check_index(&self, index: usize) -> Result<(), AnimationError> {
		if index < self.frames.len() {
			Ok(())
		} else {
			Err(self.out_of_range(index))
		}
	}

	fn out_of_range(&self, index: usize) -> AnimationError {
		AnimationError::FrameOutOfRange {
			index,
			count: self.frames.len(),
		}
	}

	fn touch(&mut self) {
		self.modified = Utc::now();
		debug!("Sequence {:?} edited: {} frames, {} ms", self.name, self.len(), self.total_duration());
	}
}
