//! Playback state machine driven by caller-supplied time deltas.

use std::{fmt, sync::Arc};

use log::debug;

use crate::file::Sprite;

use super::{
	AnimationError, AnimationSequence, Direction, PlaybackEvent, PlaybackMode, PlaybackObserver,
	PlaybackState,
};

/// Slowest accepted speed multiplier
pub const MIN_SPEED: f64 = 0.5;

/// Fastest accepted speed multiplier
pub const MAX_SPEED: f64 = 2.0;

/// Transient playback position, rebuilt whenever a sequence is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
	/// Resolved frame index
	pub index: usize,
	/// Milliseconds into the sequence (into the full cycle for `PingPong`)
	pub elapsed: f64,
	/// Stopped, playing or paused
	pub state: PlaybackState,
	/// Current `PingPong` half
	pub direction: Direction,
	/// Multiplier applied to every delta
	pub speed: f64,
}

impl Default for PlaybackCursor {
	fn default() -> Self {
		Self {
			index: 0,
			elapsed: 0.0,
			state: PlaybackState::Stopped,
			direction: Direction::Forward,
			speed: 1.0,
		}
	}
}

/// Plays an [`AnimationSequence`].
///
/// The controller does no timing of its own: a render loop calls
/// [`AnimationController::advance`] with the milliseconds since the last
/// tick. Frame and state changes are reported to registered observers only
/// when the value actually changes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use espers_types::anim::{AnimationController, AnimationSequence, PlaybackMode, PlaybackState};
/// use espers_types::file::{Palette, Sprite, SpriteKind};
///
/// let frame = Arc::new(Sprite::new(SpriteKind::Overworld, 1, vec![0; 128], Palette::new())?);
/// let seq = AnimationSequence::from_frames(
///     "blink",
///     vec![Arc::clone(&frame), frame],
///     vec![100, 100],
///     PlaybackMode::Once,
/// )?;
///
/// let mut controller = AnimationController::new(Arc::new(seq))?;
/// controller.play();
/// controller.advance(150.0);
/// assert_eq!(controller.current_frame(), 1);
///
/// controller.advance(100.0);
/// assert_eq!(controller.state(), PlaybackState::Stopped);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct AnimationController {
	sequence: Arc<AnimationSequence>,
	cursor: PlaybackCursor,
	observers: Vec<Box<dyn PlaybackObserver>>,
}

impl fmt::Debug for AnimationController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnimationController")
			.field("sequence", &self.sequence.name())
			.field("cursor", &self.cursor)
			.field("observers", &self.observers.len())
			.finish()
	}
}

impl AnimationController {
	/// Creates a stopped controller at frame 0.
	///
	/// # Errors
	///
	/// Returns an error if the sequence fails [`AnimationSequence::validate`].
	pub fn new(sequence: Arc<AnimationSequence>) -> Result<Self, AnimationError> {
		sequence.validate()?;
		Ok(Self {
			sequence,
			cursor: PlaybackCursor::default(),
			observers: Vec::new(),
		})
	}

	/// Replaces the sequence and rebuilds the cursor. Observers stay registered.
	///
	/// # Errors
	///
	/// Returns an error if the sequence fails validation; the controller is
	/// left unchanged.
	pub fn attach(&mut self, sequence: Arc<AnimationSequence>) -> Result<(), AnimationError> {
		sequence.validate()?;
		let previous = self.cursor;
		self.sequence = sequence;
		self.cursor = PlaybackCursor::default();
		debug!("Attached sequence {:?}", self.sequence.name());
		self.notify_changes(previous);
		Ok(())
	}

	/// Registers an observer for playback events.
	pub fn add_observer(&mut self, observer: impl PlaybackObserver + 'static) {
		self.observers.push(Box::new(observer));
	}

	/// Removes every observer.
	pub fn clear_observers(&mut self) {
		self.observers.clear();
	}

	/// Starts or resumes playback.
	///
	/// A `Once` sequence that already ran to its end restarts from frame 0.
	pub fn play(&mut self) {
		let previous = self.cursor;
		if self.sequence.mode() == PlaybackMode::Once && self.is_at_end() {
			self.cursor.elapsed = 0.0;
			self.cursor.index = 0;
		}
		self.cursor.state = PlaybackState::Playing;
		self.notify_changes(previous);
	}

	/// Pauses playback, keeping the position.
	pub fn pause(&mut self) {
		if self.cursor.state == PlaybackState::Playing {
			let previous = self.cursor;
			self.cursor.state = PlaybackState::Paused;
			self.notify_changes(previous);
		}
	}

	/// Stops playback and rewinds to frame 0.
	pub fn stop(&mut self) {
		let previous = self.cursor;
		self.cursor = PlaybackCursor {
			speed: previous.speed,
			..PlaybackCursor::default()
		};
		self.notify_changes(previous);
	}

	/// Pauses when playing, plays otherwise.
	pub fn toggle(&mut self) {
		if self.cursor.state == PlaybackState::Playing {
			self.pause();
		} else {
			self.play();
		}
	}

	/// Moves playback forward by `delta_ms` scaled by the speed multiplier.
	///
	/// Does nothing unless playing. A `Once` sequence that reaches its end
	/// stops on the last frame and reports [`PlaybackEvent::Finished`].
	/// Non-finite deltas are ignored.
	pub fn advance(&mut self, delta_ms: f64) {
		if self.cursor.state != PlaybackState::Playing {
			return;
		}
		if !delta_ms.is_finite() {
			debug!("Ignoring non-finite delta {delta_ms}");
			return;
		}
		let previous = self.cursor;
		let target = self.cursor.elapsed + delta_ms * self.cursor.speed;
		self.seek(target);

		let finished = self.sequence.mode() == PlaybackMode::Once && self.is_at_end();
		if finished {
			self.cursor.state = PlaybackState::Stopped;
		}
		self.notify_changes(previous);
		if finished {
			self.emit(PlaybackEvent::Finished);
		}
	}

	/// Sets the speed multiplier.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::SpeedOutOfRange`] unless `speed` is within
	/// `[0.5, 2.0]`.
	pub fn set_speed(&mut self, speed: f64) -> Result<(), AnimationError> {
		if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
			return Err(AnimationError::SpeedOutOfRange(speed));
		}
		self.cursor.speed = speed;
		Ok(())
	}

	/// Seeks to the start of frame `index`.
	///
	/// Observers hear about the move only if the frame index changes.
	///
	/// # Errors
	///
	/// Returns [`AnimationError::FrameOutOfRange`] if `index` is past the end.
	pub fn jump_to_frame(&mut self, index: usize) -> Result<(), AnimationError> {
		let start = self.sequence.frame_start(index).ok_or(AnimationError::FrameOutOfRange {
			index,
			count: self.sequence.len(),
		})?;
		let previous = self.cursor;
		self.seek(start as f64);
		self.notify_changes(previous);
		Ok(())
	}

	/// Seeks to `t` milliseconds, normalized by the playback mode.
	///
	/// Observers hear about the move only if the frame index changes.
	/// Non-finite times leave the cursor where it is.
	pub fn jump_to_time(&mut self, t: f64) {
		if !t.is_finite() {
			debug!("Ignoring seek to non-finite time {t}");
			return;
		}
		let previous = self.cursor;
		self.seek(t);
		self.notify_changes(previous);
	}

	/// Returns the attached sequence.
	pub fn sequence(&self) -> &Arc<AnimationSequence> {
		&self.sequence
	}

	/// Returns a copy of the cursor.
	pub fn cursor(&self) -> PlaybackCursor {
		self.cursor
	}

	/// Returns the resolved frame index.
	pub fn current_frame(&self) -> usize {
		self.cursor.index
	}

	/// Returns the sprite for the resolved frame.
	pub fn current_sprite(&self) -> Option<&Arc<Sprite>> {
		self.sequence.frame(self.cursor.index)
	}

	/// Returns the playback state.
	pub fn state(&self) -> PlaybackState {
		self.cursor.state
	}

	/// Returns the speed multiplier.
	pub fn speed(&self) -> f64 {
		self.cursor.speed
	}

	/// Milliseconds into the sequence, or into the full cycle for `PingPong`.
	pub fn elapsed(&self) -> f64 {
		self.cursor.elapsed
	}

	/// Returns the current `PingPong` half. Always forward in other modes.
	pub fn direction(&self) -> Direction {
		self.cursor.direction
	}

	/// Fraction of the sequence (or `PingPong` cycle) played, in `[0, 1]`.
	pub fn progress(&self) -> f64 {
		let span = self.span();
		if span <= 0.0 {
			return 0.0;
		}
		(self.cursor.elapsed / span).clamp(0.0, 1.0)
	}

	fn span(&self) -> f64 {
		let total = self.sequence.total_duration() as f64;
		match self.sequence.mode() {
			PlaybackMode::PingPong => 2.0 * total,
			PlaybackMode::Once | PlaybackMode::Loop => total,
		}
	}

	fn is_at_end(&self) -> bool {
		self.cursor.elapsed >= self.sequence.total_duration() as f64
	}

	/// Normalizes `t` for the mode and updates index, elapsed and direction.
	fn seek(&mut self, t: f64) {
		let total = self.sequence.total_duration() as f64;
		let elapsed = match self.sequence.mode() {
			PlaybackMode::Once => t.clamp(0.0, total),
			PlaybackMode::Loop | PlaybackMode::PingPong => t.rem_euclid(self.span()),
		};
		self.cursor.elapsed = elapsed;
		self.cursor.index = self.sequence.frame_at_time(elapsed);
		self.cursor.direction = if self.sequence.mode() == PlaybackMode::PingPong && elapsed >= total {
			Direction::Backward
		} else {
			Direction::Forward
		};
	}

	fn notify_changes(&mut self, previous: PlaybackCursor) {
		if previous.index != self.cursor.index {
			self.emit(PlaybackEvent::FrameChanged {
				previous: previous.index,
				current: self.cursor.index,
			});
		}
		if previous.state != self.cursor.state {
			self.emit(PlaybackEvent::StateChanged {
				previous: previous.state,
				current: self.cursor.state,
			});
		}
	}

	fn emit(&mut self, event: PlaybackEvent) {
		debug!("Playback event: {event:?}");
		for observer in &mut self.observers {
			observer.on_event(&event);
		}
	}
}
