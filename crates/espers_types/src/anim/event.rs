//! Playback notifications.

use crossbeam_channel::Sender;

use super::PlaybackState;

/// Something that happened during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
	/// The resolved frame index changed
	FrameChanged {
		/// Index before the change
		previous: usize,
		/// Index after the change
		current: usize,
	},
	/// The controller moved between stopped, playing and paused
	StateChanged {
		/// State before the change
		previous: PlaybackState,
		/// State after the change
		current: PlaybackState,
	},
	/// A `Once` sequence reached its end
	Finished,
}

/// Receives playback events from an [`AnimationController`](super::AnimationController).
///
/// Closures taking `&PlaybackEvent` and crossbeam senders implement this
/// trait directly.
pub trait PlaybackObserver {
	/// Called once per event, in the order events occur.
	fn on_event(&mut self, event: &PlaybackEvent);
}

impl<F> PlaybackObserver for F
where
	F: FnMut(&PlaybackEvent),
{
	fn on_event(&mut self, event: &PlaybackEvent) {
		self(event);
	}
}

impl PlaybackObserver for Sender<PlaybackEvent> {
	fn on_event(&mut self, event: &PlaybackEvent) {
		// A dropped receiver just means nobody is listening any more
		let _ = self.send(*event);
	}
}
