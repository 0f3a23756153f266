use std::sync::Arc;

use super::*;

fn create_sequence(count: usize, duration: u32, mode: PlaybackMode) -> AnimationSequence {
	let frames = (0..count)
		.map(|i| {
			let sprite = Sprite::new(SpriteKind::Overworld, 1, vec![i as u8; 128], Palette::grayscale()).unwrap();
			Arc::new(sprite.with_id(i as u32))
		})
		.collect();
	AnimationSequence::from_frames("walk", frames, vec![duration; count], mode).unwrap()
}

#[test]
fn test_loop_wraps_every_cycle() {
	let seq = create_sequence(5, 80, PlaybackMode::Loop);
	for k in 0..5u32 {
		assert_eq!(seq.frame_at_time(f64::from(k * 80)), k as usize);
	}
	assert_eq!(seq.frame_at_time(400.0), 0);
	assert_eq!(seq.frame_at_time(4000.0 + 170.0), 2);
}

#[test]
fn test_ping_pong_mirrors() {
	let seq = create_sequence(3, 100, PlaybackMode::PingPong);
	assert_eq!(seq.frame_at_time(250.0), seq.frame_at_time(349.0));
	for t in 0..300 {
		let t = f64::from(t);
		assert_eq!(seq.frame_at_time(t), seq.frame_at_time(599.0 - t), "t = {t}");
	}
}

#[test]
fn test_controller_over_extracted_frames() {
	let seq = Arc::new(create_sequence(4, 100, PlaybackMode::Once));
	let (tx, rx) = crossbeam_channel::unbounded();
	let mut controller = AnimationController::new(Arc::clone(&seq)).unwrap();
	controller.add_observer(tx);
	controller.set_speed(2.0).unwrap();
	controller.play();

	let mut visited = vec![controller.current_sprite().unwrap().id()];
	for _ in 0..30 {
		controller.advance(16.0);
		let id = controller.current_sprite().unwrap().id();
		if visited.last() != Some(&id) {
			visited.push(id);
		}
	}
	assert_eq!(visited, vec![0, 1, 2, 3]);
	assert_eq!(controller.state(), PlaybackState::Stopped);

	let events: Vec<_> = rx.try_iter().collect();
	assert_eq!(events.last(), Some(&PlaybackEvent::Finished));
	let frame_changes = events.iter().filter(|e| matches!(e, PlaybackEvent::FrameChanged { .. })).count();
	assert_eq!(frame_changes, 3);
}
