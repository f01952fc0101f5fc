//! Tests for command / dialogue queues.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::components::{
        BehaviorState, CommandQueue, DialogueClip, DialogueQueue, NpcCommand,
    };
    use crate::error::SequencerError;

    #[test]
    fn test_command_queue_fifo_random_sequences() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let mut queue = CommandQueue::default();
            let count = rng.gen_range(0..40);
            let mut expected = Vec::with_capacity(count);

            for _ in 0..count {
                let state = BehaviorState::ALL[rng.gen_range(0..BehaviorState::ALL.len())];
                let duration = rng.gen_range(0.0..5.0f32);
                let command = NpcCommand::new(state).with_duration(duration);
                expected.push(command.clone());
                queue.enqueue(command);
            }

            let mut drained = Vec::new();
            while !queue.is_empty() {
                drained.push(queue.dequeue().unwrap());
            }

            assert_eq!(drained, expected);
        }
    }

    #[test]
    fn test_command_queue_empty_dequeue_fails() {
        let mut queue = CommandQueue::default();
        assert!(queue.is_empty());
        assert!(matches!(queue.dequeue(), Err(SequencerError::EmptyQueue)));

        queue.enqueue(NpcCommand::new(BehaviorState::Wave));
        assert_eq!(queue.len(), 1);
        assert!(queue.dequeue().is_ok());
        assert!(matches!(queue.dequeue(), Err(SequencerError::EmptyQueue)));
    }

    #[test]
    fn test_dialogue_queue_fifo() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut queue = DialogueQueue::default();

        let clips: Vec<_> = (0..20)
            .map(|i| DialogueClip::new(format!("line_{}", i), rng.gen_range(0.5..3.0f32)))
            .collect();
        for clip in &clips {
            queue.enqueue(clip.clone());
        }

        for clip in &clips {
            assert_eq!(&queue.dequeue().unwrap(), clip);
        }
        assert!(matches!(queue.dequeue(), Err(SequencerError::EmptyQueue)));
    }

    #[test]
    fn test_command_builder_fields() {
        let spot = Entity::from_raw(10);
        let lamp = Entity::from_raw(11);
        let command = NpcCommand::new(BehaviorState::RHPointHold)
            .gesture_at(spot)
            .toggle(lamp)
            .with_dialogue(DialogueClip::new("look_here", 1.5))
            .with_duration(-3.0);

        assert_eq!(command.target_state(), BehaviorState::RHPointHold);
        assert_eq!(command.gesture_location(), Some(spot));
        assert_eq!(command.move_location(), None);
        assert_eq!(command.look_location(), None);
        assert_eq!(command.toggle_objects(), &[lamp]);
        assert_eq!(command.dialogue_clip().map(|c| c.name.as_str()), Some("look_here"));
        // Отрицательная длительность → 0 (hold)
        assert_eq!(command.duration(), 0.0);
    }
}
