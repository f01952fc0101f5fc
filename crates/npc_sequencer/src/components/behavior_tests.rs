//! Tests for behavior components.

#[cfg(test)]
mod tests {
    use crate::components::{
        AnimationFlags, BehaviorState, DialogueClip, DialogueSource, RigWeights, SequencerConfig,
        SequencerState, TimedStateGuard, Toggleable,
    };

    #[test]
    fn test_sequencer_state_default() {
        let state = SequencerState::default();
        assert_eq!(state.current_state(), BehaviorState::Idle);
        assert!(state.active_target.is_none());
        assert!(state.move_destination.is_none());
    }

    #[test]
    fn test_sequencer_config_default() {
        let config = SequencerConfig::default();
        assert_eq!(config.walk_speed, 2.5);
        assert_eq!(config.walk_speed_multiplier, 2.0);
        assert_eq!(config.arrival_threshold, 0.15);
        assert_eq!(config.turn_speed, 5.0);
        // 2.5 * 2 * 0.5 sec
        assert_eq!(config.walk_step(0.5), 2.5);
    }

    #[test]
    fn test_timed_guard_fires_once() {
        let mut guard = TimedStateGuard::default();
        assert!(!guard.is_armed());
        assert!(!guard.expire(100.0));

        guard.arm(1.0, 2.0);
        assert_eq!(guard.deadline(), Some(3.0));

        assert!(!guard.expire(2.9));
        assert!(guard.is_armed());

        assert!(guard.expire(3.0));
        assert!(!guard.is_armed());
        assert_eq!(guard.deadline(), None);

        // Повторно не срабатывает
        assert!(!guard.expire(4.0));
    }

    #[test]
    fn test_animation_flags() {
        let mut flags = AnimationFlags::default();
        assert!(flags.flag("Idle"));
        assert!(!flags.flag("Walk"));

        flags.set_flag("Walk", true);
        flags.set_flag("Idle", false);
        assert!(flags.flag("Walk"));
        assert!(!flags.flag("Idle"));
    }

    #[test]
    fn test_flag_names_unique() {
        let mut names: Vec<_> = BehaviorState::ALL.iter().map(|s| s.flag_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BehaviorState::ALL.len());
    }

    #[test]
    fn test_rig_weights_clamped() {
        let mut weights = RigWeights::default();
        weights.set_look(1.5);
        weights.set_gesture(-0.2);
        assert_eq!(weights.look, 1.0);
        assert_eq!(weights.gesture, 0.0);
    }

    #[test]
    fn test_toggleable_inverts() {
        let mut object = Toggleable::default();
        assert!(object.active);
        object.toggle();
        assert!(!object.active);
        object.toggle();
        assert!(object.active);
    }

    #[test]
    fn test_dialogue_source_playback_window() {
        let mut source = DialogueSource::default();
        assert!(!source.is_playing());
        assert_eq!(source.current_clip_duration(), 0.0);

        source.play(DialogueClip::new("hello", 2.0), 5.0);
        assert!(source.is_playing());
        assert_eq!(source.current_clip_duration(), 2.0);
        assert_eq!(source.playback_end(), 7.0);

        source.stop();
        assert!(!source.is_playing());
    }
}
