//! Tests for per-state behavior handlers.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::{
        AnimationFlags, BehaviorState, RigWeights, SequencerConfig, SequencerState,
    };
    use crate::motion::facing_yaw;
    use crate::sequencer::states::{step_behavior, NpcBody, ResolvedTargets, VisualUpdate};

    const DELTA: f32 = 1.0 / 60.0;

    struct Npc {
        state: SequencerState,
        transform: Transform,
        pose: AnimationFlags,
        rig: RigWeights,
        config: SequencerConfig,
    }

    impl Npc {
        fn in_state(current: BehaviorState) -> Self {
            let mut state = SequencerState::default();
            state.current_state = current;
            Self {
                state,
                transform: Transform::default(),
                pose: AnimationFlags::default(),
                rig: RigWeights::default(),
                config: SequencerConfig::default(),
            }
        }

        fn step(&mut self, targets: &ResolvedTargets) -> crate::sequencer::StepOutcome {
            let mut body = NpcBody {
                transform: &mut self.transform,
                pose: &mut self.pose,
                rig: &mut self.rig,
            };
            step_behavior(&mut self.state, &mut body, targets, &self.config, DELTA)
        }
    }

    #[test]
    fn test_walk_moves_then_returns_to_idle() {
        let mut npc = Npc::in_state(BehaviorState::Walk);
        let destination = Vec3::new(0.0, 0.0, -2.0);
        npc.state.move_destination = Some(destination);

        // 5 м/с → 2 м за ~24 тика
        let mut ticks = 0;
        while npc.state.current_state() == BehaviorState::Walk {
            let before = npc.transform.translation.distance(destination);
            let outcome = npc.step(&ResolvedTargets::default());
            ticks += 1;

            if npc.state.current_state() == BehaviorState::Walk {
                assert!(npc.pose.flag("Walk"));
                let after = npc.transform.translation.distance(destination);
                assert!(after < before);
                // Шаг не больше walk_speed * 2 * dt
                assert!(before - after <= npc.config.walk_step(DELTA) + 1e-5);
            } else {
                assert_eq!(outcome.transition, Some(BehaviorState::Idle));
                assert!(before <= npc.config.arrival_threshold);
            }

            assert!(ticks < 200, "walk never finished");
        }

        assert!(!npc.pose.flag("Walk"));
        assert!(npc.pose.flag("Idle"));
    }

    #[test]
    fn test_walk_without_destination_is_arrival() {
        let mut npc = Npc::in_state(BehaviorState::Walk);
        let outcome = npc.step(&ResolvedTargets::default());

        assert_eq!(outcome.transition, Some(BehaviorState::Idle));
        assert_eq!(npc.state.current_state(), BehaviorState::Idle);
        assert_eq!(npc.transform.translation, Vec3::ZERO);
    }

    #[test]
    fn test_walk_turns_toward_destination() {
        let mut npc = Npc::in_state(BehaviorState::Walk);
        npc.state.move_destination = Some(Vec3::new(10.0, 0.0, 0.0));

        for _ in 0..30 {
            npc.step(&ResolvedTargets::default());
        }

        // Разворот к +X = yaw -PI/2
        assert!((facing_yaw(&npc.transform) + std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_wave_sets_look_weight() {
        let mut npc = Npc::in_state(BehaviorState::Wave);
        let outcome = npc.step(&ResolvedTargets {
            look: Some(Vec3::new(-3.0, 1.7, 0.0)),
            ..default()
        });

        assert_eq!(outcome.transition, None);
        assert_eq!(npc.rig.look, 1.0);
        assert_eq!(npc.rig.gesture, 0.0);
        assert!(npc.pose.flag("Wave Left"));
        assert!(!npc.pose.flag("Idle"));
        // Поворот начался (налево, к -X)
        assert!(facing_yaw(&npc.transform) > 0.0);
    }

    #[test]
    fn test_point_hold_shows_visuals_toward_active_target() {
        let mut npc = Npc::in_state(BehaviorState::RHPointHold);
        let lamp = Entity::from_raw(9);
        npc.state.active_target = Some(lamp);

        let lamp_position = Vec3::new(1.0, 1.2, -4.0);
        let origin = Vec3::new(0.3, 1.4, 0.0);
        let outcome = npc.step(&ResolvedTargets {
            active: Some(lamp_position),
            hand_offset: origin,
            ..default()
        });

        assert_eq!(
            outcome.visuals,
            VisualUpdate::Show {
                target: lamp,
                origin,
                destination: lamp_position,
            }
        );
        assert_eq!(npc.rig.gesture, 1.0);
        assert_eq!(npc.rig.look, 1.0);
        assert!(npc.pose.flag("RHPointHold"));
        // active_target не сбрасывается, пока не вошли в Idle
        assert_eq!(npc.state.active_target, Some(lamp));
    }

    #[test]
    fn test_point_hold_origin_follows_npc_transform() {
        let mut npc = Npc::in_state(BehaviorState::RHPointHold);
        let lamp = Entity::from_raw(9);
        npc.state.active_target = Some(lamp);
        // NPC ушёл от spawn и развёрнут лицом к +X (yaw = -90°)
        npc.transform = Transform::from_xyz(4.0, 0.0, -6.0)
            .with_rotation(Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2));

        let outcome = npc.step(&ResolvedTargets {
            active: Some(Vec3::new(6.0, 1.0, -6.0)),
            hand_offset: Vec3::new(0.3, 1.4, 0.0),
            ..default()
        });

        let VisualUpdate::Show { origin, .. } = outcome.visuals else {
            panic!("expected Show, got {:?}", outcome.visuals);
        };
        // Локальный +X (правая рука) после поворота смотрит в мировой +Z
        assert!(
            origin.distance(Vec3::new(4.0, 1.4, -5.7)) < 1e-4,
            "origin = {:?}",
            origin
        );
    }

    #[test]
    fn test_point_hold_without_target_keeps_visuals() {
        let mut npc = Npc::in_state(BehaviorState::RHPointHold);
        let outcome = npc.step(&ResolvedTargets::default());
        assert_eq!(outcome.visuals, VisualUpdate::Unchanged);
    }

    #[test]
    fn test_idle_clears_everything() {
        let mut npc = Npc::in_state(BehaviorState::Idle);
        let lamp = Entity::from_raw(3);
        npc.state.active_target = Some(lamp);
        npc.rig.set_gesture(1.0);
        npc.rig.set_look(1.0);
        npc.pose.set_flag("Idle", false);
        npc.pose.set_flag("RHPointHold", true);
        npc.pose.set_flag("Walk", true);

        let outcome = npc.step(&ResolvedTargets::default());

        assert_eq!(outcome.visuals, VisualUpdate::Clear { target: lamp });
        assert!(npc.state.active_target.is_none());
        assert_eq!(npc.rig, RigWeights::default());
        assert!(npc.pose.flag("Idle"));
        assert!(!npc.pose.flag("RHPointHold"));
        assert!(!npc.pose.flag("Walk"));

        // Повторный Idle тик: снимать уже нечего
        let outcome = npc.step(&ResolvedTargets::default());
        assert_eq!(outcome.visuals, VisualUpdate::Unchanged);
    }

    #[test]
    fn test_talking_faces_gesture_target_only() {
        let mut npc = Npc::in_state(BehaviorState::Talking);
        npc.rig.set_look(0.5);

        npc.step(&ResolvedTargets {
            gesture: Some(Vec3::new(5.0, 0.0, 0.0)),
            look: Some(Vec3::new(-5.0, 0.0, 0.0)),
            ..default()
        });

        assert!(npc.pose.flag("Talking"));
        // Rig не трогается
        assert_eq!(npc.rig.look, 0.5);
        // Повернулся вправо (к gesture), не влево (к look)
        assert!(facing_yaw(&npc.transform) < 0.0);
    }
}
