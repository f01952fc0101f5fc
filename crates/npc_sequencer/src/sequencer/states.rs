//! Per-state behavior FSM (один handler на состояние, dispatch через match)
//!
//! Handlers чистые: меняют SequencerState / Transform / pose / rig,
//! а изменения визуалов (outline + pointer line) возвращают как VisualUpdate -
//! их применяет система, у которой есть доступ к объектам сцены.

use bevy::prelude::*;

use crate::components::{
    AnimationFlags, BehaviorState, RigWeights, SequencerConfig, SequencerState,
};
use crate::motion::{move_towards, rotate_yaw_towards};

/// Мутабельные части NPC, которые трогает FSM
pub struct NpcBody<'a> {
    pub transform: &'a mut Transform,
    pub pose: &'a mut AnimationFlags,
    pub rig: &'a mut RigWeights,
}

/// Позиции targets на текущий тик (None = target не задан или пропал)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedTargets {
    pub look: Option<Vec3>,
    pub gesture: Option<Vec3>,
    pub active: Option<Vec3>,
    /// Начало pointer line в локальных координатах NPC
    pub hand_offset: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualUpdate {
    Unchanged,
    /// Подсветить target и протянуть pointer line
    Show {
        target: Entity,
        origin: Vec3,
        destination: Vec3,
    },
    /// Снять подсветку с target и выключить pointer line
    Clear { target: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Some если handler сам перевёл FSM (Walk → Idle)
    pub transition: Option<BehaviorState>,
    pub visuals: VisualUpdate,
}

impl StepOutcome {
    fn stay() -> Self {
        Self {
            transition: None,
            visuals: VisualUpdate::Unchanged,
        }
    }
}

/// Один тик поведения текущего состояния
pub fn step_behavior(
    state: &mut SequencerState,
    body: &mut NpcBody,
    targets: &ResolvedTargets,
    config: &SequencerConfig,
    delta: f32,
) -> StepOutcome {
    let turn = config.turn_speed * delta;

    match state.current_state {
        BehaviorState::Idle => behave_idle(state, body, targets, config, turn),
        BehaviorState::Walk => behave_walk(state, body, config, turn, delta),
        BehaviorState::Wave => {
            enter_pose(body.pose, BehaviorState::Wave);
            body.rig.set_look(1.0);
            face(body.transform, targets.look, config, turn);
            StepOutcome::stay()
        }
        BehaviorState::RHPoint => {
            enter_pose(body.pose, BehaviorState::RHPoint);
            body.rig.set_look(1.0);
            face(body.transform, targets.gesture, config, turn);
            StepOutcome::stay()
        }
        BehaviorState::RHPointHold => behave_point_hold(state, body, targets, config, turn),
        BehaviorState::AcknowledgeRH | BehaviorState::Talking => {
            enter_pose(body.pose, state.current_state);
            face(body.transform, targets.gesture, config, turn);
            StepOutcome::stay()
        }
    }
}

/// Снимает Idle и включает флаг анимации состояния
fn enter_pose(pose: &mut AnimationFlags, state: BehaviorState) {
    pose.set_flag(BehaviorState::Idle.flag_name(), false);
    pose.set_flag(state.flag_name(), true);
}

fn face(transform: &mut Transform, target: Option<Vec3>, config: &SequencerConfig, turn: f32) {
    if let Some(target) = target {
        rotate_yaw_towards(transform, target, config.ground_height, turn);
    }
}

fn behave_idle(
    state: &mut SequencerState,
    body: &mut NpcBody,
    targets: &ResolvedTargets,
    config: &SequencerConfig,
    turn: f32,
) -> StepOutcome {
    for pose_state in BehaviorState::ALL {
        body.pose
            .set_flag(pose_state.flag_name(), pose_state == BehaviorState::Idle);
    }
    body.rig.set_gesture(0.0);
    body.rig.set_look(0.0);

    face(body.transform, targets.look, config, turn);

    // Подсветка/pointer снимаются при любом входе в Idle (даже если их никто не включал)
    let visuals = match state.active_target.take() {
        Some(target) => VisualUpdate::Clear { target },
        None => VisualUpdate::Unchanged,
    };

    StepOutcome {
        transition: None,
        visuals,
    }
}

fn behave_walk(
    state: &mut SequencerState,
    body: &mut NpcBody,
    config: &SequencerConfig,
    turn: f32,
    delta: f32,
) -> StepOutcome {
    let walk_flag = BehaviorState::Walk.flag_name();

    match state.move_destination {
        Some(destination)
            if body.transform.translation.distance(destination) > config.arrival_threshold =>
        {
            rotate_yaw_towards(body.transform, destination, config.ground_height, turn);
            body.transform.translation =
                move_towards(body.transform.translation, destination, config.walk_step(delta));
            body.pose.set_flag(walk_flag, true);
            StepOutcome::stay()
        }
        // Дошли (или destination никогда не задавался) → Idle в этот же тик
        _ => {
            body.pose.set_flag(walk_flag, false);
            body.pose.set_flag(BehaviorState::Idle.flag_name(), true);
            state.current_state = BehaviorState::Idle;
            StepOutcome {
                transition: Some(BehaviorState::Idle),
                visuals: VisualUpdate::Unchanged,
            }
        }
    }
}

fn behave_point_hold(
    state: &mut SequencerState,
    body: &mut NpcBody,
    targets: &ResolvedTargets,
    config: &SequencerConfig,
    turn: f32,
) -> StepOutcome {
    enter_pose(body.pose, BehaviorState::RHPointHold);
    body.rig.set_gesture(1.0);
    body.rig.set_look(1.0);

    // Корпус разворачивается к move_destination, рука указывает на target
    face(body.transform, state.move_destination, config, turn);

    let visuals = match (state.active_target, targets.active) {
        (Some(target), Some(destination)) => VisualUpdate::Show {
            target,
            origin: body.transform.transform_point(targets.hand_offset),
            destination,
        },
        _ => VisualUpdate::Unchanged,
    };

    StepOutcome {
        transition: None,
        visuals,
    }
}
