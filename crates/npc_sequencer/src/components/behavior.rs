//! Behavior FSM components (state, timed guard, config, NPC marker).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{CommandQueue, DialogueQueue};

/// Состояния NPC (каждое = одна анимация в pose backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Idle: начальное состояние, единственное из которого активируются команды
    #[default]
    Idle,
    /// Walk: поворот + движение к move_destination, по прибытии → Idle
    Walk,
    Wave,
    RHPoint,
    /// RHPointHold: указание с подсветкой active_target и pointer line
    RHPointHold,
    AcknowledgeRH,
    Talking,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 7] = [
        BehaviorState::Idle,
        BehaviorState::Walk,
        BehaviorState::Wave,
        BehaviorState::RHPoint,
        BehaviorState::RHPointHold,
        BehaviorState::AcknowledgeRH,
        BehaviorState::Talking,
    ];

    /// Имя bool-флага в pose backend (animator parameter)
    pub fn flag_name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "Idle",
            BehaviorState::Walk => "Walk",
            BehaviorState::Wave => "Wave Left",
            BehaviorState::RHPoint => "RHPoint",
            BehaviorState::RHPointHold => "RHPointHold",
            BehaviorState::AcknowledgeRH => "Acknowledge RH",
            BehaviorState::Talking => "Talking",
        }
    }
}

/// Состояние sequencer'а одного NPC (живёт столько же, сколько NPC)
///
/// Targets сохраняются между тиками, пока их не перезапишет следующая команда.
/// gesture/look хранятся как Entity и резолвятся в позицию каждый тик
/// (следуют за движущейся целью).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SequencerState {
    pub(crate) current_state: BehaviorState,
    /// Объект, который подсвечен / на который указывает pointer
    pub active_target: Option<Entity>,
    pub move_destination: Option<Vec3>,
    pub gesture_target: Option<Entity>,
    pub look_target: Option<Entity>,
}

impl SequencerState {
    pub fn current_state(&self) -> BehaviorState {
        self.current_state
    }
}

/// Timed guard: по истечении deadline принудительно возвращает FSM в Idle
///
/// Инвариант: armed == true только пока NPC в состоянии, активированном командой с duration > 0.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TimedStateGuard {
    deadline: f32,
    armed: bool,
}

impl TimedStateGuard {
    pub fn arm(&mut self, now: f32, duration: f32) {
        self.deadline = now + duration;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn deadline(&self) -> Option<f32> {
        self.armed.then_some(self.deadline)
    }

    /// Возвращает true ровно один раз: в тик, когда deadline прошёл (guard при этом disarm'ится)
    pub fn expire(&mut self, now: f32) -> bool {
        if self.armed && now >= self.deadline {
            self.armed = false;
            true
        } else {
            false
        }
    }
}

/// Параметры движения и поворота NPC
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SequencerConfig {
    /// Базовая скорость ходьбы (м/с)
    pub walk_speed: f32,
    /// Множитель скорости в Walk state
    pub walk_speed_multiplier: f32,
    /// Дистанция, на которой Walk считается завершённым
    pub arrival_threshold: f32,
    /// Скорость поворота (рад/с)
    pub turn_speed: f32,
    /// Высота ground plane для yaw-only поворота
    pub ground_height: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.5,
            walk_speed_multiplier: 2.0,
            arrival_threshold: 0.15,
            turn_speed: 5.0,
            ground_height: 0.0,
        }
    }
}

impl SequencerConfig {
    pub fn walk_step(&self, delta: f32) -> f32 {
        self.walk_speed * self.walk_speed_multiplier * delta
    }
}

/// NPC под управлением sequencer'а
///
/// Автоматически добавляет внутреннее состояние через Required Components.
/// Collaborator компоненты (AnimationFlags, RigWeights, DialogueSource, NpcRig)
/// НЕ required: их отсутствие ловит validation и останавливает NPC.
#[derive(Component, Debug, Clone, Default)]
#[require(SequencerState, TimedStateGuard, CommandQueue, DialogueQueue, SequencerConfig, Transform)]
pub struct SequencedNpc;

/// Marker: sequencer этого NPC остановлен (missing collaborator)
#[derive(Component, Debug, Clone)]
pub struct SequencerHalted {
    pub reason: String,
}
