//! Sequencer events
//!
//! Входящие (от gameplay / UI / engine layer):
//! - EnqueueCommand: добавить команду в очередь NPC
//! - ForceIdle: внешнее прерывание (сброс флага + Idle)
//!
//! Исходящие (для engine layer, UI, логов):
//! - StateChanged: переход FSM
//! - DialogueStarted: клип отдан audio backend'у

use bevy::prelude::*;

use crate::components::{BehaviorState, DialogueClip, NpcCommand};

#[derive(Event, Debug, Clone)]
pub struct EnqueueCommand {
    pub npc: Entity,
    pub command: NpcCommand,
}

#[derive(Event, Debug, Clone)]
pub struct ForceIdle {
    pub npc: Entity,
    /// Pose флаг, который сбрасывается (например "Talking")
    pub flag: String,
}

/// Причина перехода FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// Активирована команда из очереди
    Activation,
    /// Timed guard: duration истекла
    GuardExpired,
    /// Walk: NPC дошёл до move_destination
    Arrived,
    /// Внешний ForceIdle
    Forced,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct StateChanged {
    pub npc: Entity,
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub cause: TransitionCause,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct DialogueStarted {
    pub npc: Entity,
    pub clip: DialogueClip,
}
