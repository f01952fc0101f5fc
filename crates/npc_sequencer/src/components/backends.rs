//! Collaborator компоненты (ECS ↔ engine layer)
//!
//! Архитектура (как MovementCommand → NavigationAgent):
//! - Sequencer пишет intent в эти компоненты
//! - Engine layer читает (Changed<T>) и применяет к animator, rig, outline,
//!   line renderer и audio source
//! - Audio: engine пишет обратно `playing = false`, когда клип закончился

use std::collections::HashMap;

use bevy::prelude::*;

use crate::components::{BehaviorState, DialogueClip};

/// Pose backend: bool-параметры аниматора
///
/// По умолчанию выставлен только флаг Idle (NPC стоит в resting pose).
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AnimationFlags {
    flags: HashMap<String, bool>,
}

impl Default for AnimationFlags {
    fn default() -> Self {
        let mut flags = HashMap::new();
        flags.insert(BehaviorState::Idle.flag_name().to_string(), true);
        Self { flags }
    }
}

impl AnimationFlags {
    pub fn set_flag(&mut self, name: &str, value: bool) {
        match self.flags.get_mut(name) {
            Some(current) => *current = value,
            None => {
                self.flags.insert(name.to_string(), value);
            }
        }
    }

    /// Неизвестный флаг = false
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

/// Pose backend: веса animation rigging (0..1)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RigWeights {
    /// Правая рука (gesture rig)
    pub gesture: f32,
    /// Голова (look rig)
    pub look: f32,
}

impl RigWeights {
    pub fn set_gesture(&mut self, weight: f32) {
        self.gesture = weight.clamp(0.0, 1.0);
    }

    pub fn set_look(&mut self, weight: f32) {
        self.look = weight.clamp(0.0, 1.0);
    }
}

/// Highlight backend: outline на объекте сцены
///
/// Объекты без Outline просто не подсвечиваются.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Outline {
    pub enabled: bool,
}

/// Pointer visual backend: линия от руки NPC к active_target
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerLine {
    pub enabled: bool,
    pub origin: Vec3,
    pub destination: Vec3,
}

impl PointerLine {
    pub fn set_endpoints(&mut self, origin: Vec3, destination: Vec3) {
        self.origin = origin;
        self.destination = destination;
    }
}

/// Ссылки NPC на его rig entities
///
/// pointer: entity с PointerLine. Начало линии = `hand_offset` в локальных
/// координатах NPC, поэтому оно идёт вместе с NPC при ходьбе и повороте.
#[derive(Component, Debug, Clone, Copy)]
pub struct NpcRig {
    pub pointer: Entity,
    pub hand_offset: Vec3,
}

impl NpcRig {
    /// Правая рука на уровне плеча
    pub const DEFAULT_HAND_OFFSET: Vec3 = Vec3::new(0.3, 1.4, 0.0);

    pub fn new(pointer: Entity) -> Self {
        Self {
            pointer,
            hand_offset: Self::DEFAULT_HAND_OFFSET,
        }
    }

    pub fn with_hand_offset(mut self, offset: Vec3) -> Self {
        self.hand_offset = offset;
        self
    }

    /// Начало pointer line в мировых координатах
    pub fn pointer_origin(&self, npc: &Transform) -> Vec3 {
        npc.transform_point(self.hand_offset)
    }
}

/// Activation toggle backend: active/visible флаг объекта сцены
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Toggleable {
    pub active: bool,
}

impl Default for Toggleable {
    fn default() -> Self {
        Self { active: true }
    }
}

impl Toggleable {
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }
}

/// Audio backend: источник звука диалогов NPC
///
/// Sequencer вызывает `play`, engine layer сбрасывает `playing` по окончании клипа.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct DialogueSource {
    clip: Option<DialogueClip>,
    playing: bool,
    started_at: f32,
}

impl DialogueSource {
    pub fn play(&mut self, clip: DialogueClip, now: f32) {
        self.clip = Some(clip);
        self.playing = true;
        self.started_at = now;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn clip(&self) -> Option<&DialogueClip> {
        self.clip.as_ref()
    }

    /// Длительность текущего клипа (0 если клипа нет)
    pub fn current_clip_duration(&self) -> f32 {
        self.clip.as_ref().map(|c| c.duration).unwrap_or(0.0)
    }

    /// Момент, когда текущий клип должен закончиться (по reported duration)
    pub fn playback_end(&self) -> f32 {
        self.started_at + self.current_clip_duration()
    }
}
