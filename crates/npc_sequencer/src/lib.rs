//! NPC Sequencer Core
//!
//! ECS-sequencer на Bevy 0.16: authored очередь команд → FSM поведения NPC
//! → pose / rig / motion / визуалы / диалоги.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = decisions (очереди, FSM, timed guard, dialogue drain)
//! - Engine = исполнение (animator, animation rigging, outline, line renderer, audio source)
//! - Граница = collaborator компоненты (components::backends)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod components;
pub mod error;
pub mod headless;
pub mod logger;
pub mod motion;
pub mod script;
pub mod sequencer;

// Re-export базовых типов для удобства
pub use components::*;
pub use error::SequencerError;
pub use headless::HeadlessAudioPlugin;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter, LOGGER_LEVEL,
};
pub use script::{PendingScript, ScriptStep, SequenceScript};
pub use sequencer::{
    DialogueStarted, EnqueueCommand, ForceIdle, SequencerPlugin, SequencerSet, StateChanged,
    TransitionCause,
};

/// Частота simulation tick (FixedUpdate)
pub const FIXED_HZ: f64 = 60.0;

/// Главный plugin (fixed timestep + sequencer)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .add_plugins(SequencerPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` продвигает время ровно на один fixed step,
/// поэтому прогоны воспроизводимы (не зависят от wall clock).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FIXED_HZ,
        )));

    app
}

/// Spawn helper: NPC со всеми collaborator компонентами
///
/// Создаёт:
/// - pointer entity (PointerLine; начало линии считается от руки NPC)
/// - NPC: SequencedNpc (+ required state) + AnimationFlags + RigWeights + DialogueSource + NpcRig
pub fn spawn_sequenced_npc(commands: &mut Commands, position: Vec3) -> Entity {
    let pointer = commands
        .spawn((Name::new("pointer"), PointerLine::default()))
        .id();

    commands
        .spawn((
            SequencedNpc,
            Transform::from_translation(position),
            AnimationFlags::default(),
            RigWeights::default(),
            DialogueSource::default(),
            NpcRig::new(pointer),
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
