//! Headless симуляция NPC sequencer'а
//!
//! Строит маленькую сцену, грузит authored script и прогоняет тики без рендера.
//! Usage: npc_sequencer [path/to/script.ron]

use bevy::prelude::*;
use npc_sequencer::{
    create_headless_app, spawn_sequenced_npc, HeadlessAudioPlugin, Outline, PendingScript,
    SequenceScript, SequencerState, SimulationPlugin, Toggleable,
};

const DEFAULT_SCRIPT: &str = include_str!("../scripts/greeting.ron");
const MAX_TICKS: usize = 3600;

fn main() {
    let script = match std::env::args().nth(1) {
        Some(path) => SequenceScript::load(&path),
        None => SequenceScript::from_ron(DEFAULT_SCRIPT),
    };
    let script = match script {
        Ok(script) => script,
        Err(error) => {
            eprintln!("Failed to load script: {}", error);
            std::process::exit(1);
        }
    };

    println!("Starting NPC sequencer headless run ({} steps)", script.steps.len());

    let mut app = create_headless_app();
    app.add_plugins((SimulationPlugin, HeadlessAudioPlugin));

    let npc = {
        let world = app.world_mut();
        world.spawn((Name::new("door"), Transform::from_xyz(0.0, 0.0, -4.0)));
        world.spawn((Name::new("visitor"), Transform::from_xyz(2.0, 1.7, -6.0)));
        world.spawn((Name::new("counter"), Transform::from_xyz(-3.0, 0.0, 0.0)));
        world.spawn((
            Name::new("lamp"),
            Transform::from_xyz(-1.5, 1.2, -5.0),
            Outline::default(),
            Toggleable { active: false },
        ));

        let npc = spawn_sequenced_npc(&mut world.commands(), Vec3::ZERO);
        world.flush();
        world.entity_mut(npc).insert(PendingScript::new(script));
        npc
    };

    for tick in 0..MAX_TICKS {
        app.update();

        if tick % 60 == 0 {
            let world = app.world();
            let state = world.get::<SequencerState>(npc).map(|s| s.current_state());
            let position = world.get::<Transform>(npc).map(|t| t.translation);
            println!("Tick {}: state {:?}, position {:?}", tick, state, position);
        }
    }

    println!("Sequencer run complete!");
}
