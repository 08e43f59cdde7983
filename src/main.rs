//! Headless Driftvale driver.
//!
//! Runs the full behavior core — calendar, schedules, state machines,
//! navigation — at 60 ticks per second with no window or GPU. Useful for
//! watching the town live through the log output.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use driftvale::calendar::CalendarPlugin;
use driftvale::npc::NpcPlugin;
use driftvale::shared::*;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(bevy::log::LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Domain plugins
        .add_plugins(CalendarPlugin)
        .add_plugins(NpcPlugin)
        .add_systems(Startup, setup)
        .run();
}

/// Spawns the (stationary) player probe and drops straight into Playing.
fn setup(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    commands.spawn((Player, Transform::default()));
    next_state.set(GameState::Playing);
    info!("[Driftvale] Headless simulation starting");
}
