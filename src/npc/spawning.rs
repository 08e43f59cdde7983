//! Initial NPC spawning from the schedule registry.
//!
//! Each character spawns at the first stop of whatever variant resolves for
//! the current date, with today's playback queue already primed.

use bevy::prelude::*;

use super::presence::PresenceTracked;
use super::{Brain, GameBrain, NavLinks};
use crate::movement::WalkCycleDriver;
use crate::nav::KinematicAgent;
use crate::schedule::resolver::select_variant;
use crate::shared::*;

pub fn spawn_initial_npcs(
    mut commands: Commands,
    registry: Res<ScheduleRegistry>,
    calendar: Res<Calendar>,
    relationships: Res<Relationships>,
    links: Res<NavLinks>,
) {
    let date = calendar.schedule_date();
    let raining = calendar.weather.is_precipitation();

    // Deterministic spawn order regardless of map iteration order
    let mut ids: Vec<NpcId> = registry.schedules.keys().cloned().collect();
    ids.sort();

    for id in ids {
        let Some(schedule) = registry.get(&id) else {
            continue;
        };
        let hearts = relationships.hearts(&id);

        let spawn_point = select_variant(&schedule, &date, hearts, raining)
            .and_then(|variant| variant.path.first())
            .or_else(|| schedule.variants.first().and_then(|variant| variant.path.first()))
            .map(Waypoint::world_target)
            .unwrap_or(Vec2::ZERO);

        let agent = KinematicAgent::new(spawn_point, NPC_WALK_SPEED, links.0.clone());
        let mut brain = GameBrain::new(
            id.clone(),
            schedule,
            agent,
            spawn_point,
            WalkCycleDriver::default(),
        );
        brain.start_day(&date, hearts, raining);

        info!("[Npc] Spawned {} at {:?}", id, spawn_point);

        commands.spawn((
            Npc {
                id: id.clone(),
                name: display_name(&id),
            },
            Brain(brain),
            PresenceTracked::default(),
            Transform::from_translation(spawn_point.extend(0.0)),
        ));
    }
}

fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
