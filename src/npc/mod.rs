//! NPC orchestration: one brain per character wiring schedule playback, the
//! behavior state machine, and the movement layer together, plus the Bevy
//! plugin that drives every brain from the game's event streams.
//!
//! Event flow per frame (chained):
//!   DayEndEvent      → re-resolve each character's daily variant
//!   MinuteTickEvent  → advance playback, surface waypoint triggers
//!   proximity scan   → PresenceEvent
//!   PresenceEvent    → Waiting enter/exit
//!   Interaction*     → Interaction enter/exit
//!   tick             → integrate agents, drive navigation + animation

pub mod presence;
pub mod spawning;

use std::sync::Arc;

use bevy::prelude::*;

use crate::behavior::{BehaviorCtx, BehaviorState, StateMachine};
use crate::movement::{AnimationDriver, MovementController, WalkCycleDriver};
use crate::nav::{KinematicAgent, NavAgent, NavLink};
use crate::schedule::definitions::build_schedule_registry;
use crate::schedule::playback::SchedulePlayback;
use crate::schedule::resolver::select_variant;
use crate::shared::*;

/// Teleport links available to NPC routes, shared across all agents.
#[derive(Resource, Clone, Default)]
pub struct NavLinks(pub Arc<Vec<NavLink>>);

/// One character's complete behavior stack: schedule playback feeding a
/// state machine feeding a movement controller.
pub struct NpcBrain<A: NavAgent, D: AnimationDriver> {
    id: NpcId,
    schedule: Arc<CharacterSchedule>,
    playback: SchedulePlayback,
    machine: StateMachine,
    movement: MovementController<A, D>,
    player_pos: Option<Vec2>,
}

impl<A: NavAgent, D: AnimationDriver> NpcBrain<A, D> {
    pub fn new(
        id: NpcId,
        schedule: Arc<CharacterSchedule>,
        agent: A,
        spawn_point: Vec2,
        anim: D,
    ) -> Self {
        Self {
            id,
            schedule,
            playback: SchedulePlayback::default(),
            machine: StateMachine::default(),
            movement: MovementController::new(agent, spawn_point, anim),
            player_pos: None,
        }
    }

    /// Day-boundary hook: re-resolve the daily variant against the new date,
    /// rebuild the playback queue, and force the machine back to Routine.
    pub fn start_day(&mut self, date: &ScheduleDate, hearts: u8, raining: bool) {
        match select_variant(&self.schedule, date, hearts, raining) {
            Some(variant) => {
                info!(
                    "[Npc] {}: schedule '{}' ({} stops)",
                    self.id,
                    variant.name,
                    variant.path.len()
                );
                self.playback.reset_for_day(&variant.path);
            }
            None => {
                warn!("[Npc] {}: no schedule variant matches today", self.id);
                self.playback.clear();
            }
        }
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.day_reset(&mut ctx);
    }

    /// Clock-tick hook. Returns the waypoint that fired, if any, so the
    /// caller can surface it as an event.
    pub fn on_minute(&mut self, hour: u8, minute: u8) -> Option<Waypoint> {
        let waypoint = self.playback.on_minute(hour, minute)?;
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.notify_waypoint(waypoint.clone(), &mut ctx);
        Some(waypoint)
    }

    pub fn on_player_entered(&mut self) {
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.player_entered(&mut ctx);
    }

    pub fn on_player_exited(&mut self) {
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.player_exited(&mut ctx);
    }

    pub fn begin_interaction(&mut self) {
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.begin_interaction(&mut ctx);
    }

    pub fn end_interaction(&mut self) {
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.end_interaction(&mut ctx);
    }

    /// Per-frame drive: navigation and animation first, then the state
    /// machine reacts to the arrival notice.
    pub fn tick(&mut self, dt: f32) {
        let arrived = self.movement.update(dt);
        let mut ctx = BehaviorCtx {
            movement: &mut self.movement,
            player_pos: self.player_pos,
        };
        self.machine.update(arrived, &mut ctx);
    }

    pub fn set_player_pos(&mut self, pos: Option<Vec2>) {
        self.player_pos = pos;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> BehaviorState {
        self.machine.current()
    }

    pub fn position(&self) -> Vec2 {
        self.movement.position()
    }

    pub fn facing(&self) -> Facing {
        self.movement.facing()
    }

    pub fn waypoints_remaining(&self) -> usize {
        self.playback.remaining()
    }

    pub fn movement(&self) -> &MovementController<A, D> {
        &self.movement
    }

    pub fn agent_mut(&mut self) -> &mut A {
        self.movement.agent_mut()
    }
}

/// The concrete brain the game runs.
pub type GameBrain = NpcBrain<KinematicAgent, WalkCycleDriver>;

#[derive(Component)]
pub struct Brain(pub GameBrain);

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Relationships>()
            .init_resource::<NavLinks>()
            .insert_resource(build_schedule_registry())
            .add_event::<PresenceEvent>()
            .add_event::<WaypointChangedEvent>()
            .add_event::<InteractionStartEvent>()
            .add_event::<InteractionEndEvent>()
            .add_systems(OnEnter(GameState::Playing), spawning::spawn_initial_npcs)
            .add_systems(
                Update,
                (
                    handle_day_end,
                    advance_schedules,
                    presence::detect_presence,
                    apply_presence,
                    apply_interactions,
                    tick_brains,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── Systems ──────────────────────────────────────────────────────────────────

/// Re-resolves every character's schedule when a day ends. The Calendar
/// already shows the new day by the time this runs.
fn handle_day_end(
    mut day_end: EventReader<DayEndEvent>,
    calendar: Res<Calendar>,
    relationships: Res<Relationships>,
    mut npcs: Query<(&Npc, &mut Brain)>,
) {
    if day_end.is_empty() {
        return;
    }
    day_end.clear();

    let date = calendar.schedule_date();
    let raining = calendar.weather.is_precipitation();
    for (npc, mut brain) in &mut npcs {
        brain.0.start_day(&date, relationships.hearts(&npc.id), raining);
    }
}

/// Feeds clock ticks into every brain and surfaces fired waypoints.
fn advance_schedules(
    mut ticks: EventReader<MinuteTickEvent>,
    mut npcs: Query<(Entity, &mut Brain)>,
    mut waypoint_writer: EventWriter<WaypointChangedEvent>,
) {
    for tick in ticks.read() {
        for (entity, mut brain) in &mut npcs {
            if let Some(waypoint) = brain.0.on_minute(tick.hour, tick.minute) {
                debug!(
                    "[Npc] {}: waypoint {}:{:02} → {} fired",
                    brain.0.id(),
                    waypoint.hour,
                    waypoint.minute,
                    waypoint.location
                );
                waypoint_writer.send(WaypointChangedEvent {
                    npc: entity,
                    waypoint,
                });
            }
        }
    }
}

fn apply_presence(mut events: EventReader<PresenceEvent>, mut npcs: Query<&mut Brain>) {
    for event in events.read() {
        if let Ok(mut brain) = npcs.get_mut(event.npc) {
            match event.kind {
                PresenceKind::Entered => brain.0.on_player_entered(),
                PresenceKind::Exited => brain.0.on_player_exited(),
            }
        }
    }
}

fn apply_interactions(
    mut starts: EventReader<InteractionStartEvent>,
    mut ends: EventReader<InteractionEndEvent>,
    mut npcs: Query<&mut Brain>,
) {
    for event in starts.read() {
        if let Ok(mut brain) = npcs.get_mut(event.npc) {
            brain.0.begin_interaction();
        }
    }
    for event in ends.read() {
        if let Ok(mut brain) = npcs.get_mut(event.npc) {
            brain.0.end_interaction();
        }
    }
}

/// Integrates every agent, drives every brain, and mirrors agent positions
/// back into transforms.
fn tick_brains(
    time: Res<Time>,
    player: Query<&Transform, With<Player>>,
    mut npcs: Query<(&mut Brain, &mut Transform), (With<Npc>, Without<Player>)>,
) {
    let dt = time.delta_secs();
    let player_pos = player.get_single().ok().map(|t| t.translation.truncate());

    for (mut brain, mut transform) in &mut npcs {
        brain.0.set_player_pos(player_pos);
        brain.0.agent_mut().integrate(dt);
        brain.0.tick(dt);

        let pos = brain.0.position();
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}
