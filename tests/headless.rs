//! Headless integration tests for Driftvale.
//!
//! These tests exercise the behavior core without a window or GPU. They use
//! Bevy's `MinimalPlugins` to tick the app, the real domain plugins, and
//! event injection to drive the clock deterministically.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use driftvale::behavior::BehaviorState;
use driftvale::calendar::CalendarPlugin;
use driftvale::nav::NavAgent;
use driftvale::npc::{Brain, NpcPlugin};
use driftvale::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with the real domain plugins and no rendering,
/// windowing, or asset loading.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_state::<GameState>();
    app.add_plugins(CalendarPlugin);
    app.add_plugins(NpcPlugin);

    // Make the real clock effectively static so minute ticks only come from
    // explicit injection (~7 days of real time per game-minute).
    app.world_mut().resource_mut::<Calendar>().time_scale = 1.0e-7;
    app
}

/// Transitions the test app to Playing and ticks twice so the state change
/// and the spawn commands both apply.
fn enter_playing_state(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    app.update();
}

fn spawn_player(app: &mut App, pos: Vec2) -> Entity {
    app.world_mut()
        .spawn((Player, Transform::from_translation(pos.extend(0.0))))
        .id()
}

fn move_player(app: &mut App, player: Entity, pos: Vec2) {
    app.world_mut()
        .entity_mut(player)
        .get_mut::<Transform>()
        .unwrap()
        .translation = pos.extend(0.0);
}

/// Injects one game-minute tick, exactly as the calendar would emit it.
fn send_minute(app: &mut App, hour: u8, minute: u8) {
    app.world_mut().send_event(MinuteTickEvent { hour, minute });
}

fn send_day_end(app: &mut App, day: u8, season: Season, year: u32) {
    app.world_mut().send_event(DayEndEvent { day, season, year });
}

fn brain_state(app: &mut App, id: &str) -> BehaviorState {
    let mut query = app.world_mut().query::<&Brain>();
    query
        .iter(app.world())
        .find(|brain| brain.0.id() == id)
        .map(|brain| brain.0.state())
        .expect("npc should exist")
}

fn brain_position(app: &mut App, id: &str) -> Vec2 {
    let mut query = app.world_mut().query::<&Brain>();
    query
        .iter(app.world())
        .find(|brain| brain.0.id() == id)
        .map(|brain| brain.0.position())
        .expect("npc should exist")
}

fn waypoints_remaining(app: &mut App, id: &str) -> usize {
    let mut query = app.world_mut().query::<&Brain>();
    query
        .iter(app.world())
        .find(|brain| brain.0.id() == id)
        .map(|brain| brain.0.waypoints_remaining())
        .expect("npc should exist")
}

fn teleport_brain(app: &mut App, id: &str, pos: Vec2) {
    let mut query = app.world_mut().query::<&mut Brain>();
    let mut brain = query
        .iter_mut(app.world_mut())
        .find(|brain| brain.0.id() == id)
        .expect("npc should exist");
    brain.0.agent_mut().teleport(pos);
}

fn waypoint_events(app: &App) -> usize {
    app.world().resource::<Events<WaypointChangedEvent>>().len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_spawns_town_in_routine() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    let mut query = app.world_mut().query::<(&Npc, &Brain)>();
    let npcs: Vec<_> = query.iter(app.world()).collect();
    assert_eq!(npcs.len(), 3, "all shipped characters spawn");
    for (npc, brain) in npcs {
        assert_eq!(brain.0.state(), BehaviorState::Routine, "{} boots idle", npc.id);
        assert!(brain.0.waypoints_remaining() > 0, "{} has a day queued", npc.id);
    }
}

#[test]
fn test_waypoints_fire_on_exact_minutes_only() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    // Mira's weekday shift starts at 8:30. One minute early: nothing.
    send_minute(&mut app, 8, 29);
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Routine);
    assert_eq!(waypoint_events(&app), 0);

    send_minute(&mut app, 8, 30);
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Movement);
    assert!(waypoint_events(&app) > 0, "waypoint trigger surfaced as an event");
}

#[test]
fn test_skipped_minute_never_fires_late() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    let before = waypoints_remaining(&mut app, "mira");
    send_minute(&mut app, 8, 29);
    send_minute(&mut app, 8, 31); // 8:30 never ticked
    app.update();

    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Routine);
    assert_eq!(waypoints_remaining(&mut app, "mira"), before, "stale stop stays queued");
}

#[test]
fn test_arrival_completes_the_walk() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    send_minute(&mut app, 8, 30);
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Movement);

    // Drop the agent on its destination; next frame reports arrival.
    // The 8:30 stop is the store at tile (20, 6).
    teleport_brain(&mut app, "mira", Vec2::new(20.0 * TILE_SIZE, -6.0 * TILE_SIZE));
    app.update();

    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Routine);
}

#[test]
fn test_player_presence_interrupts_and_defers() {
    let mut app = build_test_app();
    let player = spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    // Walk up to Mira: one tick later she is Waiting.
    let mira_pos = brain_position(&mut app, "mira");
    move_player(&mut app, player, mira_pos + Vec2::new(PRESENCE_RADIUS * 0.5, 0.0));
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Waiting);

    // Her 8:30 departure fires while the player lingers: deferred, not acted on.
    send_minute(&mut app, 8, 30);
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Waiting);
    assert!(waypoint_events(&app) > 0, "the trigger itself still surfaces");

    // The player walks away: the deferred stop resumes.
    move_player(&mut app, player, Vec2::new(10_000.0, 10_000.0));
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Movement);
}

#[test]
fn test_day_end_resets_mid_route() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    send_minute(&mut app, 8, 30);
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Movement);
    let mid_route_remaining = waypoints_remaining(&mut app, "mira");

    // Roll the calendar to the next morning, then announce the day end.
    {
        let mut calendar = app.world_mut().resource_mut::<Calendar>();
        calendar.day = 2;
        calendar.hour = DAY_START_HOUR;
        calendar.minute = 0;
        calendar.weather = Weather::Sunny;
    }
    send_day_end(&mut app, 1, Season::Spring, 1);
    app.update();

    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Routine);
    assert!(
        waypoints_remaining(&mut app, "mira") > mid_route_remaining,
        "queue rebuilt from the new day's full path"
    );
}

#[test]
fn test_rainy_day_selects_rainy_variant() {
    let mut app = build_test_app();
    spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    app.world_mut().resource_mut::<Calendar>().weather = Weather::Rainy;
    enter_playing_state(&mut app);

    // Mira's rainy variant has 2 stops; her weekday shift has 4.
    assert_eq!(waypoints_remaining(&mut app, "mira"), 2);
}

#[test]
fn test_interaction_locks_the_character() {
    let mut app = build_test_app();
    let player = spawn_player(&mut app, Vec2::new(10_000.0, 10_000.0));
    enter_playing_state(&mut app);

    let mira = {
        let mut query = app.world_mut().query::<(Entity, &Npc)>();
        query
            .iter(app.world())
            .find(|(_, npc)| npc.id == "mira")
            .map(|(entity, _)| entity)
            .expect("mira exists")
    };

    let mira_pos = brain_position(&mut app, "mira");
    move_player(&mut app, player, mira_pos + Vec2::new(10.0, 0.0));
    app.update();

    app.world_mut().send_event(InteractionStartEvent { npc: mira });
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Interaction);

    // Presence changes are ignored while talking.
    move_player(&mut app, player, Vec2::new(10_000.0, 10_000.0));
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Interaction);

    app.world_mut().send_event(InteractionEndEvent { npc: mira });
    app.update();
    assert_eq!(brain_state(&mut app, "mira"), BehaviorState::Routine);
}
