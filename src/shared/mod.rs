//! Shared components, resources, events, and states for Driftvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }

    pub fn bit(self) -> u8 {
        1 << self.index()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn index(self) -> usize {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn bit(self) -> u8 {
        1 << self.index()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Rainy,
    Stormy,
    Snowy, // Winter only
}

impl Weather {
    /// Anything that keeps schedule-sensitive townsfolk indoors counts as rain.
    pub fn is_precipitation(self) -> bool {
        matches!(self, Weather::Rainy | Weather::Stormy | Weather::Snowy)
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub year: u32,
    pub season: Season,
    pub day: u8,           // 1-28
    pub hour: u8,          // 6-25 (25 = 1:00 AM next day)
    pub minute: u8,        // 0-59
    pub weather: Weather,
    pub time_scale: f32,   // game-minutes per real-second (default ~10)
    pub time_paused: bool,
    pub elapsed_real_seconds: f32, // accumulator for sub-minute ticks
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            year: 1,
            season: Season::Spring,
            day: 1,
            hour: DAY_START_HOUR,
            minute: 0,
            weather: Weather::Sunny,
            time_scale: 10.0,
            time_paused: false,
            elapsed_real_seconds: 0.0,
        }
    }
}

impl Calendar {
    pub fn day_of_week(&self) -> DayOfWeek {
        let total_days = (self.season.index() as u32 * 28) + (self.day as u32 - 1);
        match total_days % 7 {
            0 => DayOfWeek::Monday,
            1 => DayOfWeek::Tuesday,
            2 => DayOfWeek::Wednesday,
            3 => DayOfWeek::Thursday,
            4 => DayOfWeek::Friday,
            5 => DayOfWeek::Saturday,
            _ => DayOfWeek::Sunday,
        }
    }

    /// Day index within the current year: 0..=111.
    pub fn day_of_year(&self) -> u16 {
        (self.season.index() as u16 * DAYS_PER_SEASON as u16) + (self.day as u16 - 1)
    }

    pub fn total_days_elapsed(&self) -> u32 {
        ((self.year - 1) * 112) + self.day_of_year() as u32
    }

    /// Returns time as a float (e.g. 14.5 = 2:30 PM) for debug display.
    pub fn time_float(&self) -> f32 {
        self.hour as f32 + (self.minute as f32 / 60.0)
    }

    /// Snapshot of the calendar fields schedule matching cares about.
    pub fn schedule_date(&self) -> ScheduleDate {
        ScheduleDate {
            season: self.season,
            day: self.day,
            day_of_week: self.day_of_week(),
            day_of_year: self.day_of_year(),
        }
    }
}

/// The date inputs a schedule rule variant is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDate {
    pub season: Season,
    pub day: u8,
    pub day_of_week: DayOfWeek,
    pub day_of_year: u16,
}

// ═══════════════════════════════════════════════════════════════════════
// ORIENTATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Dominant-axis facing for a movement delta. Zero deltas face down.
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if delta.y > 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCHEDULE DATA — authored, immutable at runtime
// ═══════════════════════════════════════════════════════════════════════

pub type NpcId = String;

/// Bitmask over the four seasons. Zero means "any season".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonMask(pub u8);

impl SeasonMask {
    pub const ANY: SeasonMask = SeasonMask(0);
    pub const SPRING: SeasonMask = SeasonMask(1 << 0);
    pub const SUMMER: SeasonMask = SeasonMask(1 << 1);
    pub const FALL: SeasonMask = SeasonMask(1 << 2);
    pub const WINTER: SeasonMask = SeasonMask(1 << 3);

    pub fn is_unset(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, season: Season) -> bool {
        self.0 & season.bit() != 0
    }
}

impl std::ops::BitOr for SeasonMask {
    type Output = SeasonMask;
    fn bitor(self, rhs: SeasonMask) -> SeasonMask {
        SeasonMask(self.0 | rhs.0)
    }
}

/// Bitmask over the seven days of the week. Zero means "any day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayMask(pub u8);

impl DayMask {
    pub const ANY: DayMask = DayMask(0);
    pub const WEEKDAYS: DayMask = DayMask(0b0001_1111);
    pub const WEEKEND: DayMask = DayMask(0b0110_0000);

    pub fn is_unset(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, day: DayOfWeek) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn with(self, day: DayOfWeek) -> DayMask {
        DayMask(self.0 | day.bit())
    }
}

/// Inclusive range of day-of-year values (0..=111), e.g. a festival week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: u16,
    pub end: u16,
}

impl DateSpan {
    pub fn new(start_season: Season, start_day: u8, end_season: Season, end_day: u8) -> Self {
        Self {
            start: start_season.index() as u16 * DAYS_PER_SEASON as u16 + (start_day as u16 - 1),
            end: end_season.index() as u16 * DAYS_PER_SEASON as u16 + (end_day as u16 - 1),
        }
    }

    pub fn single(season: Season, day: u8) -> Self {
        Self::new(season, day, season, day)
    }

    pub fn contains(self, day_of_year: u16) -> bool {
        day_of_year >= self.start && day_of_year <= self.end
    }
}

/// A single scheduled stop: when to leave, where to stand, which way to face,
/// and what to do on arrival. Immutable once authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub hour: u8,
    pub minute: u8,
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    /// Pose to trigger on arrival (e.g. "sit", "sweep"). None = stand idle.
    pub animation: Option<String>,
    /// Authoring-time location tag, validated on load. Not used at runtime.
    pub location: String,
}

impl Waypoint {
    pub fn world_target(&self) -> Vec2 {
        Vec2::new(self.x as f32 * TILE_SIZE, -(self.y as f32 * TILE_SIZE))
    }
}

/// The condition gate on one rule variant. Every populated field must be
/// satisfied for the variant to match; unset fields constrain nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConditions {
    pub seasons: SeasonMask,
    pub days: DayMask,
    pub date_spans: Vec<DateSpan>,
    pub min_hearts: u8,
    /// Some(true) = rainy days only, Some(false) = dry days only, None = any.
    pub requires_rain: Option<bool>,
}

impl ScheduleConditions {
    pub fn matches(&self, date: &ScheduleDate, hearts: u8, raining: bool) -> bool {
        if !self.seasons.is_unset() && !self.seasons.contains(date.season) {
            return false;
        }
        if !self.days.is_unset() && !self.days.contains(date.day_of_week) {
            return false;
        }
        if !self.date_spans.is_empty()
            && !self.date_spans.iter().any(|s| s.contains(date.day_of_year))
        {
            return false;
        }
        if hearts < self.min_hearts {
            return false;
        }
        if let Some(required) = self.requires_rain {
            if required != raining {
                return false;
            }
        }
        true
    }
}

/// One condition-gated candidate daily path. Declaration order within a
/// CharacterSchedule doubles as priority: authors list most-specific first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleVariant {
    pub name: String,
    pub conditions: ScheduleConditions,
    pub path: Vec<Waypoint>,
}

/// The full authored variant set for one character. Read-only at runtime,
/// shared across all instances of the same archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSchedule {
    pub character: NpcId,
    pub variants: Vec<ScheduleVariant>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ScheduleRegistry {
    pub schedules: HashMap<NpcId, Arc<CharacterSchedule>>,
}

impl ScheduleRegistry {
    pub fn get(&self, id: &str) -> Option<Arc<CharacterSchedule>> {
        self.schedules.get(id).cloned()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NPCs & RELATIONSHIPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
}

/// Marker for the player entity. Movement and input are external concerns;
/// the behavior core only reads the player's position.
#[derive(Component, Debug, Clone, Default)]
pub struct Player;

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationships {
    /// NPC id → friendship points (0-1000, 100 per heart)
    pub friendship: HashMap<NpcId, u32>,
}

impl Relationships {
    pub fn hearts(&self, npc_id: &str) -> u8 {
        let points = self.friendship.get(npc_id).copied().unwrap_or(0);
        (points / FRIENDSHIP_PER_HEART).min(MAX_HEARTS) as u8
    }

    pub fn add_friendship(&mut self, npc_id: &str, amount: i32) {
        let entry = self.friendship.entry(npc_id.to_string()).or_insert(0);
        *entry = (*entry as i32 + amount).clamp(0, MAX_FRIENDSHIP as i32) as u32;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// One game-minute elapsed. Carries the new wall-clock value so consumers
/// never have to race the Calendar resource.
#[derive(Event, Debug, Clone, Copy)]
pub struct MinuteTickEvent {
    pub hour: u8,
    pub minute: u8,
}

#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub day: u8,
    pub season: Season,
    pub year: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
    pub year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Entered,
    Exited,
}

/// The player crossed an NPC's presence radius.
#[derive(Event, Debug, Clone)]
pub struct PresenceEvent {
    pub npc: Entity,
    pub kind: PresenceKind,
}

/// A new schedule waypoint became current. Multi-fire; any schedule-dependent
/// listener may consume it alongside the state machine.
#[derive(Event, Debug, Clone)]
pub struct WaypointChangedEvent {
    pub npc: Entity,
    pub waypoint: Waypoint,
}

/// External request to put an NPC into its Interaction state (dialogue, trade).
#[derive(Event, Debug, Clone)]
pub struct InteractionStartEvent {
    pub npc: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct InteractionEndEvent {
    pub npc: Entity,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;

pub const DAYS_PER_SEASON: u8 = 28;
pub const DAY_START_HOUR: u8 = 6;
/// 26:00 = 2:00 AM next day; reaching it forces the day rollover.
pub const DAY_END_HOUR: u8 = 26;

pub const FRIENDSHIP_PER_HEART: u32 = 100;
pub const MAX_HEARTS: u32 = 10;
pub const MAX_FRIENDSHIP: u32 = MAX_HEARTS * FRIENDSHIP_PER_HEART;

pub const NPC_WALK_SPEED: f32 = 40.0;
/// Distance below which a moving character has reached its target (world units).
pub const ARRIVAL_THRESHOLD: f32 = 2.0;
/// Radius of the player-presence trigger around each NPC.
pub const PRESENCE_RADIUS: f32 = 24.0;

/// Agent speed at which the walk-cycle blend parameter saturates at 1.0.
pub const ANIM_BLEND_CEILING: f32 = NPC_WALK_SPEED * 0.5;
/// Smoothing time constant for blend-parameter updates, in seconds.
pub const ANIM_BLEND_SMOOTHING: f32 = 0.1;

pub const IDLE_POSE: &str = "idle";
