//! Calendar domain — the clock service the rest of the core runs on.
//!
//! Responsible for:
//! - Advancing game time (minutes, hours, days, seasons, years)
//! - Emitting one MinuteTickEvent per elapsed game-minute
//! - Forcing the day rollover at 26:00 (2 AM) and sending DayEndEvent
//! - Rolling daily weather
//! - Sending SeasonChangeEvent on season rollover
//! - Pausing / unpausing time based on GameState

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Calendar>()
            .add_event::<MinuteTickEvent>()
            .add_event::<DayEndEvent>()
            .add_event::<SeasonChangeEvent>()
            .add_systems(OnEnter(GameState::Playing), resume_time)
            .add_systems(OnExit(GameState::Playing), pause_time)
            .add_systems(
                Update,
                tick_time
                    .run_if(in_state(GameState::Playing))
                    .run_if(time_not_paused),
            );
    }
}

// ─── Run Conditions ───────────────────────────────────────────────────────────

fn time_not_paused(calendar: Res<Calendar>) -> bool {
    !calendar.time_paused
}

// ─── State transition hooks ───────────────────────────────────────────────────

fn resume_time(mut calendar: ResMut<Calendar>) {
    calendar.time_paused = false;
    info!("[Calendar] Time resumed — {}:{:02} Day {} {:?} Year {}",
        calendar.hour, calendar.minute, calendar.day, calendar.season, calendar.year);
}

fn pause_time(mut calendar: ResMut<Calendar>) {
    calendar.time_paused = true;
    info!("[Calendar] Time paused");
}

// ─── Main time-tick system ────────────────────────────────────────────────────

/// Accumulates real delta-seconds and converts them to in-game minutes.
///
/// Default time_scale = 10.0, meaning 1 real second = 10 game-minutes.
/// One game-minute triggers when:
///     elapsed_real_seconds >= (60.0 / time_scale)
///
/// Day spans 6:00 AM → 26:00 (2:00 AM next day) = 20 game-hours = 1200 min.
/// At time_scale 10 that's 120 real seconds (2 real minutes) per game-day.
///
/// Every advanced minute emits a MinuteTickEvent carrying the new wall-clock
/// value; schedule playback matches against that payload, not against the
/// Calendar resource, so a paused-then-resumed clock skips minutes rather
/// than firing them late.
fn tick_time(
    time: Res<Time>,
    mut calendar: ResMut<Calendar>,
    mut minute_writer: EventWriter<MinuteTickEvent>,
    mut day_end_writer: EventWriter<DayEndEvent>,
    mut season_writer: EventWriter<SeasonChangeEvent>,
) {
    let delta = time.delta_secs();
    calendar.elapsed_real_seconds += delta;

    // Guard against zero / negative time_scale
    let secs_per_game_minute = if calendar.time_scale > 0.0 {
        1.0 / calendar.time_scale
    } else {
        1.0 / 10.0
    };

    // Advance as many game-minutes as have accumulated
    while calendar.elapsed_real_seconds >= secs_per_game_minute {
        calendar.elapsed_real_seconds -= secs_per_game_minute;
        advance_one_minute(
            &mut calendar,
            &mut minute_writer,
            &mut day_end_writer,
            &mut season_writer,
        );
    }
}

/// Advances the calendar by exactly one game-minute.
/// Handles minute -> hour -> day rollovers.
fn advance_one_minute(
    calendar: &mut Calendar,
    minute_writer: &mut EventWriter<MinuteTickEvent>,
    day_end_writer: &mut EventWriter<DayEndEvent>,
    season_writer: &mut EventWriter<SeasonChangeEvent>,
) {
    calendar.minute += 1;

    if calendar.minute >= 60 {
        calendar.minute = 0;
        calendar.hour += 1;

        // 2:00 AM = hour 26 -> force end of day
        if calendar.hour >= DAY_END_HOUR {
            trigger_day_end(calendar, day_end_writer, season_writer);
        }
    }

    minute_writer.send(MinuteTickEvent {
        hour: calendar.hour,
        minute: calendar.minute,
    });
}

/// Called at the 26:00 rollover. Emits DayEndEvent for the day that ended,
/// advances day/season/year, resets the clock to 6:00 AM, and rolls new
/// weather. The calendar already shows the NEW day when day-end consumers run.
fn trigger_day_end(
    calendar: &mut Calendar,
    day_end_writer: &mut EventWriter<DayEndEvent>,
    season_writer: &mut EventWriter<SeasonChangeEvent>,
) {
    day_end_writer.send(DayEndEvent {
        day: calendar.day,
        season: calendar.season,
        year: calendar.year,
    });

    info!(
        "[Calendar] Day ended — Day {} {:?} Year {}",
        calendar.day, calendar.season, calendar.year
    );

    // Advance to next day
    calendar.day += 1;
    calendar.hour = DAY_START_HOUR;
    calendar.minute = 0;
    calendar.elapsed_real_seconds = 0.0;

    // Season rollover
    if calendar.day > DAYS_PER_SEASON {
        calendar.day = 1;
        let old_season = calendar.season;
        calendar.season = calendar.season.next();

        info!(
            "[Calendar] Season changed: {:?} -> {:?} (Year {})",
            old_season, calendar.season, calendar.year
        );

        // Year rollover happens when Spring begins again
        if calendar.season == Season::Spring {
            calendar.year += 1;
            info!("[Calendar] New Year! Year {}", calendar.year);
        }

        season_writer.send(SeasonChangeEvent {
            new_season: calendar.season,
            year: calendar.year,
        });
    }

    // Roll weather for the new day
    calendar.weather = roll_weather(calendar.season);

    info!(
        "[Calendar] New day: Day {} {:?} Year {} — Weather: {:?}",
        calendar.day, calendar.season, calendar.year, calendar.weather
    );
}

// ─── Weather rolling ──────────────────────────────────────────────────────────

/// Rolls a weather result for the given season using weighted probabilities.
///
/// Spring:  60% Sunny, 30% Rainy, 10% Stormy
/// Summer:  70% Sunny, 20% Rainy, 10% Stormy
/// Fall:    50% Sunny, 35% Rainy, 15% Stormy
/// Winter:  40% Sunny, 10% Rainy, 10% Stormy, 40% Snowy
pub fn roll_weather(season: Season) -> Weather {
    let mut rng = rand::thread_rng();
    let roll: f32 = rng.gen(); // 0.0 ..< 1.0

    match season {
        Season::Spring => {
            if roll < 0.60 {
                Weather::Sunny
            } else if roll < 0.90 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Summer => {
            if roll < 0.70 {
                Weather::Sunny
            } else if roll < 0.90 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Fall => {
            if roll < 0.50 {
                Weather::Sunny
            } else if roll < 0.85 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Winter => {
            if roll < 0.40 {
                Weather::Sunny
            } else if roll < 0.50 {
                Weather::Rainy
            } else if roll < 0.60 {
                Weather::Stormy
            } else {
                Weather::Snowy
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
