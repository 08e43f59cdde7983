//! Built-in character schedules.
//!
//! Authored in code, most-specific variant first. These double as the
//! shipped content and as living examples of the variant format for
//! data-driven schedules loaded through `load`.

use std::sync::Arc;

use crate::shared::*;

fn wp(hour: u8, minute: u8, x: i32, y: i32, facing: Facing, location: &str) -> Waypoint {
    Waypoint {
        hour,
        minute,
        x,
        y,
        facing,
        animation: None,
        location: location.to_string(),
    }
}

fn wp_anim(
    hour: u8,
    minute: u8,
    x: i32,
    y: i32,
    facing: Facing,
    animation: &str,
    location: &str,
) -> Waypoint {
    Waypoint {
        animation: Some(animation.to_string()),
        ..wp(hour, minute, x, y, facing, location)
    }
}

/// Mira — runs the general store. Weekday counter shifts, Sunday off.
fn mira() -> CharacterSchedule {
    CharacterSchedule {
        character: "mira".to_string(),
        variants: vec![
            // Harvest festival, Fall 16: the whole town is at the grounds
            ScheduleVariant {
                name: "harvest_festival".to_string(),
                conditions: ScheduleConditions {
                    date_spans: vec![DateSpan::single(Season::Fall, 16)],
                    ..Default::default()
                },
                path: vec![
                    wp(9, 0, 42, 8, Facing::Down, "festival_grounds"),
                    wp(18, 0, 12, 4, Facing::Down, "home"),
                ],
            },
            // Rain keeps the shutters down; she tidies the shop instead
            ScheduleVariant {
                name: "rainy_day".to_string(),
                conditions: ScheduleConditions {
                    requires_rain: Some(true),
                    ..Default::default()
                },
                path: vec![
                    wp_anim(9, 0, 20, 6, Facing::Up, "sweep", "store"),
                    wp(16, 0, 12, 4, Facing::Down, "home"),
                ],
            },
            // Sunday walk along the waterfront
            ScheduleVariant {
                name: "sunday_off".to_string(),
                conditions: ScheduleConditions {
                    days: DayMask::ANY.with(DayOfWeek::Sunday),
                    ..Default::default()
                },
                path: vec![
                    wp(10, 0, 30, 14, Facing::Left, "dock"),
                    wp(13, 30, 34, 16, Facing::Down, "beach"),
                    wp(17, 0, 12, 4, Facing::Down, "home"),
                ],
            },
            // Everyday shop shift
            ScheduleVariant {
                name: "shopkeeper".to_string(),
                conditions: ScheduleConditions::default(),
                path: vec![
                    wp(8, 30, 20, 6, Facing::Down, "store"),
                    wp(12, 0, 22, 10, Facing::Right, "plaza"),
                    wp(13, 0, 20, 6, Facing::Down, "store"),
                    wp(18, 0, 12, 4, Facing::Down, "home"),
                ],
            },
        ],
    }
}

/// Tomas — fisherman. Lives by the water unless the weather says otherwise.
fn tomas() -> CharacterSchedule {
    CharacterSchedule {
        character: "tomas".to_string(),
        variants: vec![
            ScheduleVariant {
                name: "harvest_festival".to_string(),
                conditions: ScheduleConditions {
                    date_spans: vec![DateSpan::single(Season::Fall, 16)],
                    ..Default::default()
                },
                path: vec![
                    wp(10, 0, 44, 8, Facing::Down, "festival_grounds"),
                    wp(19, 0, 28, 18, Facing::Down, "home"),
                ],
            },
            // Close friends get invited to the bridge at dusk
            ScheduleVariant {
                name: "confidant_evening".to_string(),
                conditions: ScheduleConditions {
                    min_hearts: 8,
                    requires_rain: Some(false),
                    ..Default::default()
                },
                path: vec![
                    wp(7, 0, 32, 15, Facing::Up, "dock"),
                    wp_anim(18, 30, 26, 12, Facing::Left, "lean", "bridge"),
                    wp(21, 0, 28, 18, Facing::Down, "home"),
                ],
            },
            // Storms mean the saloon, not the water
            ScheduleVariant {
                name: "foul_weather".to_string(),
                conditions: ScheduleConditions {
                    requires_rain: Some(true),
                    ..Default::default()
                },
                path: vec![
                    wp(11, 0, 24, 9, Facing::Down, "saloon"),
                    wp(20, 0, 28, 18, Facing::Down, "home"),
                ],
            },
            // Winter: no fishing, long mornings indoors
            ScheduleVariant {
                name: "winter_routine".to_string(),
                conditions: ScheduleConditions {
                    seasons: SeasonMask::WINTER,
                    ..Default::default()
                },
                path: vec![
                    wp(10, 0, 24, 9, Facing::Down, "saloon"),
                    wp(15, 0, 28, 18, Facing::Down, "home"),
                ],
            },
            ScheduleVariant {
                name: "fishing_day".to_string(),
                conditions: ScheduleConditions::default(),
                path: vec![
                    wp_anim(6, 30, 32, 15, Facing::Up, "cast", "dock"),
                    wp(14, 0, 34, 16, Facing::Down, "beach"),
                    wp(19, 0, 28, 18, Facing::Down, "home"),
                ],
            },
        ],
    }
}

/// Doc Elsie — clinic on weekdays, forest walks on the weekend.
fn elsie() -> CharacterSchedule {
    CharacterSchedule {
        character: "elsie".to_string(),
        variants: vec![
            ScheduleVariant {
                name: "harvest_festival".to_string(),
                conditions: ScheduleConditions {
                    date_spans: vec![DateSpan::single(Season::Fall, 16)],
                    ..Default::default()
                },
                path: vec![
                    wp(9, 30, 40, 8, Facing::Down, "festival_grounds"),
                    wp(18, 30, 8, 3, Facing::Down, "home"),
                ],
            },
            ScheduleVariant {
                name: "weekend_walk".to_string(),
                conditions: ScheduleConditions {
                    days: DayMask::WEEKEND,
                    requires_rain: Some(false),
                    ..Default::default()
                },
                path: vec![
                    wp(9, 0, 4, 20, Facing::Up, "forest"),
                    wp(14, 0, 22, 10, Facing::Down, "plaza"),
                    wp(17, 30, 8, 3, Facing::Down, "home"),
                ],
            },
            ScheduleVariant {
                name: "clinic_shift".to_string(),
                conditions: ScheduleConditions::default(),
                path: vec![
                    wp(8, 0, 16, 7, Facing::Down, "clinic"),
                    wp_anim(12, 30, 16, 8, Facing::Left, "sit", "clinic"),
                    wp(13, 30, 16, 7, Facing::Down, "clinic"),
                    wp(17, 0, 8, 3, Facing::Down, "home"),
                ],
            },
        ],
    }
}

/// Builds the registry of all shipped characters.
pub fn build_schedule_registry() -> ScheduleRegistry {
    let mut registry = ScheduleRegistry::default();
    for schedule in [mira(), tomas(), elsie()] {
        registry
            .schedules
            .insert(schedule.character.clone(), Arc::new(schedule));
    }
    registry
}
