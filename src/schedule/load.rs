//! RON deserialization and validation for authored schedules.
//!
//! Schedules are authored as RON `CharacterSchedule` values. Validation runs
//! at load so malformed data fails loudly at startup instead of producing a
//! character that silently never leaves home.

use ron::error::SpannedError;

use crate::shared::*;

/// Location tags waypoints are allowed to reference. Purely an authoring
/// guard; the runtime never looks locations up.
pub const KNOWN_LOCATIONS: &[&str] = &[
    "home",
    "plaza",
    "store",
    "dock",
    "clinic",
    "saloon",
    "beach",
    "forest",
    "bridge",
    "festival_grounds",
];

#[derive(Debug)]
pub enum ScheduleLoadError {
    Parse(SpannedError),
    Invalid { character: String, reason: String },
}

impl std::fmt::Display for ScheduleLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleLoadError::Parse(err) => write!(f, "schedule parse error: {err}"),
            ScheduleLoadError::Invalid { character, reason } => {
                write!(f, "invalid schedule for '{character}': {reason}")
            }
        }
    }
}

impl std::error::Error for ScheduleLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleLoadError::Parse(err) => Some(err),
            ScheduleLoadError::Invalid { .. } => None,
        }
    }
}

impl From<SpannedError> for ScheduleLoadError {
    fn from(err: SpannedError) -> Self {
        ScheduleLoadError::Parse(err)
    }
}

/// Parses one character's schedule from RON text and validates it.
pub fn schedule_from_ron(text: &str) -> Result<CharacterSchedule, ScheduleLoadError> {
    let schedule: CharacterSchedule = ron::from_str(text)?;
    validate_schedule(&schedule)?;
    Ok(schedule)
}

/// Structural checks over an authored schedule. Variant paths must be
/// non-empty, times must be within the waking day and strictly ascending,
/// and every location tag must be known.
pub fn validate_schedule(schedule: &CharacterSchedule) -> Result<(), ScheduleLoadError> {
    let invalid = |reason: String| ScheduleLoadError::Invalid {
        character: schedule.character.clone(),
        reason,
    };

    if schedule.character.is_empty() {
        return Err(invalid("empty character id".to_string()));
    }

    for variant in &schedule.variants {
        if variant.path.is_empty() {
            return Err(invalid(format!("variant '{}' has an empty path", variant.name)));
        }

        let mut previous: Option<(u8, u8)> = None;
        for wp in &variant.path {
            if wp.hour < DAY_START_HOUR || wp.hour >= DAY_END_HOUR {
                return Err(invalid(format!(
                    "variant '{}': waypoint time {}:{:02} is outside the waking day",
                    variant.name, wp.hour, wp.minute
                )));
            }
            if wp.minute >= 60 {
                return Err(invalid(format!(
                    "variant '{}': waypoint minute {} out of range",
                    variant.name, wp.minute
                )));
            }
            if let Some(prev) = previous {
                if (wp.hour, wp.minute) <= prev {
                    return Err(invalid(format!(
                        "variant '{}': waypoint times must be strictly ascending \
                         ({}:{:02} follows {}:{:02})",
                        variant.name, wp.hour, wp.minute, prev.0, prev.1
                    )));
                }
            }
            previous = Some((wp.hour, wp.minute));

            if !KNOWN_LOCATIONS.contains(&wp.location.as_str()) {
                return Err(invalid(format!(
                    "variant '{}': unknown location tag '{}'",
                    variant.name, wp.location
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RON: &str = r#"
        (
            character: "mira",
            variants: [
                (
                    name: "rainy",
                    conditions: (
                        seasons: (0),
                        days: (0),
                        date_spans: [],
                        min_hearts: 0,
                        requires_rain: Some(true),
                    ),
                    path: [
                        (
                            hour: 9, minute: 0, x: 4, y: 2,
                            facing: Down, animation: Some("sweep"),
                            location: "home",
                        ),
                    ],
                ),
                (
                    name: "default",
                    conditions: (
                        seasons: (0),
                        days: (0),
                        date_spans: [],
                        min_hearts: 0,
                        requires_rain: None,
                    ),
                    path: [
                        (
                            hour: 8, minute: 30, x: 10, y: 5,
                            facing: Right, animation: None,
                            location: "store",
                        ),
                        (
                            hour: 17, minute: 0, x: 4, y: 2,
                            facing: Down, animation: None,
                            location: "home",
                        ),
                    ],
                ),
            ],
        )
    "#;

    #[test]
    fn test_parses_valid_schedule() {
        let schedule = schedule_from_ron(VALID_RON).expect("valid RON should load");
        assert_eq!(schedule.character, "mira");
        assert_eq!(schedule.variants.len(), 2);
        assert_eq!(schedule.variants[0].conditions.requires_rain, Some(true));
        assert_eq!(schedule.variants[1].path[0].location, "store");
    }

    #[test]
    fn test_rejects_malformed_ron() {
        let err = schedule_from_ron("(character: oops").unwrap_err();
        assert!(matches!(err, ScheduleLoadError::Parse(_)));
    }

    fn schedule_with_path(path: Vec<Waypoint>) -> CharacterSchedule {
        CharacterSchedule {
            character: "mira".to_string(),
            variants: vec![ScheduleVariant {
                name: "default".to_string(),
                conditions: ScheduleConditions::default(),
                path,
            }],
        }
    }

    fn waypoint(hour: u8, minute: u8, location: &str) -> Waypoint {
        Waypoint {
            hour,
            minute,
            x: 0,
            y: 0,
            facing: Facing::Down,
            animation: None,
            location: location.to_string(),
        }
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = validate_schedule(&schedule_with_path(vec![])).unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn test_rejects_time_outside_waking_day() {
        let err =
            validate_schedule(&schedule_with_path(vec![waypoint(5, 0, "home")])).unwrap_err();
        assert!(err.to_string().contains("outside the waking day"));

        let err =
            validate_schedule(&schedule_with_path(vec![waypoint(26, 0, "home")])).unwrap_err();
        assert!(err.to_string().contains("outside the waking day"));

        // 25:59 is the last schedulable minute
        assert!(validate_schedule(&schedule_with_path(vec![waypoint(25, 59, "home")])).is_ok());
    }

    #[test]
    fn test_rejects_non_ascending_times() {
        let err = validate_schedule(&schedule_with_path(vec![
            waypoint(9, 0, "home"),
            waypoint(9, 0, "store"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));

        let err = validate_schedule(&schedule_with_path(vec![
            waypoint(12, 0, "home"),
            waypoint(9, 0, "store"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn test_rejects_unknown_location() {
        let err =
            validate_schedule(&schedule_with_path(vec![waypoint(9, 0, "moonbase")])).unwrap_err();
        assert!(err.to_string().contains("unknown location tag 'moonbase'"));
    }
}
