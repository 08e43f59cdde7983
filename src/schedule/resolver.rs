//! Variant selection: once per day boundary, pick the daily path.

use crate::shared::*;

/// Scans the character's variants in declaration order and returns the first
/// whose condition set matches. Pure over (schedule, date, hearts, raining).
///
/// First-declared-wins is the whole priority scheme: authors order variants
/// from most-specific to least-specific. No match leaves the day unscheduled
/// and the character idling in Routine.
pub fn select_variant<'a>(
    schedule: &'a CharacterSchedule,
    date: &ScheduleDate,
    hearts: u8,
    raining: bool,
) -> Option<&'a ScheduleVariant> {
    schedule
        .variants
        .iter()
        .find(|variant| variant.conditions.matches(date, hearts, raining))
}
