//! Schedule domain: authored daily routines and their runtime playback.
//!
//! Authored data is a set of condition-gated rule variants per character
//! (shared::CharacterSchedule). Once per day the resolver picks the variant
//! for the new day; the playback handler then consumes that variant's path
//! one waypoint at a time as the clock reaches each entry's time-of-day.

pub mod definitions;
pub mod load;
pub mod playback;
pub mod resolver;
