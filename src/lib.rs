//! Driftvale NPC behavior core — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) runs a headless simulation driver.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources without a window or GPU.

pub mod shared;
pub mod calendar;
pub mod nav;
pub mod movement;
pub mod schedule;
pub mod behavior;
pub mod npc;
