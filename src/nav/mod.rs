//! Navigation domain: wraps the external pathfinding capability.
//!
//! The Navigator tracks whether the character is en route, detects arrival by
//! distance threshold, fast-forwards discontinuous nav links (teleport pads
//! connecting disconnected walkable regions), and exposes Stop/MoveTo.
//! The pathfinding engine itself is a collaborator behind the NavAgent trait;
//! movement resolves asynchronously over subsequent ticks.

mod kinematic;

pub use kinematic::{KinematicAgent, NavLink};

use bevy::prelude::*;

use crate::shared::*;

/// The consumed pathfinding capability. Implemented by whatever moves the
/// agent through the world; the behavior core only issues requests and reads
/// state back.
pub trait NavAgent: Send + Sync {
    fn set_destination(&mut self, point: Vec2);
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn teleport(&mut self, point: Vec2);
    fn set_stopped(&mut self, stopped: bool);
    /// Endpoint of the discontinuous link the agent is currently traversing,
    /// if any. The Navigator completes such links instantly.
    fn on_nav_link(&self) -> Option<Vec2>;
    /// Acknowledge the current link as traversed.
    fn complete_link(&mut self);
}

/// The single in-flight destination: where to stand and which way to face
/// once there. Overwritten whenever a new move command arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTarget {
    pub point: Vec2,
    pub facing: Facing,
}

impl NavTarget {
    pub fn new(point: Vec2, facing: Facing) -> Self {
        Self { point, facing }
    }
}

/// Drives one agent toward one target at a time.
///
/// `move_to` mid-route silently retargets: the abandoned destination gets no
/// arrival notification. That is the interruption primitive, not an error.
pub struct Navigator<A: NavAgent> {
    agent: A,
    spawn_point: Vec2,
    target: NavTarget,
    facing: Facing,
    moving: bool,
}

impl<A: NavAgent> Navigator<A> {
    pub fn new(agent: A, spawn_point: Vec2) -> Self {
        assert!(
            spawn_point.is_finite(),
            "Navigator constructed with a non-finite spawn point"
        );
        Self {
            agent,
            spawn_point,
            target: NavTarget::new(spawn_point, Facing::default()),
            facing: Facing::default(),
            moving: false,
        }
    }

    /// Sets the current target and issues a route request. Does not block;
    /// arrival is reported by a later `update`.
    pub fn move_to(&mut self, target: NavTarget) {
        self.target = target;
        self.moving = true;
        self.agent.set_stopped(false);
        self.agent.set_destination(target.point);
    }

    /// Halts movement and zeroes agent velocity. With `warp_to_spawn`, also
    /// relocates the character to its spawn position and resets the target
    /// to a neutral value.
    pub fn stop(&mut self, warp_to_spawn: bool) {
        self.moving = false;
        self.agent.set_stopped(true);
        if warp_to_spawn {
            self.agent.teleport(self.spawn_point);
            self.target = NavTarget::new(self.spawn_point, Facing::default());
        }
    }

    /// Per-tick drive. Returns true exactly once per completed route, on the
    /// tick the agent comes within ARRIVAL_THRESHOLD of the target.
    pub fn update(&mut self) -> bool {
        // A route crossing disconnected regions parks the agent on a nav
        // link; complete it instantly and resume toward the original target.
        if let Some(link_end) = self.agent.on_nav_link() {
            self.agent.teleport(link_end);
            self.agent.complete_link();
            self.agent.set_destination(self.target.point);
        }

        if !self.moving {
            return false;
        }

        let distance = self.agent.position().distance(self.target.point);
        if distance <= ARRIVAL_THRESHOLD {
            self.facing = self.target.facing;
            self.stop(false);
            return true;
        }
        false
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn target(&self) -> NavTarget {
        self.target
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Point the character at a world position without moving.
    pub fn face_toward(&mut self, point: Vec2) {
        self.facing = Facing::from_delta(point - self.agent.position());
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }
}
