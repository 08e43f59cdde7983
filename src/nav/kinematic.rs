//! Kinematic reference agent: straight-line steering toward the destination,
//! in the same walk style the rest of the game moves characters. Stands in
//! for a full pathfinding engine behind the NavAgent trait.

use bevy::prelude::*;
use std::sync::Arc;

use super::NavAgent;

/// An instant transition between two disconnected walkable areas, e.g. a
/// doorway that leads to an interior the walkable plane doesn't reach.
#[derive(Debug, Clone, Copy)]
pub struct NavLink {
    pub entry: Vec2,
    pub exit: Vec2,
    pub radius: f32,
}

/// Straight-line agent. `integrate` is ticked by the engine layer each frame;
/// everything else is the NavAgent contract consumed by the Navigator.
pub struct KinematicAgent {
    pos: Vec2,
    vel: Vec2,
    dest: Option<Vec2>,
    speed: f32,
    stopped: bool,
    links: Arc<Vec<NavLink>>,
    current_link: Option<usize>,
}

impl KinematicAgent {
    pub fn new(pos: Vec2, speed: f32, links: Arc<Vec<NavLink>>) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            dest: None,
            speed,
            stopped: true,
            links,
            current_link: None,
        }
    }

    /// Engine-side tick: walk toward the destination and latch any teleport
    /// link the route passes over. The Navigator resolves latched links.
    pub fn integrate(&mut self, dt: f32) {
        if self.stopped {
            self.vel = Vec2::ZERO;
            return;
        }
        let Some(dest) = self.dest else {
            self.vel = Vec2::ZERO;
            return;
        };

        // Latch a link when standing on its entry pad and the destination is
        // on the far side (closer to the exit than to the entry).
        if self.current_link.is_none() {
            self.current_link = self.links.iter().position(|link| {
                self.pos.distance(link.entry) <= link.radius
                    && dest.distance(link.exit) < dest.distance(link.entry)
            });
        }
        if self.current_link.is_some() {
            // Parked on the link until the Navigator completes it.
            self.vel = Vec2::ZERO;
            return;
        }

        let to_dest = dest - self.pos;
        let dist = to_dest.length();
        if dist <= f32::EPSILON {
            self.vel = Vec2::ZERO;
            return;
        }

        let step = (self.speed * dt).min(dist);
        let dir = to_dest / dist;
        self.pos += dir * step;
        self.vel = dir * self.speed;
    }
}

impl NavAgent for KinematicAgent {
    fn set_destination(&mut self, point: Vec2) {
        self.dest = Some(point);
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn teleport(&mut self, point: Vec2) {
        self.pos = point;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.vel = Vec2::ZERO;
        }
    }

    fn on_nav_link(&self) -> Option<Vec2> {
        self.current_link.map(|i| self.links[i].exit)
    }

    fn complete_link(&mut self) {
        self.current_link = None;
    }
}
