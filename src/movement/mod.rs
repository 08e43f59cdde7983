//! Movement domain: one "walk to point" operation on top of the Navigator,
//! plus the speed-to-animation bridge.
//!
//! Per tick the controller drives navigation first, then maps the agent's
//! speed through a clamped half-speed ceiling into the walk-cycle blend
//! parameter. Arrival notices are single-shot: each `move_to_point` arms
//! exactly one, and it clears when taken.

use bevy::prelude::*;

use crate::nav::{NavAgent, NavTarget, Navigator};
use crate::shared::*;

/// The consumed animation playback capability.
pub trait AnimationDriver: Send + Sync {
    /// Damp the walk-cycle blend parameter toward `value` over the given
    /// smoothing time constant.
    fn set_blend(&mut self, value: f32, smoothing: f32, dt: f32);
    fn trigger_pose(&mut self, name: &str);
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Animation state holder read by whatever renders the character. Holds the
/// damped blend value, the last triggered pose, and the paused flag; playback
/// itself is outside this core.
#[derive(Debug, Clone, Default)]
pub struct WalkCycleDriver {
    pub blend: f32,
    pub pose: Option<String>,
    pub paused: bool,
}

impl AnimationDriver for WalkCycleDriver {
    fn set_blend(&mut self, value: f32, smoothing: f32, dt: f32) {
        if self.paused {
            return;
        }
        if smoothing <= 0.0 {
            self.blend = value;
        } else {
            // Exponential damp with `smoothing` as the time constant.
            let alpha = 1.0 - (-dt / smoothing).exp();
            self.blend += (value - self.blend) * alpha;
        }
    }

    fn trigger_pose(&mut self, name: &str) {
        self.pose = Some(name.to_string());
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}

/// Owns a Navigator plus the animation capability for one character.
pub struct MovementController<A: NavAgent, D: AnimationDriver> {
    navigator: Navigator<A>,
    anim: D,
    arrival_armed: bool,
}

impl<A: NavAgent, D: AnimationDriver> MovementController<A, D> {
    pub fn new(agent: A, spawn_point: Vec2, anim: D) -> Self {
        Self {
            navigator: Navigator::new(agent, spawn_point),
            anim,
            arrival_armed: false,
        }
    }

    /// Walk to a point. Arms a fresh single-shot arrival notice; an in-flight
    /// route is silently retargeted.
    pub fn move_to_point(&mut self, target: NavTarget) {
        self.arrival_armed = true;
        self.navigator.move_to(target);
    }

    pub fn stop(&mut self, warp_to_spawn: bool) {
        self.navigator.stop(warp_to_spawn);
    }

    pub fn play_pose(&mut self, name: &str) {
        self.anim.trigger_pose(name);
    }

    pub fn face_toward(&mut self, point: Vec2) {
        self.navigator.face_toward(point);
    }

    pub fn pause_animation(&mut self) {
        self.anim.pause();
    }

    pub fn resume_animation(&mut self) {
        self.anim.resume();
    }

    /// Per-frame tick: navigation first, then the speed-derived blend update.
    /// Returns true when the armed arrival notice fires; the notice clears
    /// and stays clear until the next `move_to_point`.
    pub fn update(&mut self, dt: f32) -> bool {
        let arrived = self.navigator.update();

        let speed = self.navigator.agent().velocity().length();
        let blend = (speed / ANIM_BLEND_CEILING).clamp(0.0, 1.0);
        self.anim.set_blend(blend, ANIM_BLEND_SMOOTHING, dt);

        if arrived && self.arrival_armed {
            self.arrival_armed = false;
            return true;
        }
        false
    }

    pub fn is_moving(&self) -> bool {
        self.navigator.is_moving()
    }

    pub fn facing(&self) -> Facing {
        self.navigator.facing()
    }

    pub fn position(&self) -> Vec2 {
        self.navigator.agent().position()
    }

    pub fn agent(&self) -> &A {
        self.navigator.agent()
    }

    pub fn agent_mut(&mut self) -> &mut A {
        self.navigator.agent_mut()
    }

    pub fn anim(&self) -> &D {
        &self.anim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::test_support::ScriptedAgent;

    fn controller_at(pos: Vec2) -> MovementController<ScriptedAgent, WalkCycleDriver> {
        MovementController::new(ScriptedAgent::at(pos), pos, WalkCycleDriver::default())
    }

    #[test]
    fn test_arrival_notice_is_single_shot() {
        let mut ctl = controller_at(Vec2::ZERO);
        ctl.move_to_point(NavTarget::new(Vec2::new(10.0, 0.0), Facing::Down));

        ctl.agent_mut().pos = Vec2::new(10.0, 0.0);
        assert!(ctl.update(0.016), "armed notice fires on arrival");
        assert!(!ctl.update(0.016), "notice auto-clears after firing once");
        assert!(!ctl.update(0.016));
    }

    #[test]
    fn test_each_move_rearms_the_notice() {
        let mut ctl = controller_at(Vec2::ZERO);
        ctl.move_to_point(NavTarget::new(Vec2::new(10.0, 0.0), Facing::Down));
        ctl.agent_mut().pos = Vec2::new(10.0, 0.0);
        assert!(ctl.update(0.016));

        ctl.move_to_point(NavTarget::new(Vec2::new(30.0, 0.0), Facing::Down));
        ctl.agent_mut().pos = Vec2::new(30.0, 0.0);
        assert!(ctl.update(0.016));
    }

    #[test]
    fn test_blend_tracks_agent_speed() {
        let mut ctl = controller_at(Vec2::ZERO);
        ctl.move_to_point(NavTarget::new(Vec2::new(500.0, 0.0), Facing::Right));
        ctl.agent_mut().vel = Vec2::new(NPC_WALK_SPEED, 0.0);

        // Full walk speed is past the half-speed ceiling: blend damps to 1.0
        for _ in 0..200 {
            ctl.update(0.016);
        }
        assert!(ctl.anim().blend > 0.95, "blend should saturate near 1.0");

        // Stopping damps it back down
        ctl.agent_mut().vel = Vec2::ZERO;
        for _ in 0..200 {
            ctl.update(0.016);
        }
        assert!(ctl.anim().blend < 0.05, "blend should decay toward 0.0");
    }

    #[test]
    fn test_blend_clamped_to_unit_range() {
        let mut ctl = controller_at(Vec2::ZERO);
        ctl.agent_mut().vel = Vec2::new(10_000.0, 0.0);
        for _ in 0..500 {
            ctl.update(0.016);
        }
        assert!(ctl.anim().blend <= 1.0);
    }

    #[test]
    fn test_pose_passthrough() {
        let mut ctl = controller_at(Vec2::ZERO);
        ctl.play_pose("sweep");
        assert_eq!(ctl.anim().pose.as_deref(), Some("sweep"));
    }

    #[test]
    fn test_paused_driver_ignores_blend_updates() {
        let mut driver = WalkCycleDriver::default();
        driver.set_blend(1.0, 0.0, 0.016);
        assert_eq!(driver.blend, 1.0);
        driver.pause();
        driver.set_blend(0.0, 0.0, 0.016);
        assert_eq!(driver.blend, 1.0, "paused playback holds its blend value");
        driver.resume();
        driver.set_blend(0.0, 0.0, 0.016);
        assert_eq!(driver.blend, 0.0);
    }
}
