//! Character behavior state machine.
//!
//! Four states cover everything a townsperson does:
//!   Routine     — idle at post, playing a pose
//!   Movement    — walking a route toward the current waypoint
//!   Waiting     — paused mid-route because the player is close
//!   Interaction — locked in dialogue or trade
//!
//! Triggers come from the schedule (a waypoint fired), from proximity (the
//! player crossed the presence radius), and from the interaction layer.
//! Waiting outranks a fresh waypoint: the waypoint is deferred and replayed
//! when the player leaves.

use bevy::prelude::*;

use crate::movement::{AnimationDriver, MovementController};
use crate::nav::{NavAgent, NavTarget};
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Routine,
    Movement,
    Waiting,
    Interaction,
}

impl BehaviorState {
    pub fn index(self) -> usize {
        match self {
            BehaviorState::Routine => 0,
            BehaviorState::Movement => 1,
            BehaviorState::Waiting => 2,
            BehaviorState::Interaction => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BehaviorState::Routine => "Routine",
            BehaviorState::Movement => "Movement",
            BehaviorState::Waiting => "Waiting",
            BehaviorState::Interaction => "Interaction",
        }
    }
}

/// Everything a state hook may touch, borrowed for the duration of one call.
pub struct BehaviorCtx<'a, A: NavAgent, D: AnimationDriver> {
    pub movement: &'a mut MovementController<A, D>,
    pub player_pos: Option<Vec2>,
}

/// Per-character state machine. Pure over its inputs; all side effects go
/// through the BehaviorCtx it is handed.
pub struct StateMachine {
    current: BehaviorState,
    registered: [bool; 4],
    /// Waypoint that fired while Waiting; replayed on player exit.
    deferred: Option<Waypoint>,
    /// Waypoint currently being walked to (or paused on the way to).
    target: Option<Waypoint>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self {
            current: BehaviorState::Routine,
            registered: [true; 4],
            deferred: None,
            target: None,
        }
    }
}

impl StateMachine {
    pub fn current(&self) -> BehaviorState {
        self.current
    }

    pub fn target(&self) -> Option<&Waypoint> {
        self.target.as_ref()
    }

    /// Marks a state as unavailable. Transitions into an unregistered state
    /// are logged no-ops; the machine stays where it is.
    pub fn set_registered(&mut self, state: BehaviorState, registered: bool) {
        self.registered[state.index()] = registered;
    }

    fn transition<A: NavAgent, D: AnimationDriver>(
        &mut self,
        to: BehaviorState,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        if !self.registered[to.index()] {
            debug!("[Behavior] transition to unregistered state {} ignored", to.name());
            return;
        }
        self.exit_current(ctx);
        self.current = to;
        match to {
            BehaviorState::Routine => self.enter_routine(ctx, IDLE_POSE),
            BehaviorState::Movement => self.enter_movement(ctx),
            BehaviorState::Waiting => self.enter_waiting(ctx),
            BehaviorState::Interaction => self.enter_interaction(ctx),
        }
    }

    fn exit_current<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        if self.current == BehaviorState::Interaction {
            ctx.movement.resume_animation();
        }
    }

    fn enter_routine<A: NavAgent, D: AnimationDriver>(
        &mut self,
        ctx: &mut BehaviorCtx<A, D>,
        pose: &str,
    ) {
        self.target = None;
        ctx.movement.play_pose(pose);
    }

    fn enter_movement<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        match &self.target {
            Some(wp) => {
                let target = NavTarget::new(wp.world_target(), wp.facing);
                ctx.movement.move_to_point(target);
            }
            None => {
                // Nothing to walk toward; degrade to idling.
                self.current = BehaviorState::Routine;
                self.enter_routine(ctx, IDLE_POSE);
            }
        }
    }

    fn enter_waiting<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        ctx.movement.stop(false);
        if let Some(player) = ctx.player_pos {
            ctx.movement.face_toward(player);
        }
    }

    fn enter_interaction<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        ctx.movement.stop(false);
        if let Some(player) = ctx.player_pos {
            ctx.movement.face_toward(player);
        }
        ctx.movement.pause_animation();
    }

    /// Schedule trigger: a waypoint's departure time arrived. While Waiting
    /// the waypoint is deferred instead of acted on; in every other state it
    /// becomes the new route target, silently replacing any in-flight one.
    pub fn notify_waypoint<A: NavAgent, D: AnimationDriver>(
        &mut self,
        waypoint: Waypoint,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        if self.current == BehaviorState::Waiting {
            self.deferred = Some(waypoint);
            return;
        }
        self.target = Some(waypoint);
        self.transition(BehaviorState::Movement, ctx);
    }

    /// Proximity trigger: the player entered the presence radius. Ignored
    /// during Interaction, which already has the character's attention.
    pub fn player_entered<A: NavAgent, D: AnimationDriver>(
        &mut self,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        if self.current == BehaviorState::Interaction {
            return;
        }
        self.transition(BehaviorState::Waiting, ctx);
    }

    /// Proximity trigger: the player left. Only meaningful while Waiting;
    /// a deferred waypoint (or the interrupted route) resumes, otherwise
    /// the character goes back to idling.
    pub fn player_exited<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        if self.current != BehaviorState::Waiting {
            return;
        }
        if let Some(deferred) = self.deferred.take() {
            self.target = Some(deferred);
        }
        if self.target.is_some() {
            self.transition(BehaviorState::Movement, ctx);
        } else {
            self.transition(BehaviorState::Routine, ctx);
        }
    }

    pub fn begin_interaction<A: NavAgent, D: AnimationDriver>(
        &mut self,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        if self.current == BehaviorState::Interaction {
            return;
        }
        self.transition(BehaviorState::Interaction, ctx);
    }

    pub fn end_interaction<A: NavAgent, D: AnimationDriver>(
        &mut self,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        if self.current != BehaviorState::Interaction {
            return;
        }
        self.transition(BehaviorState::Routine, ctx);
    }

    /// Day-boundary reset: whatever was happening is abandoned and the
    /// machine returns to Routine with no pending route or deferral.
    pub fn day_reset<A: NavAgent, D: AnimationDriver>(&mut self, ctx: &mut BehaviorCtx<A, D>) {
        self.exit_current(ctx);
        self.deferred = None;
        self.target = None;
        ctx.movement.stop(false);
        self.current = BehaviorState::Routine;
        self.enter_routine(ctx, IDLE_POSE);
    }

    /// Per-frame drive. `arrived` is the movement layer's single-shot arrival
    /// notice for this frame.
    pub fn update<A: NavAgent, D: AnimationDriver>(
        &mut self,
        arrived: bool,
        ctx: &mut BehaviorCtx<A, D>,
    ) {
        match self.current {
            BehaviorState::Movement if arrived => {
                let pose = self
                    .target
                    .as_ref()
                    .and_then(|wp| wp.animation.clone())
                    .unwrap_or_else(|| IDLE_POSE.to_string());
                self.current = BehaviorState::Routine;
                self.target = None;
                ctx.movement.play_pose(&pose);
            }
            BehaviorState::Waiting => {
                // Track the player while they linger in range.
                if let Some(player) = ctx.player_pos {
                    ctx.movement.face_toward(player);
                }
            }
            _ => {}
        }
    }
}
