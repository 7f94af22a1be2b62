pub mod animation;
pub mod personality;

use glam::Vec2;

use crate::debug::ring::Transition;
use crate::ecs::components::{BehaviorState, IdleBehavior, SharkId, TransitionReason};
use crate::ecs::systems::idle::IdlePlan;
use crate::screen::ScreenBounds;
use animation::AnimationState;
use personality::Personality;

/// Fin sprite size in pixels.
pub const SPRITE_SIZE: Vec2 = Vec2::new(32.0, 24.0);
/// Offset from top-left to the creature-center. Every distance check uses it.
pub const HALF_SPRITE: Vec2 = Vec2::new(16.0, 12.0);
/// Respawn keeps this far from the screen edges.
const RESPAWN_MARGIN: f32 = 60.0;

/// One shark. A plain owned value: the engine updates it in place and the
/// renderer only ever sees `SharkFrame` snapshots.
#[derive(Debug, Clone)]
pub struct Shark {
    pub id: SharkId,
    /// Top-left, absolute virtual-screen coordinates.
    pub position: Vec2,
    pub previous_position: Vec2,
    pub state: BehaviorState,
    pub idle: IdlePlan,
    pub facing_right: bool,
    pub current_speed: f32,
    pub target_speed: f32,
    /// Always within [0, 1].
    pub energy: f32,
    pub resting: bool,
    pub rest_started: f64,
    /// +1 right, -1 left.
    pub patrol_direction: f32,
    /// Written only on entry into Patrol.
    pub patrol_baseline_y: f32,
    /// Oscillation phase for the engaged states.
    pub swim_phase: f32,
    /// Orbit angle while Circling.
    pub orbit_angle: f32,
    pub last_state_change_time: f64,
    pub state_entered_time: f64,
    pub last_energy_update_time: f64,
    pub escape_count: u32,
    pub frustrated: bool,
    pub tired: bool,
    pub personality: Personality,
    pub animation: AnimationState,
}

impl Shark {
    pub fn new(id: SharkId, position: Vec2, personality: Personality, now: f64) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            state: BehaviorState::Patrol,
            idle: IdlePlan::default(),
            facing_right: true,
            current_speed: 0.0,
            target_speed: 0.0,
            energy: 1.0,
            resting: false,
            rest_started: now,
            patrol_direction: 1.0,
            patrol_baseline_y: position.y,
            swim_phase: 0.0,
            orbit_angle: 0.0,
            last_state_change_time: now,
            state_entered_time: now,
            last_energy_update_time: now,
            escape_count: 0,
            frustrated: false,
            tired: false,
            personality,
            animation: AnimationState::default(),
        }
    }

    /// Spawn at a random spot with a random personality and heading.
    pub fn spawn(id: SharkId, bounds: &ScreenBounds, rng: &mut fastrand::Rng, now: f64) -> Self {
        let position = bounds.random_interior(RESPAWN_MARGIN, rng);
        let mut shark = Self::new(id, position, Personality::random(rng), now);
        shark.patrol_direction = if rng.bool() { 1.0 } else { -1.0 };
        shark.facing_right = shark.patrol_direction > 0.0;
        shark.energy = 0.6 + rng.f32() * 0.4;
        shark
    }

    pub fn center(&self) -> Vec2 {
        self.position + HALF_SPRITE
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.position = center - HALF_SPRITE;
    }

    pub fn time_in_state(&self, now: f64) -> f64 {
        now - self.state_entered_time
    }

    pub fn idle_behavior(&self) -> Option<IdleBehavior> {
        self.idle.behavior
    }

    /// Switch state atomically. Returns the transition, or `None` when
    /// already in `to`.
    pub fn enter_state(
        &mut self,
        to: BehaviorState,
        reason: TransitionReason,
        now: f64,
    ) -> Option<Transition> {
        let from = self.state;
        if from == to {
            return None;
        }

        // Idle state never survives a Patrol exit or re-entry.
        if from == BehaviorState::Patrol || to == BehaviorState::Patrol {
            self.idle.reset();
            self.resting = false;
        }
        if to == BehaviorState::Patrol {
            self.patrol_baseline_y = self.position.y;
        }

        self.state = to;
        self.last_state_change_time = now;
        self.state_entered_time = now;

        log::debug!(
            "Shark {} {} -> {} ({})",
            self.id.0,
            from.label(),
            to.label(),
            reason.label()
        );

        Some(Transition {
            id: self.id,
            from,
            to,
            reason,
            at: now,
        })
    }

    /// Attack ran out without a bite.
    pub fn record_miss(&mut self, frustration_threshold: u32) {
        self.escape_count += 1;
        self.tired = true;
        if self.escape_count >= frustration_threshold {
            self.frustrated = true;
        }
    }

    /// Drop back into Patrol at a fresh random spot.
    pub fn respawn(
        &mut self,
        bounds: &ScreenBounds,
        rng: &mut fastrand::Rng,
        reason: TransitionReason,
        now: f64,
    ) -> Option<Transition> {
        self.position = bounds.random_interior(RESPAWN_MARGIN, rng);
        self.previous_position = self.position;
        self.patrol_direction = if rng.bool() { 1.0 } else { -1.0 };
        self.animation.cancel_bite();
        let transition = self.enter_state(BehaviorState::Patrol, reason, now);
        // Already patrolling: still re-anchor for the new spot.
        self.patrol_baseline_y = self.position.y;
        transition
    }
}
