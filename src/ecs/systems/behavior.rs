use glam::Vec2;

use crate::debug::ring::TransitionHistory;
use crate::ecs::components::{BehaviorState, IdleBehavior, Leader, TransitionReason};
use crate::ecs::systems::school::{self, LeaderView};
use crate::ecs::systems::{idle, movement, TickContext};
use crate::shark::Shark;

/// Stalking holds this far to the side of and below the pointer.
const STALK_OFFSET: Vec2 = Vec2::new(80.0, 40.0);
/// Seeking settles just under the pointer.
const SEEK_OFFSET: Vec2 = Vec2::new(0.0, 30.0);
/// Hunting closes in a little tighter.
const HUNT_OFFSET: Vec2 = Vec2::new(0.0, 25.0);

/// (amplitude px, phase rate per nominal tick) of the swim oscillation.
const STALK_BOB: (f32, f32) = (1.0, 0.08);
const SEEK_BOB: (f32, f32) = (1.5, 0.15);
const HUNT_BOB: (f32, f32) = (3.0, 0.2);

/// Patrol speed multipliers per idle behavior.
fn idle_speed_factor(behavior: IdleBehavior) -> f32 {
    match behavior {
        IdleBehavior::SimplePatrol | IdleBehavior::DepthDiving => 1.0,
        IdleBehavior::Zigzag | IdleBehavior::CircleArea => 1.2,
        IdleBehavior::FigureEight => 1.3,
        IdleBehavior::EdgeExplore | IdleBehavior::RandomExplore => 1.4,
        IdleBehavior::RestPause | IdleBehavior::SlowDrift => 1.0,
    }
}

/// Speed the shark should be easing toward right now.
pub fn target_speed(shark: &Shark, ctx: &TickContext) -> f32 {
    let t = ctx.tuning;
    let base = match shark.state {
        BehaviorState::Patrol => {
            let energy_factor = 0.6 + 0.4 * shark.energy;
            match shark.idle.behavior {
                _ if shark.resting => t.rest_speed,
                Some(IdleBehavior::RestPause) => t.rest_speed,
                Some(IdleBehavior::SlowDrift) => t.drift_speed,
                Some(b) => t.patrol_speed * idle_speed_factor(b) * energy_factor,
                None => t.patrol_speed * energy_factor,
            }
        }
        BehaviorState::Stalking => t.stalking_speed,
        BehaviorState::Alert => t.alert_speed,
        BehaviorState::Circling => t.circling_speed,
        BehaviorState::Hunt => t.hunt_speed,
        BehaviorState::Seeking => t.seeking_speed,
        BehaviorState::Attacking => t.attack_speed,
        BehaviorState::Eating => 0.0,
    };
    (base * shark.personality.speed_scale * ctx.settings.speed_multiplier).max(0.0)
}

/// Drain or restore energy, start and end rests, and apply deep sleep.
/// Returns whether the shark is in deep sleep this tick.
pub fn update_energy(shark: &mut Shark, ctx: &TickContext, rng: &mut fastrand::Rng) -> bool {
    let t = ctx.tuning;
    let dt = ctx.dt;
    let deep_sleep = ctx.tracker.unengaged_for(ctx.now) >= t.deep_sleep_after;

    if shark.resting {
        shark.energy = (shark.energy + t.energy_recovery_rate * dt).min(1.0);
        let rested_for = ctx.now - shark.rest_started;
        if rested_for >= t.min_rest_duration || shark.energy >= t.well_rested {
            shark.resting = false;
            shark.idle.request_reselect();
        }
    } else {
        let decay = t.energy_decay_rate * shark.personality.decay_scale * dt;
        shark.energy = (shark.energy - decay).max(0.0);
        if !deep_sleep
            && shark.state == BehaviorState::Patrol
            && shark.energy < t.low_energy
            && rng.f32() < t.rest_chance * ctx.scale()
        {
            shark.resting = true;
            shark.rest_started = ctx.now;
            log::trace!("Shark {} resting at energy {:.2}", shark.id.0, shark.energy);
        }
    }

    if deep_sleep {
        shark.energy = shark.energy.max(t.deep_sleep_energy_floor);
        shark.resting = false;
    }

    shark.energy = shark.energy.clamp(0.0, 1.0);
    shark.last_energy_update_time = ctx.now;
    deep_sleep
}

/// Advance one shark by one animation tick.
pub fn advance(
    shark: &mut Shark,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
    history: &mut TransitionHistory,
    leader: Option<&LeaderView>,
) {
    let t = ctx.tuning;
    let scale = ctx.scale();
    shark.previous_position = shark.position;

    // 1. Speed
    shark.target_speed = target_speed(shark, ctx);
    movement::smooth_speed(shark, t, scale);

    // 2. Energy
    let deep_sleep = update_energy(shark, ctx, rng);

    // 3-4. Movement for the current state
    let step = shark.current_speed * scale;
    let pointer = ctx.record.last_pointer;
    match shark.state {
        BehaviorState::Patrol => {
            idle::run(shark, ctx, rng, deep_sleep, leader);
        }
        BehaviorState::Stalking => {
            let side = if shark.center().x < pointer.x { -1.0 } else { 1.0 };
            let target = pointer + Vec2::new(STALK_OFFSET.x * side, STALK_OFFSET.y);
            movement::step_toward(shark, target, step, t);
            movement::bob(shark, STALK_BOB.0, STALK_BOB.1, scale);
        }
        BehaviorState::Alert => {
            let target = ctx.record.click_position();
            movement::step_toward(shark, target, step, t);
        }
        BehaviorState::Circling => {
            shark.orbit_angle =
                (shark.orbit_angle + t.orbit_angular_speed * scale) % std::f32::consts::TAU;
            let center = ctx.record.click_position();
            let offset = Vec2::new(shark.orbit_angle.cos(), shark.orbit_angle.sin());
            movement::step_toward(shark, center + offset * t.orbit_radius, step, t);
        }
        BehaviorState::Hunt => {
            movement::step_toward(shark, pointer + HUNT_OFFSET, step, t);
            movement::bob(shark, HUNT_BOB.0, HUNT_BOB.1, scale);
        }
        BehaviorState::Seeking => {
            movement::step_toward(shark, pointer + SEEK_OFFSET, step, t);
            movement::bob(shark, SEEK_BOB.0, SEEK_BOB.1, scale);
        }
        BehaviorState::Attacking => {
            movement::step_toward(shark, pointer, step, t);
            if shark.center().distance(pointer) < t.bite_range {
                bite(shark, pointer, ctx.now, history);
            }
        }
        BehaviorState::Eating => {}
    }

    // 5. Facing
    movement::update_facing(shark, t.facing_threshold);

    // 6. Animation
    shark.animation.tick(ctx.now);
}

fn bite(shark: &mut Shark, pointer: Vec2, now: f64, history: &mut TransitionHistory) {
    if let Some(transition) = shark.enter_state(BehaviorState::Eating, TransitionReason::Bite, now) {
        history.push(transition);
    }
    shark.animation.bite(pointer, now);
}

/// Advance every shark. Followers get a read-only view of the leader.
pub fn advance_all(
    world: &mut hecs::World,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
    history: &mut TransitionHistory,
) {
    let leader = school::leader_view(world);
    for (_, (shark, is_leader)) in world.query_mut::<(&mut Shark, Option<&Leader>)>() {
        let follow = if is_leader.is_none() {
            leader.as_ref()
        } else {
            None
        };
        advance(shark, ctx, rng, history, follow);
    }
}
