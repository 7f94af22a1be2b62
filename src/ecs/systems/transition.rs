use crate::debug::ring::{Transition, TransitionHistory};
use crate::ecs::components::{BehaviorState, TransitionReason};
use crate::ecs::systems::TickContext;
use crate::shark::Shark;

/// Decide the single transition, if any, the current state permits.
///
/// All distances are measured from the creature-center.
pub fn decide(shark: &Shark, ctx: &TickContext) -> Option<(BehaviorState, TransitionReason)> {
    use BehaviorState::*;
    use TransitionReason as R;

    let t = ctx.tuning;
    let center = shark.center();
    let pointer = ctx.record.last_pointer;
    let dist = center.distance(pointer);
    let in_state = shark.time_in_state(ctx.now);

    match shark.state {
        Patrol | Stalking if pointer_resting_on_click(shark, ctx) => Some((Circling, R::PointerStill)),
        Patrol => {
            if dist < t.detection_range {
                Some((Seeking, R::PointerDetected))
            } else if dist < t.stalking_range {
                Some((Stalking, R::PointerSpotted))
            } else {
                None
            }
        }
        Stalking => {
            if dist < t.detection_range {
                Some((Seeking, R::PointerDetected))
            } else if in_state > t.stalk_timeout {
                Some((Seeking, R::StalkTimeout))
            } else {
                None
            }
        }
        Seeking => {
            if dist < t.attack_trigger_range {
                Some((Attacking, R::PointerClose))
            } else if in_state > t.seek_timeout {
                Some((Patrol, R::SeekTimeout))
            } else {
                None
            }
        }
        Alert => {
            let click = ctx.record.click_position();
            if center.distance(click) >= t.alert_arrival_range {
                None
            } else if pointer.distance(click) < t.click_near_radius {
                Some((Attacking, R::DirectHit))
            } else {
                Some((Patrol, R::ClickAbandoned))
            }
        }
        Circling => (in_state > t.circling_timeout).then_some((Attacking, R::CirclingTimeout)),
        Hunt => {
            if dist < t.hunt_attack_range {
                Some((Attacking, R::PointerClose))
            } else if in_state > t.hunt_timeout {
                Some((Patrol, R::HuntTimeout))
            } else {
                None
            }
        }
        Attacking => (in_state > t.attack_timeout).then_some((Patrol, R::AttackTimeout)),
        Eating => None,
    }
}

/// A still pointer parked on the last click point, within stalking range.
fn pointer_resting_on_click(shark: &Shark, ctx: &TickContext) -> bool {
    let Some(click) = ctx.record.last_click else {
        return false;
    };
    let t = ctx.tuning;
    let pointer = ctx.record.last_pointer;
    ctx.tracker.pointer_idle_for(ctx.now) >= t.pointer_idle_threshold
        && pointer.distance(click.position) < t.click_near_radius
        && shark.center().distance(pointer) < t.stalking_range
}

/// Apply `to` with its entry side effects.
pub fn apply(
    shark: &mut Shark,
    to: BehaviorState,
    reason: TransitionReason,
    ctx: &TickContext,
) -> Option<Transition> {
    let now = ctx.now;
    if shark.state == BehaviorState::Attacking && reason == TransitionReason::AttackTimeout {
        shark.record_miss(ctx.tuning.frustration_threshold);
        shark.animation.reset_attack();
        log::debug!(
            "Shark {} missed (escapes: {}, frustrated: {})",
            shark.id.0,
            shark.escape_count,
            shark.frustrated
        );
    }

    let transition = shark.enter_state(to, reason, now)?;

    match to {
        BehaviorState::Attacking => shark.animation.start_attack(now),
        BehaviorState::Circling => {
            // Join the orbit at the shark's current bearing.
            let d = shark.center() - ctx.record.click_position();
            shark.orbit_angle = d.y.atan2(d.x);
        }
        _ => {}
    }
    Some(transition)
}

/// Slow-cadence pass over every shark.
pub fn evaluate(world: &mut hecs::World, ctx: &TickContext, history: &mut TransitionHistory) {
    for (_, shark) in world.query_mut::<&mut Shark>() {
        if let Some((to, reason)) = decide(shark, ctx) {
            if let Some(transition) = apply(shark, to, reason, ctx) {
                history.push(transition);
            }
        }
    }
}
