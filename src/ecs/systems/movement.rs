use glam::Vec2;

use crate::config::Tuning;
use crate::screen::ScreenBounds;
use crate::shark::{Shark, SPRITE_SIZE};

/// Fraction of the vertical gap closed per nominal tick when easing toward
/// a bob target.
const VERTICAL_EASE: f32 = 0.1;

/// Per-tick rate corrected for ticks longer or shorter than nominal.
fn blend(rate: f32, scale: f32) -> f32 {
    1.0 - (1.0 - rate).powf(scale.max(0.0))
}

/// Ease `current_speed` toward `target_speed`, snapping inside epsilon.
pub fn smooth_speed(shark: &mut Shark, tuning: &Tuning, scale: f32) {
    let gap = shark.target_speed - shark.current_speed;
    if gap.abs() < tuning.speed_snap_epsilon {
        shark.current_speed = shark.target_speed;
    } else {
        shark.current_speed += gap * blend(tuning.speed_transition_rate, scale);
    }
    shark.current_speed = shark.current_speed.max(0.0);
}

/// Proportional step of the creature-center toward `target`.
///
/// Inside the dead-zone nothing moves. Otherwise the step is capped by
/// `max_step` far away and by a fraction of the remaining distance close
/// in, so the shark settles without overshooting. Returns the distance
/// left before the step.
pub fn step_toward(shark: &mut Shark, target: Vec2, max_step: f32, tuning: &Tuning) -> f32 {
    let center = shark.center();
    let to_target = target - center;
    let dist = to_target.length();
    if !dist.is_finite() || dist <= tuning.dead_zone {
        return dist;
    }
    let step = max_step.min(dist * tuning.approach_fraction);
    shark.set_center(center + to_target / dist * step);
    dist
}

/// Horizontal drift along the patrol heading.
pub fn drift(shark: &mut Shark, step: f32) {
    shark.position.x += shark.patrol_direction * step;
}

/// Ease the vertical position toward `target_y`.
pub fn ease_y(shark: &mut Shark, target_y: f32, scale: f32) {
    shark.position.y += (target_y - shark.position.y) * blend(VERTICAL_EASE, scale);
}

/// Incremental sinusoidal bob: only the change in the sine is applied, so
/// entering a bobbing state never snaps the shark.
pub fn bob(shark: &mut Shark, amplitude: f32, rate: f32, scale: f32) {
    let before = shark.swim_phase.sin();
    shark.swim_phase = (shark.swim_phase + rate * scale) % std::f32::consts::TAU;
    shark.position.y += amplitude * (shark.swim_phase.sin() - before);
}

/// Wrap to the opposite edge once fully off-screen. The heading is kept
/// and the previous position is shifted too, so facing does not flip on
/// the jump.
pub fn wrap_horizontal(shark: &mut Shark, bounds: &ScreenBounds) -> bool {
    let shift = if shark.position.x > bounds.right() + SPRITE_SIZE.x {
        (bounds.left - SPRITE_SIZE.x) - shark.position.x
    } else if shark.position.x < bounds.left - SPRITE_SIZE.x {
        bounds.right() - shark.position.x
    } else {
        return false;
    };
    shark.position.x += shift;
    shark.previous_position.x += shift;
    true
}

/// Facing follows horizontal displacement, but only past the threshold.
pub fn update_facing(shark: &mut Shark, threshold: f32) {
    let dx = shark.position.x - shark.previous_position.x;
    if dx > threshold {
        shark.facing_right = true;
    } else if dx < -threshold {
        shark.facing_right = false;
    }
}
