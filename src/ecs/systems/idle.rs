use std::f32::consts::TAU;

use glam::Vec2;

use crate::ecs::components::{EnergyTier, IdleBehavior};
use crate::ecs::systems::movement;
use crate::ecs::systems::school::{self, LeaderView};
use crate::ecs::systems::TickContext;
use crate::shark::Shark;

/// Idle targets stay this far inside the screen.
const TARGET_MARGIN: f32 = 80.0;
/// Distance at which an explore target counts as reached.
const ARRIVAL_DIST: f32 = 30.0;
/// Bob phase advance per nominal tick.
const PHASE_RATE: f32 = 0.05;

const PATROL_BOB: f32 = 8.0;
const ZIGZAG_AMPLITUDE: f32 = 45.0;
const ZIGZAG_FREQ: f32 = 3.0;
const ZIGZAG_FLIP_CHANCE: f32 = 0.002;
const DIVE_CHANCE: f32 = 0.002;
const DIVE_MIN: f32 = 60.0;
const DIVE_MAX: f32 = 160.0;
const REST_BOB: f32 = 3.0;
const DRIFT_BOB: f32 = 15.0;
const CIRCLE_AREA_RADIUS: f32 = 90.0;
/// Figure-8 half-extents as a fraction of the screen.
const FIGURE_EIGHT_RX: f32 = 0.3;
const FIGURE_EIGHT_RY: f32 = 0.2;

/// Planner state for the current idle behavior. Reset on every Patrol
/// entry and exit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IdlePlan {
    /// `None` until the first pick after a reset.
    pub behavior: Option<IdleBehavior>,
    /// When the current behavior was picked.
    pub started: f64,
    /// How long it runs before the next pick.
    pub duration: f64,
    /// One-time target chosen at pick time (edge, interior point, orbit
    /// center).
    pub target: Vec2,
    pub phase: f32,
    /// Figure-8 parameter or circle-area angle.
    pub angle: f32,
    /// Extra depth offset from a deep dive.
    pub dive_offset: f32,
    reselect: bool,
}

impl IdlePlan {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.started
    }

    /// Pick again on the next tick.
    pub fn request_reselect(&mut self) {
        self.reselect = true;
    }

    fn due(&self, now: f64) -> bool {
        self.behavior.is_none() || self.reselect || self.elapsed(now) >= self.duration
    }
}

pub fn energy_tier(energy: f32, ctx: &TickContext) -> EnergyTier {
    if energy > ctx.tuning.high_energy {
        EnergyTier::High
    } else if energy > ctx.tuning.medium_energy {
        EnergyTier::Medium
    } else {
        EnergyTier::Low
    }
}

/// Candidates for the current energy tier, minus disabled toggles and the
/// behavior that just ran. Falls through to calmer tiers when a tier is
/// emptied; the low tier always leaves at least two options.
fn candidates(shark: &Shark, ctx: &TickContext) -> Vec<IdleBehavior> {
    let tiers: &[EnergyTier] = match energy_tier(shark.energy, ctx) {
        EnergyTier::High => &[EnergyTier::High, EnergyTier::Medium, EnergyTier::Low],
        EnergyTier::Medium => &[EnergyTier::Medium, EnergyTier::Low],
        EnergyTier::Low => &[EnergyTier::Low],
    };
    let current = shark.idle.behavior;
    for tier in tiers {
        let picks: Vec<IdleBehavior> = tier
            .candidates()
            .iter()
            .copied()
            .filter(|b| ctx.settings.behaviors.allows(*b) && Some(*b) != current)
            .collect();
        if !picks.is_empty() {
            return picks;
        }
    }
    vec![IdleBehavior::SimplePatrol]
}

/// Pick a new idle behavior, never the one currently running.
pub fn select(shark: &mut Shark, ctx: &TickContext, rng: &mut fastrand::Rng) {
    let picks = candidates(shark, ctx);
    let behavior = picks[rng.usize(0..picks.len())];
    let (min, max) = (ctx.tuning.idle_min_duration, ctx.tuning.idle_max_duration);
    let duration = min + rng.f64() * (max - min);
    begin(shark, behavior, duration, ctx, rng);
}

/// Start `behavior` now, bypassing the selection rules. Used by rest and
/// deep sleep.
pub fn force(
    shark: &mut Shark,
    behavior: IdleBehavior,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
) {
    if shark.idle.behavior == Some(behavior) {
        return;
    }
    begin(shark, behavior, ctx.tuning.idle_max_duration, ctx, rng);
}

fn begin(
    shark: &mut Shark,
    behavior: IdleBehavior,
    duration: f64,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
) {
    let bounds = &ctx.bounds;
    let center = shark.center();
    let target = match behavior {
        IdleBehavior::EdgeExplore => bounds.random_edge(TARGET_MARGIN, rng),
        IdleBehavior::RandomExplore => bounds.random_interior(TARGET_MARGIN, rng),
        IdleBehavior::CircleArea => {
            bounds.random_interior(TARGET_MARGIN + CIRCLE_AREA_RADIUS, rng)
        }
        IdleBehavior::FigureEight => bounds.center(),
        _ => center,
    };
    // Start orbits at the shark's bearing so the first target is close.
    let angle = match behavior {
        IdleBehavior::CircleArea => {
            let d = center - target;
            d.y.atan2(d.x)
        }
        IdleBehavior::FigureEight => {
            let rx = (bounds.width * FIGURE_EIGHT_RX).max(1.0);
            ((center.x - target.x) / rx).clamp(-1.0, 1.0).asin()
        }
        _ => 0.0,
    };

    log::trace!("Shark {} idle -> {}", shark.id.0, behavior.label());
    shark.idle = IdlePlan {
        behavior: Some(behavior),
        started: ctx.now,
        duration,
        target,
        phase: 0.0,
        angle,
        dive_offset: 0.0,
        reselect: false,
    };
}

/// One Patrol tick: reselect when due, then run the current behavior.
pub fn run(
    shark: &mut Shark,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
    deep_sleep: bool,
    leader: Option<&LeaderView>,
) {
    if deep_sleep {
        force(shark, IdleBehavior::SlowDrift, ctx, rng);
    } else if shark.resting {
        force(shark, IdleBehavior::RestPause, ctx, rng);
    } else if shark.idle.due(ctx.now) {
        select(shark, ctx, rng);
    }

    if let Some(leader) = leader {
        school::follow(shark, leader, ctx.tuning);
    }

    let Some(behavior) = shark.idle.behavior else {
        return;
    };
    execute(shark, behavior, ctx, rng);

    if behavior.wraps() {
        movement::wrap_horizontal(shark, &ctx.bounds);
    }
}

fn execute(shark: &mut Shark, behavior: IdleBehavior, ctx: &TickContext, rng: &mut fastrand::Rng) {
    let scale = ctx.scale();
    let step = shark.current_speed * scale;
    let baseline = shark.patrol_baseline_y;
    shark.idle.phase = (shark.idle.phase + PHASE_RATE * scale) % (TAU * 10.0);
    let phase = shark.idle.phase;

    match behavior {
        IdleBehavior::SimplePatrol => {
            movement::drift(shark, step);
            movement::ease_y(shark, baseline + PATROL_BOB * phase.sin(), scale);
        }
        IdleBehavior::DepthDiving => {
            movement::drift(shark, step);
            if rng.f32() < DIVE_CHANCE * scale {
                shark.idle.dive_offset = if shark.idle.dive_offset == 0.0 {
                    let depth = DIVE_MIN + rng.f32() * (DIVE_MAX - DIVE_MIN);
                    if rng.bool() {
                        depth
                    } else {
                        -depth
                    }
                } else {
                    0.0
                };
            }
            let amplitude = 20.0 + 60.0 * shark.energy;
            let freq = 0.5 + shark.energy;
            let target_y = baseline + shark.idle.dive_offset + amplitude * (phase * freq).sin();
            movement::ease_y(shark, target_y, scale);
        }
        IdleBehavior::Zigzag => {
            movement::drift(shark, step);
            if rng.f32() < ZIGZAG_FLIP_CHANCE * scale {
                shark.patrol_direction = -shark.patrol_direction;
            }
            let target_y = baseline + ZIGZAG_AMPLITUDE * (phase * ZIGZAG_FREQ).sin();
            movement::ease_y(shark, target_y, scale);
        }
        IdleBehavior::FigureEight => {
            let rx = ctx.bounds.width * FIGURE_EIGHT_RX;
            let ry = ctx.bounds.height * FIGURE_EIGHT_RY;
            // Parameter advances at roughly the shark's own pace.
            shark.idle.angle = (shark.idle.angle + step / rx.max(1.0)) % TAU;
            let t = shark.idle.angle;
            let point = shark.idle.target + Vec2::new(rx * t.sin(), ry * (2.0 * t).sin());
            movement::step_toward(shark, point, step, ctx.tuning);
        }
        IdleBehavior::EdgeExplore => {
            let target = shark.idle.target;
            let dist = movement::step_toward(shark, target, step, ctx.tuning);
            if dist < ARRIVAL_DIST {
                shark.idle.request_reselect();
            }
        }
        IdleBehavior::RandomExplore => {
            let target = shark.idle.target;
            let dist = movement::step_toward(shark, target, step, ctx.tuning);
            if dist < ARRIVAL_DIST {
                shark.idle.target = ctx.bounds.random_interior(TARGET_MARGIN, rng);
            }
        }
        IdleBehavior::CircleArea => {
            let angular = step / CIRCLE_AREA_RADIUS * (0.5 + shark.energy);
            shark.idle.angle = (shark.idle.angle + angular) % TAU;
            let a = shark.idle.angle;
            let point = shark.idle.target + Vec2::new(a.cos(), a.sin()) * CIRCLE_AREA_RADIUS;
            movement::step_toward(shark, point, step.max(1.0), ctx.tuning);
        }
        IdleBehavior::RestPause => {
            movement::drift(shark, step);
            movement::ease_y(shark, baseline + REST_BOB * (phase * 0.5).sin(), scale);
        }
        IdleBehavior::SlowDrift => {
            movement::drift(shark, step);
            movement::ease_y(shark, baseline + DRIFT_BOB * (phase * 0.2).sin(), scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Tuning};
    use crate::ecs::components::SharkId;
    use crate::input::{InputTracker, InteractionRecord};
    use crate::screen::ScreenBounds;
    use crate::shark::personality::Personality;

    struct Fixture {
        record: InteractionRecord,
        tracker: InputTracker,
        tuning: Tuning,
        settings: Settings,
        bounds: ScreenBounds,
    }

    impl Fixture {
        fn new() -> Self {
            let bounds = ScreenBounds::new(0.0, 0.0, 1920.0, 1080.0);
            Self {
                record: InteractionRecord::new(bounds.center()),
                tracker: InputTracker::new(0.0),
                tuning: Tuning::default(),
                settings: Settings::default(),
                bounds,
            }
        }

        fn ctx(&self, now: f64) -> TickContext<'_> {
            TickContext {
                now,
                dt: crate::ecs::systems::NOMINAL_DT,
                record: &self.record,
                tracker: &self.tracker,
                tuning: &self.tuning,
                settings: &self.settings,
                bounds: self.bounds,
            }
        }
    }

    fn shark(energy: f32) -> Shark {
        let mut s = Shark::new(SharkId(0), Vec2::new(400.0, 500.0), Personality::default(), 0.0);
        s.energy = energy;
        s
    }

    #[test]
    fn never_repeats_back_to_back() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(11);
        for energy in [0.9, 0.5, 0.1] {
            let mut s = shark(energy);
            let mut last = None;
            for i in 0..500 {
                select(&mut s, &fx.ctx(i as f64), &mut rng);
                assert_ne!(s.idle.behavior, last);
                last = s.idle.behavior;
            }
        }
    }

    #[test]
    fn picks_come_from_energy_tier() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(5);
        let mut s = shark(0.1);
        for i in 0..100 {
            select(&mut s, &fx.ctx(i as f64), &mut rng);
            let b = s.idle.behavior.unwrap();
            assert!(EnergyTier::Low.candidates().contains(&b));
        }
    }

    #[test]
    fn disabled_toggles_are_never_picked() {
        let mut fx = Fixture::new();
        fx.settings.behaviors.zigzag = false;
        fx.settings.behaviors.figure_eight = false;
        let mut rng = fastrand::Rng::with_seed(9);
        let mut s = shark(0.95);
        for i in 0..300 {
            select(&mut s, &fx.ctx(i as f64), &mut rng);
            let b = s.idle.behavior.unwrap();
            assert_ne!(b, IdleBehavior::Zigzag);
            assert_ne!(b, IdleBehavior::FigureEight);
        }
    }

    #[test]
    fn empty_tier_falls_back_without_repeating() {
        let mut fx = Fixture::new();
        fx.settings.behaviors.zigzag = false;
        fx.settings.behaviors.figure_eight = false;
        fx.settings.behaviors.edge_explore = false;
        fx.settings.behaviors.circle_area = false;
        let mut rng = fastrand::Rng::with_seed(1);
        let mut s = shark(0.95);
        s.idle.behavior = Some(IdleBehavior::RandomExplore);
        select(&mut s, &fx.ctx(1.0), &mut rng);
        let b = s.idle.behavior.unwrap();
        assert_ne!(b, IdleBehavior::RandomExplore);
        assert!(EnergyTier::Medium.candidates().contains(&b));
    }

    #[test]
    fn duration_within_configured_range() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(2);
        let mut s = shark(0.5);
        for i in 0..100 {
            select(&mut s, &fx.ctx(i as f64), &mut rng);
            assert!(s.idle.duration >= fx.tuning.idle_min_duration);
            assert!(s.idle.duration <= fx.tuning.idle_max_duration);
        }
    }

    #[test]
    fn patrol_behaviors_never_touch_baseline() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(4);
        let mut s = shark(0.5);
        s.current_speed = 2.0;
        force(&mut s, IdleBehavior::DepthDiving, &fx.ctx(0.0), &mut rng);
        for i in 0..2000 {
            run(&mut s, &fx.ctx(i as f64 / 60.0), &mut rng, false, None);
            assert_eq!(s.patrol_baseline_y, 500.0);
        }
    }

    #[test]
    fn explore_reaches_target_and_requests_reselect() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(8);
        let mut s = shark(0.9);
        s.current_speed = 3.0;
        force(&mut s, IdleBehavior::EdgeExplore, &fx.ctx(0.0), &mut rng);
        let target = s.idle.target;
        for _ in 0..3000 {
            let ctx = fx.ctx(0.5);
            execute(&mut s, IdleBehavior::EdgeExplore, &ctx, &mut rng);
            if s.idle.reselect {
                break;
            }
        }
        assert!(s.idle.reselect);
        assert!(s.center().distance(target) < ARRIVAL_DIST);
    }

    #[test]
    fn deep_sleep_forces_slow_drift() {
        let fx = Fixture::new();
        let mut rng = fastrand::Rng::with_seed(6);
        let mut s = shark(0.9);
        run(&mut s, &fx.ctx(0.0), &mut rng, true, None);
        assert_eq!(s.idle.behavior, Some(IdleBehavior::SlowDrift));
    }
}
