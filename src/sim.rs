use crate::clock::{ClockError, SimClock};
use crate::config::{Settings, Tuning};
use crate::debug::ring::TransitionHistory;
use crate::ecs::components::{Follower, Leader, SharkId};
use crate::ecs::systems::{self, behavior, events, transition, TickContext};
use crate::input::{InputEvents, InputFeed, InputTracker, InteractionRecord};
use crate::render::frame::SharkFrame;
use crate::screen::ScreenBounds;
use crate::shark::Shark;

/// Evaluator cadence (seconds).
pub const EVAL_INTERVAL: f64 = 0.1;
/// Transitions kept for diagnostics.
const HISTORY_CAPACITY: usize = 64;

/// The behavior core: every shark, the clock, and the reader side of the
/// input record. Single-threaded; the host drives it with `step` or with
/// `evaluation_tick` + `animation_tick` on its own timers.
pub struct Simulation {
    world: hecs::World,
    rng: fastrand::Rng,
    settings: Settings,
    tuning: Tuning,
    bounds: ScreenBounds,
    feed: InputFeed,
    record: InteractionRecord,
    tracker: InputTracker,
    clock: SimClock,
    history: TransitionHistory,
    eval_accumulator: f64,
    next_id: u32,
}

impl Simulation {
    pub fn new(bounds: ScreenBounds, settings: Settings, tuning: Tuning, seed: u64) -> Self {
        let feed = InputFeed::new(bounds);
        let record = feed.snapshot();
        let clock = SimClock::new();
        let mut sim = Self {
            world: hecs::World::new(),
            rng: fastrand::Rng::with_seed(seed),
            settings: settings.sanitized(),
            tuning: tuning.sanitized(),
            bounds,
            feed,
            record,
            tracker: InputTracker::new(clock.now()),
            clock,
            history: TransitionHistory::new(HISTORY_CAPACITY),
            eval_accumulator: 0.0,
            next_id: 0,
        };
        let leader = sim.spawn_shark();
        let inserted = sim.world.insert_one(leader, Leader);
        debug_assert!(inserted.is_ok(), "leader entity vanished after spawn");
        sim.sync_school();
        sim
    }

    /// Writer handle for the input hook.
    pub fn input_feed(&self) -> InputFeed {
        self.feed.clone()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn record(&self) -> &InteractionRecord {
        &self.record
    }

    pub fn shark_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.sync_school();
    }

    pub fn set_bounds(&mut self, bounds: ScreenBounds) {
        self.bounds = bounds;
        self.feed.set_bounds(bounds);
    }

    /// One nominal frame: evaluator first when it is due, then the
    /// animation advance.
    pub fn step(&mut self, dt: f64) -> Result<(), ClockError> {
        self.clock.advance(dt)?;
        self.eval_accumulator += dt;
        if self.eval_accumulator >= EVAL_INTERVAL {
            // One evaluation per frame; a long frame does not queue more.
            self.eval_accumulator = (self.eval_accumulator - EVAL_INTERVAL).min(EVAL_INTERVAL);
            self.evaluation_tick();
        }
        self.advance(dt as f32);
        Ok(())
    }

    /// Run `step` at the nominal rate for `seconds` of simulated time.
    pub fn run_for(&mut self, seconds: f64) -> Result<(), ClockError> {
        let dt = f64::from(systems::NOMINAL_DT);
        let ticks = (seconds / dt).round() as u64;
        for _ in 0..ticks {
            self.step(dt)?;
        }
        Ok(())
    }

    /// Animation tick on a host-owned timer: moves the clock by `dt`.
    pub fn animation_tick(&mut self, dt: f64) -> Result<(), ClockError> {
        self.clock.advance(dt)?;
        self.advance(dt as f32);
        Ok(())
    }

    /// Evaluation tick on a host-owned timer, at the current clock.
    pub fn evaluation_tick(&mut self) {
        let events = self.poll_input();
        let ctx = TickContext {
            now: self.clock.now(),
            dt: EVAL_INTERVAL as f32,
            record: &self.record,
            tracker: &self.tracker,
            tuning: &self.tuning,
            settings: &self.settings,
            bounds: self.bounds,
        };
        events::apply(&mut self.world, &events, &ctx, &mut self.rng, &mut self.history);
        transition::evaluate(&mut self.world, &ctx, &mut self.history);
    }

    fn advance(&mut self, dt: f32) {
        let events = self.poll_input();
        let ctx = TickContext {
            now: self.clock.now(),
            dt,
            record: &self.record,
            tracker: &self.tracker,
            tuning: &self.tuning,
            settings: &self.settings,
            bounds: self.bounds,
        };
        events::apply(&mut self.world, &events, &ctx, &mut self.rng, &mut self.history);
        behavior::advance_all(&mut self.world, &ctx, &mut self.rng, &mut self.history);
    }

    fn poll_input(&mut self) -> InputEvents {
        self.record = self.feed.snapshot();
        self.tracker.poll(&self.record, self.clock.now())
    }

    /// Renderer snapshots, leader first.
    pub fn frames(&self) -> Vec<SharkFrame> {
        let mut frames = Vec::with_capacity(self.shark_count());
        self.frames_into(&mut frames);
        frames
    }

    /// Fill `out` without allocating once it has capacity.
    pub fn frames_into(&self, out: &mut Vec<SharkFrame>) {
        out.clear();
        let now = self.clock.now();
        for (_, shark) in self.world.query::<&Shark>().iter() {
            out.push(SharkFrame::from_shark(shark, &self.bounds, now));
        }
        out.sort_by_key(|f| f.id);
    }

    /// Copy of one shark's state.
    pub fn shark(&self, id: SharkId) -> Option<Shark> {
        self.world
            .query::<&Shark>()
            .iter()
            .find(|(_, s)| s.id == id)
            .map(|(_, s)| s.clone())
    }

    /// Copy of the leader.
    pub fn leader(&self) -> Option<Shark> {
        self.world
            .query::<(&Shark, &Leader)>()
            .iter()
            .next()
            .map(|(_, (s, _))| s.clone())
    }

    /// Mutate one shark in place (hosts and tests staging a scenario).
    pub fn update_shark<R>(&mut self, id: SharkId, f: impl FnOnce(&mut Shark) -> R) -> Option<R> {
        self.world
            .query_mut::<&mut Shark>()
            .into_iter()
            .find(|(_, s)| s.id == id)
            .map(|(_, s)| f(s))
    }

    fn spawn_shark(&mut self) -> hecs::Entity {
        let id = SharkId(self.next_id);
        self.next_id += 1;
        let shark = Shark::spawn(id, &self.bounds, &mut self.rng, self.clock.now());
        log::info!(
            "Spawned shark {} ({}) at ({:.0}, {:.0})",
            id.0,
            shark.personality.name,
            shark.position.x,
            shark.position.y
        );
        self.world.spawn((shark,))
    }

    /// Match the follower count to the multi-instance setting.
    fn sync_school(&mut self) {
        let wanted = if self.settings.multi_instance {
            self.tuning.school_size.saturating_sub(1)
        } else {
            0
        };
        let followers: Vec<hecs::Entity> = self
            .world
            .query::<&Follower>()
            .iter()
            .map(|(e, _)| e)
            .collect();

        if followers.len() > wanted {
            for entity in &followers[wanted..] {
                if let Err(e) = self.world.despawn(*entity) {
                    log::warn!("Follower {entity:?} already gone: {e}");
                }
            }
            log::info!("Despawned {} followers", followers.len() - wanted);
        }
        for _ in followers.len()..wanted {
            let entity = self.spawn_shark();
            let inserted = self.world.insert_one(entity, Follower);
            debug_assert!(inserted.is_ok(), "follower entity vanished after spawn");
        }
    }
}
