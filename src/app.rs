use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use glam::Vec2;
use instant::Instant;

use sharkfin::config::{Settings, Tuning};
use sharkfin::debug::timer::{PhaseTimers, TickPhase};
use sharkfin::error::Result;
use sharkfin::input::InputFeed;
use sharkfin::render::frame::SharkFrame;
use sharkfin::screen::ScreenBounds;
use sharkfin::sim::{Simulation, EVAL_INTERVAL};

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;
/// Default run length when no duration is given.
const DEFAULT_RUN_SECONDS: f64 = 60.0;
/// Virtual screen used without a real display.
const SCREEN_W: f32 = 1920.0;
const SCREEN_H: f32 = 1080.0;

const SETTINGS_FILE: &str = "sharkfin.toml";
const TUNING_FILE: &str = "sharkfin-tuning.toml";

// ---------------------------------------------------------------------------
// Host timing
// ---------------------------------------------------------------------------

/// Frame-time window between two log lines.
#[derive(Clone, Copy)]
struct FrameWindow {
    frames: u32,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for FrameWindow {
    fn default() -> Self {
        Self {
            frames: 0,
            sum: 0.0,
            min: f64::MAX,
            max: 0.0,
        }
    }
}

impl FrameWindow {
    fn push(&mut self, dt: f64) {
        self.frames += 1;
        self.sum += dt;
        self.min = self.min.min(dt);
        self.max = self.max.max(dt);
    }
}

/// Host-side timing: frame times plus the per-phase costs of each tick.
struct HostStats {
    total_frames: u64,
    window: FrameWindow,
    window_start: Instant,
    phases: PhaseTimers,
}

impl HostStats {
    fn new() -> Self {
        Self {
            total_frames: 0,
            window: FrameWindow::default(),
            window_start: Instant::now(),
            phases: PhaseTimers::new(),
        }
    }

    /// Time `f` under `phase`.
    fn timed<R>(&mut self, phase: TickPhase, f: impl FnOnce() -> R) -> R {
        self.phases.begin();
        let out = f();
        self.phases.end(phase);
        out
    }

    fn record_frame(&mut self, dt: f64) {
        self.total_frames += 1;
        self.window.push(dt);

        let elapsed = self.window_start.elapsed().as_secs_f64();
        if elapsed < FPS_LOG_INTERVAL {
            return;
        }
        let w = std::mem::take(&mut self.window);
        log::info!(
            "FPS: {:.0} | frame avg {:.2}ms min {:.2}ms max {:.2}ms | {} frames total | {}",
            f64::from(w.frames) / elapsed,
            w.sum / f64::from(w.frames.max(1)) * 1000.0,
            w.min * 1000.0,
            w.max * 1000.0,
            self.total_frames,
            self.phases.summary(),
        );
        self.window_start = Instant::now();
    }
}

// ---------------------------------------------------------------------------
// Scripted pointer
// ---------------------------------------------------------------------------

/// Stand-in for the OS input hook: a pointer that wanders, clicks, parks
/// on the click point and then darts away, on a 30 s loop.
struct PointerScript {
    feed: InputFeed,
    clicked_this_loop: bool,
}

impl PointerScript {
    const LOOP_SECONDS: f64 = 30.0;
    const CLICK_AT: f64 = 10.0;
    const PARK_UNTIL: f64 = 24.0;

    fn new(feed: InputFeed) -> Self {
        Self {
            feed,
            clicked_this_loop: false,
        }
    }

    fn park_point() -> Vec2 {
        Vec2::new(SCREEN_W * 0.5, SCREEN_H * 0.5)
    }

    fn drive(&mut self, now: f64) {
        let t = now % Self::LOOP_SECONDS;
        if t < Self::CLICK_AT {
            self.clicked_this_loop = false;
            // Slow lap around the outer edge.
            let a = (t / Self::CLICK_AT * std::f64::consts::TAU) as f32;
            let p = Vec2::new(
                SCREEN_W * (0.5 + 0.45 * a.cos()),
                SCREEN_H * (0.5 + 0.45 * a.sin()),
            );
            self.feed.on_pointer_moved(p);
        } else if t < Self::PARK_UNTIL {
            if !self.clicked_this_loop {
                self.feed.on_pointer_moved(Self::park_point());
                self.feed.on_button_down(Self::park_point(), now);
                self.clicked_this_loop = true;
            }
        } else {
            let dx = ((t - Self::PARK_UNTIL) * 120.0) as f32;
            self.feed.on_pointer_moved(Self::park_point() + Vec2::new(dx, -dx * 0.3));
        }
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Headless host: owns the timers a desktop shell would own and plays the
/// renderer's part by reading frames back.
struct App {
    sim: Simulation,
    pointer: PointerScript,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    eval_accumulator: f64,
    tick_count: u64,

    // Host timing
    stats: HostStats,

    // Transition log cursor
    logged_transitions: u64,

    // Reusable frame buffer (avoid per-frame allocation)
    frame_buf: Vec<SharkFrame>,
}

impl App {
    fn new(settings: Settings, tuning: Tuning) -> Self {
        let bounds = ScreenBounds::new(0.0, 0.0, SCREEN_W, SCREEN_H);
        let seed = fastrand::u64(..);
        let sim = Simulation::new(bounds, settings, tuning, seed);
        let pointer = PointerScript::new(sim.input_feed());
        let frame_buf = Vec::with_capacity(sim.shark_count());
        log::info!(
            "Simulation ready: {} shark(s), seed {seed}, {}x{} virtual screen",
            sim.shark_count(),
            SCREEN_W,
            SCREEN_H
        );
        Self {
            sim,
            pointer,
            last_frame_time: None,
            accumulator: 0.0,
            eval_accumulator: 0.0,
            tick_count: 0,
            stats: HostStats::new(),
            logged_transitions: 0,
            frame_buf,
        }
    }

    /// Run fixed-timestep ticks, with the evaluator on its own slower timer.
    fn run_fixed_update(&mut self, dt: f64) -> Result<()> {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            let now = self.sim.now();
            let pointer = &mut self.pointer;
            self.stats.timed(TickPhase::Input, || pointer.drive(now));

            self.eval_accumulator += TICK_RATE;
            if self.eval_accumulator >= EVAL_INTERVAL {
                self.eval_accumulator -= EVAL_INTERVAL;
                let sim = &mut self.sim;
                self.stats.timed(TickPhase::Evaluate, || sim.evaluation_tick());
            }

            let sim = &mut self.sim;
            self.stats.timed(TickPhase::Advance, || sim.animation_tick(TICK_RATE))?;

            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }
        Ok(())
    }

    /// Stand-in for the renderer: copy frames out.
    fn build_frames(&mut self) {
        let (sim, buf) = (&self.sim, &mut self.frame_buf);
        self.stats.timed(TickPhase::Snapshot, || sim.frames_into(buf));

        if let Some(leader) = self.frame_buf.first() {
            log::trace!(
                "Leader at ({:.1}, {:.1}) {} scale {:.2}",
                leader.position.x,
                leader.position.y,
                leader.state.label(),
                leader.scale
            );
        }
    }

    fn log_transitions(&mut self) {
        let history = self.sim.history();
        let fresh = (history.total() - self.logged_transitions) as usize;
        let skip = history.len().saturating_sub(fresh);
        for t in history.iter().skip(skip) {
            log::info!(
                "[{:>7.2}s] shark {}: {} -> {} ({})",
                t.at,
                t.id.0,
                t.from.label(),
                t.to.label(),
                t.reason.label()
            );
        }
        self.logged_transitions = history.total();
    }

    fn frame(&mut self) -> Result<()> {
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt = now.duration_since(last).as_secs_f64();
            self.stats.record_frame(dt);
            self.run_fixed_update(dt)?;
        }
        self.last_frame_time = Some(now);

        self.build_frames();
        self.log_transitions();
        Ok(())
    }
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    if !path.exists() {
        return Ok(Tuning::default());
    }
    log::info!("Loading tuning overrides from {}", path.display());
    Tuning::from_toml_str(&fs::read_to_string(path)?)
}

/// Entry point: load settings, then drive the simulation in real time.
///
/// Usage: `sharkfin [seconds] [settings.toml]`
pub fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_RUN_SECONDS);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));

    let settings = Settings::load(&settings_path)?;
    if !settings_path.exists() {
        settings.save(&settings_path)?;
        log::info!("Wrote default settings to {}", settings_path.display());
    }
    let tuning = load_tuning(Path::new(TUNING_FILE))?;

    let mut app = App::new(settings, tuning);
    let started = Instant::now();
    while started.elapsed().as_secs_f64() < seconds {
        app.frame()?;
        thread::sleep(Duration::from_secs_f64(TICK_RATE));
    }

    log::info!(
        "Done after {} ticks, {} transitions",
        app.tick_count,
        app.sim.history().total()
    );
    Ok(())
}
