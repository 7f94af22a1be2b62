pub mod behavior;
pub mod events;
pub mod idle;
pub mod movement;
pub mod school;
pub mod transition;

use crate::config::{Settings, Tuning};
use crate::input::{InputTracker, InteractionRecord};
use crate::screen::ScreenBounds;

/// Nominal animation tick length (seconds). Per-tick constants assume it.
pub const NOMINAL_DT: f32 = 1.0 / 60.0;

/// Read-only inputs shared by every system for one tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    /// Simulation clock seconds.
    pub now: f64,
    /// Seconds since the previous tick of the same kind.
    pub dt: f32,
    pub record: &'a InteractionRecord,
    pub tracker: &'a InputTracker,
    pub tuning: &'a Tuning,
    pub settings: &'a Settings,
    pub bounds: ScreenBounds,
}

impl TickContext<'_> {
    /// `dt` in nominal ticks.
    pub fn scale(&self) -> f32 {
        self.dt / NOMINAL_DT
    }
}
