use instant::Instant;

/// Which part of a host frame is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TickPhase {
    Input = 0,
    Evaluate = 1,
    Advance = 2,
    Snapshot = 3,
}

impl TickPhase {
    pub const ALL: [TickPhase; 4] = [Self::Input, Self::Evaluate, Self::Advance, Self::Snapshot];

    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Evaluate => "evaluate",
            Self::Advance => "advance",
            Self::Snapshot => "snapshot",
        }
    }
}

const EMA_ALPHA: f64 = 0.1;

/// EMA-smoothed cost per phase, in microseconds.
pub struct PhaseTimers {
    durations_us: [f64; 4],
    start: Instant,
}

impl PhaseTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 4],
            start: Instant::now(),
        }
    }

    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    pub fn end(&mut self, phase: TickPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let slot = &mut self.durations_us[phase as usize];
        *slot = *slot * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: TickPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// One-line summary for the periodic log.
    pub fn summary(&self) -> String {
        TickPhase::ALL
            .iter()
            .map(|p| format!("{} {:.1}us", p.label(), self.get(*p)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for PhaseTimers {
    fn default() -> Self {
        Self::new()
    }
}
