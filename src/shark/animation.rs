use glam::Vec2;

/// Swim cycle length in frames.
pub const SWIM_FRAMES: u8 = 8;
/// Ticks per swim frame (~8 FPS at 60 Hz).
const SWIM_FRAME_TICKS: u64 = 8;
/// Bite cycle length in frames.
pub const BITE_FRAMES: u8 = 12;
/// Ticks per bite frame (~12 FPS at 60 Hz).
const BITE_FRAME_TICKS: u64 = 5;
/// Bite effect sprite edge, centered on the pointer.
pub const BITE_EFFECT_SIZE: f32 = 64.0;
/// Seconds for the bite effect to fade out.
const BITE_FADE: f64 = 1.0;
/// Fin scale at the peak of an attack lunge.
pub const ATTACK_SCALE: f32 = 1.5;
const ATTACK_GROW: f64 = 0.3;
const ATTACK_SHRINK: f64 = 0.5;

/// Linear tween of the fin scale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScaleTween {
    from: f32,
    to: f32,
    start: f64,
    duration: f64,
}

impl ScaleTween {
    fn rest() -> Self {
        Self {
            from: 1.0,
            to: 1.0,
            start: 0.0,
            duration: 0.0,
        }
    }

    fn value(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32;
        self.from + (self.to - self.from) * t
    }
}

/// Bite effect shown where the pointer was caught.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiteEffect {
    /// Absolute top-left of the effect sprite.
    pub position: Vec2,
    pub started: f64,
}

/// Per-shark sprite animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    frame_counter: u64,
    pub swim_frame: u8,
    pub bite_frame: u8,
    /// Bite cycle is running.
    pub eating: bool,
    pub bite_effect: Option<BiteEffect>,
    /// Host should hide the OS cursor until the next input.
    pub cursor_hidden: bool,
    scale: ScaleTween,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            frame_counter: 0,
            swim_frame: 0,
            bite_frame: 0,
            eating: false,
            bite_effect: None,
            cursor_hidden: false,
            scale: ScaleTween::rest(),
        }
    }
}

impl AnimationState {
    /// Advance frame counters by one animation tick.
    pub fn tick(&mut self, now: f64) {
        self.frame_counter += 1;

        if self.frame_counter % SWIM_FRAME_TICKS == 0 {
            self.swim_frame = (self.swim_frame + 1) % SWIM_FRAMES;
        }

        if self.eating && self.frame_counter % BITE_FRAME_TICKS == 0 {
            self.bite_frame = (self.bite_frame + 1) % BITE_FRAMES;
        }

        if let Some(effect) = self.bite_effect {
            if now - effect.started >= BITE_FADE {
                self.bite_effect = None;
                self.eating = false;
                self.bite_frame = 0;
            }
        }
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Lunge: grow the fin.
    pub fn start_attack(&mut self, now: f64) {
        self.scale = ScaleTween {
            from: self.scale.value(now),
            to: ATTACK_SCALE,
            start: now,
            duration: ATTACK_GROW,
        };
    }

    /// Attack gave up: snap the fin back.
    pub fn reset_attack(&mut self) {
        self.scale = ScaleTween::rest();
    }

    /// Pointer caught at `pointer`.
    pub fn bite(&mut self, pointer: Vec2, now: f64) {
        self.eating = true;
        self.bite_frame = 0;
        self.cursor_hidden = true;
        self.bite_effect = Some(BiteEffect {
            position: pointer - Vec2::splat(BITE_EFFECT_SIZE * 0.5),
            started: now,
        });
        self.scale = ScaleTween {
            from: self.scale.value(now),
            to: 1.0,
            start: now,
            duration: ATTACK_SHRINK,
        };
    }

    /// Input arrived: drop any in-flight bite visual.
    pub fn cancel_bite(&mut self) {
        self.eating = false;
        self.bite_frame = 0;
        self.bite_effect = None;
        self.cursor_hidden = false;
        self.scale = ScaleTween::rest();
    }

    pub fn scale(&self, now: f64) -> f32 {
        self.scale.value(now)
    }

    /// Effect opacity in [0, 1], 0 when no effect is showing.
    pub fn bite_opacity(&self, now: f64) -> f32 {
        match self.bite_effect {
            Some(effect) => (1.0 - (now - effect.started) / BITE_FADE).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swim_cycle_advances_every_eighth_tick() {
        let mut anim = AnimationState::default();
        for i in 1..=7 {
            anim.tick(i as f64 / 60.0);
        }
        assert_eq!(anim.swim_frame, 0);
        anim.tick(8.0 / 60.0);
        assert_eq!(anim.swim_frame, 1);
        for i in 9..=64 {
            anim.tick(i as f64 / 60.0);
        }
        assert_eq!(anim.swim_frame, 0);
    }

    #[test]
    fn bite_cycle_runs_only_while_eating() {
        let mut anim = AnimationState::default();
        for i in 1..=10 {
            anim.tick(i as f64 / 60.0);
        }
        assert_eq!(anim.bite_frame, 0);

        anim.bite(Vec2::new(100.0, 100.0), 0.2);
        assert_eq!(anim.bite_effect.map(|e| e.position), Some(Vec2::new(68.0, 68.0)));
        for i in 11..=20 {
            anim.tick(i as f64 / 60.0);
        }
        assert_eq!(anim.bite_frame, 2);
    }

    #[test]
    fn bite_effect_fades_then_clears() {
        let mut anim = AnimationState::default();
        anim.bite(Vec2::ZERO, 1.0);
        assert!((anim.bite_opacity(1.5) - 0.5).abs() < 1e-6);
        anim.tick(2.0);
        assert!(anim.bite_effect.is_none());
        assert!(!anim.eating);
        assert!(anim.cursor_hidden);
    }

    #[test]
    fn attack_scale_grows_then_resets() {
        let mut anim = AnimationState::default();
        anim.start_attack(0.0);
        assert!((anim.scale(0.15) - 1.25).abs() < 1e-6);
        assert_eq!(anim.scale(1.0), ATTACK_SCALE);
        anim.reset_attack();
        assert_eq!(anim.scale(1.0), 1.0);
    }
}
