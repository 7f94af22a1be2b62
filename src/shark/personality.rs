/// Personality profile rolled at spawn. Scales movement speed and how fast
/// energy drains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    pub name: &'static str,
    pub speed_scale: f32,
    pub decay_scale: f32,
}

const PROFILES: [Personality; 4] = [
    Personality {
        name: "lazy",
        speed_scale: 0.8,
        decay_scale: 0.7,
    },
    Personality {
        name: "curious",
        speed_scale: 1.0,
        decay_scale: 1.0,
    },
    Personality {
        name: "restless",
        speed_scale: 1.1,
        decay_scale: 1.15,
    },
    Personality {
        name: "hungry",
        speed_scale: 1.2,
        decay_scale: 1.3,
    },
];

impl Personality {
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        PROFILES[rng.usize(0..PROFILES.len())]
    }
}

impl Default for Personality {
    fn default() -> Self {
        PROFILES[1]
    }
}
