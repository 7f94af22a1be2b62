//! User settings record and engine tuning.
//!
//! `Settings` is the record the persistence collaborator reads and writes.
//! `Tuning` carries every range, duration and speed the engine uses; the
//! defaults are hand-tuned values, not physics, so they load from TOML too.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::components::IdleBehavior;
use crate::error::Result;

/// Lowest speed multiplier accepted from settings.
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;
/// Highest speed multiplier accepted from settings.
pub const MAX_SPEED_MULTIPLIER: f32 = 5.0;

/// Per-behavior switches exposed in the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorToggles {
    pub figure_eight: bool,
    pub zigzag: bool,
    pub depth_diving: bool,
    pub edge_explore: bool,
    pub circle_area: bool,
}

impl Default for BehaviorToggles {
    fn default() -> Self {
        Self {
            figure_eight: true,
            zigzag: true,
            depth_diving: true,
            edge_explore: true,
            circle_area: true,
        }
    }
}

impl BehaviorToggles {
    /// Whether the planner may pick `behavior`. Behaviors without a toggle
    /// are always allowed so every energy tier keeps a candidate.
    pub fn allows(&self, behavior: IdleBehavior) -> bool {
        match behavior {
            IdleBehavior::FigureEight => self.figure_eight,
            IdleBehavior::Zigzag => self.zigzag,
            IdleBehavior::DepthDiving => self.depth_diving,
            IdleBehavior::EdgeExplore => self.edge_explore,
            IdleBehavior::CircleArea => self.circle_area,
            IdleBehavior::SimplePatrol
            | IdleBehavior::RandomExplore
            | IdleBehavior::RestPause
            | IdleBehavior::SlowDrift => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed_multiplier: f32,
    pub multi_instance: bool,
    pub auto_start: bool,
    pub behaviors: BehaviorToggles,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            multi_instance: false,
            auto_start: false,
            behaviors: BehaviorToggles::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings.sanitized())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from disk. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Clamp out-of-range values to safe ones.
    pub fn sanitized(mut self) -> Self {
        self.speed_multiplier = if self.speed_multiplier.is_finite() {
            self.speed_multiplier
                .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER)
        } else {
            1.0
        };
        self
    }
}

/// Engine constants. Speeds are pixels per nominal (1/60 s) tick,
/// durations are seconds, ranges are pixels between creature-centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Speed smoothing and stepping
    pub speed_transition_rate: f32,
    pub speed_snap_epsilon: f32,
    pub dead_zone: f32,
    pub approach_fraction: f32,
    pub facing_threshold: f32,

    // Per-state speeds
    pub patrol_speed: f32,
    pub stalking_speed: f32,
    pub alert_speed: f32,
    pub circling_speed: f32,
    pub hunt_speed: f32,
    pub seeking_speed: f32,
    pub attack_speed: f32,
    pub rest_speed: f32,
    pub drift_speed: f32,

    // Energy
    pub energy_decay_rate: f32,
    pub energy_recovery_rate: f32,
    pub low_energy: f32,
    pub well_rested: f32,
    pub rest_chance: f32,
    pub min_rest_duration: f64,
    pub deep_sleep_after: f64,
    pub deep_sleep_energy_floor: f32,

    // Ranges
    pub detection_range: f32,
    pub stalking_range: f32,
    pub attack_trigger_range: f32,
    pub hunt_attack_range: f32,
    pub bite_range: f32,
    pub alert_arrival_range: f32,
    pub click_near_radius: f32,

    // Timeouts
    pub stalk_timeout: f64,
    pub seek_timeout: f64,
    pub circling_timeout: f64,
    pub attack_timeout: f64,
    pub hunt_timeout: f64,
    pub pointer_idle_threshold: f64,
    pub frustration_threshold: u32,

    // Idle planner
    pub idle_min_duration: f64,
    pub idle_max_duration: f64,
    pub high_energy: f32,
    pub medium_energy: f32,

    // Orbits
    pub orbit_radius: f32,
    pub orbit_angular_speed: f32,

    // Multi-instance
    pub school_size: usize,
    pub school_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed_transition_rate: 0.08,
            speed_snap_epsilon: 0.01,
            dead_zone: 2.0,
            approach_fraction: 0.25,
            facing_threshold: 0.5,

            patrol_speed: 1.5,
            stalking_speed: 1.0,
            alert_speed: 4.0,
            circling_speed: 3.0,
            hunt_speed: 5.0,
            seeking_speed: 3.0,
            attack_speed: 8.0,
            rest_speed: 0.1,
            drift_speed: 0.4,

            energy_decay_rate: 0.01,
            energy_recovery_rate: 0.05,
            low_energy: 0.25,
            well_rested: 0.8,
            rest_chance: 0.005,
            min_rest_duration: 5.0,
            deep_sleep_after: 120.0,
            deep_sleep_energy_floor: 0.1,

            detection_range: 150.0,
            stalking_range: 300.0,
            attack_trigger_range: 60.0,
            hunt_attack_range: 80.0,
            bite_range: 20.0,
            alert_arrival_range: 30.0,
            click_near_radius: 40.0,

            stalk_timeout: 6.0,
            seek_timeout: 5.0,
            circling_timeout: 4.0,
            attack_timeout: 3.0,
            hunt_timeout: 8.0,
            pointer_idle_threshold: 8.0,
            frustration_threshold: 3,

            idle_min_duration: 8.0,
            idle_max_duration: 20.0,
            high_energy: 0.66,
            medium_energy: 0.33,

            orbit_radius: 50.0,
            orbit_angular_speed: 0.05,

            school_size: 4,
            school_radius: 250.0,
        }
    }
}

impl Tuning {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tuning: Tuning = toml::from_str(content)?;
        Ok(tuning.sanitized())
    }

    /// Clamp every constant into a range the engine can run with.
    /// Non-finite values fall back to the default for that field.
    pub fn sanitized(mut self) -> Self {
        let d = Tuning::default();
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let finite64 = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        self.speed_transition_rate =
            finite(self.speed_transition_rate, d.speed_transition_rate).clamp(0.001, 1.0);
        self.approach_fraction =
            finite(self.approach_fraction, d.approach_fraction).clamp(0.001, 1.0);

        for (value, fallback) in [
            (&mut self.speed_snap_epsilon, d.speed_snap_epsilon),
            (&mut self.dead_zone, d.dead_zone),
            (&mut self.facing_threshold, d.facing_threshold),
            (&mut self.patrol_speed, d.patrol_speed),
            (&mut self.stalking_speed, d.stalking_speed),
            (&mut self.alert_speed, d.alert_speed),
            (&mut self.circling_speed, d.circling_speed),
            (&mut self.hunt_speed, d.hunt_speed),
            (&mut self.seeking_speed, d.seeking_speed),
            (&mut self.attack_speed, d.attack_speed),
            (&mut self.rest_speed, d.rest_speed),
            (&mut self.drift_speed, d.drift_speed),
            (&mut self.energy_decay_rate, d.energy_decay_rate),
            (&mut self.energy_recovery_rate, d.energy_recovery_rate),
            (&mut self.detection_range, d.detection_range),
            (&mut self.stalking_range, d.stalking_range),
            (&mut self.attack_trigger_range, d.attack_trigger_range),
            (&mut self.hunt_attack_range, d.hunt_attack_range),
            (&mut self.bite_range, d.bite_range),
            (&mut self.alert_arrival_range, d.alert_arrival_range),
            (&mut self.click_near_radius, d.click_near_radius),
            (&mut self.orbit_radius, d.orbit_radius),
            (&mut self.orbit_angular_speed, d.orbit_angular_speed),
            (&mut self.school_radius, d.school_radius),
        ] {
            *value = finite(*value, fallback).max(0.0);
        }

        for (value, fallback) in [
            (&mut self.min_rest_duration, d.min_rest_duration),
            (&mut self.deep_sleep_after, d.deep_sleep_after),
            (&mut self.stalk_timeout, d.stalk_timeout),
            (&mut self.seek_timeout, d.seek_timeout),
            (&mut self.circling_timeout, d.circling_timeout),
            (&mut self.attack_timeout, d.attack_timeout),
            (&mut self.hunt_timeout, d.hunt_timeout),
            (&mut self.pointer_idle_threshold, d.pointer_idle_threshold),
            (&mut self.idle_min_duration, d.idle_min_duration),
            (&mut self.idle_max_duration, d.idle_max_duration),
        ] {
            *value = finite64(*value, fallback).max(0.0);
        }
        self.idle_max_duration = self.idle_max_duration.max(self.idle_min_duration);
        self.stalking_range = self.stalking_range.max(self.detection_range);

        for (value, fallback) in [
            (&mut self.low_energy, d.low_energy),
            (&mut self.well_rested, d.well_rested),
            (&mut self.rest_chance, d.rest_chance),
            (&mut self.deep_sleep_energy_floor, d.deep_sleep_energy_floor),
            (&mut self.medium_energy, d.medium_energy),
            (&mut self.high_energy, d.high_energy),
        ] {
            *value = finite(*value, fallback).clamp(0.0, 1.0);
        }
        self.well_rested = self.well_rested.max(self.low_energy);
        self.high_energy = self.high_energy.max(self.medium_energy);
        self.school_size = self.school_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.speed_multiplier = 1.5;
        settings.behaviors.zigzag = false;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn negative_speed_multiplier_is_clamped() {
        let settings = Settings::from_toml_str("speed_multiplier = -3.0").unwrap();
        assert_eq!(settings.speed_multiplier, MIN_SPEED_MULTIPLIER);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings = Settings::from_toml_str("[behaviors]\nfigure_eight = false\n").unwrap();
        assert!(!settings.behaviors.figure_eight);
        assert!(settings.behaviors.zigzag);
        assert_eq!(settings.speed_multiplier, 1.0);
    }

    #[test]
    fn untoggled_behaviors_always_allowed() {
        let toggles = BehaviorToggles {
            figure_eight: false,
            zigzag: false,
            depth_diving: false,
            edge_explore: false,
            circle_area: false,
        };
        assert!(toggles.allows(IdleBehavior::RandomExplore));
        assert!(toggles.allows(IdleBehavior::SlowDrift));
        assert!(!toggles.allows(IdleBehavior::Zigzag));
    }

    #[test]
    fn tuning_sanitizes_bad_values() {
        let tuning = Tuning::from_toml_str(
            "detection_range = 400.0\nstalking_range = 100.0\nattack_speed = -2.0\n",
        )
        .unwrap();
        assert_eq!(tuning.attack_speed, 0.0);
        assert!(tuning.stalking_range >= tuning.detection_range);
    }

    #[test]
    fn nan_tuning_falls_back_to_defaults() {
        let defaults = Tuning::default();
        let tuning = Tuning::from_toml_str(
            "low_energy = nan\nmedium_energy = nan\nspeed_transition_rate = nan\n\
             approach_fraction = nan\nrest_chance = nan\nhunt_timeout = inf\n",
        )
        .unwrap();
        assert_eq!(tuning.low_energy, defaults.low_energy);
        assert_eq!(tuning.medium_energy, defaults.medium_energy);
        assert_eq!(tuning.speed_transition_rate, defaults.speed_transition_rate);
        assert_eq!(tuning.approach_fraction, defaults.approach_fraction);
        assert_eq!(tuning.rest_chance, defaults.rest_chance);
        assert_eq!(tuning.hunt_timeout, defaults.hunt_timeout);
        assert!(tuning.well_rested >= tuning.low_energy);
        assert!(tuning.high_energy >= tuning.medium_energy);
    }

    #[test]
    fn malformed_settings_report_parse_error() {
        let err = Settings::from_toml_str("speed_multiplier = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::error::SharkError::ConfigParse(_)));
    }
}
