//! Empirical constants that shape how the scene looks and feels.
//!
//! Every field can be overridden from a JSON file passed with `--tuning`;
//! absent fields keep their defaults.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("reading tuning file {path} failed: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("tuning file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("tuning file {path}: {field} must be a probability in [0, 1], got {value}")]
    OutOfRange {
        path: String,
        field: &'static str,
        value: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    pub time_transition_ms: f64,
    pub theme_transition_ms: f64,

    pub rain_cap: usize,
    pub snow_cap: usize,
    pub rain_drops_per_frame: usize,
    pub rain_spawn_chance: f32,
    pub snow_interval_ms: f64,

    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub drip_pointer_multiplier: f32,
    pub umbrella_radius: f32,
    pub umbrella_push: f32,
    pub umbrella_soot_push: f32,

    pub heater_melt_radius: f32,
    pub snow_melt_delay_frames: f32,
    pub warm_melt_chance: f32,

    pub fire_per_frame: usize,
    pub flame_burst_count: usize,
    pub heater_start_smoke: usize,
    pub smoke_interval_ms: f64,

    pub soot_delay_ms: f64,
    pub soot_interval_ms: f64,
    pub soot_chance: f32,
    pub soot_cap: usize,
    pub soot_rain_radius: f32,
    pub soot_rain_hits: usize,
    pub shake_threshold: f32,
    pub shake_sample_ms: f64,

    pub douse_radius: f32,
    pub douse_per_drop: f32,
    pub douse_threshold: f32,
    pub douse_base_decay: f32,
    pub douse_warmth_decay: f32,
    pub steam_burst_count: usize,

    pub frost_seed_count: usize,
    pub frost_cap: usize,
    pub frost_seed_chance: f32,
    pub frost_branch_chance: f32,
    pub frost_heat_radius: f32,
    pub frost_heater_melt: u32,
    pub frost_drip_chance: f32,

    pub glow_ramp: f32,
    pub glow_decay: f32,
    pub glow_still_distance: f32,

    pub star_density: f32,
    pub shooting_star_cap: usize,
    pub shooting_star_chance: f32,

    pub lightning_chance: f32,
    pub lightning_max_depth: u8,
    pub lightning_max_steps: usize,
    pub lightning_branch_chance: f32,
    pub lightning_decay: f32,

    pub cloud_fade_in: f32,
    pub cloud_fade_out: f32,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            time_transition_ms: 5_000.0,
            theme_transition_ms: 3_000.0,

            rain_cap: 400,
            snow_cap: 200,
            rain_drops_per_frame: 3,
            rain_spawn_chance: 0.8,
            snow_interval_ms: 50.0,

            pointer_radius: 50.0,
            pointer_strength: 2.0,
            drip_pointer_multiplier: 0.3,
            umbrella_radius: 150.0,
            umbrella_push: 15.0,
            umbrella_soot_push: 10.0,

            heater_melt_radius: 100.0,
            snow_melt_delay_frames: 30.0,
            warm_melt_chance: 0.005,

            fire_per_frame: 3,
            flame_burst_count: 80,
            heater_start_smoke: 30,
            smoke_interval_ms: 100.0,

            soot_delay_ms: 1_500.0,
            soot_interval_ms: 150.0,
            soot_chance: 0.4,
            soot_cap: 80,
            soot_rain_radius: 30.0,
            soot_rain_hits: 3,
            shake_threshold: 1.8,
            shake_sample_ms: 50.0,

            douse_radius: 30.0,
            douse_per_drop: 2.0,
            douse_threshold: 15.0,
            douse_base_decay: 0.05,
            douse_warmth_decay: 0.1,
            steam_burst_count: 25,

            frost_seed_count: 25,
            frost_cap: 400,
            frost_seed_chance: 0.1,
            frost_branch_chance: 0.015,
            frost_heat_radius: 45.0,
            frost_heater_melt: 3,
            frost_drip_chance: 0.005,

            glow_ramp: 0.005,
            glow_decay: 0.01,
            glow_still_distance: 2.0,

            star_density: 1.0 / 8.0,
            shooting_star_cap: 3,
            shooting_star_chance: 0.005,

            lightning_chance: 0.002,
            lightning_max_depth: 3,
            lightning_max_steps: 60,
            lightning_branch_chance: 0.04,
            lightning_decay: 0.02,

            cloud_fade_in: 0.005,
            cloud_fade_out: 0.003,
        }
    }
}

impl SceneTuning {
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: display.clone(),
            source,
        })?;
        let tuning: Self =
            serde_json::from_str(&content).map_err(|source| TuningError::Parse {
                path: display.clone(),
                source,
            })?;
        match tuning.first_bad_probability() {
            Some((field, value)) => Err(TuningError::OutOfRange {
                path: display,
                field,
                value,
            }),
            None => Ok(tuning),
        }
    }

    fn probabilities(&self) -> [(&'static str, f32); 9] {
        [
            ("rain_spawn_chance", self.rain_spawn_chance),
            ("warm_melt_chance", self.warm_melt_chance),
            ("soot_chance", self.soot_chance),
            ("frost_seed_chance", self.frost_seed_chance),
            ("frost_branch_chance", self.frost_branch_chance),
            ("frost_drip_chance", self.frost_drip_chance),
            ("shooting_star_chance", self.shooting_star_chance),
            ("lightning_chance", self.lightning_chance),
            ("lightning_branch_chance", self.lightning_branch_chance),
        ]
    }

    /// Chances feed straight into `random_bool`, which rejects anything outside [0, 1].
    fn first_bad_probability(&self) -> Option<(&'static str, f32)> {
        self.probabilities()
            .into_iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
    }
}
