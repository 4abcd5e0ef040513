//! Game and training configuration.
//!
//! Defaults reproduce the classic tuning: a 400x600 screen, gravity 0.3,
//! jump strength -8 and a 150px gap scrolling at 3px per tick.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loadable from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub evolution: EvolutionConfig,
}

/// Screen, physics and obstacle constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Fixed tick rate of the windowed loop.
    pub fps: u32,
    /// Added to the bird's velocity every tick.
    pub gravity: f32,
    /// Velocity assigned on a jump (negative is up).
    pub jump_strength: f32,
    pub pipe_speed: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Minimum height of either pipe segment.
    pub pipe_margin: f32,
    /// Distance past the right edge where new pipes spawn.
    pub spawn_offset: f32,
    pub bird_x: f32,
    pub bird_width: f32,
    pub bird_height: f32,
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Fraction of each generation kept as parents.
    pub elite_fraction: f32,
    /// Probability of mutating each weight.
    pub mutation_rate: f32,
    /// Maximum absolute change applied by one mutation.
    pub mutation_strength: f32,
    /// Weights are clamped to `[-weight_clamp, weight_clamp]` after mutation.
    pub weight_clamp: f32,
    /// Headless runs stop a generation after this many ticks.
    pub max_ticks: u64,
    /// Stop training once the best fitness of a generation reaches this.
    pub fitness_threshold: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            screen_height: 600.0,
            fps: 60,
            gravity: 0.3,
            jump_strength: -8.0,
            pipe_speed: 3.0,
            pipe_gap: 150.0,
            pipe_width: 50.0,
            pipe_margin: 50.0,
            spawn_offset: 200.0,
            bird_x: 100.0,
            bird_width: 40.0,
            bird_height: 30.0,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            elite_fraction: 0.2,
            mutation_rate: 0.10,
            mutation_strength: 0.5,
            weight_clamp: 5.0,
            max_ticks: 20_000,
            fitness_threshold: None,
        }
    }
}

impl GameConfig {
    /// Vertical start position of every bird. Whole pixels, like the screen.
    pub fn bird_start_y(&self) -> f32 {
        (self.screen_height / 2.0).floor()
    }

    /// Largest top-segment height a pipe may be generated with.
    pub fn max_top_height(&self) -> f32 {
        self.screen_height - self.pipe_gap - self.pipe_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "screen must have a positive size, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".to_string()));
        }
        if self.pipe_margin < 0.0 || self.pipe_gap <= 0.0 {
            return Err(ConfigError::Invalid(
                "pipe gap must be positive and margin non-negative".to_string(),
            ));
        }
        if self.pipe_speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pipe speed must be positive, got {}",
                self.pipe_speed
            )));
        }
        if self.pipe_width < 0.0 || self.spawn_offset < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pipe width {} and spawn offset {} must not be negative",
                self.pipe_width, self.spawn_offset
            )));
        }
        if self.max_top_height() < self.pipe_margin {
            return Err(ConfigError::Invalid(format!(
                "pipe gap {} with margin {} does not fit a screen height of {}",
                self.pipe_gap, self.pipe_margin, self.screen_height
            )));
        }
        if self.bird_height >= self.screen_height {
            return Err(ConfigError::Invalid(format!(
                "bird height {} does not fit a screen height of {}",
                self.bird_height, self.screen_height
            )));
        }
        Ok(())
    }
}

impl EvolutionConfig {
    /// Number of parents kept per generation, at least one.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f32 * self.elite_fraction) as usize).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Invalid(
                "population size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.elite_fraction) {
            return Err(ConfigError::Invalid(format!(
                "elite fraction must be within [0, 1], got {}",
                self.elite_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Invalid(format!(
                "mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.mutation_strength <= 0.0 || self.weight_clamp <= 0.0 {
            return Err(ConfigError::Invalid(
                "mutation strength and weight clamp must be positive".to_string(),
            ));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid("max ticks must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.evolution.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.bird_start_y(), 300.0);
        assert_eq!(config.game.max_top_height(), 400.0);
        assert_eq!(config.evolution.elite_count(), 10);
    }

    #[test]
    fn test_gap_that_does_not_fit_is_rejected() {
        let mut game = GameConfig::default();
        game.pipe_gap = 550.0;
        assert!(matches!(game.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_pipes_that_never_recycle_are_rejected() {
        for speed in [0.0, -3.0] {
            let mut game = GameConfig::default();
            game.pipe_speed = speed;
            assert!(matches!(game.validate(), Err(ConfigError::Invalid(_))));
        }

        let mut game = GameConfig::default();
        game.pipe_width = -1.0;
        assert!(matches!(game.validate(), Err(ConfigError::Invalid(_))));

        let mut game = GameConfig::default();
        game.spawn_offset = -10.0;
        assert!(matches!(game.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "game": { "gravity": 0.5 } }"#).unwrap();
        assert_eq!(config.game.gravity, 0.5);
        assert_eq!(config.game.screen_height, 600.0);
        assert_eq!(config.evolution, EvolutionConfig::default());
    }

    #[test]
    fn test_elite_count_is_at_least_one() {
        let mut evolution = EvolutionConfig::default();
        evolution.population_size = 2;
        evolution.elite_fraction = 0.1;
        assert_eq!(evolution.elite_count(), 1);
    }
}
