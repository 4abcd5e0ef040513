//! Flappy bird as a neuro-evolution playground.
//!
//! The game core (`bird`, `pipe`, `collision`, `simulation`) is plain
//! arithmetic with no window attached; `app` and `render` put it on screen
//! with ggez, and `evolution` breeds the networks that fly it.

pub mod app;
pub mod bird;
pub mod brain;
pub mod collision;
pub mod config;
pub mod error;
pub mod evolution;
pub mod neural_network;
pub mod persistence;
pub mod pipe;
pub mod render;
pub mod replay;
pub mod simulation;

pub use brain::Brain;
pub use config::{Config, EvolutionConfig, GameConfig};
pub use error::{ConfigError, ModelError};
pub use evolution::{GenerationStats, Trainer};
pub use neural_network::NeuralNetwork;
pub use simulation::GameState;
