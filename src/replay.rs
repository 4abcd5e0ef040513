use crate::brain::Brain;
use crate::collision::Termination;
use crate::config::GameConfig;
use crate::simulation::GameState;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How a single-bird replay ended.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub score: u32,
    pub ticks: u64,
    /// `None` if the tick cap stopped the replay first.
    pub cause: Option<Termination>,
}

/// A batch of one for `brain`, on a seeded or random timeline.
pub fn replay_state<B: Brain>(config: &GameConfig, brain: B, seed: Option<u64>) -> GameState<B> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    GameState::single(config.clone(), brain, rng)
}

/// Flies `brain` without a window until it crashes or `max_ticks` pass.
pub fn replay_headless<B: Brain>(
    config: &GameConfig,
    brain: B,
    seed: Option<u64>,
    max_ticks: u64,
) -> ReplayReport {
    let mut state = replay_state(config, brain, seed);
    state.run(max_ticks);
    let score = state.score;
    let ticks = state.ticks;
    let cause = state.finished.first().and_then(|result| result.cause);
    ReplayReport { score, ticks, cause }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::INPUT_COUNT;

    #[test]
    fn test_idle_bird_falls_out() {
        let report = replay_headless(
            &GameConfig::default(),
            |_: &[f32; INPUT_COUNT]| 0.0f32,
            Some(1),
            10_000,
        );
        assert_eq!(report.score, 0);
        assert_eq!(report.ticks, 42);
        assert_eq!(report.cause, Some(Termination::OutOfBounds));
    }

    #[test]
    fn test_tick_cap_stops_a_surviving_bird() {
        // Flap whenever the bird drops below the middle of the screen; with no
        // pipe reached yet this hovers safely.
        let hover = |inputs: &[f32; INPUT_COUNT]| if inputs[0] > 300.0 { 1.0f32 } else { 0.0 };
        let report = replay_headless(&GameConfig::default(), hover, Some(1), 50);
        assert_eq!(report.ticks, 50);
        assert_eq!(report.cause, None);
    }
}
