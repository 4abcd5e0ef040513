use crate::config::{Config, EvolutionConfig, GameConfig};
use crate::error::ModelError;
use crate::neural_network::NeuralNetwork;
use crate::persistence;
use crate::simulation::{AgentResult, GameState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub worst_fitness: f32,
    /// Pipes passed on the shared timeline.
    pub score: u32,
    pub ticks: u64,
}

/// Networks and their fitness from the last evaluation.
pub struct Population {
    pub members: Vec<(NeuralNetwork, f32)>, // network and fitness
    config: EvolutionConfig,
}

impl Population {
    /// Sets up a random population, optionally seeded with a saved network.
    pub fn new<R: Rng>(
        config: EvolutionConfig,
        seed_model: Option<NeuralNetwork>,
        rng: &mut R,
    ) -> Self {
        let mut members = Vec::with_capacity(config.population_size);
        if let Some(network) = seed_model {
            members.push((network, 0.0));
        }
        while members.len() < config.population_size {
            members.push((NeuralNetwork::new_random(rng), 0.0));
        }
        Population { members, config }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fresh copies of every network, in member order.
    pub fn networks(&self) -> Vec<NeuralNetwork> {
        self.members.iter().map(|(network, _)| network.clone()).collect()
    }

    /// Writes batch fitness back onto the members by id.
    pub fn record(&mut self, results: &[AgentResult]) {
        for result in results {
            if let Some(member) = self.members.get_mut(result.id) {
                member.1 = result.fitness;
            }
        }
    }

    /// Sorts members so the fittest comes first.
    pub fn rank(&mut self) {
        self.members.sort_by(|a, b| b.1.total_cmp(&a.1));
    }

    /// Creates the next generation through selection, crossover, and mutation.
    ///
    /// Expects a ranked population. The fittest network survives unchanged.
    pub fn evolve<R: Rng>(&mut self, rng: &mut R) {
        let elite_count = self.config.elite_count().min(self.members.len());
        let elites: Vec<&NeuralNetwork> = self
            .members
            .iter()
            .take(elite_count)
            .map(|(network, _)| network)
            .collect();
        if elites.is_empty() {
            return;
        }

        let mut new_population = Vec::with_capacity(self.config.population_size);
        new_population.push((elites[0].clone(), 0.0));

        while new_population.len() < self.config.population_size {
            let parent1 = elites[rng.random_range(0..elites.len())];
            let parent2 = elites[rng.random_range(0..elites.len())];

            let mut child = NeuralNetwork::crossover(parent1, parent2, rng);
            child.mutate(
                rng,
                self.config.mutation_rate,
                self.config.mutation_strength,
                self.config.weight_clamp,
            );

            new_population.push((child, 0.0));
        }

        self.members = new_population;
    }
}

/// Drives generations of batches: hands out a game per generation and
/// breeds the next population from its results.
pub struct Trainer {
    game: GameConfig,
    evolution: EvolutionConfig,
    population: Population,
    rng: StdRng,
    output: Option<PathBuf>,
    champion: Option<(NeuralNetwork, f32)>,
    history: Vec<GenerationStats>,
    solved: bool,
}

impl Trainer {
    pub fn new(
        config: &Config,
        seed_model: Option<NeuralNetwork>,
        seed: Option<u64>,
        output: Option<PathBuf>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let population = Population::new(config.evolution.clone(), seed_model, &mut rng);

        Trainer {
            game: config.game.clone(),
            evolution: config.evolution.clone(),
            population,
            rng,
            output,
            champion: None,
            history: Vec::new(),
            solved: false,
        }
    }

    /// 1-based number of the generation about to be (or being) evaluated.
    pub fn generation(&self) -> usize {
        self.history.len() + 1
    }

    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    /// True once all generations ran or the fitness threshold was reached.
    pub fn is_done(&self) -> bool {
        self.solved || self.history.len() >= self.evolution.generations
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Best network seen so far with its fitness.
    pub fn champion(&self) -> Option<&(NeuralNetwork, f32)> {
        self.champion.as_ref()
    }

    /// A fresh batch with one bird per member of the current population.
    pub fn start_batch(&mut self) -> GameState<NeuralNetwork> {
        let timeline = StdRng::seed_from_u64(self.rng.random());
        GameState::new(self.game.clone(), self.population.networks(), timeline)
    }

    /// Reads fitness back from a finished or interrupted batch, saves the
    /// champion and breeds the next generation.
    pub fn finish_batch(
        &mut self,
        state: GameState<NeuralNetwork>,
    ) -> Result<GenerationStats, ModelError> {
        let score = state.score;
        let ticks = state.ticks;
        let results = state.into_results();

        self.population.record(&results);
        self.population.rank();

        let fitness: Vec<f32> = self.population.members.iter().map(|(_, f)| *f).collect();
        let best_fitness = fitness.first().copied().unwrap_or(0.0);
        let worst_fitness = fitness.last().copied().unwrap_or(0.0);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f32>() / fitness.len() as f32
        };

        let stats = GenerationStats {
            generation: self.generation(),
            best_fitness,
            mean_fitness,
            worst_fitness,
            score,
            ticks,
        };
        log::info!(
            "Generation {}: best {:.1}, mean {:.2}, worst {:.1}, score {}, ticks {}",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.worst_fitness,
            stats.score,
            stats.ticks
        );

        let improved = match &self.champion {
            Some((_, fitness)) => best_fitness > *fitness,
            None => true,
        };
        if improved {
            if let Some((network, _)) = self.population.members.first() {
                self.champion = Some((network.clone(), best_fitness));
                if let Some(path) = &self.output {
                    persistence::save_model(network, path)?;
                }
            }
        }

        if let Some(threshold) = self.evolution.fitness_threshold {
            if best_fitness >= threshold {
                log::info!(
                    "Fitness threshold {} reached in generation {}",
                    threshold,
                    stats.generation
                );
                self.solved = true;
            }
        }

        self.history.push(stats.clone());
        if !self.is_done() {
            self.population.evolve(&mut self.rng);
        }
        Ok(stats)
    }

    /// Runs every remaining generation without a window, each batch capped
    /// at the configured tick limit.
    pub fn run_headless(&mut self) -> Result<(), ModelError> {
        log::info!(
            "Starting headless training: {} generations, population {}",
            self.evolution.generations,
            self.population.len()
        );
        while !self.is_done() {
            let mut state = self.start_batch();
            if !state.run(self.evolution.max_ticks) {
                log::info!(
                    "Generation {} hit the {} tick cap with {} birds alive",
                    self.generation(),
                    self.evolution.max_ticks,
                    state.agents.len()
                );
            }
            self.finish_batch(state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.evolution.population_size = 10;
        config.evolution.generations = 3;
        config.evolution.max_ticks = 2_000;
        config
    }

    #[test]
    fn test_population_seeded_with_saved_model() {
        let mut rng = StdRng::seed_from_u64(1);
        let saved = NeuralNetwork::from_weights(&[0.25; 31]).unwrap();
        let population = Population::new(small_config().evolution, Some(saved.clone()), &mut rng);
        assert_eq!(population.len(), 10);
        assert_eq!(population.members[0].0, saved);
    }

    #[test]
    fn test_rank_puts_fittest_first() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut population = Population::new(small_config().evolution, None, &mut rng);
        let results: Vec<AgentResult> = (0..10)
            .map(|id| AgentResult {
                id,
                fitness: id as f32,
                ticks_survived: 1,
                cause: None,
            })
            .collect();
        population.record(&results);
        population.rank();
        assert_eq!(population.members[0].1, 9.0);
        assert_eq!(population.members[9].1, 0.0);
    }

    #[test]
    fn test_evolve_keeps_size_and_best() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut population = Population::new(small_config().evolution, None, &mut rng);
        population.members[4].1 = 10.0;
        let best = population.members[4].0.clone();
        population.rank();
        population.evolve(&mut rng);
        assert_eq!(population.len(), 10);
        assert_eq!(population.members[0].0, best);
        assert!(population.members.iter().all(|(_, f)| *f == 0.0));
    }

    #[test]
    fn test_headless_runs_every_generation() {
        let mut trainer = Trainer::new(&small_config(), None, Some(7), None);
        trainer.run_headless().unwrap();
        assert!(trainer.is_done());
        assert_eq!(trainer.history().len(), 3);
        assert_eq!(trainer.history()[2].generation, 3);
        assert!(trainer.champion().is_some());
        for stats in trainer.history() {
            assert!(stats.best_fitness >= stats.mean_fitness);
            assert!(stats.mean_fitness >= stats.worst_fitness);
        }
    }

    #[test]
    fn test_threshold_stops_training_early() {
        let mut config = small_config();
        config.evolution.generations = 10;
        config.evolution.fitness_threshold = Some(-1.0);
        let mut trainer = Trainer::new(&config, None, Some(9), None);
        trainer.run_headless().unwrap();
        assert_eq!(trainer.history().len(), 1);
    }
}
