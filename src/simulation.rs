use crate::bird::Bird;
use crate::brain::{Brain, Sensors};
use crate::collision::{self, Termination};
use crate::config::GameConfig;
use crate::pipe::Pipe;
use rand::rngs::StdRng;

/// Fitness awarded to every live bird when a pipe is recycled.
pub const PIPE_REWARD: f32 = 5.0;
/// Fitness removed from a bird when its attempt ends.
pub const TERMINATION_PENALTY: f32 = 1.0;

/// A bird paired with the brain flying it and its running fitness.
pub struct Agent<B> {
    /// Index of the brain in the caller's population.
    pub id: usize,
    pub bird: Bird,
    pub brain: B,
    pub fitness: f32,
}

/// Final record of one agent, read back by the trainer.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub id: usize,
    pub fitness: f32,
    pub ticks_survived: u64,
    /// `None` when the run stopped with the bird still alive.
    pub cause: Option<Termination>,
}

/// What happened during a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub pipes_passed: u32,
    pub terminated: Vec<(usize, Termination)>,
}

/// One shared pipe timeline flown by a batch of birds in lockstep.
///
/// A replay is simply a batch of one.
pub struct GameState<B> {
    pub config: GameConfig,
    pub pipes: Vec<Pipe>,
    pub agents: Vec<Agent<B>>,
    pub finished: Vec<AgentResult>,
    pub score: u32,
    pub ticks: u64,
    rng: StdRng,
}

impl<B: Brain> GameState<B> {
    /// Starts a batch: one bird per brain, ids in iteration order.
    pub fn new<I>(config: GameConfig, brains: I, mut rng: StdRng) -> Self
    where
        I: IntoIterator<Item = B>,
    {
        let agents = brains
            .into_iter()
            .enumerate()
            .map(|(id, brain)| Agent {
                id,
                bird: Bird::spawn(&config),
                brain,
                fitness: 0.0,
            })
            .collect();
        let pipes = vec![Pipe::new(Pipe::spawn_x(&config), &config, &mut rng)];

        GameState {
            config,
            pipes,
            agents,
            finished: Vec::new(),
            score: 0,
            ticks: 0,
            rng,
        }
    }

    /// A batch of one, as used for replaying a saved brain.
    pub fn single(config: GameConfig, brain: B, rng: StdRng) -> Self {
        GameState::new(config, std::iter::once(brain), rng)
    }

    /// True once every bird has been removed.
    pub fn is_over(&self) -> bool {
        self.agents.is_empty()
    }

    /// First live agent, whose brain is the one saved on request.
    pub fn leader(&self) -> Option<&Agent<B>> {
        self.agents.first()
    }

    /// Advances the world by one tick.
    ///
    /// Pipes move and recycle first, then every bird senses the first pipe,
    /// decides, moves, and is checked against the screen and every pipe.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        self.ticks += 1;

        for pipe in &mut self.pipes {
            pipe.update(self.config.pipe_speed);
        }
        let (passed, kept): (Vec<Pipe>, Vec<Pipe>) = std::mem::take(&mut self.pipes)
            .into_iter()
            .partition(Pipe::is_off_screen);
        self.pipes = kept;
        for _ in &passed {
            let pipe = Pipe::new(Pipe::spawn_x(&self.config), &self.config, &mut self.rng);
            self.pipes.push(pipe);
            self.score += 1;
            for agent in &mut self.agents {
                agent.fitness += PIPE_REWARD;
            }
        }
        outcome.pipes_passed = passed.len() as u32;

        for agent in &mut self.agents {
            if let Some(pipe) = self.pipes.first() {
                let sensors = Sensors::read(&agent.bird, pipe, self.config.screen_height);
                if agent.brain.wants_jump(&sensors) {
                    agent.bird.jump(self.config.jump_strength);
                }
            }
            agent.bird.update(self.config.gravity);
        }

        let mut survivors = Vec::with_capacity(self.agents.len());
        for mut agent in std::mem::take(&mut self.agents) {
            match collision::check(&agent.bird, &self.pipes, self.config.screen_height) {
                Some(cause) => {
                    agent.fitness -= TERMINATION_PENALTY;
                    log::debug!(
                        "Bird {} terminated by {:?} at tick {} with fitness {:.1}",
                        agent.id,
                        cause,
                        self.ticks,
                        agent.fitness
                    );
                    outcome.terminated.push((agent.id, cause));
                    self.finished.push(AgentResult {
                        id: agent.id,
                        fitness: agent.fitness,
                        ticks_survived: self.ticks,
                        cause: Some(cause),
                    });
                }
                None => survivors.push(agent),
            }
        }
        self.agents = survivors;

        outcome
    }

    /// Ticks until every bird is gone or `max_ticks` have elapsed in total.
    /// Returns true if the batch ended on its own.
    pub fn run(&mut self, max_ticks: u64) -> bool {
        while !self.is_over() && self.ticks < max_ticks {
            self.tick();
        }
        self.is_over()
    }

    /// Ends the batch, returning every agent's result ordered by id.
    /// Birds still alive keep their fitness without a penalty.
    pub fn into_results(self) -> Vec<AgentResult> {
        let ticks = self.ticks;
        let mut results = self.finished;
        results.extend(self.agents.into_iter().map(|agent| AgentResult {
            id: agent.id,
            fitness: agent.fitness,
            ticks_survived: ticks,
            cause: None,
        }));
        results.sort_by_key(|result| result.id);
        results
    }
}
