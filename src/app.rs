//! Windowed front ends: fixed-rate ggez loops around the game state.

use crate::config::GameConfig;
use crate::evolution::Trainer;
use crate::neural_network::NeuralNetwork;
use crate::persistence;
use crate::render::{self, RenderContext};
use crate::simulation::GameState;
use ggez::conf::{WindowMode, WindowSetup};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{event, Context, ContextBuilder, GameError, GameResult};
use std::path::PathBuf;

/// Opens a window sized to the screen config and hands it to the app built
/// by `build`. Only returns on failure to create the window.
pub fn run_window<S, F>(config: &GameConfig, title: &str, build: F) -> GameResult
where
    S: event::EventHandler<GameError> + 'static,
    F: FnOnce(&mut Context) -> GameResult<S>,
{
    let (mut ctx, event_loop) = ContextBuilder::new("flappy_evolution", "flappy-evolution")
        .window_setup(WindowSetup::default().title(title))
        .add_resource_path(render::ASSET_DIR)
        .window_mode(
            WindowMode::default().dimensions(config.screen_width, config.screen_height),
        )
        .build()?;

    let state = build(&mut ctx)?;

    event::run(ctx, event_loop, state)
}

/// Trains a population on screen, one generation per batch.
pub struct TrainingApp {
    trainer: Trainer,
    // Taken out while a finished batch is handed back to the trainer.
    state: Option<GameState<NeuralNetwork>>,
    render: RenderContext,
    fps: u32,
    save_path: PathBuf,
    running: bool,
}

impl TrainingApp {
    pub fn new(
        ctx: &mut Context,
        mut trainer: Trainer,
        config: &GameConfig,
        save_path: PathBuf,
    ) -> GameResult<Self> {
        let state = trainer.start_batch();
        Ok(TrainingApp {
            trainer,
            state: Some(state),
            render: RenderContext::new(ctx, config)?,
            fps: config.fps,
            save_path,
            running: true,
        })
    }

    fn next_generation(&mut self, ctx: &mut Context) -> GameResult {
        if let Some(state) = self.state.take() {
            self.trainer
                .finish_batch(state)
                .map_err(|e| GameError::CustomError(e.to_string()))?;
        }
        self.running = true;

        if self.trainer.is_done() {
            if let Some((_, fitness)) = self.trainer.champion() {
                log::info!("Training finished, best fitness {:.1}", fitness);
            }
            ctx.request_quit();
        } else {
            self.state = Some(self.trainer.start_batch());
        }
        Ok(())
    }
}

impl event::EventHandler for TrainingApp {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        while ctx.time.check_update_time(self.fps) {
            let Some(state) = self.state.as_mut() else {
                return Ok(());
            };
            if self.running {
                state.tick();
            }
            if !self.running || state.is_over() {
                self.next_generation(ctx)?;
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = self.render.begin_frame(ctx);

        if let Some(state) = &self.state {
            self.render.draw_world(&mut canvas, state);
            self.render.draw_hud(
                &mut canvas,
                format!(
                    "Score: {}\nGeneration: {}\nAlive: {}/{}",
                    state.score,
                    self.trainer.generation(),
                    state.agents.len(),
                    self.trainer.population_size()
                ),
            );
        }

        canvas.finish(ctx)
    }

    fn key_down_event(
        &mut self,
        ctx: &mut Context,
        input: KeyInput,
        _repeated: bool,
    ) -> GameResult {
        match input.keycode {
            Some(KeyCode::Q) => {
                // Save the first live network and end this generation's batch.
                if let Some(state) = &self.state {
                    persistence::save_leader(state, &self.save_path)
                        .map_err(|e| GameError::CustomError(e.to_string()))?;
                }
                self.running = false;
            }
            Some(KeyCode::Escape) => ctx.request_quit(),
            _ => {}
        }
        Ok(())
    }
}

/// Flies one saved network until it crashes, then reports the score.
pub struct ReplayApp {
    state: GameState<NeuralNetwork>,
    render: RenderContext,
    fps: u32,
}

impl ReplayApp {
    pub fn new(ctx: &mut Context, state: GameState<NeuralNetwork>) -> GameResult<Self> {
        let render = RenderContext::new(ctx, &state.config)?;
        let fps = state.config.fps;
        Ok(ReplayApp { state, render, fps })
    }
}

impl event::EventHandler for ReplayApp {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        while ctx.time.check_update_time(self.fps) {
            if self.state.is_over() {
                break;
            }
            self.state.tick();
            if self.state.is_over() {
                println!("Game Over! Final Score: {}", self.state.score);
                ctx.request_quit();
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = self.render.begin_frame(ctx);
        self.render.draw_world(&mut canvas, &self.state);
        let hud = format!("Score: {}", self.state.score);
        self.render.draw_hud(&mut canvas, hud);
        canvas.finish(ctx)
    }
}
