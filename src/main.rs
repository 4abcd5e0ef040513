use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flappy_evolution::app::{self, ReplayApp, TrainingApp};
use flappy_evolution::persistence::{self, DEFAULT_CHAMPION_PATH, DEFAULT_MODEL_PATH};
use flappy_evolution::replay;
use flappy_evolution::{Config, Trainer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flappy-evolution")]
#[command(version)]
#[command(about = "Flappy bird flown by evolved neural networks")]
struct Cli {
    /// Configuration file (JSON); defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Random seed for reproducible pipes and breeding
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve networks, saving the best one as it improves
    Train {
        /// Run without a window, as fast as possible
        #[arg(long)]
        headless: bool,

        /// Override the number of generations
        #[arg(long)]
        generations: Option<usize>,

        /// Override the population size
        #[arg(long)]
        population: Option<usize>,

        /// Where the best network is written
        #[arg(short, long, default_value = DEFAULT_CHAMPION_PATH)]
        output: PathBuf,

        /// Where Q writes the first live network during windowed training
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        save: PathBuf,

        /// Seed the first generation with a saved network
        #[arg(long)]
        resume: Option<PathBuf>,
    },

    /// Fly a saved network until it crashes
    Replay {
        /// Saved network file
        model: PathBuf,

        /// Run without a window and print the result
        #[arg(long)]
        headless: bool,
    },

    /// Write the default configuration to a file
    InitConfig {
        #[arg(short, long, default_value = "flappy.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Train {
            headless,
            generations,
            population,
            output,
            save,
            resume,
        } => {
            let mut config = config;
            if let Some(generations) = generations {
                config.evolution.generations = generations;
            }
            if let Some(population) = population {
                config.evolution.population_size = population;
            }
            config.validate()?;
            anyhow::ensure!(
                output != save,
                "--output and --save must name different files, both are {}",
                output.display()
            );
            train(config, headless, output, save, resume, cli.seed)
        }
        Commands::Replay { model, headless } => replay_model(config, &model, headless, cli.seed),
        Commands::InitConfig { output } => {
            Config::default().save(&output)?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn train(
    config: Config,
    headless: bool,
    output: PathBuf,
    save: PathBuf,
    resume: Option<PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let seed_model = match resume {
        Some(path) => Some(
            persistence::load_model(&path)
                .with_context(|| format!("failed to resume from {}", path.display()))?,
        ),
        None => None,
    };
    let mut trainer = Trainer::new(&config, seed_model, seed, Some(output.clone()));

    if headless {
        trainer.run_headless()?;
        if let Some((_, fitness)) = trainer.champion() {
            println!(
                "Best fitness {:.1} after {} generations, saved to {}",
                fitness,
                trainer.history().len(),
                output.display()
            );
        }
        return Ok(());
    }

    app::run_window(&config.game, "Flappy Bird - training", |ctx| {
        TrainingApp::new(ctx, trainer, &config.game, save)
    })
    .map_err(|e| anyhow::anyhow!("window error: {}", e))
}

fn replay_model(
    config: Config,
    path: &Path,
    headless: bool,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let network = persistence::load_model(path)
        .with_context(|| format!("failed to load model {}", path.display()))?;

    if headless {
        let report =
            replay::replay_headless(&config.game, network, seed, config.evolution.max_ticks);
        match report.cause {
            Some(cause) => println!(
                "Game Over! Final Score: {} ({:?} after {} ticks)",
                report.score, cause, report.ticks
            ),
            None => println!(
                "Stopped after {} ticks with the bird alive. Score: {}",
                report.ticks, report.score
            ),
        }
        return Ok(());
    }

    let state = replay::replay_state(&config.game, network, seed);
    app::run_window(&config.game, "Flappy Bird", |ctx| ReplayApp::new(ctx, state))
        .map_err(|e| anyhow::anyhow!("window error: {}", e))
}
