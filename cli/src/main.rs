use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use minegym_core::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;

/// Plays Minesweeper episodes in the terminal with a random legal-move driver.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Start from a registered environment id, e.g. Minesweeper-v0
    #[arg(long)]
    env_id: Option<Preset>,

    /// JSON file with environment settings, applied before the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Seed for mine layouts instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Only open the clicked cell, never cascade
    #[arg(long)]
    no_flood_fill: bool,

    /// Reward deducted per click on an already open cell
    #[arg(long)]
    punishment: Option<f64>,

    /// Check engine invariants after every step
    #[arg(long)]
    debug_invariants: bool,

    #[arg(short, long, default_value_t = 1)]
    episodes: u32,

    /// Give up on an episode after this many steps
    #[arg(long, default_value_t = 10_000)]
    max_steps: u32,

    /// Seed for the driver's move choice
    #[arg(long)]
    agent_seed: Option<u64>,

    /// Render the board after every step: ansi, rgb_array or human
    #[arg(short, long)]
    render: Option<RenderMode>,

    /// Print one JSON record per step
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StepRecord<'a> {
    episode: u32,
    action: Action,
    reward: f64,
    done: bool,
    info: &'a StepInfo,
}

#[derive(Debug, Default)]
struct Summary {
    episodes: u32,
    wins: u32,
    losses: u32,
    total_reward: f64,
    total_steps: u64,
}

impl Summary {
    fn record(&mut self, board: &BoardEngine) {
        self.episodes += 1;
        if board.is_won() {
            self.wins += 1;
        } else if board.is_lost() {
            self.losses += 1;
        }
        self.total_reward += board.reward();
        self.total_steps += u64::from(board.steps());
    }

    fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.episodes)
        }
    }

    fn mean_steps(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / f64::from(self.episodes)
        }
    }
}

fn build_config(args: &Args) -> Result<EnvConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EnvConfig::from_json(&json)?
        }
        None => args.env_id.map(Preset::config).unwrap_or_default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(mines) = args.mines {
        config.mine_count = mines;
    }
    if let Some(punishment) = args.punishment {
        config.punishment = punishment;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_flood_fill {
        config.flood_fill = false;
    }
    if args.debug_invariants {
        config.debug_invariants = true;
    }

    config.validate()?;
    Ok(config)
}

fn frame_text(env: &MinesweeperEnv, mode: RenderMode) -> Result<String> {
    let mode = if mode == RenderMode::Human {
        log::warn!("no window frontend in the terminal, rendering as ansi");
        RenderMode::Ansi
    } else {
        mode
    };
    Ok(match env.render(mode)? {
        // ansi frames already end every row with a newline
        Frame::Text(text) => text,
        Frame::Rgb(pixels) => format!("rgb frame {:?}\n", pixels.dim()),
    })
}

fn print_frame(env: &MinesweeperEnv, mode: RenderMode) -> Result<()> {
    print!("{}", frame_text(env, mode)?);
    Ok(())
}

fn play_episode(
    env: &mut MinesweeperEnv,
    rng: &mut StdRng,
    args: &Args,
    episode: u32,
) -> Result<()> {
    env.reset()?;
    if let Some(mode) = args.render {
        print_frame(env, mode)?;
    }

    for _ in 0..args.max_steps {
        let legal = env.legal_actions()?;
        let Some(&action) = legal.choose(rng) else {
            break;
        };
        let step = env.step(action)?;

        if args.json {
            let record = StepRecord {
                episode,
                action,
                reward: step.reward,
                done: step.done,
                info: &step.info,
            };
            println!("{}", serde_json::to_string(&record)?);
        }
        if let Some(mode) = args.render {
            print_frame(env, mode)?;
        }
        if step.done {
            return Ok(());
        }
    }

    log::warn!("episode {} stopped after {} steps", episode, args.max_steps);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = build_config(&args)?;
    let mut env = MinesweeperEnv::new(config)?;
    log::info!("layout seed: {}", env.seed());

    let mut rng = match args.agent_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut summary = Summary::default();
    for episode in 0..args.episodes {
        play_episode(&mut env, &mut rng, &args, episode)?;
        let board = env.board().context("episode did not start")?;
        log::debug!(
            "episode {}: reward {:.3} after {} steps",
            episode,
            board.reward(),
            board.steps()
        );
        summary.record(board);
    }

    println!(
        "episodes: {}  wins: {}  losses: {}  mean reward: {:.3}  mean steps: {:.1}",
        summary.episodes,
        summary.wins,
        summary.losses,
        summary.mean_reward(),
        summary.mean_steps()
    );
    Ok(())
}
