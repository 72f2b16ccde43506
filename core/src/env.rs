use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
    pub flood_fill: bool,
    pub punishment: f64,
    pub seed: Option<u64>,
    pub debug_invariants: bool,
    pub cell_pixels: u16,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            mine_count: 10,
            flood_fill: true,
            punishment: EngineOptions::DEFAULT_PUNISHMENT,
            seed: None,
            debug_invariants: cfg!(debug_assertions),
            cell_pixels: 16,
        }
    }
}

impl EnvConfig {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.width, self.height, self.mine_count)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            flood_fill: self.flood_fill,
            punishment: self.punishment,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.board_config().validate()?;
        if !self.punishment.is_finite() || self.punishment < 0.0 {
            return Err(GymError::InvalidConfiguration(format!(
                "punishment must be a non-negative number, got {}",
                self.punishment
            )));
        }
        if self.cell_pixels == 0 {
            return Err(GymError::InvalidConfiguration(
                "cell_pixels must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| GymError::InvalidConfiguration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeState {
    Uninitialized,
    Ready,
    Terminal,
}

impl Default for EpisodeState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Array2<i8>,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Minesweeper behind a reset/step/render loop.
///
/// Actions are flat cell indices decoded as `(action % width, action / width)`.
#[derive(Clone, Debug)]
pub struct MinesweeperEnv<G = RandomLayoutGenerator> {
    config: EnvConfig,
    generator: G,
    board: Option<BoardEngine>,
}

impl MinesweeperEnv<RandomLayoutGenerator> {
    pub fn new(config: EnvConfig) -> Result<Self> {
        let generator = RandomLayoutGenerator::new(config.seed);
        Self::with_generator(config, generator)
    }

    pub fn from_preset(preset: Preset) -> Result<Self> {
        Self::new(preset.config())
    }

    /// Seed of the layout stream, the configured one or the one drawn for an unseeded run.
    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn reseed(&mut self, seed: Option<u64>) {
        self.generator.reseed(seed);
        self.config.seed = seed;
    }
}

impl<G: MineLayoutGenerator> MinesweeperEnv<G> {
    pub fn with_generator(config: EnvConfig, generator: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            board: None,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn action_count(&self) -> usize {
        self.config.board_config().total_cells() as usize
    }

    pub fn board(&self) -> Option<&BoardEngine> {
        self.board.as_ref()
    }

    pub fn state(&self) -> EpisodeState {
        match &self.board {
            None => EpisodeState::Uninitialized,
            Some(board) if board.is_done() => EpisodeState::Terminal,
            Some(_) => EpisodeState::Ready,
        }
    }

    pub fn reset(&mut self) -> Result<Array2<i8>> {
        let layout = self.generator.generate(&self.config.board_config())?;
        let board = BoardEngine::new(layout, self.config.engine_options());
        if self.config.debug_invariants {
            board.check_invariants(None)?;
        }
        log::debug!(
            "reset {}x{} board with {} mines",
            self.config.width,
            self.config.height,
            self.config.mine_count
        );

        let observation = board.observation();
        self.board = Some(board);
        Ok(observation)
    }

    pub fn step(&mut self, action: Action) -> Result<Step> {
        let debug_invariants = self.config.debug_invariants;
        let board = self.board.as_mut().ok_or(GymError::NotReset)?;
        let coords = board.decode_action(action)?;
        let prev_is_lost = board.is_lost();
        let was_done = board.is_done();

        if was_done {
            log::warn!("step {} on a finished episode, reset to play again", action);
            board.record_step();
        } else {
            let before = debug_invariants.then(|| board.snapshot());
            board.record_step();
            let outcome = board.open_cell(coords)?;
            log::trace!("action {} at {:?}: {:?}", action, coords, outcome);
            if let Some(before) = before {
                board.check_invariants(Some(&before))?;
            }
        }

        let done = board.is_done();
        if done && !was_done {
            if board.is_lost() {
                log::debug!("hit a mine at {:?} after {} steps", coords, board.steps());
            } else {
                log::debug!("board cleared after {} steps", board.steps());
            }
        }

        Ok(Step {
            observation: board.observation(),
            reward: board.reward(),
            done,
            info: StepInfo::from_engine(board, prev_is_lost, coords),
        })
    }

    pub fn legal_actions(&self) -> Result<Vec<Action>> {
        Ok(self.current_board()?.legal_actions())
    }

    pub fn observation(&self) -> Result<Array2<i8>> {
        Ok(self.current_board()?.observation())
    }

    pub fn render(&self, mode: RenderMode) -> Result<Frame> {
        let board = self.current_board()?;
        Ok(match mode {
            RenderMode::Ansi => Frame::Text(board.render_ansi()),
            RenderMode::RgbArray | RenderMode::Human => {
                Frame::Rgb(board.render_rgb(self.config.cell_pixels))
            }
        })
    }

    /// Translates a click on an RGB frame into a step; `None` when it lands outside the board.
    pub fn click(&mut self, px: u32, py: u32) -> Result<Option<Step>> {
        let action = self
            .current_board()?
            .action_at_pixel(px, py, self.config.cell_pixels);
        action.map(|action| self.step(action)).transpose()
    }

    fn current_board(&self) -> Result<&BoardEngine> {
        self.board.as_ref().ok_or(GymError::NotReset)
    }
}
