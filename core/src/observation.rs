use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Diagnostics returned alongside every step.
///
/// `mine_locations` reveals the whole layout and is meant for debugging and analysis, not as an
/// input to learning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub opened_cells: CellCount,
    pub steps: u32,
    pub unnecessary_steps: u32,
    pub game_over: bool,
    pub died_this_turn: bool,
    pub mine_locations: Array2<u8>,
    pub opened_cell: Coord2,
}

impl StepInfo {
    pub fn from_engine(engine: &BoardEngine, prev_is_lost: bool, opened_cell: Coord2) -> Self {
        let game_over = engine.is_lost();
        Self {
            opened_cells: engine.opened_cells(),
            steps: engine.steps(),
            unnecessary_steps: engine.unnecessary_steps(),
            game_over,
            died_this_turn: game_over && !prev_is_lost,
            mine_locations: engine.mine_layout().to_int_grid(),
            opened_cell,
        }
    }
}

impl BoardEngine {
    /// Player view of the board, indexed `[x, y]`: -1 unopened, -2 opened mine, otherwise the
    /// neighbor mine count. Rebuilt on every call.
    pub fn observation(&self) -> Array2<i8> {
        let (width, height) = self.size();
        Array2::from_shape_fn((usize::from(width), usize::from(height)), |(x, y)| {
            self.cell_view((x as Coord, y as Coord)).code()
        })
    }

    pub fn info(&self, prev_is_lost: bool, action: Action) -> Result<StepInfo> {
        let opened_cell = self.decode_action(action)?;
        Ok(StepInfo::from_engine(self, prev_is_lost, opened_cell))
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.action_mask()
            .into_iter()
            .enumerate()
            .filter_map(|(action, legal)| legal.then_some(action))
            .collect()
    }

    pub fn action_mask(&self) -> Vec<bool> {
        let width = self.width();
        (0..self.action_count())
            .map(|action| !self.is_open(decode_action(action, width)))
            .collect()
    }
}
