use std::collections::VecDeque;
use std::num::Saturating;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub flood_fill: bool,
    /// Reward deducted per click on an already open cell, as a fraction of one safe cell.
    pub punishment: f64,
}

impl EngineOptions {
    pub const DEFAULT_PUNISHMENT: f64 = 0.01;
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            flood_fill: true,
            punishment: Self::DEFAULT_PUNISHMENT,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    AlreadyOpen,
    /// Safe cell opened, with the number of cells revealed including the flood.
    Revealed(CellCount),
    HitMine,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    mine_layout: MineLayout,
    open_mask: Array2<bool>,
    options: EngineOptions,
    opened_count: Saturating<CellCount>,
    opened_mines: Saturating<CellCount>,
    steps: Saturating<u32>,
    unnecessary_steps: Saturating<u32>,
}

impl BoardEngine {
    pub fn new(mine_layout: MineLayout, options: EngineOptions) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            open_mask: Array2::default(size.to_nd_index()),
            options,
            opened_count: Saturating(0),
            opened_mines: Saturating(0),
            steps: Saturating(0),
            unnecessary_steps: Saturating(0),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn board_config(&self) -> BoardConfig {
        self.mine_layout.board_config()
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn open_mask(&self) -> &Array2<bool> {
        &self.open_mask
    }

    pub fn action_count(&self) -> usize {
        self.mine_layout.total_cells() as usize
    }

    pub fn is_open(&self, coords: Coord2) -> bool {
        self.open_mask[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn neighbor_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_layout.adjacent_mine_count(coords)
    }

    pub fn opened_cells(&self) -> CellCount {
        self.opened_count.0
    }

    pub fn opened_mines(&self) -> CellCount {
        self.opened_mines.0
    }

    pub fn opened_safe_cells(&self) -> CellCount {
        self.opened_count.0 - self.opened_mines.0
    }

    pub fn steps(&self) -> u32 {
        self.steps.0
    }

    pub fn unnecessary_steps(&self) -> u32 {
        self.unnecessary_steps.0
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        if !self.is_open(coords) {
            CellView::Hidden
        } else if self.has_mine_at(coords) {
            CellView::Mine
        } else {
            CellView::Count(self.neighbor_mine_count(coords))
        }
    }

    pub fn decode_action(&self, action: Action) -> Result<Coord2> {
        let action_count = self.action_count();
        if action >= action_count {
            return Err(GymError::InvalidAction {
                action,
                action_count,
            });
        }
        Ok(decode_action(action, self.width()))
    }

    pub(crate) fn record_step(&mut self) {
        self.steps += 1;
    }

    /// Opens `coords`, cascading through zero-count regions when flood fill is enabled.
    ///
    /// Opening a mine is a legal move; it is reported as [`OpenOutcome::HitMine`] and
    /// detected as a loss by [`BoardEngine::is_lost`].
    pub fn open_cell(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if self.is_open(coords) {
            self.unnecessary_steps += 1;
            return Ok(OpenOutcome::AlreadyOpen);
        }

        self.mark_open(coords);
        if self.has_mine_at(coords) {
            return Ok(OpenOutcome::HitMine);
        }

        let mut revealed: CellCount = 1;
        if self.options.flood_fill && self.neighbor_mine_count(coords) == 0 {
            let mut to_visit: VecDeque<_> = self
                .mine_layout
                .iter_neighbors(coords)
                .filter(|&pos| !self.is_open(pos))
                .collect();

            // the open mask doubles as the visited set
            while let Some(visit_coords) = to_visit.pop_front() {
                if self.is_open(visit_coords) {
                    continue;
                }

                self.mark_open(visit_coords);
                revealed += 1;

                if self.neighbor_mine_count(visit_coords) == 0 {
                    to_visit.extend(
                        self.mine_layout
                            .iter_neighbors(visit_coords)
                            .filter(|&pos| !self.is_open(pos)),
                    );
                }
            }
            log::trace!("flood fill from {:?} opened {} cells", coords, revealed);
        }

        Ok(OpenOutcome::Revealed(revealed))
    }

    fn mark_open(&mut self, coords: Coord2) {
        self.open_mask[coords.to_nd_index()] = true;
        self.opened_count += 1;
        if self.has_mine_at(coords) {
            self.opened_mines += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> BoardEngine {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        BoardEngine::new(layout, EngineOptions::default())
    }

    #[test]
    fn open_nonzero_cell_reveals_only_itself() {
        let mut engine = engine((3, 2), &[(1, 1)]);

        assert_eq!(engine.open_cell((1, 0)).unwrap(), OpenOutcome::Revealed(1));
        assert_eq!(engine.opened_cells(), 1);
        assert_eq!(engine.cell_view((1, 0)), CellView::Count(1));
        assert_eq!(engine.cell_view((0, 0)), CellView::Hidden);
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        let mut engine = engine((4, 4), &[(3, 3)]);

        let outcome = engine.open_cell((0, 0)).unwrap();

        assert_eq!(outcome, OpenOutcome::Revealed(15));
        assert_eq!(engine.cell_view((0, 0)), CellView::Count(0));
        assert_eq!(engine.cell_view((2, 2)), CellView::Count(1));
        assert_eq!(engine.cell_view((3, 3)), CellView::Hidden);
        assert_eq!(engine.opened_mines(), 0);
    }

    #[test]
    fn flood_fill_stops_at_nonzero_border() {
        // column of mines at x = 2 splits the board
        let mut engine = engine((5, 3), &[(2, 0), (2, 1), (2, 2)]);

        engine.open_cell((0, 1)).unwrap();

        for y in 0..3 {
            assert!(engine.is_open((0, y)));
            assert!(engine.is_open((1, y)));
            assert!(!engine.is_open((2, y)));
            assert!(!engine.is_open((3, y)));
            assert!(!engine.is_open((4, y)));
        }
    }

    #[test]
    fn flood_fill_disabled_opens_single_cell() {
        let layout = MineLayout::from_mine_coords((4, 4), &[(3, 3)]).unwrap();
        let options = EngineOptions {
            flood_fill: false,
            ..Default::default()
        };
        let mut engine = BoardEngine::new(layout, options);

        assert_eq!(engine.open_cell((0, 0)).unwrap(), OpenOutcome::Revealed(1));
        assert_eq!(engine.opened_cells(), 1);
    }

    #[test]
    fn reopening_counts_unnecessary_step_only() {
        let mut engine = engine((3, 2), &[(1, 1)]);
        engine.open_cell((0, 0)).unwrap();
        let mask_before = engine.open_mask().clone();

        assert_eq!(engine.open_cell((0, 0)).unwrap(), OpenOutcome::AlreadyOpen);

        assert_eq!(engine.open_mask(), &mask_before);
        assert_eq!(engine.unnecessary_steps(), 1);
        assert_eq!(engine.opened_cells(), 1);
    }

    #[test]
    fn opening_mine_is_legal() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(engine.open_cell((0, 0)).unwrap(), OpenOutcome::HitMine);
        assert_eq!(engine.opened_mines(), 1);
        assert_eq!(engine.cell_view((0, 0)), CellView::Mine);
    }

    #[test]
    fn open_cell_rejects_out_of_bounds() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        assert_eq!(engine.open_cell((2, 0)), Err(GymError::InvalidCoords));
    }

    #[test]
    fn decode_action_rejects_out_of_range() {
        let engine = engine((3, 2), &[(1, 1)]);

        assert_eq!(engine.decode_action(5).unwrap(), (2, 1));
        assert_eq!(
            engine.decode_action(6),
            Err(GymError::InvalidAction {
                action: 6,
                action_count: 6
            })
        );
    }
}
