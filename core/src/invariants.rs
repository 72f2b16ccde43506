use ndarray::{Array2, Zip};

use crate::*;

/// State captured before a mutation, compared against the state after it.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSnapshot {
    open_mask: Array2<bool>,
    steps: u32,
    unnecessary_steps: u32,
}

impl BoardEngine {
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            open_mask: self.open_mask().clone(),
            steps: self.steps(),
            unnecessary_steps: self.unnecessary_steps(),
        }
    }

    /// Checks the reward/termination relationships, and monotonicity against `before` when given.
    ///
    /// A failure means the engine itself is broken; it is logged and returned as
    /// [`GymError::InvariantViolation`].
    pub fn check_invariants(&self, before: Option<&EngineSnapshot>) -> Result<()> {
        let result = self.find_violation(before).map_or(Ok(()), |violation| {
            Err(GymError::InvariantViolation(violation))
        });
        if let Err(err) = &result {
            log::error!("{}", err);
        }
        result
    }

    fn find_violation(&self, before: Option<&EngineSnapshot>) -> Option<String> {
        let reward = self.reward();
        let lost = self.is_lost();
        let opened = self.opened_cells();
        let counted_open = self.open_mask().iter().filter(|&&open| open).count() as CellCount;
        let counted_mines = Zip::from(self.open_mask())
            .and(self.mine_layout().mine_mask())
            .fold(0, |acc, &open, &mine| acc + CellCount::from(open && mine));

        if counted_open != opened {
            return Some(format!(
                "open counter {} disagrees with open mask {}",
                opened, counted_open
            ));
        }
        if counted_mines != self.opened_mines() {
            return Some(format!(
                "mine counter {} disagrees with open mask {}",
                self.opened_mines(),
                counted_mines
            ));
        }
        if self.opened_mines() > 1 {
            return Some(format!("{} mines open, at most 1 allowed", self.opened_mines()));
        }
        if !(-1.0..=1.0).contains(&reward) {
            return Some(format!("reward {} outside [-1, 1]", reward));
        }
        if (reward < 0.0) != lost {
            return Some(format!("reward {} but lost = {}", reward, lost));
        }
        if opened == 0 && reward != 0.0 {
            return Some(format!("nothing opened but reward is {}", reward));
        }
        if reward == 1.0 && !self.is_won() {
            return Some("full reward on a board that is not won".into());
        }
        if self.is_won() && self.unnecessary_steps() == 0 && reward != 1.0 {
            return Some(format!("clean sweep but reward is {}", reward));
        }
        if self.is_done() != (lost || self.is_won()) {
            return Some("done flag disagrees with win/loss".into());
        }

        if let Some(before) = before {
            if before.open_mask.dim() != self.open_mask().dim() {
                return Some("board shape changed within an episode".into());
            }
            let rehidden = Zip::from(&before.open_mask)
                .and(self.open_mask())
                .fold(false, |acc, &was_open, &is_open| acc || (was_open && !is_open));
            if rehidden {
                return Some("an open cell was hidden again".into());
            }
            if self.steps() < before.steps || self.unnecessary_steps() < before.unnecessary_steps {
                return Some("step counters went backwards".into());
            }
        }

        None
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
    fn holds_through_a_game() {
        let mut engine = engine((4, 4), &[(3, 3), (0, 3)]);
        assert_eq!(engine.check_invariants(None), Ok(()));

        for coords in [(3, 0), (3, 0), (0, 0), (3, 3)] {
            let before = engine.snapshot();
            engine.record_step();
            engine.open_cell(coords).unwrap();
            assert_eq!(engine.check_invariants(Some(&before)), Ok(()));
        }
        assert!(engine.is_lost());
    }

    #[test]
    fn detects_rehidden_cell() {
        let mut engine = engine((3, 2), &[(1, 1)]);
        engine.open_cell((0, 0)).unwrap();
        let before = engine.snapshot();

        let fresh = self::engine((3, 2), &[(1, 1)]);

        assert!(matches!(
            fresh.check_invariants(Some(&before)),
            Err(GymError::InvariantViolation(_))
        ));
    }

    #[test]
    fn detects_second_open_mine() {
        let mut engine = engine((3, 1), &[(0, 0), (2, 0)]);
        engine.open_cell((0, 0)).unwrap();
        engine.open_cell((2, 0)).unwrap();

        assert!(matches!(
            engine.check_invariants(None),
            Err(GymError::InvariantViolation(_))
        ));
    }
}
