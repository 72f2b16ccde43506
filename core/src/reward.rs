use crate::*;

impl BoardEngine {
    pub fn is_lost(&self) -> bool {
        self.opened_mines() > 0
    }

    pub fn is_won(&self) -> bool {
        !self.is_lost() && self.opened_safe_cells() == self.mine_layout().safe_cell_count()
    }

    pub fn is_done(&self) -> bool {
        self.is_lost() || self.opened_safe_cells() == self.mine_layout().safe_cell_count()
    }

    /// Fraction of safe cells opened, less the waste penalty, floored at zero.
    ///
    /// The floor hides waste past the point where it cancels progress: at the default
    /// punishment, 100 clicks on open cells cancel one opened cell and further clicks cost nothing.
    pub fn progress(&self) -> f64 {
        let openable = f64::from(self.mine_layout().safe_cell_count());
        if openable == 0.0 {
            return 0.0;
        }
        let waste = f64::from(self.unnecessary_steps()) * self.options().punishment;
        ((f64::from(self.opened_safe_cells()) - waste) / openable).max(0.0)
    }

    /// Episode reward so far.
    ///
    /// Zero before anything is opened, 1 after a clean sweep, and negative as soon as a mine is
    /// open: each opened mine costs a full 1 while progress stays below 1 on a lost board.
    pub fn reward(&self) -> f64 {
        self.progress() - f64::from(self.opened_mines())
    }
}
