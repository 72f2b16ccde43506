use crate::*;
pub use random::*;

mod random;

/// Source of mine layouts for new episodes.
pub trait MineLayoutGenerator {
    fn generate(&mut self, config: &BoardConfig) -> Result<MineLayout>;
}

/// Places `mine_count` mines on a `width`x`height` board.
///
/// With a seed the layout is fully determined by `(width, height, mine_count, seed)`; without
/// one the layout is drawn from an OS-seeded source.
pub fn generate_mines(
    width: Coord,
    height: Coord,
    mine_count: CellCount,
    seed: Option<u64>,
) -> Result<MineLayout> {
    let config = BoardConfig::new_unchecked(width, height, mine_count);
    RandomLayoutGenerator::new(seed).generate(&config)
}

pub(crate) fn check_layout_config(config: &BoardConfig) -> Result<()> {
    if config.width == 0 || config.height == 0 {
        return Err(GymError::InvalidConfiguration(format!(
            "cannot place mines on a {}x{} board",
            config.width, config.height
        )));
    }
    if config.mine_count > config.total_cells() {
        return Err(GymError::InvalidConfiguration(format!(
            "requested {} mines but only {} cells fit",
            config.mine_count,
            config.total_cells()
        )));
    }
    Ok(())
}

/// Replays the same layout on every episode.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator {
    layout: MineLayout,
}

impl FixedLayoutGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }
}

impl MineLayoutGenerator for FixedLayoutGenerator {
    fn generate(&mut self, config: &BoardConfig) -> Result<MineLayout> {
        let actual = self.layout.board_config();
        if actual != *config {
            return Err(GymError::InvalidConfiguration(format!(
                "fixed layout is {}x{} with {} mines, board expects {}x{} with {}",
                actual.width,
                actual.height,
                actual.mine_count,
                config.width,
                config.height,
                config.mine_count
            )));
        }
        Ok(self.layout.clone())
    }
}
