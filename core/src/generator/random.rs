use rand::prelude::*;
use rand::rngs::StdRng;

use super::*;

/// Uniform layout generation: `mine_count` distinct cells sampled without replacement.
///
/// This is the only owner of randomness in the crate. Successive layouts continue one stream, so
/// a fixed seed reproduces the whole sequence of episodes.
#[derive(Clone, Debug)]
pub struct RandomLayoutGenerator {
    seed: u64,
    rng: StdRng,
}

impl RandomLayoutGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let seed = rand::rng().random();
            log::debug!("no seed given, drew {}", seed);
            seed
        });
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the stream, drawing a fresh seed when `None`.
    pub fn reseed(&mut self, seed: Option<u64>) {
        *self = Self::new(seed);
    }
}

impl Default for RandomLayoutGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(&mut self, config: &BoardConfig) -> Result<MineLayout> {
        check_layout_config(config)?;

        let width = config.width as usize;
        let total_cells = config.total_cells() as usize;
        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());

        // optimize for full boards
        if config.mine_count as usize == total_cells {
            log::debug!("minefield full, every cell is a mine");
            mine_mask.fill(true);
            return Ok(MineLayout::from_mine_mask(mine_mask));
        }

        let picks = rand::seq::index::sample(&mut self.rng, total_cells, config.mine_count as usize);
        for index in picks.iter() {
            mine_mask[[index % width, index / width]] = true;
        }

        Ok(MineLayout::from_mine_mask(mine_mask))
    }
}
