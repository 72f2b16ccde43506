use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Beginner,
    Hard,
    Expert,
}

impl Preset {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Hard, Self::Expert];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Beginner => "Minesweeper-v0",
            Self::Hard => "MinesweeperHard-v0",
            Self::Expert => "MinesweeperExpert-v0",
        }
    }

    pub const fn board_config(self) -> BoardConfig {
        match self {
            Self::Beginner => BoardConfig::new_unchecked(8, 8, 10),
            Self::Hard => BoardConfig::new_unchecked(16, 16, 40),
            Self::Expert => BoardConfig::new_unchecked(30, 16, 99),
        }
    }

    pub fn config(self) -> EnvConfig {
        let BoardConfig {
            width,
            height,
            mine_count,
        } = self.board_config();
        EnvConfig {
            width,
            height,
            mine_count,
            ..Default::default()
        }
    }
}

impl FromStr for Preset {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| GymError::InvalidConfiguration(format!("unknown environment id {s:?}")))
    }
}
