use serde::{Deserialize, Serialize};

/// Player-visible state of one cell, the typed form of an observation value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Mine,
    Count(u8),
}

impl CellView {
    pub const HIDDEN_CODE: i8 = -1;
    pub const MINE_CODE: i8 = -2;

    /// Numeric observation value: -1 hidden, -2 opened mine, 0..=8 neighbor count.
    pub const fn code(self) -> i8 {
        match self {
            Self::Hidden => Self::HIDDEN_CODE,
            Self::Mine => Self::MINE_CODE,
            Self::Count(count) => count as i8,
        }
    }

    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            Self::HIDDEN_CODE => Some(Self::Hidden),
            Self::MINE_CODE => Some(Self::Mine),
            0..=8 => Some(Self::Count(code as u8)),
            _ => None,
        }
    }

    pub const fn ansi_char(self) -> char {
        match self {
            Self::Hidden => 'x',
            Self::Mine => 'B',
            Self::Count(0) => '.',
            Self::Count(count) => (b'0' + count) as char,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
