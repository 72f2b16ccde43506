use std::fmt::{self, Display};
use std::str::FromStr;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Live window, driven by an external frontend from the RGB frame.
    Human,
    Ansi,
    RgbArray,
}

impl RenderMode {
    pub const ALL: [Self; 3] = [Self::Human, Self::Ansi, Self::RgbArray];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ansi => "ansi",
            Self::RgbArray => "rgb_array",
        }
    }
}

impl Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderMode {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                let err = GymError::UnsupportedRenderMode { mode: s.into() };
                log::warn!("{}", err);
                err
            })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Text(String),
    Rgb(Array3<u8>),
}

impl Frame {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Rgb(_) => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&Array3<u8>> {
        match self {
            Self::Text(_) => None,
            Self::Rgb(pixels) => Some(pixels),
        }
    }
}

pub type Rgb = [u8; 3];

pub const MAGENTA: Rgb = [255, 0, 255];
pub const GRAY: Rgb = [128, 128, 128];
pub const WHITE: Rgb = [255, 255, 255];
pub const BLUE: Rgb = [0, 0, 255];
pub const GREEN: Rgb = [0, 128, 0];
pub const RED: Rgb = [255, 0, 0];
pub const NAVY: Rgb = [0, 0, 128];
pub const MAROON: Rgb = [128, 0, 0];
pub const TEAL: Rgb = [0, 128, 128];
pub const YELLOW: Rgb = [255, 255, 0];

pub const fn cell_color(cell: CellView) -> Rgb {
    match cell {
        CellView::Mine => MAGENTA,
        CellView::Hidden => GRAY,
        CellView::Count(0) => WHITE,
        CellView::Count(1) => BLUE,
        CellView::Count(2) => GREEN,
        CellView::Count(3) => RED,
        CellView::Count(4) => NAVY,
        CellView::Count(5) => MAROON,
        CellView::Count(6) => TEAL,
        CellView::Count(7) => YELLOW,
        CellView::Count(_) => MAGENTA,
    }
}

impl BoardEngine {
    /// One line per row `y`, one character per column `x`, each line terminated by `\n`.
    pub fn render_ansi(&self) -> String {
        let (width, height) = self.size();
        let mut out = String::with_capacity((usize::from(width) + 1) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                out.push(self.cell_view((x, y)).ansi_char());
            }
            out.push('\n');
        }
        out
    }

    /// Each cell becomes a `cell_pixels` square block; image rows follow `y`, columns follow `x`.
    pub fn render_rgb(&self, cell_pixels: u16) -> Array3<u8> {
        let (width, height) = self.size();
        let px = usize::from(cell_pixels.max(1));
        Array3::from_shape_fn(
            (usize::from(height) * px, usize::from(width) * px, 3),
            |(row, col, channel)| {
                let coords = ((col / px) as Coord, (row / px) as Coord);
                cell_color(self.cell_view(coords))[channel]
            },
        )
    }

    /// Maps a pixel of [`render_rgb`](Self::render_rgb) back to the action that opens its cell.
    pub fn action_at_pixel(&self, px: u32, py: u32, cell_pixels: u16) -> Option<Action> {
        let (width, height) = self.size();
        let cell_pixels = u32::from(cell_pixels.max(1));
        let x = px / cell_pixels;
        let y = py / cell_pixels;
        if x >= u32::from(width) || y >= u32::from(height) {
            return None;
        }
        Some(encode_action((x as Coord, y as Coord), width))
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
    fn ansi_rows_follow_y() {
        let mut engine = engine((3, 2), &[(1, 1)]);
        engine.open_cell((1, 0)).unwrap();
        engine.open_cell((2, 0)).unwrap();

        assert_eq!(engine.render_ansi(), "x11\nxxx\n");
    }

    #[test]
    fn ansi_shows_zero_and_mine() {
        let mut engine = engine((4, 1), &[(3, 0)]);
        engine.open_cell((0, 0)).unwrap();
        engine.open_cell((3, 0)).unwrap();

        assert_eq!(engine.render_ansi(), "..1B\n");
    }

    #[test]
    fn rgb_colors_follow_observation() {
        let mut engine = engine((3, 2), &[(1, 1)]);
        engine.open_cell((2, 0)).unwrap();
        engine.open_cell((1, 1)).unwrap();

        let pixels = engine.render_rgb(2);

        assert_eq!(pixels.dim(), (4, 6, 3));
        let at = |row: usize, col: usize| {
            [
                pixels[[row, col, 0]],
                pixels[[row, col, 1]],
                pixels[[row, col, 2]],
            ]
        };
        assert_eq!(at(0, 0), GRAY);
        assert_eq!(at(1, 5), BLUE);
        assert_eq!(at(3, 3), MAGENTA);
    }

    #[test]
    fn color_table() {
        assert_eq!(cell_color(CellView::Count(0)), WHITE);
        assert_eq!(cell_color(CellView::Count(3)), RED);
        assert_eq!(cell_color(CellView::Count(6)), TEAL);
        assert_eq!(cell_color(CellView::Count(8)), MAGENTA);
    }

    #[test]
    fn click_maps_back_to_step_action() {
        let engine = engine((3, 2), &[(1, 1)]);

        assert_eq!(engine.action_at_pixel(0, 0, 16), Some(0));
        assert_eq!(engine.action_at_pixel(47, 0, 16), Some(2));
        assert_eq!(engine.action_at_pixel(20, 17, 16), Some(4));
        assert_eq!(engine.decode_action(4).unwrap(), (1, 1));
        assert_eq!(engine.action_at_pixel(48, 0, 16), None);
        assert_eq!(engine.action_at_pixel(0, 32, 16), None);
    }

    #[test]
    fn render_mode_parsing() {
        assert_eq!("ansi".parse::<RenderMode>(), Ok(RenderMode::Ansi));
        assert_eq!("rgb_array".parse::<RenderMode>(), Ok(RenderMode::RgbArray));
        assert_eq!("human".parse::<RenderMode>(), Ok(RenderMode::Human));

        let err = "terminal".parse::<RenderMode>().unwrap_err();
        assert_eq!(
            err,
            GymError::UnsupportedRenderMode {
                mode: "terminal".into()
            }
        );
        assert!(err.to_string().contains("rgb_array"));
    }
}
