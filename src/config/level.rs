//! ASCII level layouts.
//!
//! Row 0 is the top of the level. Glyphs:
//! `#` ground, `^` spikes, `C` coin, `S` strawberry, `F` flag,
//! `P` player spawn, `.` or space empty.

use bevy::math::{IVec2, Vec2};
use thiserror::Error;

pub const TILE_SIZE: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Ground,
    Spikes,
    Coin,
    Strawberry,
    Flag,
}

impl Tile {
    fn from_glyph(glyph: char) -> Option<Option<Tile>> {
        match glyph {
            '#' => Some(Some(Tile::Ground)),
            '^' => Some(Some(Tile::Spikes)),
            'C' => Some(Some(Tile::Coin)),
            'S' => Some(Some(Tile::Strawberry)),
            'F' => Some(Some(Tile::Flag)),
            '.' | ' ' | 'P' => Some(None),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("layout has no rows")]
    Empty,
    #[error("no player spawn `P` in layout")]
    MissingSpawn,
    #[error("second player spawn at column {column}, row {row}")]
    DuplicateSpawn { column: usize, row: usize },
    #[error("unknown glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph { glyph: char, column: usize, row: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    /// Cells in level coordinates: x grows right, y grows up, (0, 0) bottom left.
    pub tiles: Vec<(IVec2, Tile)>,
    pub spawn: IVec2,
    pub width: usize,
    pub height: usize,
}

impl LevelLayout {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        if rows.is_empty() {
            return Err(LevelError::Empty);
        }

        let height = rows.len();
        let mut width = 0;
        let mut tiles = Vec::new();
        let mut spawn = None;

        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as i32;
            for (column, glyph) in line.as_ref().chars().enumerate() {
                width = width.max(column + 1);
                let cell = IVec2::new(column as i32, y);
                if glyph == 'P' {
                    if spawn.is_some() {
                        return Err(LevelError::DuplicateSpawn { column, row });
                    }
                    spawn = Some(cell);
                }
                match Tile::from_glyph(glyph) {
                    Some(Some(tile)) => tiles.push((cell, tile)),
                    Some(None) => {}
                    None => return Err(LevelError::UnknownGlyph { glyph, column, row }),
                }
            }
        }

        let spawn = spawn.ok_or(LevelError::MissingSpawn)?;
        Ok(Self { tiles, spawn, width, height })
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|(_, t)| *t == tile).count()
    }
}

/// Centre of a cell in world pixels.
pub fn cell_center(cell: IVec2) -> Vec2 {
    (cell.as_vec2() + Vec2::splat(0.5)) * TILE_SIZE
}
