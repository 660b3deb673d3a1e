use crate::config::Config;
use glam::Vec2;
use std::fs::read_to_string;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// The built-in level, 0 = empty, 1 = wall.
const DEMO_GRID: [[u8; 15]; 11] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1],
    [1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid cell value {value} at row {row}, column {col} (expected 0 or 1)")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("invalid tile {found:?} at row {row}, column {col}")]
    InvalidTile { row: usize, col: usize, found: char },

    #[error("second spawn at row {row}, column {col}")]
    DuplicateSpawn { row: usize, col: usize },

    #[error("unrecognized section: {0}")]
    UnknownSection(String),

    #[error("section {0} appears more than once")]
    DuplicateSection(String),

    #[error("unrecognized meta directive: {0}")]
    UnknownDirective(String),

    #[error("unrecognized key {key:?} for directive {directive:?}")]
    UnknownKey { directive: String, key: String },

    #[error("incorrectly formatted meta: {0}")]
    MalformedMeta(String),

    #[error("bad value {value:?} for {key:?}")]
    BadValue { key: String, value: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not read map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall,
}

impl Tile {
    fn from_cell(row: usize, col: usize, value: u8) -> Result<Self, MapError> {
        match value {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Wall),
            value => Err(MapError::InvalidCell { row, col, value }),
        }
    }
}

/// Fixed rectangular tile grid, row-major with the origin at the top left.
#[derive(Clone, PartialEq, Debug)]
pub struct Map {
    /// number of columns
    pub width: usize,
    /// number of rows
    pub height: usize,
    tiles: Vec<Tile>,
    spawn: Option<(usize, usize)>,
    pub config: Config,
}

impl Map {
    /// Build a map from literal rows of 0/1 cells with the default config.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                tiles.push(Tile::from_cell(row, col, value)?);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
            spawn: None,
            config: Config::default(),
        })
    }

    pub fn demo() -> Self {
        Self {
            width: DEMO_GRID[0].len(),
            height: DEMO_GRID.len(),
            tiles: DEMO_GRID
                .iter()
                .flatten()
                .map(|&cell| if cell == 1 { Tile::Wall } else { Tile::Empty })
                .collect(),
            spawn: None,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Result<Self, MapError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        log::info!("loading map at {}", path.display());
        let file = read_to_string(path).map_err(|source| MapError::Io {
            path: path.into(),
            source,
        })?;

        Self::parse(&file)
    }

    /// Parse the text map format: a `!!!!META` section of config directives
    /// and a `!!!!MAIN` section of `0`/`1`/`*` rows, each ended by a blank line.
    pub fn parse(src: &str) -> Result<Self, MapError> {
        let mut lines = src.lines().map(str::trim_end);
        let mut config = Config::default();
        let mut map = None;

        while let Some(line) = lines.by_ref().next() {
            match line {
                "" => continue,
                "!!!!META" => parse_meta(&mut config, &mut lines)?,
                "!!!!MAIN" if map.is_some() => {
                    return Err(MapError::DuplicateSection(line.to_owned()))
                }
                "!!!!MAIN" => map = Some(parse_main(&mut lines)?),
                other => return Err(MapError::UnknownSection(other.to_owned())),
            }
        }

        let map = map.ok_or(MapError::Empty)?.with_config(config)?;
        log::info!(
            "map is {}x{} tiles of {} units",
            map.width,
            map.height,
            map.config.tile_size
        );
        if !map.is_sealed() {
            log::warn!("map border is not all walls, rays may leave the grid");
        }

        Ok(map)
    }

    pub fn tile_size(&self) -> f32 {
        self.config.tile_size
    }

    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.tile_size()
    }

    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.tile_size()
    }

    /// Whether a point lies within the closed world rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0. ..=self.world_width()).contains(&x) && (0. ..=self.world_height()).contains(&y)
    }

    pub fn tile(&self, col: usize, row: usize) -> Option<Tile> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + col).copied()
    }

    /// Grid cell containing a world point, if it is inside the grid.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let col = (x / self.tile_size()).floor();
        let row = (y / self.tile_size()).floor();
        // also rejects NaN
        if !(col >= 0. && row >= 0. && col < self.width as f32 && row < self.height as f32) {
            return None;
        }
        Some((col as usize, row as usize))
    }

    /// Out-of-grid points count as walls.
    pub fn is_walkable(&self, x: f32, y: f32) -> bool {
        self.cell_at(x, y)
            .and_then(|(col, row)| self.tile(col, row))
            .is_some_and(|tile| tile == Tile::Empty)
    }

    pub fn cell_origin(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(col as f32, row as f32) * self.tile_size()
    }

    /// Centre of the `*` cell, if the map declared one.
    pub fn spawn(&self) -> Option<Vec2> {
        let (col, row) = self.spawn?;
        Some(self.cell_origin(col, row) + Vec2::splat(self.tile_size() / 2.))
    }

    pub fn is_sealed(&self) -> bool {
        let wall = |col, row| self.tile(col, row) == Some(Tile::Wall);
        (0..self.width).all(|col| wall(col, 0) && wall(col, self.height - 1))
            && (0..self.height).all(|row| wall(0, row) && wall(self.width - 1, row))
    }

    /// All cells in row-major order with their `(col, row)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, &tile)| ((idx % self.width, idx / self.width), tile))
    }
}

fn parse_meta<'lines>(
    config: &mut Config,
    mut lines: impl Iterator<Item = &'lines str>,
) -> Result<(), MapError> {
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }

        let mut chunks = line.split(',');
        let directive = chunks.by_ref().next().unwrap_or_default();
        let params = chunks
            .map(|param| param.split_once('='))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MapError::MalformedMeta(line.to_owned()))?;
        config.apply_directive(directive, &params)?;
    }

    Ok(())
}

fn parse_main<'lines>(mut lines: impl Iterator<Item = &'lines str>) -> Result<Map, MapError> {
    let mut width = None;
    let mut height = 0;
    let mut tiles = vec![];
    let mut spawn = None;

    let parsed = lines.by_ref().try_for_each(|line| {
        if line.is_empty() {
            return ControlFlow::Break(Ok(()));
        }

        let row = height;
        let expected = *width.get_or_insert(line.chars().count());
        if line.chars().count() != expected {
            return ControlFlow::Break(Err(MapError::Ragged {
                row,
                expected,
                found: line.chars().count(),
            }));
        }

        for (col, ch) in line.chars().enumerate() {
            let tile = match ch {
                '0' => Tile::Empty,
                '1' => Tile::Wall,
                '*' if spawn.is_some() => {
                    return ControlFlow::Break(Err(MapError::DuplicateSpawn { row, col }))
                }
                '*' => {
                    spawn = Some((col, row));
                    Tile::Empty
                }
                found => return ControlFlow::Break(Err(MapError::InvalidTile { row, col, found })),
            };
            tiles.push(tile);
        }

        height += 1;
        ControlFlow::Continue(())
    });
    if let ControlFlow::Break(Err(err)) = parsed {
        return Err(err);
    }

    let width = width.ok_or(MapError::Empty)?;
    Ok(Map {
        width,
        height,
        tiles,
        spawn,
        config: Config::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Map {
        Map::from_rows(&[
            &[1, 1, 1, 1],
            &[1, 0, 0, 1],
            &[1, 0, 1, 1],
            &[1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn walkability_follows_cells() {
        let map = room();
        assert!(map.is_walkable(40., 40.));
        assert!(map.is_walkable(95.9, 63.9));
        assert!(!map.is_walkable(70., 70.));
        assert!(!map.is_walkable(10., 40.));
    }

    #[test]
    fn out_of_grid_is_a_wall() {
        let map = room();
        assert!(!map.is_walkable(-0.5, 40.));
        assert!(!map.is_walkable(40., -0.5));
        assert!(!map.is_walkable(128., 40.));
        assert!(!map.is_walkable(40., 1000.));
        assert!(!map.is_walkable(f32::NAN, 40.));
        assert!(!map.is_walkable(f32::INFINITY, 40.));
    }

    #[test]
    fn world_extent() {
        let map = room();
        assert_eq!(map.world_width(), 128.);
        assert_eq!(map.world_height(), 128.);
        assert!(map.contains(128., 0.));
        assert!(!map.contains(128.1, 0.));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Map::from_rows(&[&[1, 1, 1], &[1, 0], &[1, 1, 1]]).unwrap_err();
        assert!(matches!(
            err,
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn out_of_range_cells_are_rejected() {
        let err = Map::from_rows(&[&[1, 1], &[1, 7]]).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidCell {
                row: 1,
                col: 1,
                value: 7
            }
        ));
        assert!(matches!(Map::from_rows(&[]), Err(MapError::Empty)));
    }

    #[test]
    fn demo_is_sealed() {
        let map = Map::demo();
        assert_eq!((map.width, map.height), (15, 11));
        assert!(map.is_sealed());
        assert!(map.is_walkable(map.world_width() / 2., map.world_height() / 2.));
    }

    #[test]
    fn open_border_is_not_sealed() {
        let map = Map::from_rows(&[&[1, 1, 1], &[1, 0, 0], &[1, 1, 1]]).unwrap();
        assert!(!map.is_sealed());
    }

    #[test]
    fn parse_meta_and_main() {
        let map = Map::parse(
            "!!!!META\nview,fov=90,columns=4\ntile,size=16\n\n!!!!MAIN\n1111\n1*01\n1111\n",
        )
        .unwrap();

        assert_eq!((map.width, map.height), (4, 3));
        assert_eq!(map.config.column_count, 4);
        assert_eq!(map.tile_size(), 16.);
        assert_eq!(map.spawn(), Some(Vec2::new(24., 24.)));
        assert_eq!(map.tile(1, 1), Some(Tile::Empty));
        assert_eq!(map.tile(3, 1), Some(Tile::Wall));
    }

    #[test]
    fn parse_errors_are_descriptive() {
        assert!(matches!(
            Map::parse("!!!!MAIN\n111\n1x1\n111\n"),
            Err(MapError::InvalidTile {
                row: 1,
                col: 1,
                found: 'x'
            })
        ));
        assert!(matches!(
            Map::parse("!!!!MAIN\n1111\n1**1\n1111\n"),
            Err(MapError::DuplicateSpawn { row: 1, col: 2 })
        ));
        assert!(matches!(
            Map::parse("!!!!MAIN\n111\n101\n111\n\n!!!!MAIN\n1\n"),
            Err(MapError::DuplicateSection(_))
        ));
        assert!(matches!(
            Map::parse("!!!!WORLD\n"),
            Err(MapError::UnknownSection(_))
        ));
        assert!(matches!(
            Map::parse("!!!!META\nview,fov\n\n!!!!MAIN\n1\n"),
            Err(MapError::MalformedMeta(_))
        ));
        assert!(matches!(
            Map::parse("!!!!META\nview,fov=0\n"),
            Err(MapError::Empty)
        ));
        assert!(matches!(
            Map::parse("!!!!META\nview,fov=0\n\n!!!!MAIN\n1\n"),
            Err(MapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn iter_visits_every_cell_row_major() {
        let map = room();
        let cells = map.iter().collect::<Vec<_>>();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[5], ((1, 1), Tile::Empty));
        assert_eq!(cells[10], ((2, 2), Tile::Wall));
    }
}
