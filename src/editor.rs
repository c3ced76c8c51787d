//! Tile level editor
//!
//! A 20x20 grid of cells painted with the current tool. Exporting turns the
//! grid into a `Level`, fusing runs of wall cells into larger rectangles;
//! importing paints a level back onto the grid.

use std::collections::HashSet;

use crate::consts::{GRID_TILES, TILE_SIZE};
use crate::error::LevelError;
use crate::game::Game;
use crate::level::{Level, ObstacleKind, ObstacleSpec, Point, TorchSpec};
use crate::settings::Settings;
use crate::theme::Theme;

/// Name given to exported levels
pub const DEFAULT_LEVEL_NAME: &str = "New Level";

/// Content of one grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Reset,
    Torch,
    Exit,
}

/// Painting tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Wall,
    Reset,
    Torch,
    Exit,
    Eraser,
}

impl Tool {
    /// Tool by its palette name (`wall`, `reset`, `torch`, `exit`, `eraser`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wall" => Some(Self::Wall),
            "reset" => Some(Self::Reset),
            "torch" => Some(Self::Torch),
            "exit" => Some(Self::Exit),
            "eraser" => Some(Self::Eraser),
            _ => None,
        }
    }

    /// Cell this tool paints
    pub fn cell(self) -> Cell {
        match self {
            Self::Wall => Cell::Wall,
            Self::Reset => Cell::Reset,
            Self::Torch => Cell::Torch,
            Self::Exit => Cell::Exit,
            Self::Eraser => Cell::Empty,
        }
    }
}

/// Row-major square grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorGrid {
    cells: Vec<Cell>,
}

impl Default for EditorGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::Empty; GRID_TILES * GRID_TILES],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= GRID_TILES || row >= GRID_TILES {
            return None;
        }
        Some(self.cells[row * GRID_TILES + col])
    }

    /// Returns false when the coordinates are outside the grid
    pub fn set(&mut self, col: usize, row: usize, cell: Cell) -> bool {
        if col >= GRID_TILES || row >= GRID_TILES {
            return false;
        }
        self.cells[row * GRID_TILES + col] = cell;
        true
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// `(col, row, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (i % GRID_TILES, i / GRID_TILES, cell))
    }

    fn is_wall(&self, col: usize, row: usize) -> bool {
        self.get(col, row) == Some(Cell::Wall)
    }
}

/// Merge wall cells into rectangles, as `(col, row, cols, rows)`.
///
/// Each unvisited wall cell, in row-major order, grows to the right over
/// unvisited wall cells; only when it could not grow right does it grow down.
pub fn fuse_walls(grid: &EditorGrid) -> Vec<(usize, usize, usize, usize)> {
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut fused = Vec::new();

    for (col, row, cell) in grid.iter() {
        if cell != Cell::Wall || visited.contains(&(col, row)) {
            continue;
        }
        let free = |c: usize, r: usize, visited: &HashSet<(usize, usize)>| {
            grid.is_wall(c, r) && !visited.contains(&(c, r))
        };

        let mut cols = 1;
        while free(col + cols, row, &visited) {
            visited.insert((col + cols, row));
            cols += 1;
        }

        let mut rows = 1;
        if cols == 1 {
            while free(col, row + rows, &visited) {
                visited.insert((col, row + rows));
                rows += 1;
            }
        }

        visited.insert((col, row));
        fused.push((col, row, cols, rows));
    }
    fused
}

/// Grid cell holding field position `(x, y)`, if inside the grid
fn cell_at(x: f32, y: f32) -> Option<(usize, usize)> {
    let col = (x / TILE_SIZE).floor();
    let row = (y / TILE_SIZE).floor();
    let limit = GRID_TILES as f32;
    if col < 0.0 || row < 0.0 || col >= limit || row >= limit {
        return None;
    }
    Some((col as usize, row as usize))
}

fn cell_origin(col: usize, row: usize) -> (f32, f32) {
    (col as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
}

/// Editing session: current tool, grid and level name
#[derive(Debug, Clone)]
pub struct EditorSession {
    tool: Tool,
    grid: EditorGrid,
    name: String,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            tool: Tool::default(),
            grid: EditorGrid::new(),
            name: DEFAULT_LEVEL_NAME.to_string(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn grid(&self) -> &EditorGrid {
        &self.grid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Apply the current tool to one cell; out-of-grid clicks are ignored
    pub fn paint(&mut self, col: usize, row: usize) {
        if !self.grid.set(col, row, self.tool.cell()) {
            log::debug!("Ignoring paint outside the grid at ({}, {})", col, row);
        }
    }

    /// Build the level described by the grid
    pub fn export(&self) -> Level {
        let mut level = Level::new(self.name.clone());

        for (col, row, cell) in self.grid.iter() {
            let (x, y) = cell_origin(col, row);
            match cell {
                Cell::Reset => level.obstacles.push(ObstacleSpec::new(
                    ObstacleKind::Reset,
                    x,
                    y,
                    TILE_SIZE,
                    TILE_SIZE,
                )),
                Cell::Exit => level.exit = Some(Point::new(x, y)),
                Cell::Torch => level.torches.push(TorchSpec::new(x, y)),
                Cell::Wall | Cell::Empty => {}
            }
        }

        for (col, row, cols, rows) in fuse_walls(&self.grid) {
            let (x, y) = cell_origin(col, row);
            level.obstacles.push(ObstacleSpec::new(
                ObstacleKind::Wall,
                x,
                y,
                cols as f32 * TILE_SIZE,
                rows as f32 * TILE_SIZE,
            ));
        }
        level
    }

    /// Exported level as pretty-printed JSON
    pub fn export_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Replace the grid with `level`. A cell keeps the first content painted
    /// into it: walls, then resets, then the exit, then torches.
    pub fn import(&mut self, level: &Level) {
        self.grid.clear();
        self.name = level.name.clone();

        for obstacle in &level.obstacles {
            match obstacle.kind {
                ObstacleKind::Wall => {
                    let cols = (obstacle.width / TILE_SIZE).round().max(0.0) as usize;
                    let rows = (obstacle.height / TILE_SIZE).round().max(0.0) as usize;
                    for r in 0..rows {
                        for c in 0..cols {
                            let x = obstacle.x + c as f32 * TILE_SIZE;
                            let y = obstacle.y + r as f32 * TILE_SIZE;
                            self.fill_if_empty(x, y, Cell::Wall);
                        }
                    }
                }
                ObstacleKind::Reset | ObstacleKind::Unknown => {}
            }
        }
        for obstacle in &level.obstacles {
            if obstacle.kind == ObstacleKind::Reset {
                self.fill_if_empty(obstacle.x, obstacle.y, Cell::Reset);
            }
        }
        if let Some(exit) = level.exit {
            self.fill_if_empty(exit.x, exit.y, Cell::Exit);
        }
        for torch in &level.torches {
            self.fill_if_empty(torch.x, torch.y, Cell::Torch);
        }
    }

    /// Parse and import a level
    pub fn import_json(&mut self, json: &str) -> Result<(), LevelError> {
        let level = Level::from_json(json)?;
        self.import(&level);
        Ok(())
    }

    fn fill_if_empty(&mut self, x: f32, y: f32, cell: Cell) {
        let Some((col, row)) = cell_at(x, y) else {
            log::debug!("Skipping {:?} outside the grid at ({}, {})", cell, x, y);
            return;
        };
        if self.grid.get(col, row) == Some(Cell::Empty) {
            self.grid.set(col, row, cell);
        }
    }

    /// Game over the exported level with the editor preview palette.
    /// The caller starts it.
    pub fn try_level(&self, settings: Settings) -> Result<Game, LevelError> {
        let level = self.export();
        level.validate(0)?;
        Ok(Game::single_level(level, Theme::editor_preview(), settings))
    }
}
