//! # Maze
//!
//! Fixed ASCII grids. `#` is a wall, `S` the start, `E` the exit and a
//! space is open floor. Movement is a bounds check followed by a wall check.

use std::fmt;

const LEVELS: &[&str] = &[
    "\
##########
#S   #   #
# ## # # #
#  #   # #
## ##### #
#      # #
# #### # #
#    #   E
##########",
    "\
###############
#S#     #     #
# # ### # ### #
# #   #   #   #
# ### ####### #
#   #       # #
### # ##### # #
#   #     #   #
# ####### ### #
#         #  E#
###############",
    "\
#####################
#S    #       #     #
##### # ##### # ### #
#     #     # #   # #
# ######### # ### # #
#         # #     # #
######### # ####### #
#       # #       # #
# ##### # ####### # #
#     #           #E#
#####################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Wall, grid edge, or the maze is already solved.
    Blocked,
    /// Stepped onto the exit.
    Escaped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MazeError {
    NoStart,
    NoExit,
    Ragged { row: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::NoStart => write!(f, "maze has no start marker 'S'"),
            MazeError::NoExit => write!(f, "maze has no exit marker 'E'"),
            MazeError::Ragged { row } => write!(f, "maze row {row} has a different width"),
        }
    }
}

impl std::error::Error for MazeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Wall,
    Open,
    Exit,
}

#[derive(Debug, Clone)]
pub struct Maze {
    cells: Vec<Vec<Cell>>,
    start: (usize, usize),
    pub player: (usize, usize),
    pub moves: u32,
    pub escaped: bool,
    pub level: usize,
}

impl Maze {
    pub fn parse(source: &str) -> Result<Self, MazeError> {
        let mut cells = Vec::new();
        let mut start = None;
        let mut has_exit = false;
        let mut width = None;

        for (row, line) in source.lines().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            match width {
                None => width = Some(chars.len()),
                Some(w) if w != chars.len() => return Err(MazeError::Ragged { row }),
                Some(_) => {}
            }
            let mut row_cells = Vec::with_capacity(chars.len());
            for (col, c) in chars.into_iter().enumerate() {
                let cell = match c {
                    '#' => Cell::Wall,
                    'S' => {
                        if start.is_none() {
                            start = Some((row, col));
                        }
                        Cell::Open
                    }
                    'E' => {
                        has_exit = true;
                        Cell::Exit
                    }
                    _ => Cell::Open,
                };
                row_cells.push(cell);
            }
            cells.push(row_cells);
        }

        let start = start.ok_or(MazeError::NoStart)?;
        if !has_exit {
            return Err(MazeError::NoExit);
        }

        Ok(Self {
            cells,
            start,
            player: start,
            moves: 0,
            escaped: false,
            level: 0,
        })
    }

    /// Load one of the built-in levels (wraps around).
    pub fn builtin(level: usize) -> Self {
        let index = level % LEVELS.len();
        // Built-in grids are fixed strings covered by tests.
        let mut maze = match Maze::parse(LEVELS[index]) {
            Ok(maze) => maze,
            Err(e) => {
                log::warn!("Built-in maze {} failed to parse: {}", index, e);
                Maze::fallback()
            }
        };
        maze.level = index;
        maze
    }

    fn fallback() -> Self {
        Self {
            cells: vec![vec![Cell::Open, Cell::Exit]],
            start: (0, 0),
            player: (0, 0),
            moves: 0,
            escaped: false,
            level: 0,
        }
    }

    pub fn level_count() -> usize {
        LEVELS.len()
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        matches!(self.cell(row, col), Some(Cell::Wall))
    }

    fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.escaped {
            return MoveOutcome::Blocked;
        }
        let (dr, dc) = direction.delta();
        let (Some(row), Some(col)) = (
            self.player.0.checked_add_signed(dr),
            self.player.1.checked_add_signed(dc),
        ) else {
            return MoveOutcome::Blocked;
        };

        match self.cell(row, col) {
            None | Some(Cell::Wall) => MoveOutcome::Blocked,
            Some(Cell::Open) => {
                self.player = (row, col);
                self.moves += 1;
                MoveOutcome::Moved
            }
            Some(Cell::Exit) => {
                self.player = (row, col);
                self.moves += 1;
                self.escaped = true;
                MoveOutcome::Escaped
            }
        }
    }

    pub fn reset(&mut self) {
        self.player = self.start;
        self.moves = 0;
        self.escaped = false;
    }

    pub fn next_level(&self) -> Self {
        Maze::builtin(self.level + 1)
    }

    /// Text rendering with the player drawn as `@`.
    pub fn render_lines(&self) -> Vec<String> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        if (row, col) == self.player {
                            '@'
                        } else {
                            match cell {
                                Cell::Wall => '#',
                                Cell::Open => ' ',
                                Cell::Exit => 'E',
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Maze {
    fn default() -> Self {
        Maze::builtin(0)
    }
}
