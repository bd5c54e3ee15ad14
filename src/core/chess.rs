//! # Chess Board
//!
//! Display only. Uppercase pieces are white, lowercase black. Moves are
//! acknowledged but never applied; there is no rule engine.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

pub type Board = [[char; 8]; 8];

#[derive(Debug, Clone)]
pub struct ChessBoard {
    pub board: Board,
    pub current_player: Player,
}

impl ChessBoard {
    pub fn new() -> Self {
        Self {
            board: initial_board(),
            current_player: Player::White,
        }
    }

    pub fn display(&self) -> String {
        let mut out = String::from("  a b c d e f g h\n");
        out.push_str(" +-----------------+\n");
        for (i, row) in self.board.iter().enumerate() {
            out.push_str(&format!("{}|", 8 - i));
            for piece in row {
                out.push(*piece);
                out.push(' ');
            }
            out.push_str("|\n");
        }
        out.push_str(" +-----------------+\n");
        out
    }

    /// Acknowledge a move without applying it.
    pub fn make_move(&self, mv: &str) -> String {
        format!("Attempted move: {mv}. (Move logic not fully implemented)")
    }

    pub fn status(&self) -> String {
        format!("{} to move.", self.current_player)
    }

    pub fn is_game_over(&self) -> bool {
        false
    }

    pub fn switch_player(&mut self) {
        self.current_player = match self.current_player {
            Player::White => Player::Black,
            Player::Black => Player::White,
        };
    }
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_board() -> Board {
    let mut board = [[' '; 8]; 8];
    board[0] = ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r'];
    board[1] = ['p'; 8];
    // Empty ranks get a checker pattern so the grid stays readable
    for (rank, row) in board.iter_mut().enumerate().take(6).skip(2) {
        for (file, square) in row.iter_mut().enumerate() {
            *square = if (rank + file) % 2 == 0 { ' ' } else { '.' };
        }
    }
    board[6] = ['P'; 8];
    board[7] = ['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R'];
    board
}
