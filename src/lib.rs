//! Xiangqi rules engine
//!
//! 象棋规则引擎：走法校验、回合与终局判定、悔棋

pub mod board;
pub mod config;
pub mod error;
pub mod fen;
pub mod game;
pub mod rules;
pub mod types;
pub mod validator;

pub use board::Board;
pub use config::GameConfig;
pub use error::{GameError, IllegalReason};
pub use fen::{parse_fen, to_fen, FenState, INITIAL_FEN};
pub use game::{Game, GameStatus, MoveOutcome, MoveRecord, Snapshot};
pub use types::{Color, Move, Piece, PieceKind, Position};
pub use validator::{is_legal, legal_destinations, legal_moves};
