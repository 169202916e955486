//! 错误类型
//!
//! 所有拒绝都在调用边界返回，不会留下部分修改的状态

use std::fmt;

use thiserror::Error;

use crate::types::{Color, PieceKind, Position};

/// 走法不合法的具体原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// 起点没有棋子
    EmptySquare,
    /// 起点与终点相同
    SameSquare,
    /// 终点是己方棋子
    OwnPieceAtTarget,
    /// 违反该棋子的走法规则
    PieceRule(PieceKind),
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::EmptySquare => write!(f, "no piece on the starting square"),
            IllegalReason::SameSquare => write!(f, "start and destination are the same"),
            IllegalReason::OwnPieceAtTarget => write!(f, "cannot capture own piece"),
            IllegalReason::PieceRule(kind) => write!(f, "{} cannot move that way", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("position ({row}, {col}) is outside the 10x9 board")]
    InvalidPosition { row: i8, col: i8 },
    #[error("not your turn: {0} is to move")]
    NotYourTurn(Color),
    #[error("illegal move {from} -> {to}: {reason}")]
    IllegalMove {
        from: Position,
        to: Position,
        reason: IllegalReason,
    },
    #[error("game already over")]
    GameAlreadyOver,
    #[error("no move to undo")]
    NoHistory,
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("invalid coordinate notation: {0}")]
    InvalidNotation(String),
}

impl GameError {
    /// 简短的错误代码，供 JSON 协议使用
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidPosition { .. } => "invalid_position",
            GameError::NotYourTurn(_) => "not_your_turn",
            GameError::IllegalMove { .. } => "illegal_move",
            GameError::GameAlreadyOver => "game_already_over",
            GameError::NoHistory => "no_history",
            GameError::InvalidFen(_) => "invalid_fen",
            GameError::InvalidNotation(_) => "invalid_notation",
        }
    }
}
