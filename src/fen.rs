//! FEN 解析和生成
//!
//! 格式: `<棋盘> [回合]`，只描述局面，不记录棋谱
//!
//! 棋盘从第 0 行（黑方底线）写到第 9 行（红方底线），行之间用 `/` 分隔：
//! - 红方：K(帅) A(仕) E(相) H(马) R(车) C(炮) P(兵)，也接受 N/B
//! - 黑方：对应小写
//! - 空格：数字 (1-9)
//!
//! 回合：`r`（或 `w`）红方，`b` 黑方，省略时为红方。其后的字段被忽略。

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Color, Piece, PieceKind, Position, COLS, ROWS};

/// 标准开局局面
pub const INITIAL_FEN: &str = "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR r";

/// FEN 解析后的状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenState {
    pub board: Board,
    pub turn: Color,
}

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<FenState, GameError> {
    let mut parts = fen.split_whitespace();
    let board_str = parts
        .next()
        .ok_or_else(|| GameError::InvalidFen("empty FEN".to_string()))?;
    let board = parse_board(board_str)?;

    let turn = match parts.next() {
        None => Color::Red,
        Some(turn_str) => {
            let mut chars = turn_str.chars();
            match (chars.next().and_then(Color::from_fen_char), chars.next()) {
                (Some(color), None) => color,
                _ => return Err(GameError::InvalidFen(format!("invalid turn: {}", turn_str))),
            }
        }
    };

    Ok(FenState { board, turn })
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<Board, GameError> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != ROWS as usize {
        return Err(GameError::InvalidFen(format!(
            "expected {} rows, got {}",
            ROWS,
            rows.len()
        )));
    }

    let mut board = Board::empty();
    let mut generals = [0usize; 2];

    for (row, row_str) in rows.iter().enumerate() {
        let row = row as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if skip == 0 {
                    return Err(GameError::InvalidFen(format!("zero skip in row {}", row)));
                }
                col += skip as i8;
            } else {
                let piece = Piece::from_fen_char(ch)
                    .ok_or_else(|| GameError::InvalidFen(format!("invalid piece char: {}", ch)))?;
                if col < COLS {
                    board.set(Position::new(row, col), Some(piece))?;
                }
                if piece.kind == PieceKind::General {
                    generals[piece.color as usize] += 1;
                }
                col += 1;
            }
            if col > COLS {
                return Err(GameError::InvalidFen(format!(
                    "row {} is wider than {} columns",
                    row, COLS
                )));
            }
        }

        if col != COLS {
            return Err(GameError::InvalidFen(format!(
                "row {} has {} columns, expected {}",
                row, col, COLS
            )));
        }
    }

    if generals.iter().any(|&n| n > 1) {
        return Err(GameError::InvalidFen("more than one General per side".to_string()));
    }

    Ok(board)
}

/// 从棋盘生成 FEN 字符串
pub fn to_fen(board: &Board, turn: Color) -> String {
    let rows: Vec<String> = board
        .rows()
        .iter()
        .map(|cells| {
            let mut row_str = String::new();
            let mut empty_count = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if empty_count > 0 {
                            row_str.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        row_str.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                row_str.push_str(&empty_count.to_string());
            }
            row_str
        })
        .collect();

    format!("{} {}", rows.join("/"), turn.to_fen_char())
}
