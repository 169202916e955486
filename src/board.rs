//! 象棋棋盘
//!
//! 10 行 x 9 列的占位数据，只提供越界安全的读写，不含任何走法规则。

use std::fmt;

use lazy_static::lazy_static;

use crate::error::GameError;
use crate::types::{Color, PieceKind, Piece, Position, COLS, ROWS};

const SQUARES: usize = ROWS as usize * COLS as usize;

/// 底线从左到右的排布
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];

lazy_static! {
    /// 标准开局局面
    static ref INITIAL: Board = Board::build_initial();
}

/// 棋盘（数组存储，行优先）
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; SQUARES],
        }
    }

    /// 标准开局局面
    pub fn initial() -> Board {
        INITIAL.clone()
    }

    fn build_initial() -> Board {
        let mut board = Board::empty();
        for color in [Color::Red, Color::Black] {
            let back = color.back_rank();
            let step = color.forward();
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.place(Position::new(back, col as i8), Piece::new(*kind, color));
            }
            // 炮在底线前两行，兵在底线前三行
            for col in [1, 7] {
                board.place(
                    Position::new(back + 2 * step, col),
                    Piece::new(PieceKind::Cannon, color),
                );
            }
            for col in (0..COLS).step_by(2) {
                board.place(
                    Position::new(back + 3 * step, col),
                    Piece::new(PieceKind::Soldier, color),
                );
            }
        }
        board
    }

    #[inline]
    fn place(&mut self, pos: Position, piece: Piece) {
        self.squares[pos.to_index()] = Some(piece);
    }

    /// 检查位置是否在棋盘内
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.is_valid()
    }

    /// 读取某个格子，越界返回 `InvalidPosition`
    pub fn get(&self, pos: Position) -> Result<Option<Piece>, GameError> {
        let pos = pos.validate()?;
        Ok(self.squares[pos.to_index()])
    }

    /// 写入某个格子，返回原来的内容
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> Result<Option<Piece>, GameError> {
        let pos = pos.validate()?;
        Ok(std::mem::replace(&mut self.squares[pos.to_index()], piece))
    }

    /// 获取某位置的棋子，越界视为空
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn has_piece(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// 把 `from` 的棋子移到 `to`，返回被吃的棋子
    ///
    /// 调用方负责保证两个位置都合法
    pub(crate) fn relocate(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self.squares[from.to_index()].take();
        std::mem::replace(&mut self.squares[to.to_index()], piece)
    }

    /// 获取所有棋子（可按阵营过滤），行优先
    pub fn pieces(&self, color: Option<Color>) -> Vec<(Position, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (Position::from_index(i), p)))
            .filter(|(_, p)| color.map_or(true, |c| p.color == c))
            .collect()
    }

    /// 找到将/帅的位置
    pub fn find_general(&self, color: Color) -> Option<Position> {
        self.squares.iter().enumerate().find_map(|(i, p)| match p {
            Some(piece) if piece.kind == PieceKind::General && piece.color == color => {
                Some(Position::from_index(i))
            }
            _ => None,
        })
    }

    /// 统计两点之间（不含端点）的棋子数
    ///
    /// 两点不在同一行或同一列时返回 None
    pub fn count_between(&self, from: Position, to: Position) -> Option<usize> {
        if from == to || (from.row != to.row && from.col != to.col) {
            return None;
        }
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();
        let mut count = 0;
        let mut pos = from.offset(dr, dc);
        while pos != to {
            if self.has_piece(pos) {
                count += 1;
            }
            pos = pos.offset(dr, dc);
        }
        Some(count)
    }

    /// 按行导出全部格子
    pub fn rows(&self) -> Vec<Vec<Option<Piece>>> {
        self.squares
            .chunks(COLS as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h i")?;
        for (row, cells) in self.squares.chunks(COLS as usize).enumerate() {
            if row == 5 {
                writeln!(f, "  -----------------")?;
            }
            write!(f, "{}", row)?;
            for cell in cells {
                let ch = cell.map_or('.', |p| p.to_fen_char());
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}", self)
    }
}
