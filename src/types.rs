//! 象棋核心类型定义
//!
//! 阵营、棋子、坐标与走法

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// 棋盘行数
pub const ROWS: i8 = 10;
/// 棋盘列数
pub const COLS: i8 = 9;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 从 FEN 回合字符解析（`w` 视为红方）
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'r' | 'w' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }

    /// 底线所在行
    pub fn back_rank(&self) -> i8 {
        match self {
            Color::Red => ROWS - 1,
            Color::Black => 0,
        }
    }

    /// 兵卒前进方向（行增量）
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// 车
    Chariot,
    /// 马
    Horse,
    /// 相/象
    Elephant,
    /// 仕/士
    Advisor,
    /// 帅/将
    General,
    /// 炮
    Cannon,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Advisor,
        PieceKind::General,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// 从 FEN 字符解析（大小写均可，兼容 n/b 写法）
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'r' => Some(PieceKind::Chariot),
            'h' | 'n' => Some(PieceKind::Horse),
            'e' | 'b' => Some(PieceKind::Elephant),
            'a' => Some(PieceKind::Advisor),
            'k' => Some(PieceKind::General),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceKind::Chariot => 'r',
            PieceKind::Horse => 'h',
            PieceKind::Elephant => 'e',
            PieceKind::Advisor => 'a',
            PieceKind::General => 'k',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Chariot => "Chariot",
            PieceKind::Horse => "Horse",
            PieceKind::Elephant => "Elephant",
            PieceKind::Advisor => "Advisor",
            PieceKind::General => "General",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋子：类型与阵营互相独立，创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// FEN 字符：红方大写，黑方小写
    pub fn to_fen_char(&self) -> char {
        let ch = self.kind.to_fen_char();
        match self.color {
            Color::Red => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        Some(Piece { kind, color })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9 (0 是黑方底线，9 是红方底线)
/// col: 0-8 (从左到右)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..ROWS).contains(&self.row) && (0..COLS).contains(&self.col)
    }

    /// 越界时返回 `InvalidPosition`
    pub fn validate(self) -> Result<Position, GameError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GameError::InvalidPosition {
                row: self.row,
                col: self.col,
            })
        }
    }

    /// 检查位置是否在该方九宫内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (7..=9).contains(&self.row),
            Color::Black => (0..=2).contains(&self.row),
        }
    }

    /// 检查位置是否在该方半场（河界以内）
    pub fn is_on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (5..=9).contains(&self.row),
            Color::Black => (0..=4).contains(&self.row),
        }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 行优先下标，仅对合法位置有意义
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * (COLS as usize) + self.col as usize
    }

    pub fn from_index(index: usize) -> Position {
        Position {
            row: (index / COLS as usize) as i8,
            col: (index % COLS as usize) as i8,
        }
    }

    /// 全部 90 个格子，行优先
    pub fn all() -> impl Iterator<Item = Position> {
        (0..(ROWS as usize * COLS as usize)).map(Position::from_index)
    }

    /// 从坐标记号解析（如 "a0"，字母为列，数字为行）
    pub fn from_notation(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let col = match file.to_ascii_lowercase() {
            c @ 'a'..='i' => (c as u8 - b'a') as i8,
            _ => return None,
        };
        let row = rank.to_digit(10)? as i8;
        Some(Position { row, col })
    }

    /// 转换为坐标记号（如 "a0"）
    pub fn to_notation(&self) -> String {
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.to_notation())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

impl FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_notation(s.trim())
            .ok_or_else(|| GameError::InvalidNotation(s.to_string()))
    }
}

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// 从走法字符串解析，格式 `b9c7`
    pub fn from_notation(s: &str) -> Option<Move> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let from = Position::from_notation(&s[0..2])?;
        let to = Position::from_notation(&s[2..4])?;
        Some(Move { from, to })
    }

    pub fn to_notation(&self) -> String {
        format!("{}{}", self.from.to_notation(), self.to.to_notation())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_notation(s).ok_or_else(|| GameError::InvalidNotation(s.to_string()))
    }
}
