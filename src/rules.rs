//! 棋子走法规则
//!
//! 每种棋子一个纯函数，判断 `from -> to` 在几何与阻挡上是否合法。
//! 这里不检查“不能吃己方棋子”，该规则由 [`crate::validator`] 统一处理。
//! 调用方保证两个位置都在棋盘内且 `from` 上有棋子。

use crate::board::Board;
use crate::types::{Color, Position};

#[inline]
fn deltas(from: Position, to: Position) -> (i8, i8) {
    (to.row - from.row, to.col - from.col)
}

#[inline]
fn color_at(board: &Board, pos: Position) -> Option<Color> {
    board.piece_at(pos).map(|p| p.color)
}

/// 车：直线任意距离，中间不能有子
pub fn chariot_move(board: &Board, from: Position, to: Position) -> bool {
    board.count_between(from, to) == Some(0)
}

/// 马：走日字，不能蹩马腿
pub fn horse_move(board: &Board, from: Position, to: Position) -> bool {
    let (dr, dc) = deltas(from, to);
    let leg = match (dr.abs(), dc.abs()) {
        (2, 1) => from.offset(dr.signum(), 0),
        (1, 2) => from.offset(0, dc.signum()),
        _ => return false,
    };
    !board.has_piece(leg)
}

/// 相/象：走田字，不能过河，不能塞象眼
pub fn elephant_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(color) = color_at(board, from) else {
        return false;
    };
    let (dr, dc) = deltas(from, to);
    if dr.abs() != 2 || dc.abs() != 2 {
        return false;
    }
    if !to.is_on_own_side(color) {
        return false;
    }
    let eye = from.offset(dr / 2, dc / 2);
    !board.has_piece(eye)
}

/// 仕/士：斜走一步，不出九宫
pub fn advisor_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(color) = color_at(board, from) else {
        return false;
    };
    let (dr, dc) = deltas(from, to);
    dr.abs() == 1 && dc.abs() == 1 && to.is_in_palace(color)
}

/// 帅/将：直走一步，不出九宫
pub fn general_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(color) = color_at(board, from) else {
        return false;
    };
    let (dr, dc) = deltas(from, to);
    dr.abs() + dc.abs() == 1 && to.is_in_palace(color)
}

/// 炮：不吃子时同车，吃子时中间必须恰好隔一个子（炮架）
pub fn cannon_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(between) = board.count_between(from, to) else {
        return false;
    };
    if board.has_piece(to) {
        between == 1
    } else {
        between == 0
    }
}

/// 兵/卒：只能前进一步，过河后可以左右走一步，永不后退
pub fn soldier_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(color) = color_at(board, from) else {
        return false;
    };
    let (dr, dc) = deltas(from, to);
    if dr == color.forward() && dc == 0 {
        return true;
    }
    // 已过河：红兵在 4 行及以上，黑卒在 5 行及以下
    let crossed_river = !from.is_on_own_side(color);
    dr == 0 && dc.abs() == 1 && crossed_river
}
