//! 走法校验
//!
//! 坐标检查、回合归属、不能吃己方棋子，然后按棋子类型分派到 [`crate::rules`]。
//! 不做将军检测：走完后己方将帅可被吃的走法同样合法。

use crate::board::Board;
use crate::error::{GameError, IllegalReason};
use crate::rules;
use crate::types::{Color, Move, Piece, PieceKind, Position};

/// 单个棋子的走法判定函数
pub type MoveRule = fn(&Board, Position, Position) -> bool;

/// 按棋子类型选择走法规则
pub fn rule_for(kind: PieceKind) -> MoveRule {
    match kind {
        PieceKind::Chariot => rules::chariot_move,
        PieceKind::Horse => rules::horse_move,
        PieceKind::Elephant => rules::elephant_move,
        PieceKind::Advisor => rules::advisor_move,
        PieceKind::General => rules::general_move,
        PieceKind::Cannon => rules::cannon_move,
        PieceKind::Soldier => rules::soldier_move,
    }
}

/// 完整校验一步棋，成功时返回要移动的棋子
pub fn check_move(
    board: &Board,
    from: Position,
    to: Position,
    side_to_move: Color,
) -> Result<Piece, GameError> {
    let from = from.validate()?;
    let to = to.validate()?;
    let illegal = |reason| GameError::IllegalMove { from, to, reason };

    if from == to {
        return Err(illegal(IllegalReason::SameSquare));
    }

    let piece = board
        .piece_at(from)
        .ok_or_else(|| illegal(IllegalReason::EmptySquare))?;
    if piece.color != side_to_move {
        return Err(GameError::NotYourTurn(side_to_move));
    }

    if let Some(target) = board.piece_at(to) {
        if target.color == side_to_move {
            return Err(illegal(IllegalReason::OwnPieceAtTarget));
        }
    }

    if !rule_for(piece.kind)(board, from, to) {
        return Err(illegal(IllegalReason::PieceRule(piece.kind)));
    }

    Ok(piece)
}

/// 判断走法是否合法
#[inline]
pub fn is_legal(board: &Board, from: Position, to: Position, side_to_move: Color) -> bool {
    check_move(board, from, to, side_to_move).is_ok()
}

/// 获取某个棋子的所有合法目标位置（按该棋子所属阵营判断），行优先
///
/// 起点越界或为空时返回空列表
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    Position::all()
        .filter(|&to| is_legal(board, from, to, piece.color))
        .collect()
}

/// 获取某方所有合法走法
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces(Some(color))
        .into_iter()
        .flat_map(|(from, _)| {
            legal_destinations(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_legal_moves_initial() {
        let board = Board::initial();
        // 初始局面双方各 44 个合法走法
        assert_eq!(legal_moves(&board, Color::Red).len(), 44);
        assert_eq!(legal_moves(&board, Color::Black).len(), 44);
    }

    #[test]
    fn test_same_square_never_legal() {
        let board = Board::initial();
        for (pos, piece) in board.pieces(None) {
            assert!(!is_legal(&board, pos, pos, piece.color));
            assert_eq!(
                check_move(&board, pos, pos, piece.color),
                Err(GameError::IllegalMove {
                    from: pos,
                    to: pos,
                    reason: IllegalReason::SameSquare
                })
            );
        }
    }

    #[test]
    fn test_rejection_reasons() {
        let board = Board::initial();

        assert_eq!(
            check_move(&board, p(10, 0), p(9, 0), Color::Red),
            Err(GameError::InvalidPosition { row: 10, col: 0 })
        );
        assert_eq!(
            check_move(&board, p(9, 0), p(9, -1), Color::Red),
            Err(GameError::InvalidPosition { row: 9, col: -1 })
        );
        assert_eq!(
            check_move(&board, p(5, 5), p(4, 5), Color::Red),
            Err(GameError::IllegalMove {
                from: p(5, 5),
                to: p(4, 5),
                reason: IllegalReason::EmptySquare
            })
        );
        assert_eq!(
            check_move(&board, p(3, 0), p(4, 0), Color::Red),
            Err(GameError::NotYourTurn(Color::Red))
        );
        assert_eq!(
            check_move(&board, p(9, 0), p(9, 1), Color::Red),
            Err(GameError::IllegalMove {
                from: p(9, 0),
                to: p(9, 1),
                reason: IllegalReason::OwnPieceAtTarget
            })
        );
        assert_eq!(
            check_move(&board, p(9, 1), p(8, 1), Color::Red),
            Err(GameError::IllegalMove {
                from: p(9, 1),
                to: p(8, 1),
                reason: IllegalReason::PieceRule(PieceKind::Horse)
            })
        );
        assert_eq!(
            check_move(&board, p(9, 1), p(7, 2), Color::Red),
            Ok(Piece::new(PieceKind::Horse, Color::Red))
        );
    }

    #[test]
    fn test_opening_horse_moves() {
        let board = Board::initial();
        assert!(is_legal(&board, p(9, 1), p(7, 2), Color::Red));
        assert!(is_legal(&board, p(9, 1), p(7, 0), Color::Red));
        // 相在 (9,2) 蹩马腿
        assert!(!is_legal(&board, p(9, 1), p(8, 3), Color::Red));
        assert_eq!(legal_destinations(&board, p(9, 1)), vec![p(7, 0), p(7, 2)]);
    }

    #[test]
    fn test_opening_cannon_destinations() {
        let board = Board::initial();
        let dests = legal_destinations(&board, p(7, 1));
        assert_eq!(dests.len(), 12);
        // 炮二平五
        assert!(dests.contains(&p(7, 4)));
        // 隔黑炮打马
        assert!(dests.contains(&p(0, 1)));
        assert!(!dests.contains(&p(2, 1)));
        assert!(!dests.contains(&p(9, 1)));
    }

    #[test]
    fn test_destinations_use_owner_color() {
        let board = Board::initial();
        assert_eq!(
            legal_destinations(&board, p(3, 4)),
            vec![p(4, 4)],
            "black soldier advances toward red"
        );
        assert!(legal_destinations(&board, p(4, 4)).is_empty());
        assert!(legal_destinations(&board, p(-1, 4)).is_empty());
    }

    #[test]
    fn test_moving_into_capture_is_allowed() {
        // 不做将军检测：红帅走到黑车的线上仍然合法
        let mut board = Board::empty();
        board
            .set(p(9, 4), Some(Piece::new(PieceKind::General, Color::Red)))
            .unwrap();
        board
            .set(p(0, 3), Some(Piece::new(PieceKind::Chariot, Color::Black)))
            .unwrap();
        assert!(is_legal(&board, p(9, 4), p(9, 3), Color::Red));
    }

    #[test]
    fn test_rule_dispatch_covers_every_kind() {
        let board = Board::initial();
        for kind in PieceKind::ALL {
            let (from, _) = board
                .pieces(Some(Color::Red))
                .into_iter()
                .find(|(_, piece)| piece.kind == kind)
                .unwrap();
            assert!(!rule_for(kind)(&board, from, from));
        }
    }
}
