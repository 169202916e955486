//! 随机对局下的悔棋与走法性质
//!
//! 用固定种子的随机走子生成大量局面，检查：
//! - 走一步再悔棋，棋盘和回合完全复原
//! - 走 n 步再悔 n 步，回到开局
//! - 记录重放得到的棋盘与当前棋盘一致
//! - 相不过河、仕不出九宫、兵不后退不斜走

use rand::prelude::*;
use xiangqi::{legal_moves, Board, Color, Game, Move, PieceKind, Position};

const SEEDS: u64 = 24;
const MAX_PLIES: usize = 80;

/// 随机挑一步不吃将帅的合法走法（吃将帅后不能悔棋）
fn random_move(game: &Game, rng: &mut StdRng) -> Option<Move> {
    let board = game.board();
    let moves: Vec<Move> = legal_moves(board, game.current_turn())
        .into_iter()
        .filter(|mv| {
            board
                .piece_at(mv.to)
                .map_or(true, |p| p.kind != PieceKind::General)
        })
        .collect();
    moves.choose(rng).copied()
}

fn play_random(seed: u64, mut on_position: impl FnMut(&Game)) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new();
    for _ in 0..MAX_PLIES {
        on_position(&game);
        match random_move(&game, &mut rng) {
            Some(mv) => {
                game.apply_move(mv).unwrap();
            }
            None => break,
        }
    }
    game
}

#[test]
fn apply_then_undo_restores_exactly() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new();
        for _ in 0..MAX_PLIES {
            let Some(mv) = random_move(&game, &mut rng) else {
                break;
            };
            let board_before = game.board().clone();
            let turn_before = game.current_turn();
            let history_before = game.history().len();

            let outcome = game.apply_move(mv).unwrap();
            assert_eq!(game.board().piece_at(mv.to), Some(outcome.piece));
            assert_eq!(game.board().piece_at(mv.from), None);

            let record = game.undo().unwrap();
            assert_eq!((record.from, record.to), (mv.from, mv.to));
            assert_eq!(record.captured, outcome.captured);
            assert_eq!(game.board(), &board_before, "seed {} move {}", seed, mv);
            assert_eq!(game.current_turn(), turn_before);
            assert_eq!(game.history().len(), history_before);

            game.apply_move(mv).unwrap();
        }
    }
}

#[test]
fn full_rewind_returns_to_opening() {
    for seed in 0..SEEDS {
        let mut game = play_random(seed, |game| {
            assert_eq!(&game.replayed_board(), game.board());
        });
        assert!(!game.is_over());

        let plies = game.history().len();
        for _ in 0..plies {
            game.undo().unwrap();
        }
        assert_eq!(game.board(), &Board::initial(), "seed {}", seed);
        assert_eq!(game.current_turn(), Color::Red);
        assert!(game.history().is_empty());
    }
}

#[test]
fn turn_alternates_with_history_length() {
    let game = play_random(7, |game| {
        let expected = if game.history().len() % 2 == 0 {
            Color::Red
        } else {
            Color::Black
        };
        assert_eq!(game.current_turn(), expected);
    });
    assert!(!game.history().is_empty());
}

#[test]
fn destinations_respect_piece_confinement() {
    for seed in 0..SEEDS {
        play_random(seed, |game| {
            let board = game.board();
            for (from, piece) in board.pieces(Some(game.current_turn())) {
                for to in game.legal_destinations(from).unwrap() {
                    assert_ne!(from, to);
                    if let Some(target) = board.piece_at(to) {
                        assert_ne!(target.color, piece.color, "self-capture {}{}", from, to);
                    }
                    match piece.kind {
                        PieceKind::Elephant => assert!(to.is_on_own_side(piece.color)),
                        PieceKind::Advisor | PieceKind::General => {
                            assert!(to.is_in_palace(piece.color))
                        }
                        PieceKind::Soldier => check_soldier_step(from, to, piece.color),
                        _ => {}
                    }
                }
            }
        });
    }
}

fn check_soldier_step(from: Position, to: Position, color: Color) {
    let dr = to.row - from.row;
    let dc = to.col - from.col;
    assert!(dr != -color.forward(), "soldier moved backward {}{}", from, to);
    assert!(dr == 0 || dc == 0, "soldier moved diagonally {}{}", from, to);
    if dc != 0 {
        assert!(!from.is_on_own_side(color), "sideways before river {}{}", from, to);
    }
}

#[test]
fn line_pieces_respect_obstruction() {
    for seed in 0..SEEDS {
        play_random(seed, |game| {
            let board = game.board();
            for (from, piece) in board.pieces(Some(game.current_turn())) {
                if !matches!(piece.kind, PieceKind::Chariot | PieceKind::Cannon) {
                    continue;
                }
                for to in game.legal_destinations(from).unwrap() {
                    let between = board.count_between(from, to).unwrap();
                    let capture = board.has_piece(to);
                    let expected = match (piece.kind, capture) {
                        (PieceKind::Cannon, true) => 1,
                        _ => 0,
                    };
                    assert_eq!(between, expected, "{} {}{}", piece, from, to);
                }
            }
        });
    }
}
