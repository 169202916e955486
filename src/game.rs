//! 对局状态机
//!
//! 持有棋盘、当前回合、终局状态和走子记录。只有 [`Game::apply_move`] 和
//! [`Game::undo`] 会修改状态，并且都先完成全部校验再修改。

use log::{debug, info};
use serde::Serialize;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::fen::{to_fen, FenState};
use crate::types::{Color, Move, Piece, PieceKind, Position};
use crate::validator;

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Over { winner: Color },
}

/// 一步棋的记录，悔棋时按后进先出弹出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
}

/// 走子成功后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub game_over: bool,
    pub winner: Option<Color>,
}

/// 供界面重绘的完整局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// 按行排列，第 0 行是黑方底线
    pub board: Vec<Vec<Option<Piece>>>,
    pub fen: String,
    pub turn: Color,
    pub status: GameStatus,
    pub moves_played: usize,
    pub last_move: Option<MoveRecord>,
}

/// 一局象棋
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    status: GameStatus,
    history: Vec<MoveRecord>,
    /// 起始局面，用于重新开始和重放校验
    start: FenState,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// 标准开局，红方先走
    pub fn new() -> Game {
        Game::from_state(FenState {
            board: Board::initial(),
            turn: Color::Red,
        })
    }

    pub fn with_config(config: &GameConfig) -> Result<Game, GameError> {
        Ok(Game::from_state(config.start_state()?))
    }

    pub fn from_fen(fen: &str) -> Result<Game, GameError> {
        Game::with_config(&GameConfig::with_start_fen(fen))
    }

    fn from_state(start: FenState) -> Game {
        let status = status_of(&start.board);
        info!("new game: {} to move, {:?}", start.turn, status);
        Game {
            board: start.board.clone(),
            turn: start.turn,
            status,
            history: Vec::new(),
            start,
        }
    }

    /// 重新开始：清空记录并回到起始局面
    pub fn restart(&mut self) {
        info!("restart after {} moves", self.history.len());
        self.board = self.start.board.clone();
        self.turn = self.start.turn;
        self.status = status_of(&self.board);
        self.history.clear();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 获取当前回合
    #[inline]
    pub fn current_turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over { .. })
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Over { winner } => Some(winner),
            GameStatus::InProgress => None,
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 当前局面的 FEN
    pub fn fen(&self) -> String {
        to_fen(&self.board, self.turn)
    }

    /// 判断当前行棋方的走法是否合法
    pub fn is_legal(&self, from: Position, to: Position) -> bool {
        !self.is_over() && validator::is_legal(&self.board, from, to, self.turn)
    }

    /// 本回合某个棋子可以到达的位置
    ///
    /// 不是当前行棋方的棋子或对局已结束时返回空列表
    pub fn legal_destinations(&self, from: Position) -> Result<Vec<Position>, GameError> {
        let from = from.validate()?;
        if self.is_over() {
            return Ok(Vec::new());
        }
        match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => {
                Ok(validator::legal_destinations(&self.board, from))
            }
            _ => Ok(Vec::new()),
        }
    }

    /// 尝试走子，失败时状态不变
    pub fn attempt_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, GameError> {
        self.apply_move(Move::new(from, to))
    }

    /// 执行走子：吃子、记录、切换回合，吃掉将帅时结束对局
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, GameError> {
        if self.is_over() {
            debug!("rejected {}: game already over", mv);
            return Err(GameError::GameAlreadyOver);
        }
        let piece = validator::check_move(&self.board, mv.from, mv.to, self.turn).map_err(|e| {
            debug!("rejected {}: {}", mv, e);
            e
        })?;

        let captured = self.board.relocate(mv.from, mv.to);
        self.history.push(MoveRecord {
            from: mv.from,
            to: mv.to,
            captured,
        });
        debug!("{} {} {}", self.turn, piece.kind, mv);

        match captured {
            Some(taken) if taken.kind == PieceKind::General => {
                let winner = taken.color.opposite();
                self.status = GameStatus::Over { winner };
                info!("{} captured, {} wins", taken, winner);
            }
            _ => self.turn = self.turn.opposite(),
        }

        Ok(MoveOutcome {
            piece,
            captured,
            game_over: self.is_over(),
            winner: self.winner(),
        })
    }

    /// 悔棋：撤销最近一步，恢复被吃的棋子和回合
    ///
    /// 对局结束后不能悔棋
    pub fn undo(&mut self) -> Result<MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let record = self.history.pop().ok_or(GameError::NoHistory)?;

        let moved = self.board.relocate(record.to, record.from);
        debug_assert!(moved.is_none(), "origin square must be empty before undo");
        if let Some(captured) = record.captured {
            self.board.set(record.to, Some(captured))?;
        }
        self.turn = self.turn.opposite();
        debug!("undo {}{}, {} to move", record.from, record.to, self.turn);

        Ok(record)
    }

    /// 从起始局面按记录重放得到的棋盘，应与当前棋盘一致
    pub fn replayed_board(&self) -> Board {
        let mut board = self.start.board.clone();
        for record in &self.history {
            board.relocate(record.from, record.to);
        }
        board
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.rows(),
            fen: self.fen(),
            turn: self.turn,
            status: self.status,
            moves_played: self.history.len(),
            last_move: self.history.last().copied(),
        }
    }
}

/// 根据将帅是否在场判断局面状态，红帅缺失优先判黑胜
fn status_of(board: &Board) -> GameStatus {
    if board.find_general(Color::Red).is_none() {
        GameStatus::Over {
            winner: Color::Black,
        }
    } else if board.find_general(Color::Black).is_none() {
        GameStatus::Over { winner: Color::Red }
    } else {
        GameStatus::InProgress
    }
}
