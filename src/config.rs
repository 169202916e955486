//! 对局配置

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::fen::{parse_fen, FenState, INITIAL_FEN};

/// 对局配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 起始局面（FEN），重新开始时也回到这里；为空时使用标准开局
    pub start_fen: Option<String>,
}

impl GameConfig {
    pub fn with_start_fen(fen: impl Into<String>) -> Self {
        GameConfig {
            start_fen: Some(fen.into()),
        }
    }

    /// 解析起始局面
    pub fn start_state(&self) -> Result<FenState, GameError> {
        parse_fen(self.start_fen.as_deref().unwrap_or(INITIAL_FEN))
    }
}
