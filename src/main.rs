//! Xiangqi CLI
//!
//! 命令行界面，用于查询合法走法和驱动对局
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 以 JSON 行通信，持有一局对局

use clap::{Parser, Subcommand};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use xiangqi::{
    Game, GameConfig, GameError, Move, MoveOutcome, MoveRecord, Position, Snapshot, INITIAL_FEN,
};

#[derive(Parser)]
#[command(name = "xiangqi")]
#[command(about = "Xiangqi rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出某个棋子本回合的合法目标位置
    Moves {
        /// FEN 字符串
        #[arg(long, default_value = INITIAL_FEN)]
        fen: String,

        /// 起点坐标（如 b9）
        #[arg(long)]
        from: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 依次执行走法并输出局面
    Play {
        /// FEN 字符串
        #[arg(long, default_value = INITIAL_FEN)]
        fen: String,

        /// 走法列表（如 h7e7 h0g2）
        moves: Vec<String>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server {
        /// 起始局面，`new` 命令未指定时也使用它
        #[arg(long)]
        fen: Option<String>,
    },
}

// Server 模式的请求和响应结构
#[derive(Debug, Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destinations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<MoveOutcomeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MoveOutcomeInfo {
    #[serde(rename = "move")]
    mv: String,
    captured: Option<char>,
    game_over: bool,
    winner: Option<String>,
}

impl MoveOutcomeInfo {
    fn new(mv: Move, outcome: &MoveOutcome) -> Self {
        MoveOutcomeInfo {
            mv: mv.to_notation(),
            captured: outcome.captured.map(|p| p.to_fen_char()),
            game_over: outcome.game_over,
            winner: outcome.winner.map(|c| c.to_string().to_lowercase()),
        }
    }
}

impl ServerResponse {
    fn success() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    fn with_snapshot(mut self, snapshot: &Snapshot) -> Self {
        self.snapshot = serde_json::to_value(snapshot).ok();
        self
    }

    fn error(err: &GameError) -> Self {
        Self {
            ok: false,
            error: Some(err.to_string()),
            code: Some(err.code().to_string()),
            ..Default::default()
        }
    }

    fn message(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => error!("failed to serialize output: {}", e),
    }
}

fn exit_with(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen, from, json } => {
            let game = Game::from_fen(&fen).unwrap_or_else(|e| exit_with(e));
            let from: Position = from.parse().unwrap_or_else(|e| exit_with(e));
            let dests = game.legal_destinations(from).unwrap_or_else(|e| exit_with(e));
            let dests: Vec<String> = dests.iter().map(Position::to_notation).collect();

            if json {
                print_json(&dests, true);
            } else {
                println!("Legal destinations from {} ({}):", from, dests.len());
                for to in &dests {
                    println!("  {}", to);
                }
            }
        }

        Commands::Play { fen, moves, json } => {
            let mut game = Game::from_fen(&fen).unwrap_or_else(|e| exit_with(e));
            for mv_str in &moves {
                let mv: Move = mv_str.parse().unwrap_or_else(|e| exit_with(e));
                let outcome = game.apply_move(mv).unwrap_or_else(|e| exit_with(e));
                if !json {
                    match outcome.captured {
                        Some(taken) => println!("{} {} takes {}", mv, outcome.piece, taken),
                        None => println!("{} {}", mv, outcome.piece),
                    }
                }
            }

            if json {
                print_json(&game.snapshot(), true);
            } else {
                println!("\n{}", game.board());
                match game.winner() {
                    Some(winner) => println!("Game over: {} wins", winner),
                    None => println!("{} to move", game.current_turn()),
                }
                println!("FEN: {}", game.fen());
            }
        }

        Commands::Server { fen } => {
            let config = GameConfig { start_fen: fen };
            run_server(config);
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server(config: GameConfig) {
    let mut game = Game::with_config(&config).unwrap_or_else(|e| exit_with(e));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("stdin closed: {}", e);
                break;
            }
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::message(&format!("Invalid JSON: {}", e)), false);
                let _ = stdout.flush();
                continue;
            }
        };

        if request.cmd == "quit" {
            break;
        }

        let response = handle_request(&mut game, &config, &request);
        print_json(&response, false);
        let _ = stdout.flush();
    }
}

/// 处理一条请求
fn handle_request(game: &mut Game, config: &GameConfig, request: &ServerRequest) -> ServerResponse {
    let result = match request.cmd.as_str() {
        "new" => handle_new(game, config, request),
        "moves" => handle_moves(game, request),
        "move" => handle_move(game, request),
        "undo" => game
            .undo()
            .map(|record| undone_response(game, &record)),
        "snapshot" => Ok(ServerResponse::success().with_snapshot(&game.snapshot())),
        "restart" => {
            game.restart();
            Ok(ServerResponse::success().with_snapshot(&game.snapshot()))
        }
        _ => return ServerResponse::message(&format!("Unknown command: {}", request.cmd)),
    };
    result.unwrap_or_else(|e| ServerResponse::error(&e))
}

fn required_position(value: &Option<String>, name: &str) -> Result<Position, GameError> {
    value
        .as_deref()
        .ok_or_else(|| GameError::InvalidNotation(format!("missing '{}'", name)))?
        .parse()
}

/// 处理 new 命令：按请求或默认配置开新局
fn handle_new(
    game: &mut Game,
    config: &GameConfig,
    request: &ServerRequest,
) -> Result<ServerResponse, GameError> {
    let config = match &request.fen {
        Some(fen) => GameConfig::with_start_fen(fen.as_str()),
        None => config.clone(),
    };
    *game = Game::with_config(&config)?;
    Ok(ServerResponse::success().with_snapshot(&game.snapshot()))
}

/// 处理 moves 命令
fn handle_moves(game: &Game, request: &ServerRequest) -> Result<ServerResponse, GameError> {
    let from = required_position(&request.from, "from")?;
    let dests = game.legal_destinations(from)?;
    Ok(ServerResponse {
        destinations: Some(dests.iter().map(Position::to_notation).collect()),
        ..ServerResponse::success()
    })
}

/// 处理 move 命令
fn handle_move(game: &mut Game, request: &ServerRequest) -> Result<ServerResponse, GameError> {
    let from = required_position(&request.from, "from")?;
    let to = required_position(&request.to, "to")?;
    let outcome = game.attempt_move(from, to)?;
    Ok(ServerResponse {
        outcome: Some(MoveOutcomeInfo::new(Move::new(from, to), &outcome)),
        ..ServerResponse::success()
    }
    .with_snapshot(&game.snapshot()))
}

fn undone_response(game: &Game, record: &MoveRecord) -> ServerResponse {
    ServerResponse {
        undone: Some(Move::new(record.from, record.to).to_notation()),
        ..ServerResponse::success()
    }
    .with_snapshot(&game.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> ServerRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_server_session() {
        let config = GameConfig::default();
        let mut game = Game::with_config(&config).unwrap();

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"moves","from":"b9"}"#));
        assert!(resp.ok);
        assert_eq!(resp.destinations, Some(vec!["a7".to_string(), "c7".to_string()]));

        let resp = handle_request(
            &mut game,
            &config,
            &request(r#"{"cmd":"move","from":"b7","to":"b0"}"#),
        );
        assert!(resp.ok);
        let outcome = resp.outcome.unwrap();
        assert_eq!(outcome.mv, "b7b0");
        assert_eq!(outcome.captured, Some('h'));
        assert!(!outcome.game_over);

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"undo"}"#));
        assert!(resp.ok);
        assert_eq!(resp.undone.as_deref(), Some("b7b0"));
        assert_eq!(resp.snapshot.unwrap()["fen"], INITIAL_FEN);

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"undo"}"#));
        assert!(!resp.ok);
        assert_eq!(resp.code.as_deref(), Some("no_history"));
    }

    #[test]
    fn test_server_rejections() {
        let config = GameConfig::default();
        let mut game = Game::new();

        let resp = handle_request(
            &mut game,
            &config,
            &request(r#"{"cmd":"move","from":"a3","to":"a4"}"#),
        );
        assert_eq!(resp.code.as_deref(), Some("not_your_turn"));

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"move","from":"a6"}"#));
        assert_eq!(resp.code.as_deref(), Some("invalid_notation"));

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"fly"}"#));
        assert!(!resp.ok);
        assert!(resp.code.is_none());
    }

    #[test]
    fn test_server_new_and_game_over() {
        let config = GameConfig::default();
        let mut game = Game::new();

        let resp = handle_request(
            &mut game,
            &config,
            &request(r#"{"cmd":"new","fen":"3k5/9/9/9/9/9/9/9/9/3RK4 r"}"#),
        );
        assert!(resp.ok);

        let resp = handle_request(
            &mut game,
            &config,
            &request(r#"{"cmd":"move","from":"d9","to":"d0"}"#),
        );
        let outcome = resp.outcome.unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner.as_deref(), Some("red"));

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"undo"}"#));
        assert_eq!(resp.code.as_deref(), Some("game_already_over"));

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"restart"}"#));
        assert!(resp.ok);
        assert!(!game.is_over());

        let resp = handle_request(&mut game, &config, &request(r#"{"cmd":"new"}"#));
        assert!(resp.ok);
        assert_eq!(game.fen(), INITIAL_FEN);
    }
}
