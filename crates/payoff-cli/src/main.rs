//! payoff - ターミナルで対話的に意思決定分析を行う
//!
//! stdin から 1 行ずつユーザーのターンを読み、アシスタントの返答を stdout に出力する。
//! ログは stderr へ（`RUST_LOG`、デフォルトは `warn`）。
//!
//! ```text
//! payoff [--config payoff.toml] [--session session-<ULID>] [--store-dir DIR] [--json]
//! ```

mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use payoff_core::app::{AppBuilder, PayoffConfig, Session};
use payoff_core::domain::{SessionId, Stage};
use payoff_core::impls::{FileSessionStore, LocalComputeBackend};

const DEFAULT_STORE_DIR: &str = ".payoff/sessions";

#[derive(Debug, Parser)]
#[command(name = "payoff", version, about = "Decision analysis under uncertainty")]
struct Args {
    /// TOML 設定ファイル
    #[arg(long, default_value = "payoff.toml")]
    config: PathBuf,

    /// 既存セッションを再開（`session-<ULID>`）
    #[arg(long)]
    session: Option<SessionId>,

    /// セッションの保存先ディレクトリ（設定より優先）
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// 結果をスコア表ではなく JSON で出力
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> PayoffConfig {
    let mut config = PayoffConfig::load(&args.config).unwrap_or_else(|err| {
        tracing::warn!(path = %args.config.display(), error = %err, "ignoring config");
        PayoffConfig::default()
    });
    if let Some(dir) = &args.store_dir {
        config.session.store_dir = Some(dir.clone());
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args);

    let store_dir = config
        .session
        .store_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
    let app = AppBuilder::new()
        .with_store(FileSessionStore::new(store_dir))
        .with_backend(LocalComputeBackend::new())
        .with_config(config)
        .build()
        .context("invalid configuration")?;

    let mut session = match args.session {
        Some(id) => app.open_session(id).await,
        None => app.new_session().await,
    };
    eprintln!("session: {}", session.id());

    let mut busy = session.busy();
    tokio::spawn(async move {
        while busy.changed().await.is_ok() {
            if *busy.borrow_and_update() {
                eprintln!("(computing...)");
            }
        }
    });

    println!("{}\n", session.state().current_prompt());
    let places = app.config().display.decimals;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "/status" => {
                println!("{}\n", session.status());
                continue;
            }
            _ => {}
        }
        turn(&mut session, input, places, args.json).await?;
    }
    Ok(())
}

async fn turn(session: &mut Session, input: &str, places: u32, json: bool) -> Result<()> {
    let seen = session.state().history.len();
    let had_result = session.state().result.is_some();
    let state = session.send(input).await?;

    if state.history.is_empty() {
        println!("{}\n", state.current_prompt());
        return Ok(());
    }
    for reply in render::new_replies(&state.history, seen) {
        println!("{reply}\n");
    }
    if state.stage == Stage::Result
        && !had_result
        && let Some(result) = &state.result
    {
        if json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            println!("{}", render::score_table(result, places));
        }
    }
    Ok(())
}
