mod api;
mod config;
mod models;
mod opener;
mod ui;

use std::fs::OpenOptions;
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiError, GalleryClient};
use crate::config::{API_URL_ENV, ConfigError, config_dir, data_dir, load_config};
use crate::ui::actions::Effect;
use crate::ui::state::Outcome;
use crate::ui::{App, handle_key_event, render};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("终端错误: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// 日志写入文件，终端由 TUI 独占
fn init_logging(path: &Path, level: tracing::Level) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 配置文件路径 (~/.config/webtoon-gallery/config.toml)
    let config = load_config(&config_dir()?.join("config.toml"))?
        .with_env_override(std::env::var(API_URL_ENV).ok());

    let log_path = data_dir()?.join("gallery.log");
    init_logging(&log_path, config.log_level())?;
    let client = Arc::new(GalleryClient::new(&config)?);
    tracing::info!(api = %client.base_url(), "starting webtoon gallery");
    let (tx, mut rx) = mpsc::unbounded_channel();

    // 创建应用状态并发起首批请求
    let mut app = App::new(config.grid_columns);
    app.mount();

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app, &client, &tx, &mut rx);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result.map_err(AppError::from)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &Arc<GalleryClient>,
    tx: &UnboundedSender<Outcome>,
    rx: &mut UnboundedReceiver<Outcome>,
) -> io::Result<()> {
    loop {
        for effect in app.take_effects() {
            run_effect(effect, client, tx);
        }
        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key_event(app, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// 执行副作用：网络请求放到后台任务，结果经通道送回主循环
fn run_effect(effect: Effect, client: &Arc<GalleryClient>, tx: &UnboundedSender<Outcome>) {
    let client = Arc::clone(client);
    match effect {
        Effect::FetchWebtoons { seq, query } => spawn_fetch(tx, async move {
            Outcome::Webtoons {
                seq,
                result: client.list_webtoons(&query).await,
            }
        }),
        Effect::FetchGenres => spawn_fetch(tx, async move { Outcome::Genres(client.genres().await) }),
        Effect::FetchStats => spawn_fetch(tx, async move { Outcome::Stats(client.stats().await) }),
        Effect::FetchDetail { id } => spawn_fetch(tx, async move {
            Outcome::Detail {
                id,
                result: client.webtoon(id).await,
            }
        }),
        Effect::OpenUrl(url) => {
            tracing::info!(%url, "opening link");
            if let Err(e) = opener::open_url(&url) {
                send_outcome(
                    tx,
                    Outcome::OpenFailed {
                        url,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }
}

fn spawn_fetch<F>(tx: &UnboundedSender<Outcome>, fut: F)
where
    F: Future<Output = Outcome> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        send_outcome(&tx, fut.await);
    });
}

/// 主循环退出后接收端已关闭，此时丢弃结果
fn send_outcome(tx: &UnboundedSender<Outcome>, outcome: Outcome) {
    if tx.send(outcome).is_err() {
        tracing::debug!("ui loop closed, dropping outcome");
    }
}
