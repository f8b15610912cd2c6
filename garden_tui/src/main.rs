//! garden_tui - Walk the garden, meet vegetables, fight them

mod app;
mod ui;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use garden_core::config::{load_battle_constants, load_garden_config};
use garden_core::generate::{FighterGenerator, LlmFighterGenerator, OfflineGenerator};
use garden_core::{BattleConstants, GameSession, GardenConfig, RngSource};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "garden_tui", about = "A turn-based vegetable battler in your terminal")]
struct Cli {
    /// Directory holding battle.toml and garden.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,

    /// Never call the LLM; every fighter uses the fallback profile
    #[arg(long)]
    offline: bool,

    /// Where diagnostics are written
    #[arg(long, default_value = "garden.log")]
    log_file: PathBuf,
}

fn init_tracing(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("garden_core=info,garden_tui=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_constants(dir: &Path) -> BattleConstants {
    let path = dir.join("battle.toml");
    load_battle_constants(&path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "using default battle constants");
        BattleConstants::default()
    })
}

fn load_garden(dir: &Path) -> GardenConfig {
    let path = dir.join("garden.toml");
    load_garden_config(&path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "using default garden");
        GardenConfig::default()
    })
}

fn make_generator(offline: bool) -> Box<dyn FighterGenerator> {
    if offline {
        return Box::new(OfflineGenerator);
    }
    match LlmFighterGenerator::from_env() {
        Ok(generator) => {
            tracing::info!(model = generator.model(), "using LLM fighter generator");
            Box::new(generator)
        }
        Err(err) => {
            tracing::warn!(error = %err, "LLM unavailable, playing offline");
            Box::new(OfflineGenerator)
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let game = GameSession::new(
        load_constants(&cli.config),
        load_garden(&cli.config),
        Box::new(RngSource::thread()),
    );
    let mut app = App::new(game, make_generator(cli.offline), runtime);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, &*app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match (key.code, key.modifiers) {
                        (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                        _ => app.on_key(key),
                    }
                }
            }
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;
    }

    Ok(())
}
