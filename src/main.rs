//! Terminal 21 Run runner (default binary).
//!
//! Reads keys with crossterm, steps the engine on a fixed tick and redraws the
//! table as lines of styled text.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use run21::engine::{Engine, EngineConfig, Silent, TimedPresenter};
use run21::input::{handle_key_event, should_quit};
use run21::term::{TableView, TerminalRenderer};
use run21::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    let log_file = run21::logging::init(&config.log_dir)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    log::info!("logging to {}", log_file.display());
    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}

fn run(term: &mut TerminalRenderer, config: EngineConfig) -> Result<()> {
    log::info!("starting round with seed {}", config.seed);
    let mut engine = Engine::with_config(config, TimedPresenter::new(), Silent);

    let view = TableView::new();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut summary_written = false;

    loop {
        term.draw(view.render(&engine))?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        log::info!("quit: {}", serde_json::to_string(&engine.summary())?);
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        match engine.apply(action) {
                            Ok(true) => log::debug!("applied {}", action.as_str()),
                            Ok(false) => log::debug!("{} had no effect", action.as_str()),
                            Err(e) => log::warn!("{} rejected: {} ({})", action.as_str(), e, e.code()),
                        }
                        if action == GameAction::Restart {
                            summary_written = false;
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            engine.tick(TICK_MS);

            for animation in engine.presenter_mut().take_started() {
                log::debug!("animation {} ({}ms)", animation.as_str(), animation.duration_ms());
            }

            if engine.game().game_over() && !summary_written {
                log::info!("round summary: {}", serde_json::to_string(&engine.summary())?);
                summary_written = true;
            }
        }
    }
}
