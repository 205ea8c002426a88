//! A falling-sand playground for the terminal.
//!
//! Run the binary to open the canvas and paint with the mouse.
//! Run with `--headless <TICKS>` to simulate without a terminal UI and print
//! the final grid as text.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::{renderer::Renderer, scene::Scene};
use crate::ui::{
    canvas::CanvasWidget, controls::ControlsPanel, layout::AppLayout, popup, theme::Theme,
};

/// Grid size used by `--headless` when none is given.
const HEADLESS_SIZE: (usize, usize) = (40, 20);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Falling-sand playground for the terminal")]
struct Cli {
    /// Grid width in cells (defaults to the width of the canvas pane).
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (defaults to twice the canvas pane height).
    #[arg(long)]
    height: Option<usize>,

    /// Starting scene.
    #[arg(long, value_enum, default_value_t = Scene::default())]
    scene: Scene,

    /// Frames painted per second.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Frames per simulation step (overrides the saved default).
    #[arg(long)]
    tick_interval: Option<u32>,

    /// Start with the simulation paused.
    #[arg(long)]
    paused: bool,

    /// Seed for the simulation's random choices.
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many ticks without a UI and print the grid to stdout.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<std::path::PathBuf>,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    if let Some(ticks) = cli.headless {
        return run_headless(&cli, ticks);
    }

    // ── size the grid before touching the terminal ───────────
    let (cols, rows) = crossterm::terminal::size()?;
    let terminal_area = Rect::new(0, 0, cols, rows);
    let pane = AppLayout::from_area(terminal_area).canvas_inner;
    let width = cli.width.unwrap_or(usize::from(pane.width).max(1));
    let height = cli.height.unwrap_or((usize::from(pane.height) * 2).max(1));

    let renderer = Renderer::with_scene(width, height, cli.scene, cli.seed)?;
    let user_config = config::AppConfig::load();
    let mut state = AppState::new(renderer, user_config);
    state.terminal_area = terminal_area;
    state.paused = cli.paused;
    if let Some(interval) = cli.tick_interval {
        state.set_tick_interval(interval);
    }
    tracing::info!(
        "starting {}x{} scene={} fps={} tick_interval={}",
        width,
        height,
        cli.scene,
        cli.fps,
        state.tick_interval
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, cli.fps).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Install the tracing subscriber.  Logs never go to stdout.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn run_headless(cli: &Cli, ticks: u64) -> Result<()> {
    print!("{}", headless_output(cli, ticks)?);
    Ok(())
}

/// The grid after `ticks` ticks, newline-terminated.
fn headless_output(cli: &Cli, ticks: u64) -> Result<String> {
    let width = cli.width.unwrap_or(HEADLESS_SIZE.0);
    let height = cli.height.unwrap_or(HEADLESS_SIZE.1);
    let mut renderer = Renderer::with_scene(width, height, cli.scene, cli.seed)?;
    for _ in 0..ticks {
        renderer.tick();
    }
    tracing::info!("headless run finished after {} ticks", renderer.ticks());
    let mut text = renderer.to_text();
    text.push('\n');
    Ok(text)
}

// ───────────────────────────────────────── frame loop ───────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    fps: u32,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(Duration::from_secs(1) / fps.max(1));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame: Option<Instant> = None;

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(w, h) => state.terminal_area = Rect::new(0, 0, w, h),
                }
            }

            _ = frames.tick() => {
                let started = Instant::now();
                state.begin_frame();
                terminal.draw(|frame| draw(frame, state))?;
                state.end_frame();

                let period = last_frame.map_or(Duration::ZERO, |prev| started - prev);
                last_frame = Some(started);
                state.record_frame_timing(started.elapsed(), period);
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());
    let renderer = &state.renderer;

    let (title, title_style) = if state.paused {
        (
            format!(" {}x{} · paused ", renderer.width(), renderer.height()),
            Theme::paused_title_style(),
        )
    } else {
        (
            format!(" {}x{} ", renderer.width(), renderer.height()),
            Theme::title_style(),
        )
    };
    let canvas_block = Block::default()
        .title(title)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        CanvasWidget::new(renderer.get_data(), renderer.width(), renderer.height())
            .block(canvas_block),
        layout.canvas_area,
    );

    frame.render_widget(
        ControlsPanel {
            paused: state.paused,
            tick_interval: state.tick_interval,
            material: state.material,
            stats: state.panel_stats(),
        },
        layout.panel_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Canvas => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::KeyBindingsSubmenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(
                popup::SettingsPopup {
                    state,
                    selected: state.settings_selected,
                },
                frame.area(),
            );
        }
        ActiveView::KeyBindingsSubmenu => {
            frame.render_widget(
                popup::KeyBindingsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Canvas => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_output_ends_with_a_newline() {
        let cli = Cli::parse_from([
            "sandspiel", "--headless", "0", "--width", "5", "--height", "3", "--scene", "bonfire",
        ]);
        let text = headless_output(&cli, 0).unwrap();
        assert_eq!(text, "  f  \n     \n=====\n");
    }

    #[test]
    fn headless_defaults_to_a_small_grid() {
        let cli = Cli::parse_from(["sandspiel", "--headless", "3", "--seed", "7"]);
        let text = headless_output(&cli, 3).unwrap();
        assert_eq!(text.lines().count(), HEADLESS_SIZE.1);
        assert!(text.lines().all(|l| l.chars().count() == HEADLESS_SIZE.0));
    }
}
