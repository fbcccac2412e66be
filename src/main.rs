// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod data;
mod events;
mod graph;
mod source;
mod ui;

use app::{App, View};
use source::{FileSource, HttpSource, SnapshotSource};

#[derive(Parser, Debug)]
#[command(name = "routegraph")]
#[command(about = "Terminal UI for watching integration route topologies")]
struct Args {
    /// Path to a snapshot JSON file
    #[arg(short, long, default_value = "snapshot.json", conflicts_with = "url")]
    file: PathBuf,

    /// Poll a monitoring server for snapshots (base URL)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Environment name passed to the server (used with --url)
    #[arg(long, default_value = "default", requires = "url")]
    env: String,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "3")]
    refresh: u64,

    /// Export the graph built from --file to a JSON file and exit
    #[arg(short, long, conflicts_with = "url")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let refresh = Duration::from_secs(args.refresh);

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path);
    }

    // Handle HTTP polling mode
    if let Some(ref url) = args.url {
        return run_with_http(url, &args.env, refresh);
    }

    // Default: file-based mode
    run_with_file(&args.file, refresh)
}

/// Run with a file-based snapshot source
fn run_with_file(path: &PathBuf, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, refresh)
}

/// Run with an HTTP polling source
fn run_with_http(url: &str, env: &str, refresh: Duration) -> Result<()> {
    // The poller lives on a tokio runtime that outlasts the TUI loop
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source = Box::new(HttpSource::spawn(url, env, refresh));

    // The source fills a channel in the background; poll it fast
    run_tui(source, Duration::from_millis(200))
}

/// Run the TUI with the given snapshot source
fn run_tui(source: Box<dyn SnapshotSource>, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source);
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, resize_banner_area(area));
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Topology => ui::topology::render(frame, app, chunks[2]),
                View::Endpoints => ui::endpoints::render(frame, app, chunks[2]),
                View::Services => ui::services::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Centered band for the "terminal too small" banner. The terminal can be
/// shorter than the banner itself, so the rect is clamped to the frame.
fn resize_banner_area(area: ratatui::layout::Rect) -> ratatui::layout::Rect {
    let y = (area.height / 2).saturating_sub(2);
    ratatui::layout::Rect::new(0, y, area.width, 5).intersection(area)
}

/// Build the graph from a snapshot file and export it to JSON
fn export_to_file(snapshot_path: &std::path::Path, export_path: &std::path::Path) -> Result<()> {
    let source = Box::new(FileSource::new(snapshot_path));
    let mut app = App::new(source);

    if !app.reload_data()? {
        if let Some(err) = app.connection_error.take() {
            anyhow::bail!("failed to load {}: {}", snapshot_path.display(), err);
        }
        anyhow::bail!("no snapshot data in {}", snapshot_path.display());
    }

    app.export_state(export_path)?;
    println!("Exported route graph to: {}", export_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_resize_banner_centered_in_normal_terminal() {
        let banner = resize_banner_area(Rect::new(0, 0, 40, 10));
        assert_eq!(banner, Rect::new(0, 3, 40, 5));
    }

    #[test]
    fn test_resize_banner_fits_tiny_terminals() {
        for height in 0..4 {
            let area = Rect::new(0, 0, 40, height);
            let banner = resize_banner_area(area);
            assert_eq!(banner.y, 0);
            assert!(banner.bottom() <= area.bottom());
        }
    }
}
