//! Services view rendering.
//!
//! One row per monitored service: route counts by health, exchange
//! totals, throughput rate, and a sparkline of recent activity.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::RouteHealth;
use crate::ui::theme::hex_color;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Services view as a table with throughput trends.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Service"),
        Cell::from("Routes"),
        Cell::from("Up"),
        Cell::from("Down"),
        Cell::from("Exchanges"),
        Cell::from("Rate"),
        Cell::from("Trend"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = data
        .services
        .iter()
        .map(|service| {
            let active =
                service.routes.iter().filter(|r| r.health() == RouteHealth::Active).count();
            let failed =
                service.routes.iter().filter(|r| r.health() == RouteHealth::Failed).count();
            let total: u64 =
                service.routes.iter().filter_map(|r| r.stats.exchanges_total).sum();

            let sparkline = render_sparkline(&app.history.sparkline(&service.name));
            let rate = app
                .history
                .rate(&service.name)
                .map(|r| format!("{:.0}/s", r))
                .unwrap_or_else(|| "-".to_string());

            let failed_style = if failed > 0 {
                app.theme.status_style(RouteHealth::Failed)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(service.name.clone())
                    .style(Style::default().fg(hex_color(&service.color))),
                Cell::from(service.routes.len().to_string()),
                Cell::from(active.to_string())
                    .style(Style::default().fg(app.theme.active)),
                Cell::from(failed.to_string()).style(failed_style),
                Cell::from(format_count(total)),
                Cell::from(rate),
                Cell::from(sparkline),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(8),
    ];

    let selected = app.selected_service_index.min(data.services.len().saturating_sub(1));
    let title = format!(" Services ({}) ", data.services.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Convert normalized history levels (0-7) into sparkline characters.
fn render_sparkline(levels: &[u8]) -> String {
    levels
        .iter()
        .map(|&l| SPARKLINE_CHARS[(l as usize).min(7)])
        .collect()
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
