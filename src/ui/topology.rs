//! Topology view rendering.
//!
//! Displays the route graph as an edge table: source endpoint, target
//! endpoint, owning service, lifecycle state, and exchange count.
//! Edges whose statistics moved in the latest snapshot are marked.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::theme::hex_color;

/// Render the Topology view showing all graph edges.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(model) = app.graph.model() else {
        return;
    };

    let edges = app.filtered_edges();

    let header = Row::new(vec![
        Cell::from("From"),
        Cell::from("To"),
        Cell::from("Service"),
        Cell::from("Route"),
        Cell::from("State"),
        Cell::from("Exchanges"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = edges
        .iter()
        .map(|edge| {
            let from = model.node(edge.from).map(|n| n.label.as_str()).unwrap_or("?");
            let to = model.node(edge.to).map(|n| n.label.as_str()).unwrap_or("?");
            let changed = app.changed_edges.contains(&(edge.from, edge.to));

            let state = edge.route.state.as_deref().unwrap_or("-");
            let marker = if changed { "● " } else { "  " };
            let row_style = if changed {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}{}", marker, from)),
                Cell::from(to.to_string()),
                Cell::from(edge.service.clone())
                    .style(Style::default().fg(hex_color(&edge.color))),
                Cell::from(edge.route.name.clone()),
                Cell::from(state.to_string())
                    .style(app.theme.status_style(edge.route.health())),
                Cell::from(edge.label.clone().unwrap_or_else(|| "-".to_string())),
            ])
            .style(row_style)
        })
        .collect();

    let title = if app.filter_text.is_empty() {
        format!(" Topology ({} links) ", edges.len())
    } else {
        format!(" Topology ({} links, filter: {}) ", edges.len(), app.filter_text)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(28),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .row_highlight_style(app.theme.selected);

    let mut state = TableState::default();
    state.select(Some(app.selected_edge_index));

    frame.render_stateful_widget(table, area, &mut state);
}
