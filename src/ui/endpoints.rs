//! Endpoints view rendering.
//!
//! Lists every endpoint node the graph has ever seen, with its degree
//! (how many links touch it) and the services on those links.

use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::theme::hex_color;

/// Render the Endpoints view as a searchable node table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(model) = app.graph.model() else {
        return;
    };

    let nodes = app.filtered_nodes();

    let header = Row::new(vec![
        Cell::from("Endpoint"),
        Cell::from("In"),
        Cell::from("Out"),
        Cell::from("Services"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = nodes
        .iter()
        .map(|node| {
            let mut inbound = 0;
            let mut outbound = 0;
            let mut services = BTreeSet::new();
            for edge in model.edges() {
                if edge.to == node.id {
                    inbound += 1;
                    services.insert(edge.service.as_str());
                }
                if edge.from == node.id {
                    outbound += 1;
                    services.insert(edge.service.as_str());
                }
            }

            let marker = if node.highlight { "● " } else { "  " };
            let row_style = if node.highlight {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}{}", marker, node.label))
                    .style(Style::default().fg(hex_color(&node.color))),
                Cell::from(inbound.to_string()),
                Cell::from(outbound.to_string()),
                Cell::from(services.into_iter().collect::<Vec<_>>().join(", ")),
            ])
            .style(row_style)
        })
        .collect();

    let title = if app.filter_text.is_empty() {
        format!(" Endpoints ({}) ", nodes.len())
    } else {
        format!(" Endpoints ({}, filter: {}) ", nodes.len(), app.filter_text)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(55),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Percentage(35),
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
    state.select(Some(app.selected_node_index));

    frame.render_stateful_widget(table, area, &mut state);
}
