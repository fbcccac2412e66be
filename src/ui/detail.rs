//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about the
//! current selection: a route edge (full statistics) or an endpoint
//! node (its connectivity).

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Selection};
use crate::graph::{route_title, GraphModel, NodeId};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the detail of the current selection as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(model) = app.graph.model() else {
        return;
    };

    let (title, lines) = match app.selection {
        Some(Selection::Route(pair)) => {
            let Some(rendered) = route_lines(model, pair) else {
                return;
            };
            rendered
        }
        Some(Selection::Endpoint(ref label)) => {
            let Some(rendered) = endpoint_lines(model, label) else {
                return;
            };
            rendered
        }
        None => return,
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height =
        ((lines.len() as u16 + 4).min(area.height * 90 / 100)).max(MIN_OVERLAY_HEIGHT);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Detail lines for a route edge: endpoints plus the full statistics text.
fn route_lines(model: &GraphModel, pair: (NodeId, NodeId)) -> Option<(String, Vec<Line<'static>>)> {
    let edge = model.edge(pair.0, pair.1)?;
    let from = model.node(edge.from)?.label.clone();
    let to = model.node(edge.to)?.label.clone();

    let mut lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(from, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" → "),
            Span::styled(to, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(format!(" Service: {}", edge.service)),
        Line::from(""),
    ];
    for text in route_title(&edge.route).lines() {
        lines.push(Line::from(format!(" {}", text)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Esc to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    Some((format!(" Route: {} ", edge.route.name), lines))
}

/// Detail lines for an endpoint node: every link touching it.
fn endpoint_lines(model: &GraphModel, label: &str) -> Option<(String, Vec<Line<'static>>)> {
    let id = model.node_id(label)?;

    let mut lines = vec![Line::from(""), Line::from(" Inbound:")];
    let mut inbound = 0;
    for edge in model.edges().filter(|e| e.to == id) {
        let from = model.node(edge.from).map(|n| n.label.as_str()).unwrap_or("?");
        lines.push(Line::from(format!("   {} ({})", from, edge.service)));
        inbound += 1;
    }
    if inbound == 0 {
        lines.push(Line::from(Span::styled(
            "   none",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(" Outbound:"));
    let mut outbound = 0;
    for edge in model.edges().filter(|e| e.from == id) {
        let to = model.node(edge.to).map(|n| n.label.as_str()).unwrap_or("?");
        lines.push(Line::from(format!("   {} ({})", to, edge.service)));
        outbound += 1;
    }
    if outbound == 0 {
        lines.push(Line::from(Span::styled(
            "   none",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Esc to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    Some((format!(" Endpoint: {} ", label), lines))
}
