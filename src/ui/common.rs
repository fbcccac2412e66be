//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::RouteHealth;

/// Render the header bar with topology overview.
///
/// Displays: connection indicator, route counts by health, node/edge totals.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(" ROUTEGRAPH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Count routes by health bucket
    let mut active = 0;
    let mut idle = 0;
    let mut failed = 0;
    for service in &data.services {
        for route in &service.routes {
            match route.health() {
                RouteHealth::Active => active += 1,
                RouteHealth::Idle => idle += 1,
                RouteHealth::Failed => failed += 1,
            }
        }
    }

    let (node_count, edge_count) = app
        .graph
        .model()
        .map(|m| (m.node_count(), m.edge_count()))
        .unwrap_or((0, 0));

    // Overall status indicator: connection loss trumps route health
    let (status_icon, status_style) = if app.connection_error.is_some() {
        ("●", app.theme.status_style(RouteHealth::Failed))
    } else if failed > 0 {
        ("●", app.theme.status_style(RouteHealth::Failed))
    } else {
        ("●", app.theme.status_style(RouteHealth::Active))
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled(
            format!("{} ", data.name.to_uppercase()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(format!("{}", active), Style::default().fg(app.theme.active)),
        Span::raw(" up "),
        if idle > 0 {
            Span::styled(format!("{}", idle), Style::default().fg(app.theme.idle))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" idle "),
        if failed > 0 {
            Span::styled(
                format!("{}", failed),
                Style::default().fg(app.theme.failed).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" down │ "),
        Span::styled(
            format!("{}", data.services.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" services │ "),
        Span::raw(format!("{} endpoints {} links", node_count, edge_count)),
    ];

    if let Some(ref err) = app.connection_error {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            err.clone(),
            Style::default().fg(app.theme.failed).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Topology "),
        Line::from(" 2:Endpoints "),
        Line::from(" 3:Services "),
    ];

    let selected = match app.current_view {
        View::Topology => 0,
        View::Endpoints => 1,
        View::Services => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, time since last snapshot, and available
/// controls. Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Temporary status message takes priority
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let updated = data.last_updated.as_deref().unwrap_or("-");

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Topology | View::Endpoints => {
                    "/:search Tab:switch Enter:detail ?:help q:quit"
                }
                View::Services => "↑↓:select Tab:switch ?:help q:quit",
            }
        };

        format!(" {} | Updated {} | {}", app.source_description(), updated, controls)
    } else if let Some(ref err) = app.connection_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       View detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Topology & Endpoints",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay, responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
