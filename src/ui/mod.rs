mod cards;
mod modal;

use crate::app::{App, LayoutGeometry};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
};

/// Top-level render. Records clickable regions into `app.geometry`.
pub fn render(app: &mut App, frame: &mut Frame) {
    let palette = app.palette();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let mut geometry = LayoutGeometry::default();
    cards::render(app, frame, &mut geometry);

    // Overlays in stacking order; the last one drawn is on top
    for (depth, kind) in app.modals.stack().iter().enumerate() {
        let (content, close) = modal::render(*kind, &palette, frame, depth as u16);
        geometry.modal = Some(content);
        geometry.modal_close = Some(close);
    }

    app.geometry = geometry;
}

/// Create a centered rectangle using percentage of parent area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
