use crate::modal::ModalKind;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Draw one overlay. Returns its content rect and close-control rect.
pub fn render(kind: ModalKind, palette: &Palette, frame: &mut Frame, depth: u16) -> (Rect, Rect) {
    let base = super::centered_rect(64, 70, frame.area());
    // Offset stacked overlays so the one underneath stays visible
    let area = Rect::new(
        (base.x + depth * 2).min(frame.area().right().saturating_sub(base.width)),
        (base.y + depth).min(frame.area().bottom().saturating_sub(base.height)),
        base.width,
        base.height,
    );

    frame.render_widget(Clear, area);

    let body = match kind {
        ModalKind::HowTo => how_to_lines(palette),
        ModalKind::About => about_lines(palette),
        ModalKind::Thanks => thanks_lines(palette),
    };

    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(format!(" {} ", kind.title()))
                .title(Line::from(Span::styled("[x]", Style::default().fg(palette.highlight))).right_aligned())
                .title_bottom(
                    Line::from(" q/Enter close · Esc close all · click outside to dismiss ")
                        .style(Style::default().fg(palette.muted)),
                ),
        );
    frame.render_widget(widget, area);

    let close = Rect::new(area.right().saturating_sub(4), area.y, 3, 1);
    (area, close)
}

fn heading<'a>(text: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(palette.highlight)),
        Span::raw(action),
    ])
}

fn how_to_lines(palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        heading("  Finding skills", palette),
        binding("/", "Focus the search box (type to filter)", palette),
        binding("Enter/Esc", "Leave the search box", palette),
        binding("c / C", "Next / previous category", palette),
        binding("0-9", "Pick a category (0 = all)", palette),
        Line::from(""),
        heading("  Cards", palette),
        binding("←↑↓→ hjkl", "Move between cards", palette),
        binding("PgUp/PgDn", "Page through cards", palette),
        binding("g / G", "First / last card", palette),
        binding("Enter / d", "Download the selected SKILL.md", palette),
        Line::from(""),
        heading("  Everything else", palette),
        binding("t", "Toggle light / dark theme", palette),
        binding("? i !", "How to / About / Thanks", palette),
        binding("Esc", "Close all dialogs", palette),
        binding("q", "Quit", palette),
        Line::from(""),
        Line::from(Span::styled(
            "  Downloaded skills are saved as <name>.md. Drop the file into your",
            Style::default().fg(palette.muted),
        )),
        Line::from(Span::styled(
            "  agent's skills folder to install it.",
            Style::default().fg(palette.muted),
        )),
    ]
}

fn about_lines(palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        heading("  Skill Explorer", palette),
        Line::from(format!("  Version {}", env!("CARGO_PKG_VERSION"))),
        Line::from(""),
        Line::from("  A browsable catalog of agent skills. Each skill is a single"),
        Line::from("  SKILL.md file describing a capability an agent can load on"),
        Line::from("  demand. Search by name, description or tag, narrow by"),
        Line::from("  category, and download the ones you want."),
    ]
}

fn thanks_lines(palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        heading("  Thank you", palette),
        Line::from(""),
        Line::from("  To everyone who wrote, reviewed and shared a skill in this"),
        Line::from("  catalog, and to the maintainers of ratatui, crossterm and"),
        Line::from("  tokio, which this browser is built on."),
    ]
}
