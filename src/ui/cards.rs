use crate::app::{App, HeaderButton, InputMode, LayoutGeometry};
use crate::deck::Card;
use crate::modal::ModalKind;
use crate::theme::{Palette, Theme};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

const CARD_MIN_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 7;
const SEARCH_LABEL: &str = " 🔍 ";

pub fn render(app: &mut App, frame: &mut Frame, geometry: &mut LayoutGeometry) {
    let area = frame.area();
    let palette = app.palette();

    // Layout: header(2) + search(3) + categories(1) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0], &palette, geometry);
    render_search(app, frame, chunks[1], &palette, geometry);
    render_categories(app, frame, chunks[2], &palette, geometry);

    if app.is_loading() {
        render_placeholder(frame, chunks[3], &palette, "Loading skills…", "");
    } else if app.deck.is_empty_visible() {
        render_placeholder(
            frame,
            chunks[3],
            &palette,
            "No skills found",
            "Try a different search term or category",
        );
    } else if app.deck.is_grid_visible() {
        render_grid(app, frame, chunks[3], &palette, geometry);
    }

    render_status(app, frame, chunks[4], &palette);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect, palette: &Palette, geometry: &mut LayoutGeometry) {
    let count = match app.skill_count {
        Some(n) => n.to_string(),
        None => "loading…".to_string(),
    };
    let title = Line::from(vec![
        Span::styled(
            " Skill Explorer",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   [{} skills]", count), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.muted)),
        ),
        area,
    );

    // Buttons, right-aligned on the first row
    let theme_label = match app.theme.current() {
        Theme::Dark => "[☾ dark]".to_string(),
        Theme::Light => "[☀ light]".to_string(),
    };
    let mut buttons: Vec<(String, HeaderButton)> = ModalKind::ALL
        .iter()
        .map(|kind| (format!("[{}]", kind.title()), HeaderButton::Modal(*kind)))
        .collect();
    buttons.push((theme_label, HeaderButton::Theme));

    let total: u16 = buttons.iter().map(|(label, _)| label.width() as u16 + 1).sum();
    let mut x = area.right().saturating_sub(total);
    let mut spans = Vec::new();
    for (label, button) in buttons {
        let width = label.width() as u16;
        if x + width > area.right() {
            break;
        }
        geometry.header_buttons.push((Rect::new(x, area.y, width, 1), button));
        spans.push(Span::styled(label, Style::default().fg(palette.highlight)));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    let start = area.right().saturating_sub(total).max(area.x);
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(start, area.y, area.right() - start, 1),
    );
}

fn render_search(app: &App, frame: &mut Frame, area: Rect, palette: &Palette, geometry: &mut LayoutGeometry) {
    let editing = app.input_mode == InputMode::Editing;
    let style = if editing {
        Style::default().fg(palette.highlight)
    } else {
        Style::default().fg(palette.muted)
    };
    let title = if editing {
        " Search (Enter/Esc to leave) "
    } else {
        " Search (/) "
    };

    let text = if app.view.search_term.is_empty() && !editing {
        Line::from(vec![
            Span::raw(SEARCH_LABEL),
            Span::styled("Search skills by name, description or tag", Style::default().fg(palette.muted)),
        ])
    } else {
        Line::from(vec![
            Span::raw(SEARCH_LABEL),
            Span::styled(app.view.search_term.as_str(), Style::default().fg(palette.fg)),
        ])
    };

    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(title),
        ),
        area,
    );
    geometry.search = area;

    if editing {
        frame.set_cursor_position((search_cursor_x(area, &app.view.search_term), area.y + 1));
    }
}

/// Cursor column after `term`, kept inside the search box border.
fn search_cursor_x(area: Rect, term: &str) -> u16 {
    let offset = 1 + SEARCH_LABEL.width() + term.width();
    let last = area.right().saturating_sub(2);
    (area.x as usize).saturating_add(offset).min(last as usize) as u16
}

fn render_categories(app: &App, frame: &mut Frame, area: Rect, palette: &Palette, geometry: &mut LayoutGeometry) {
    let active = app.active_category_index();
    let mut spans = vec![Span::raw(" ")];
    let mut x = area.x + 1;

    for (index, tag) in app.category_tags.iter().enumerate() {
        let label = if index < 10 {
            format!(" {} {} ", index, tag.label)
        } else {
            format!(" {} ", tag.label)
        };
        let width = label.width() as u16;
        if x + width > area.right() {
            break;
        }
        let style = if index == active {
            Style::default()
                .fg(palette.chip_fg)
                .bg(palette.chip_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        geometry.categories.push((Rect::new(x, area.y, width, 1), index));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_grid(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette, geometry: &mut LayoutGeometry) {
    let columns = (area.width / CARD_MIN_WIDTH).max(1);
    let rows = (area.height / CARD_HEIGHT).max(1);
    app.grid_columns = columns as usize;
    app.grid_rows_visible = rows as usize;
    app.clamp_scroll();

    let card_width = area.width / columns;
    let first = app.scroll_row * app.grid_columns;
    let selected = app.deck.selected();

    for (offset, card) in app.deck.cards().iter().skip(first).enumerate() {
        let row = (offset / app.grid_columns) as u16;
        let col = (offset % app.grid_columns) as u16;
        if row >= rows {
            break;
        }
        let rect = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        );
        let index = first + offset;
        render_card(card, index == selected, frame, rect, palette);
        geometry.cards.push((rect, index));
        geometry
            .download_buttons
            .push((Rect::new(rect.right().saturating_sub(4), rect.y, 3, 1), index));
    }
}

fn render_card(card: &Card, selected: bool, frame: &mut Frame, area: Rect, palette: &Palette) {
    let border = if selected {
        Style::default().fg(palette.selected_border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };
    let name_width = (area.width as usize).saturating_sub(8);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {} ", truncate_str(&card.name, name_width)),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ))
        .title(Line::from(Span::styled("[↓]", Style::default().fg(palette.accent))).right_aligned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            card.category.as_str(),
            Style::default().fg(palette.accent).add_modifier(Modifier::ITALIC),
        )),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(card.description.as_str())
            .style(Style::default().fg(palette.fg))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let mut chips = Vec::new();
    for tag in &card.tags {
        chips.push(Span::styled(
            format!(" {} ", tag),
            Style::default().fg(palette.chip_fg).bg(palette.chip_bg),
        ));
        chips.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(chips)), chunks[2]);
}

fn render_placeholder(frame: &mut Frame, area: Rect, palette: &Palette, title: &str, hint: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint, Style::default().fg(palette.muted))),
    ];
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted)),
        ),
        area,
    );
}

fn render_status(app: &App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let key = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let status_style = if app.status_is_error {
        Style::default().fg(palette.error)
    } else {
        Style::default().fg(palette.muted)
    };
    let line = Line::from(vec![
        Span::styled(" ←↑↓→", key),
        Span::raw(" Move  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("c", key),
        Span::raw(" Category  "),
        Span::styled("d", key),
        Span::raw(" Download  "),
        Span::styled("t", key),
        Span::raw(" Theme  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), status_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
