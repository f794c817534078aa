use crate::app::{App, HeaderButton, InputMode, LayoutGeometry};
use crate::modal::ModalKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Escape dismisses every open overlay, wherever focus is
    if key.code == KeyCode::Esc && app.modals.any_open() {
        app.modals.close_all();
        return;
    }

    if app.modals.any_open() {
        handle_modal_key(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Editing => handle_search_key(app, key),
        InputMode::Normal => handle_grid_key(app, key),
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Enter => {
            app.modals.close_top();
        }
        KeyCode::Char(c) => {
            if let Some(kind) = ModalKind::from_opener(c) {
                app.open_modal(kind);
            }
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.blur_search();
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_search_char(c);
        }
        KeyCode::Down => {
            app.blur_search();
        }
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.focus_search();
        }
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1),
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_rows(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_rows(-1),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Char('g') => app.deck.select_first(),
        KeyCode::Char('G') => app.deck.select_last(),
        KeyCode::Enter | KeyCode::Char('d') => {
            app.download_selected();
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
        }
        KeyCode::Char('c') => app.cycle_category(true),
        KeyCode::Char('C') => app.cycle_category(false),
        KeyCode::Char(c @ '0'..='9') => {
            if let Some(index) = c.to_digit(10) {
                app.select_category(index as usize);
            }
        }
        KeyCode::Char(c) => {
            if let Some(kind) = ModalKind::from_opener(c) {
                app.open_modal(kind);
            }
        }
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let pos = Position::new(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.modals.any_open() {
                click_overlay(app, pos);
            } else {
                click_page(app, pos);
            }
        }
        MouseEventKind::ScrollDown => app.move_rows(1),
        MouseEventKind::ScrollUp => app.move_rows(-1),
        _ => {}
    }
}

/// A click on the close control or on the background closes the top overlay.
fn click_overlay(app: &mut App, pos: Position) {
    let on_close = app.geometry.modal_close.is_some_and(|r| r.contains(pos));
    let on_content = app.geometry.modal.is_some_and(|r| r.contains(pos));
    if on_close || !on_content {
        app.modals.close_top();
    }
}

fn click_page(app: &mut App, pos: Position) {
    let geometry = &app.geometry;

    if let Some(button) = LayoutGeometry::hit(&geometry.header_buttons, pos) {
        match button {
            HeaderButton::Theme => app.toggle_theme(),
            HeaderButton::Modal(kind) => app.open_modal(kind),
        }
        return;
    }

    if geometry.search.contains(pos) {
        app.focus_search();
        return;
    }

    if let Some(index) = LayoutGeometry::hit(&geometry.categories, pos) {
        app.select_category(index);
        return;
    }

    if let Some(index) = LayoutGeometry::hit(&geometry.download_buttons, pos) {
        app.blur_search();
        app.download_card(index);
        return;
    }

    if let Some(index) = LayoutGeometry::hit(&geometry.cards, pos) {
        app.blur_search();
        app.deck.select(index);
        return;
    }

    app.blur_search();
}
