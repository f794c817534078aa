use crate::catalog::Skill;
use crate::config::Config;
use crate::deck::Deck;
use crate::download::{trigger_download, DownloadMessage};
use crate::filter::{categories_of, Category, CategoryTag, ViewState};
use crate::modal::{ModalController, ModalKind};
use crate::theme::{Palette, ThemeManager};
use ratatui::layout::{Position, Rect};
use std::sync::mpsc::Sender;

/// Input focus: the search field or the card grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Clickable controls in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Theme,
    Modal(ModalKind),
}

/// Screen regions from the last frame, used for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub struct LayoutGeometry {
    pub search: Rect,
    pub header_buttons: Vec<(Rect, HeaderButton)>,
    /// Category tag rects, keyed by index into `App::category_tags`.
    pub categories: Vec<(Rect, usize)>,
    /// Card rects, keyed by index into the deck.
    pub cards: Vec<(Rect, usize)>,
    pub download_buttons: Vec<(Rect, usize)>,
    /// Content rect of the topmost overlay.
    pub modal: Option<Rect>,
    pub modal_close: Option<Rect>,
}

impl LayoutGeometry {
    pub fn hit<T: Copy>(regions: &[(Rect, T)], pos: Position) -> Option<T> {
        regions
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, value)| *value)
    }
}

/// Main application state.
pub struct App {
    pub config: Config,
    pub should_quit: bool,

    // Catalog, immutable once loaded
    pub skills: Vec<Skill>,
    /// `None` until the catalog load resolves.
    pub skill_count: Option<usize>,
    pub category_tags: Vec<CategoryTag>,

    pub view: ViewState,
    pub deck: Deck,
    pub input_mode: InputMode,

    pub theme: ThemeManager,
    pub modals: ModalController,

    // Grid layout from the last frame
    pub grid_columns: usize,
    pub grid_rows_visible: usize,
    pub scroll_row: usize,
    pub geometry: LayoutGeometry,

    pub status_msg: String,
    pub status_is_error: bool,

    download_tx: Sender<DownloadMessage>,
}

impl App {
    pub fn new(config: Config, theme: ThemeManager, download_tx: Sender<DownloadMessage>) -> Self {
        Self {
            config,
            should_quit: false,

            skills: Vec::new(),
            skill_count: None,
            category_tags: categories_of(&[]),

            view: ViewState::default(),
            deck: Deck::new(),
            input_mode: InputMode::Normal,

            theme,
            modals: ModalController::new(),

            grid_columns: 1,
            grid_rows_visible: 1,
            scroll_row: 0,
            geometry: LayoutGeometry::default(),

            status_msg: "Loading skills...".to_string(),
            status_is_error: false,

            download_tx,
        }
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    pub fn is_loading(&self) -> bool {
        self.skill_count.is_none()
    }

    /// Store the loaded catalog, update the count, and show it.
    pub fn catalog_loaded(&mut self, skills: Vec<Skill>) {
        self.skill_count = Some(skills.len());
        self.category_tags = categories_of(&skills);
        self.skills = skills;
        if !self
            .category_tags
            .iter()
            .any(|t| t.category == self.view.active_category)
        {
            self.view.active_category = Category::All;
        }
        self.apply_filter();
        if self.skills.is_empty() {
            self.set_error("No skills available (catalog empty or failed to load)");
        } else {
            self.set_status(format!("{} skills loaded", self.skills.len()));
        }
    }

    /// Re-run the filter over the catalog and re-render the deck.
    pub fn apply_filter(&mut self) {
        let filtered = self.view.apply(&self.skills);
        tracing::debug!(
            term = %self.view.search_term,
            category = %self.view.active_category,
            matches = filtered.len(),
            "filter applied"
        );
        self.deck.render(&filtered, &self.config.catalog);
        self.scroll_row = 0;
    }

    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn blur_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.view.search_term.push(c);
        self.apply_filter();
    }

    pub fn pop_search_char(&mut self) {
        if self.view.search_term.pop().is_some() {
            self.apply_filter();
        }
    }

    /// Number of matches for the current view.
    pub fn match_count(&self) -> usize {
        self.deck.cards().len()
    }

    /// Activate the category tag at `index` in `category_tags`.
    pub fn select_category(&mut self, index: usize) {
        if let Some(tag) = self.category_tags.get(index) {
            self.view.active_category = tag.category.clone();
            self.apply_filter();
        }
    }

    pub fn active_category_index(&self) -> usize {
        self.category_tags
            .iter()
            .position(|t| t.category == self.view.active_category)
            .unwrap_or(0)
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.category_tags.len();
        if len == 0 {
            return;
        }
        let current = self.active_category_index();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.select_category(next);
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.set_status(format!("Theme: {}", theme)),
            Err(e) => {
                tracing::warn!(error = %e, "could not persist theme");
                self.set_error(format!("Theme: {} (not saved: {})", self.theme.current(), e));
            }
        }
    }

    pub fn open_modal(&mut self, kind: ModalKind) {
        self.input_mode = InputMode::Normal;
        self.modals.open(kind);
    }

    /// Move the card selection unless an overlay holds the scroll lock.
    pub fn move_selection(&mut self, delta: isize) {
        if self.modals.scroll_locked() {
            return;
        }
        self.deck.move_by(delta);
    }

    pub fn move_rows(&mut self, rows: isize) {
        self.move_selection(rows * self.grid_columns.max(1) as isize);
    }

    pub fn page_down(&mut self) {
        self.move_rows(self.grid_rows_visible.max(1) as isize);
    }

    pub fn page_up(&mut self) {
        self.move_rows(-(self.grid_rows_visible.max(1) as isize));
    }

    /// Dispatch the download wired to the card at `index`.
    pub fn download_card(&mut self, index: usize) {
        let Some(request) = self.deck.download_for(index).cloned() else {
            return;
        };
        self.deck.select(index);
        self.set_status(format!("Downloading {}...", request.name));
        trigger_download(
            request,
            self.config.download_dir.clone(),
            self.config.timeout,
            self.download_tx.clone(),
        );
    }

    pub fn download_selected(&mut self) {
        self.download_card(self.deck.selected());
    }

    pub fn handle_download_message(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::Finished { name, saved_to } => {
                self.set_status(format!("Downloaded {} to {}", name, saved_to.display()));
            }
            DownloadMessage::Failed { name, error } => {
                self.set_error(format!("Download of {} failed: {}", name, error.user_message()));
            }
        }
    }

    /// Keep the selected card's row within the visible rows.
    pub fn clamp_scroll(&mut self) {
        let columns = self.grid_columns.max(1);
        let rows = self.grid_rows_visible.max(1);
        let selected_row = self.deck.selected() / columns;
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + rows {
            self.scroll_row = selected_row + 1 - rows;
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_msg = msg.into();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_msg = msg.into();
        self.status_is_error = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Location;
    use crate::theme::{LocalStorage, Theme};
    use std::path::PathBuf;
    use std::sync::mpsc::Receiver;

    pub(crate) fn sample_skills() -> Vec<Skill> {
        vec![
            Skill {
                name: "Git Helper".to_string(),
                category: "Dev".to_string(),
                category_slug: "dev".to_string(),
                description: "Helps with git".to_string(),
                tags: vec!["git".to_string(), "vcs".to_string()],
            },
            Skill {
                name: "Essay Coach".to_string(),
                category: "Writing".to_string(),
                category_slug: "writing".to_string(),
                description: "Improves prose".to_string(),
                tags: vec!["essay".to_string()],
            },
            Skill {
                name: "SQL Tutor".to_string(),
                category: "Dev".to_string(),
                category_slug: "dev".to_string(),
                description: "Explains queries".to_string(),
                tags: vec!["sql".to_string()],
            },
        ]
    }

    pub(crate) fn test_app(dir: &tempfile::TempDir) -> (App, Receiver<DownloadMessage>) {
        let config = Config::resolve(
            Location::Path(dir.path().join("skills-data.json")),
            Some(dir.path().join("downloads")),
            Some(dir.path().join("storage.json")),
            5,
            Some(PathBuf::from("unused.log")),
        );
        let theme = ThemeManager::init(LocalStorage::new(config.storage_path.clone()));
        let (tx, rx) = std::sync::mpsc::channel();
        (App::new(config, theme, tx), rx)
    }

    #[test]
    fn test_loading_until_catalog_arrives() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        assert!(app.is_loading());

        app.catalog_loaded(sample_skills());
        assert!(!app.is_loading());
        assert_eq!(app.skill_count, Some(3));
        assert_eq!(app.match_count(), 3);
        assert!(app.deck.is_grid_visible());
    }

    #[test]
    fn test_failed_fetch_leaves_usable_empty_ui() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);

        app.catalog_loaded(Vec::new());
        assert_eq!(app.skill_count, Some(0));
        assert!(app.deck.is_empty_visible());
        assert!(!app.deck.is_grid_visible());
        assert!(app.status_is_error);

        app.focus_search();
        app.push_search_char('g');
        assert_eq!(app.view.search_term, "g");
        assert_eq!(app.match_count(), 0);
        assert!(app.deck.is_empty_visible());
    }

    #[test]
    fn test_search_refilters_on_each_keystroke() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.catalog_loaded(sample_skills());

        app.push_search_char('s');
        app.push_search_char('q');
        assert_eq!(app.match_count(), 1);
        assert_eq!(app.deck.cards()[0].name, "SQL Tutor");

        app.pop_search_char();
        app.pop_search_char();
        assert_eq!(app.match_count(), 3);
    }

    #[test]
    fn test_category_selection_and_cycling() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.catalog_loaded(sample_skills());
        assert_eq!(app.category_tags.len(), 3);

        app.select_category(1);
        assert_eq!(app.view.active_category, Category::from_slug("dev"));
        assert_eq!(app.match_count(), 2);

        app.cycle_category(true);
        assert_eq!(app.view.active_category, Category::from_slug("writing"));
        app.cycle_category(true);
        assert_eq!(app.view.active_category, Category::All);
        app.cycle_category(false);
        assert_eq!(app.view.active_category, Category::from_slug("writing"));

        app.select_category(99);
        assert_eq!(app.view.active_category, Category::from_slug("writing"));
    }

    #[test]
    fn test_scroll_lock_blocks_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.catalog_loaded(sample_skills());

        app.open_modal(ModalKind::About);
        app.move_selection(1);
        assert_eq!(app.deck.selected(), 0);

        app.modals.close_all();
        app.move_selection(1);
        assert_eq!(app.deck.selected(), 1);
    }

    #[test]
    fn test_toggle_theme_updates_status() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.toggle_theme();
        assert_eq!(app.theme.current(), Theme::Light);
        assert_eq!(app.status_msg, "Theme: light");
        app.toggle_theme();
        assert_eq!(app.theme.current(), Theme::Dark);
    }

    #[test]
    fn test_clamp_scroll_follows_selection() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.catalog_loaded(sample_skills());
        app.grid_columns = 1;
        app.grid_rows_visible = 1;

        app.deck.select_last();
        app.clamp_scroll();
        assert_eq!(app.scroll_row, 2);

        app.deck.select_first();
        app.clamp_scroll();
        assert_eq!(app.scroll_row, 0);
    }

    #[tokio::test]
    async fn test_download_selected_saves_file() {
        let dir = tempfile::tempdir().unwrap();
        let skill_dir = dir.path().join("skills").join("essay-coach");
        std::fs::create_dir_all(&skill_dir).unwrap();
        std::fs::write(skill_dir.join("SKILL.md"), "coach").unwrap();

        let (mut app, rx) = test_app(&dir);
        app.catalog_loaded(sample_skills());
        app.deck.select(1);
        app.download_selected();
        assert_eq!(app.status_msg, "Downloading Essay Coach...");

        let message = tokio::task::spawn_blocking(move || {
            rx.recv_timeout(std::time::Duration::from_secs(5))
        })
        .await
        .unwrap()
        .unwrap();
        app.handle_download_message(message);
        assert!(!app.status_is_error);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("downloads").join("Essay Coach.md")).unwrap(),
            "coach"
        );
    }
}
