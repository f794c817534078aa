use crate::catalog::{Location, Skill};
use crate::download::DownloadRequest;

/// One visible card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Wired at render time to this card's own skill.
    pub download: Option<DownloadRequest>,
}

/// The visible card set: either a grid of cards or the empty placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    grid_visible: bool,
    empty_visible: bool,
    selected: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            grid_visible: true,
            empty_visible: false,
            selected: 0,
        }
    }

    /// Replace the visible cards with one card per skill, in order.
    pub fn render(&mut self, skills: &[&Skill], catalog: &Location) {
        if skills.is_empty() {
            self.grid_visible = false;
            self.empty_visible = true;
            self.cards.clear();
            self.selected = 0;
            return;
        }

        self.grid_visible = true;
        self.empty_visible = false;
        self.cards = skills
            .iter()
            .map(|skill| Card {
                name: skill.name.clone(),
                category: skill.category.clone(),
                description: skill.description.clone(),
                tags: skill.tags.clone(),
                download: DownloadRequest::for_skill(skill, catalog),
            })
            .collect();
        self.selected = 0;
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn is_empty_visible(&self) -> bool {
        self.empty_visible
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected = index;
        }
    }

    /// Move the selection by `delta` cards, clamped to the deck.
    pub fn move_by(&mut self, delta: isize) {
        if self.cards.is_empty() {
            return;
        }
        let last = self.cards.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.cards.len().saturating_sub(1);
    }

    /// Download request wired to the card at `index`.
    pub fn download_for(&self, index: usize) -> Option<&DownloadRequest> {
        self.cards.get(index)?.download.as_ref()
    }
}
