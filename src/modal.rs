/// The three dismissible overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    HowTo,
    About,
    Thanks,
}

impl ModalKind {
    pub const ALL: [ModalKind; 3] = [Self::HowTo, Self::About, Self::Thanks];

    pub fn title(self) -> &'static str {
        match self {
            Self::HowTo => "How to use",
            Self::About => "About",
            Self::Thanks => "Thanks",
        }
    }

    /// Key that opens this overlay.
    pub fn opener(self) -> char {
        match self {
            Self::HowTo => '?',
            Self::About => 'i',
            Self::Thanks => '!',
        }
    }

    pub fn from_opener(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.opener() == c)
    }
}

/// Reference-counted scroll lock. Scrolling is allowed only at zero holders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollLock {
    holders: usize,
}

impl ScrollLock {
    fn acquire(&mut self) {
        self.holders += 1;
    }

    fn release(&mut self) {
        self.holders = self.holders.saturating_sub(1);
    }

    pub fn is_locked(&self) -> bool {
        self.holders > 0
    }
}

/// Open/closed state for each overlay, in stacking order.
#[derive(Debug, Default)]
pub struct ModalController {
    open: Vec<ModalKind>,
    scroll_lock: ScrollLock,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `kind` on top of any others. No-op if already open.
    pub fn open(&mut self, kind: ModalKind) {
        if self.is_open(kind) {
            return;
        }
        self.open.push(kind);
        self.scroll_lock.acquire();
        tracing::debug!(?kind, "modal opened");
    }

    /// Close `kind`. No-op if already closed.
    pub fn close(&mut self, kind: ModalKind) {
        if let Some(pos) = self.open.iter().position(|k| *k == kind) {
            self.open.remove(pos);
            self.scroll_lock.release();
            tracing::debug!(?kind, "modal closed");
        }
    }

    /// Close the topmost overlay, if any.
    pub fn close_top(&mut self) -> Option<ModalKind> {
        let top = self.top()?;
        self.close(top);
        Some(top)
    }

    /// Close every open overlay at once.
    pub fn close_all(&mut self) {
        for kind in std::mem::take(&mut self.open) {
            self.scroll_lock.release();
            tracing::debug!(?kind, "modal closed");
        }
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.open.contains(&kind)
    }

    pub fn any_open(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn top(&self) -> Option<ModalKind> {
        self.open.last().copied()
    }

    /// Open overlays, bottom first.
    pub fn stack(&self) -> &[ModalKind] {
        &self.open
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_closed_and_unlocked() {
        let modals = ModalController::new();
        assert!(!modals.any_open());
        assert!(!modals.scroll_locked());
        for kind in ModalKind::ALL {
            assert!(!modals.is_open(kind));
        }
    }

    #[test]
    fn test_open_about_then_escape_restores_scroll() {
        let mut modals = ModalController::new();
        modals.open(ModalKind::About);
        assert!(modals.is_open(ModalKind::About));
        assert!(modals.scroll_locked());

        modals.close_all();
        assert!(!modals.is_open(ModalKind::About));
        assert!(!modals.scroll_locked());
    }

    #[test]
    fn test_stacked_modals_keep_lock_until_last_closes() {
        let mut modals = ModalController::new();
        modals.open(ModalKind::HowTo);
        modals.open(ModalKind::Thanks);

        modals.close(ModalKind::Thanks);
        assert!(modals.scroll_locked());
        assert_eq!(modals.top(), Some(ModalKind::HowTo));

        modals.close(ModalKind::HowTo);
        assert!(!modals.scroll_locked());
    }

    #[test]
    fn test_reopen_and_reclose_are_noops() {
        let mut modals = ModalController::new();
        modals.open(ModalKind::About);
        modals.open(ModalKind::About);
        assert_eq!(modals.stack(), &[ModalKind::About]);

        modals.close(ModalKind::About);
        modals.close(ModalKind::About);
        assert!(!modals.scroll_locked());

        modals.open(ModalKind::HowTo);
        assert!(modals.scroll_locked());
    }

    #[test]
    fn test_close_all_closes_every_overlay() {
        let mut modals = ModalController::new();
        for kind in ModalKind::ALL {
            modals.open(kind);
        }
        modals.close_all();
        assert!(!modals.any_open());
        assert!(!modals.scroll_locked());
    }

    #[test]
    fn test_close_top() {
        let mut modals = ModalController::new();
        assert_eq!(modals.close_top(), None);
        modals.open(ModalKind::About);
        modals.open(ModalKind::Thanks);
        assert_eq!(modals.close_top(), Some(ModalKind::Thanks));
        assert_eq!(modals.stack(), &[ModalKind::About]);
    }

    #[test]
    fn test_openers() {
        assert_eq!(ModalKind::from_opener('?'), Some(ModalKind::HowTo));
        assert_eq!(ModalKind::from_opener('i'), Some(ModalKind::About));
        assert_eq!(ModalKind::from_opener('!'), Some(ModalKind::Thanks));
        assert_eq!(ModalKind::from_opener('x'), None);
    }
}
