use std::sync::Arc;

use shared::domain::Docente;

use crate::{screen::RecordScreen, RecordStore, ScreenState};

/// Read-only view over the active docentes.
pub struct ListingView {
    screen: RecordScreen,
}

impl ListingView {
    pub async fn mount(store: Arc<dyn RecordStore>) -> Self {
        let mut screen = RecordScreen::new(store);
        screen.refresh().await;
        Self { screen }
    }

    pub fn state(&self) -> &ScreenState {
        self.screen.state()
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        self.screen.set_search(term)
    }

    pub fn visible(&self) -> Vec<&Docente> {
        self.screen.visible()
    }
}
