//! Fetch-and-filter protocol shared by the listing and management views.

use std::{mem, sync::Arc};

use shared::domain::{Docente, DocenteId};
use tracing::{debug, error};

use crate::RecordStore;

pub const FETCH_FAILED_MESSAGE: &str = "Could not load the docentes.";

/// Last successful fetch plus the free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub records: Vec<Docente>,
    pub search: String,
}

impl Listing {
    /// Records whose name contains the search term, in fetched order.
    pub fn visible(&self) -> Vec<&Docente> {
        self.records
            .iter()
            .filter(|docente| docente.name_matches(&self.search))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    Loading,
    Ready(Listing),
    Failed { message: String },
}

pub struct RecordScreen {
    store: Arc<dyn RecordStore>,
    state: ScreenState,
}

impl RecordScreen {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            state: ScreenState::Loading,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ScreenState::Failed { .. })
    }

    /// Issues one listing call. A failed screen stays failed until it is
    /// mounted again; the search term survives a reload.
    pub async fn refresh(&mut self) {
        if self.is_failed() {
            debug!("screen failed earlier; skipping refresh until remount");
            return;
        }

        let search = match mem::replace(&mut self.state, ScreenState::Loading) {
            ScreenState::Ready(listing) => listing.search,
            _ => String::new(),
        };

        self.state = match self.store.list_active().await {
            Ok(records) => {
                debug!(count = records.len(), "fetched active docentes");
                ScreenState::Ready(Listing { records, search })
            }
            Err(err) => {
                error!(error = %err, "failed to fetch docentes");
                ScreenState::Failed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                }
            }
        };
    }

    /// Returns false when there is no fetched list to filter.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        match &mut self.state {
            ScreenState::Ready(listing) => {
                listing.search = term.into();
                true
            }
            _ => false,
        }
    }

    pub fn search(&self) -> &str {
        match &self.state {
            ScreenState::Ready(listing) => &listing.search,
            _ => "",
        }
    }

    pub fn records(&self) -> &[Docente] {
        match &self.state {
            ScreenState::Ready(listing) => &listing.records,
            _ => &[],
        }
    }

    pub fn visible(&self) -> Vec<&Docente> {
        match &self.state {
            ScreenState::Ready(listing) => listing.visible(),
            _ => Vec::new(),
        }
    }

    pub fn find(&self, id: DocenteId) -> Option<&Docente> {
        self.records().iter().find(|docente| docente.id == id)
    }
}
