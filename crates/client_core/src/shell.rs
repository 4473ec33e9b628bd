use std::sync::Arc;

use crate::{ListingView, ManagementView, RecordStore};

pub enum ActiveView {
    Listing(ListingView),
    Management(ManagementView),
}

/// Mounts one view at a time. Toggling drops the current view and the other
/// one fetches from scratch.
pub struct RootShell {
    store: Arc<dyn RecordStore>,
    active: ActiveView,
}

impl RootShell {
    pub async fn mount(store: Arc<dyn RecordStore>) -> Self {
        let active = ActiveView::Listing(ListingView::mount(Arc::clone(&store)).await);
        Self { store, active }
    }

    pub async fn toggle(&mut self) {
        let store = Arc::clone(&self.store);
        self.active = match self.active {
            ActiveView::Listing(_) => ActiveView::Management(ManagementView::mount(store).await),
            ActiveView::Management(_) => ActiveView::Listing(ListingView::mount(store).await),
        };
    }

    pub fn toggle_label(&self) -> &'static str {
        match self.active {
            ActiveView::Listing(_) => "Go to manage docentes",
            ActiveView::Management(_) => "Go to list docentes",
        }
    }

    pub fn is_listing(&self) -> bool {
        matches!(self.active, ActiveView::Listing(_))
    }

    pub fn active(&self) -> &ActiveView {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveView {
        &mut self.active
    }
}
