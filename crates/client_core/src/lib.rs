use async_trait::async_trait;
use shared::domain::{Docente, DocenteId, DocentePatch, NewDocente};

pub mod error;
pub mod listing;
mod local;
pub mod management;
pub mod screen;
pub mod shell;
pub mod transport;

pub use error::{ManageError, StoreError};
pub use listing::ListingView;
pub use management::{Alert, AlertKind, EditForm, FormMode, ManagementView};
pub use screen::{Listing, RecordScreen, ScreenState};
pub use shell::{ActiveView, RootShell};
pub use transport::RestRecordStore;

/// Query/mutation capability over the `Docentes` table.
///
/// Every call is single-shot: it either applies entirely or fails, and the
/// caller never retries on its own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records with `is_deleted != true`, ascending by identifier.
    async fn list_active(&self) -> Result<Vec<Docente>, StoreError>;
    async fn insert(&self, docente: &NewDocente) -> Result<(), StoreError>;
    /// Applies `patch` to the record matched by `id`.
    async fn update(&self, id: DocenteId, patch: &DocentePatch) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
