//! SQLite binding of the record store.

use async_trait::async_trait;
use shared::domain::{Docente, DocenteId, DocentePatch, NewDocente};
use storage::Storage;
use tracing::warn;

use crate::{RecordStore, StoreError};

#[async_trait]
impl RecordStore for Storage {
    async fn list_active(&self) -> Result<Vec<Docente>, StoreError> {
        Ok(self.list_active_docentes().await?)
    }

    async fn insert(&self, docente: &NewDocente) -> Result<(), StoreError> {
        self.insert_docente(docente).await?;
        Ok(())
    }

    async fn update(&self, id: DocenteId, patch: &DocentePatch) -> Result<(), StoreError> {
        // An unmatched filter is not an error for the hosted store either.
        if !self.update_docente(id, patch).await? {
            warn!(docente_id = id.0, "update matched no docente");
        }
        Ok(())
    }
}
