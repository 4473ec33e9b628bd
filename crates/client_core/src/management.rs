//! Create, edit and soft-delete on top of the shared fetch protocol.
//!
//! Every successful mutation is followed by a full reload; nothing is applied
//! to the in-memory list ahead of the store.

use std::sync::Arc;

use shared::{
    domain::{Docente, DocenteFields, DocenteId, DocentePatch, NewDocente},
    error::{ErrorCode, ValidationError},
};
use tracing::{error, info};

use crate::{screen::RecordScreen, ManageError, RecordStore, ScreenState};

const ADDED_MESSAGE: &str = "Docente added successfully.";
const UPDATED_MESSAGE: &str = "Docente updated successfully.";
const DELETED_MESSAGE: &str = "Docente deleted successfully.";
const SAVE_FAILED_MESSAGE: &str = "Could not add or update the docente.";
const DELETE_FAILED_MESSAGE: &str = "Could not delete the docente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(DocenteId),
}

/// Modal form contents, kept as raw text until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub mode: FormMode,
    pub name: String,
    pub regime: String,
    pub order: String,
}

impl EditForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            regime: String::new(),
            order: String::new(),
        }
    }

    pub fn edit(docente: &Docente) -> Self {
        Self {
            mode: FormMode::Edit(docente.id),
            name: docente.name.clone(),
            regime: docente.regime.to_string(),
            order: docente.order.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add docente",
            FormMode::Edit(_) => "Edit docente",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Save changes",
        }
    }

    pub fn validate(&self) -> Result<DocenteFields, ValidationError> {
        DocenteFields::parse(&self.name, &self.regime, &self.order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error(ErrorCode),
}

/// Transient notice raised by a management action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    fn success(message: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.to_string(),
        }
    }

    fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error(code),
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::Success => "Success",
            AlertKind::Error(_) => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, AlertKind::Error(_))
    }
}

pub struct ManagementView {
    screen: RecordScreen,
    form: Option<EditForm>,
    alert: Option<Alert>,
}

impl ManagementView {
    pub async fn mount(store: Arc<dyn RecordStore>) -> Self {
        let mut screen = RecordScreen::new(store);
        screen.refresh().await;
        Self {
            screen,
            form: None,
            alert: None,
        }
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

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Opens an empty form in create mode. Needs a loaded list.
    pub fn open_create(&mut self) -> bool {
        if !matches!(self.screen.state(), ScreenState::Ready(_)) {
            return false;
        }
        self.form = Some(EditForm::create());
        true
    }

    /// Opens the form pre-filled from a record of the last fetch.
    pub fn open_edit(&mut self, id: DocenteId) -> bool {
        let Some(docente) = self.screen.find(id) else {
            return false;
        };
        self.form = Some(EditForm::edit(docente));
        true
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validates the open form and sends it as an insert or an
    /// identifier-matched update. On any failure the form stays open with the
    /// entered values.
    pub async fn submit(&mut self) -> Result<(), ManageError> {
        let Some(form) = self.form.as_ref() else {
            return Err(ManageError::FormClosed);
        };

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(err) => {
                self.alert = Some(Alert::error(err.code(), err.to_string()));
                return Err(err.into());
            }
        };

        let mode = form.mode;
        let store = Arc::clone(self.screen.store());
        let (result, success_message) = match mode {
            FormMode::Create => (
                store.insert(&NewDocente::from(fields)).await,
                ADDED_MESSAGE,
            ),
            FormMode::Edit(id) => (
                store.update(id, &DocentePatch::fields(fields)).await,
                UPDATED_MESSAGE,
            ),
        };

        if let Err(source) = result {
            error!(error = %source, ?mode, "failed to add or update docente");
            self.alert = Some(Alert::error(ErrorCode::MutationFailed, SAVE_FAILED_MESSAGE));
            return Err(ManageError::MutationFailed { source });
        }

        info!(?mode, "docente saved");
        self.alert = Some(Alert::success(success_message));
        self.form = None;
        self.screen.refresh().await;
        Ok(())
    }

    /// Soft-deletes by identifier. No confirmation step.
    pub async fn delete(&mut self, id: DocenteId) -> Result<(), ManageError> {
        let store = Arc::clone(self.screen.store());
        if let Err(source) = store.update(id, &DocentePatch::soft_delete()).await {
            error!(error = %source, docente_id = id.0, "failed to delete docente");
            self.alert = Some(Alert::error(
                ErrorCode::MutationFailed,
                DELETE_FAILED_MESSAGE,
            ));
            return Err(ManageError::MutationFailed { source });
        }

        info!(docente_id = id.0, "docente soft-deleted");
        self.alert = Some(Alert::success(DELETED_MESSAGE));
        self.screen.refresh().await;
        Ok(())
    }
}
