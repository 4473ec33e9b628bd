use super::*;

use client_core::{AlertKind, StoreError};
use shared::error::{ErrorCode, FormField, ValidationError};

fn rejected() -> ManageError {
    ManageError::MutationFailed {
        source: StoreError::Rejected {
            status: 500,
            body: "permission denied for table Docentes".into(),
        },
    }
}

#[test]
fn alert_message_is_the_exit_error() {
    let alert = Alert {
        kind: AlertKind::Error(ErrorCode::MutationFailed),
        message: "Could not delete the docente.".into(),
    };
    assert_eq!(
        failure_message(Some(alert), &rejected()),
        "Could not delete the docente."
    );
}

#[test]
fn store_detail_never_reaches_the_user() {
    let message = failure_message(None, &rejected());
    assert_eq!(message, GENERIC_FAILURE);
    assert!(!message.contains("500"));
    assert!(!message.contains("permission denied"));
}

#[test]
fn validation_text_is_shown_without_alert() {
    let err = ManageError::Validation(ValidationError::NotANumber {
        field: FormField::Order,
    });
    assert_eq!(failure_message(None, &err), "Order must be a valid number.");
}

#[test]
fn cli_parses_edit_overrides() {
    let cli = Cli::try_parse_from(["vincula", "--quiet", "edit", "4", "--regime", "20"])
        .expect("parse");
    assert!(cli.quiet);
    match cli.command {
        Command::Edit {
            id, name, regime, order,
        } => {
            assert_eq!(id, 4);
            assert!(name.is_none());
            assert_eq!(regime.as_deref(), Some("20"));
            assert!(order.is_none());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[tokio::test]
async fn sqlite_store_opens_after_health_check() {
    let settings = Settings {
        database_url: ":memory:".into(),
        ..Settings::default()
    };
    let store = open_store(&settings).await.expect("open");
    assert!(store.list_active().await.expect("list").is_empty());
}

#[tokio::test]
async fn rest_store_requires_project_url() {
    let settings = Settings {
        backend: Backend::Rest,
        supabase_key: Some("anon".into()),
        ..Settings::default()
    };
    let err = open_store(&settings).await.err().expect("missing url");
    assert!(err.to_string().contains("SUPABASE_URL"));
}
