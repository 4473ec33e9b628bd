//! Plain-text rendering of the views.

use client_core::{Alert, EditForm, ScreenState};
use shared::domain::Docente;

pub const LOADING_TEXT: &str = "Loading docentes...";

pub fn docente_row(docente: &Docente) -> String {
    format!(
        "#{} {}  Regime: {} hours  Order: {}",
        docente.id, docente.name, docente.regime, docente.order
    )
}

pub fn screen(title: &str, state: &ScreenState, visible: &[&Docente]) -> String {
    match state {
        ScreenState::Loading => LOADING_TEXT.to_string(),
        ScreenState::Failed { message } => message.clone(),
        ScreenState::Ready(listing) => {
            let mut out = vec![title.to_string()];
            if !listing.search.is_empty() {
                out.push(format!("Search: {}", listing.search));
            }
            if visible.is_empty() {
                out.push("(no docentes)".to_string());
            }
            out.extend(visible.iter().map(|docente| docente_row(docente)));
            out.join("\n")
        }
    }
}

pub fn alert(alert: &Alert) -> String {
    format!("{}: {}", alert.title(), alert.message)
}

pub fn form_header(form: &EditForm) -> String {
    format!("-- {} --", form.title())
}

#[cfg(test)]
mod tests {
    use client_core::Listing;
    use shared::domain::DocenteId;

    use super::*;

    fn docente(id: i64, name: &str) -> Docente {
        Docente {
            id: DocenteId(id),
            name: name.into(),
            regime: 40,
            order: id,
            created_at: None,
            updated_at: None,
            deleted: false,
        }
    }

    #[test]
    fn renders_row_with_regime_hours() {
        assert_eq!(
            docente_row(&docente(3, "Ana")),
            "#3 Ana  Regime: 40 hours  Order: 3"
        );
    }

    #[test]
    fn ready_screen_lists_visible_rows_and_search() {
        let ana = docente(1, "Ana");
        let state = ScreenState::Ready(Listing {
            records: vec![ana.clone(), docente(2, "Bruno")],
            search: "an".into(),
        });
        let rendered = screen("Docentes", &state, &[&ana]);
        assert_eq!(
            rendered,
            "Docentes\nSearch: an\n#1 Ana  Regime: 40 hours  Order: 1"
        );
    }

    #[test]
    fn failed_and_loading_screens_show_only_the_message() {
        let failed = ScreenState::Failed {
            message: "Could not load the docentes.".into(),
        };
        assert_eq!(screen("Docentes", &failed, &[]), "Could not load the docentes.");
        assert_eq!(screen("Docentes", &ScreenState::Loading, &[]), LOADING_TEXT);
    }

    #[test]
    fn empty_ready_screen_says_so() {
        let state = ScreenState::Ready(Listing::default());
        assert_eq!(screen("Docentes", &state, &[]), "Docentes\n(no docentes)");
    }
}
