//! Table and column names shared by every store binding.

pub const DEFAULT_TABLE: &str = "Docentes";

pub const COLUMN_ID: &str = "ID_Docente";
pub const COLUMN_DELETED: &str = "is_deleted";

/// PostgREST query pairs for listing active records in identifier order.
pub fn list_active_query() -> [(&'static str, String); 3] {
    [
        ("select", "*".to_string()),
        (COLUMN_DELETED, "neq.true".to_string()),
        ("order", format!("{COLUMN_ID}.asc")),
    ]
}

/// PostgREST filter matching a single record by identifier.
pub fn match_id_query(id: i64) -> [(&'static str, String); 1] {
    [(COLUMN_ID, format!("eq.{id}"))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_filters_deleted_and_orders_by_id() {
        let query = list_active_query();
        assert!(query.contains(&("is_deleted", "neq.true".to_string())));
        assert!(query.contains(&("order", "ID_Docente.asc".to_string())));
    }

    #[test]
    fn match_query_uses_eq_operator() {
        assert_eq!(match_id_query(12), [("ID_Docente", "eq.12".to_string())]);
    }
}
