use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::{Docente, DocenteId, DocentePatch, NewDocente};

const DOCENTE_COLUMNS: &str =
    r#""ID_Docente", "Nome", "Regime", "Ordem", created_at, updated_at, is_deleted"#;

/// SQLite-backed `Docentes` table.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run docentes migrations")?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Rows not flagged as deleted, ascending by identifier.
    pub async fn list_active_docentes(&self) -> Result<Vec<Docente>> {
        debug!("storage: listing active docentes");
        let rows = sqlx::query(&format!(
            r#"SELECT {DOCENTE_COLUMNS}
               FROM "Docentes"
               WHERE is_deleted <> 1
               ORDER BY "ID_Docente" ASC"#
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list docentes")?;

        Ok(rows.iter().map(docente_from_row).collect())
    }

    /// Looks a row up by identifier, including soft-deleted ones.
    pub async fn get_docente(&self, id: DocenteId) -> Result<Option<Docente>> {
        let row = sqlx::query(&format!(
            r#"SELECT {DOCENTE_COLUMNS} FROM "Docentes" WHERE "ID_Docente" = ?"#
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load docente {id}"))?;
        Ok(row.as_ref().map(docente_from_row))
    }

    pub async fn insert_docente(&self, docente: &NewDocente) -> Result<DocenteId> {
        let rec = sqlx::query(
            r#"INSERT INTO "Docentes" ("Nome", "Regime", "Ordem", is_deleted)
               VALUES (?, ?, ?, ?)
               RETURNING "ID_Docente""#,
        )
        .bind(&docente.name)
        .bind(docente.regime)
        .bind(docente.order)
        .bind(docente.deleted)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert docente")?;
        Ok(DocenteId(rec.get::<i64, _>(0)))
    }

    /// Applies the present patch columns and bumps `updated_at`. Returns
    /// whether a row matched the identifier.
    pub async fn update_docente(&self, id: DocenteId, patch: &DocentePatch) -> Result<bool> {
        if patch.is_empty() {
            return Ok(self.get_docente(id).await?.is_some());
        }

        let result = sqlx::query(
            r#"UPDATE "Docentes"
               SET "Nome" = COALESCE(?, "Nome"),
                   "Regime" = COALESCE(?, "Regime"),
                   "Ordem" = COALESCE(?, "Ordem"),
                   is_deleted = COALESCE(?, is_deleted),
                   updated_at = CURRENT_TIMESTAMP
               WHERE "ID_Docente" = ?"#,
        )
        .bind(patch.name.as_deref())
        .bind(patch.regime)
        .bind(patch.order)
        .bind(patch.deleted)
        .bind(id.0)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update docente {id}"))?;

        Ok(result.rows_affected() > 0)
    }
}

fn docente_from_row(r: &SqliteRow) -> Docente {
    Docente {
        id: DocenteId(r.get::<i64, _>(0)),
        name: r.get::<String, _>(1),
        regime: r.get::<i64, _>(2),
        order: r.get::<i64, _>(3),
        created_at: Some(r.get::<DateTime<Utc>, _>(4)),
        updated_at: Some(r.get::<DateTime<Utc>, _>(5)),
        deleted: r.get::<bool, _>(6),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
