//! Hosted-store binding speaking the PostgREST dialect (as exposed by Supabase
//! under `/rest/v1`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::{Docente, DocenteId, DocentePatch, NewDocente},
    protocol::{list_active_query, match_id_query},
};
use tracing::debug;
use url::Url;

use crate::{RecordStore, StoreError};

const REST_PREFIX: &str = "rest/v1/";

pub struct RestRecordStore {
    http: Client,
    table_url: Url,
    api_key: String,
}

impl RestRecordStore {
    pub fn new(
        project_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), project_url, api_key, table)
    }

    pub fn with_client(
        http: Client,
        project_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            http,
            table_url: table_url(project_url, table)?,
            api_key: api_key.into(),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

fn table_url(project_url: &str, table: &str) -> Result<Url, StoreError> {
    let mut base = Url::parse(project_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(REST_PREFIX)?.join(table)?)
}

async fn accepted(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn list_active(&self) -> Result<Vec<Docente>, StoreError> {
        debug!(url = %self.table_url, "rest: listing active docentes");
        let response = self
            .authorized(self.http.get(self.table_url.clone()))
            .query(&list_active_query())
            .send()
            .await?;
        Ok(accepted(response).await?.json().await?)
    }

    async fn insert(&self, docente: &NewDocente) -> Result<(), StoreError> {
        debug!(url = %self.table_url, "rest: inserting docente");
        let response = self
            .authorized(self.http.post(self.table_url.clone()))
            .header("Prefer", "return=minimal")
            .json(&[docente])
            .send()
            .await?;
        accepted(response).await?;
        Ok(())
    }

    async fn update(&self, id: DocenteId, patch: &DocentePatch) -> Result<(), StoreError> {
        debug!(url = %self.table_url, docente_id = id.0, "rest: updating docente");
        let response = self
            .authorized(self.http.patch(self.table_url.clone()))
            .query(&match_id_query(id.0))
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        accepted(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
