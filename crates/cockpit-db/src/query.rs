//! Minimal PostgREST query builder.
//!
//! Filters follow PostgREST's `column=op.value` convention:
//!   select=url&user_id=eq.abc&period_start=gte.2025-01-01T00:00:00Z

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::client::SupabaseClient;
use crate::error::{DbError, Result};

pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: String,
    params: Vec<(String, String)>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table: &str) -> Self {
        Self { client, table: table.to_string(), params: Vec::new() }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "eq", value.as_ref())
    }

    pub fn gte(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "gte", value.as_ref())
    }

    pub fn lte(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "lte", value.as_ref())
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.params.push(("order".to_string(), format!("{column}.{dir}")));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    fn filter(mut self, column: &str, op: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("{op}.{value}")));
        self
    }

    /// Query-string pairs accumulated so far.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// GET rows matching the filters.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let resp = self
            .client
            .request(reqwest::Method::GET, &self.table)?
            .query(&self.params)
            .send()
            .await?;
        let rows = check_response(resp).await?;
        debug!(count = rows.as_array().map(Vec::len).unwrap_or(0), "PostgREST select");
        Ok(serde_json::from_value(rows)?)
    }

    /// POST `rows` and return the inserted representation.
    #[instrument(skip(self, rows), fields(table = %self.table))]
    pub async fn insert<B, T>(self, rows: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .request(reqwest::Method::POST, &self.table)?
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let inserted = check_response(resp).await?;
        Ok(serde_json::from_value(inserted)?)
    }

    /// PATCH rows matching the filters. Refuses to run without a filter.
    #[instrument(skip(self, patch), fields(table = %self.table))]
    pub async fn update<B>(self, patch: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        if !self.params.iter().any(|(k, _)| k != "select" && k != "order" && k != "limit") {
            return Err(DbError::InvalidQuery(format!(
                "refusing unfiltered update on {}",
                self.table
            )));
        }
        let resp = self
            .client
            .request(reqwest::Method::PATCH, &self.table)?
            .query(&self.params)
            .json(patch)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }
}

async fn check_response(resp: reqwest::Response) -> Result<serde_json::Value> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    if status >= 400 {
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body["message"].as_str().map(String::from))
            .unwrap_or(text);
        return Err(DbError::Api { status, message });
    }
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Array(Vec::new()));
    }
    Ok(serde_json::from_str(&text)?)
}
