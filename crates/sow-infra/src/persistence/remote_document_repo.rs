//! PostgREST document library
//!
//! Talks to a Supabase-style REST endpoint exposing a table with the columns
//! `id, type, title, content, created_at`.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use sow_domain::repository::{DocumentRepository, NewDocument, StoredDocument};
use sow_types::{ConfigError, DocumentKind, Error, Result};
use tracing::{debug, info};

/// Connection settings for the remote library
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

pub struct RemoteDocumentRepository {
    client: Client,
    table_url: String,
}

impl RemoteDocumentRepository {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        if settings.url.trim().is_empty() {
            return Err(ConfigError::MissingRemote("remote url".to_string()).into());
        }
        if settings.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRemote("remote api key".to_string()).into());
        }

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&settings.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", settings.api_key))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(storage_error)?;

        Ok(Self {
            client,
            table_url: table_url(&settings.url, &settings.table),
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().map_err(storage_error)?;
        let status = response.status();
        debug!(%status, url = %response.url(), "remote library response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::Storage(format!("HTTP {}: {}", status, body.trim())))
    }

    fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<StoredDocument>> {
        self.send(request)?.json().map_err(storage_error)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ConfigError::ParseError("api key contains invalid characters".to_string()).into())
}

fn storage_error(e: reqwest::Error) -> Error {
    Error::Storage(e.to_string())
}

/// `{url}/rest/v1/{table}` without doubled slashes
fn table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base.trim().trim_end_matches('/'), table.trim())
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`
fn parse_content_range(value: &str) -> Option<usize> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

impl DocumentRepository for RemoteDocumentRepository {
    fn save(&self, document: NewDocument) -> std::result::Result<StoredDocument, Error> {
        debug!(kind = %document.kind, "inserting remote document");
        let rows = self.fetch_rows(
            self.client
                .post(&self.table_url)
                .header("Prefer", "return=representation")
                .json(&[&document]),
        )?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::Storage("insert returned no rows".to_string()))?;
        info!(id = %row.id, kind = %row.kind, title = %row.title, "document saved remotely");
        Ok(row)
    }

    fn load(&self, id: &str) -> std::result::Result<Option<StoredDocument>, Error> {
        let rows = self.fetch_rows(
            self.client
                .get(&self.table_url)
                .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]),
        )?;
        Ok(rows.into_iter().next())
    }

    fn list(&self, kind: DocumentKind) -> std::result::Result<Vec<StoredDocument>, Error> {
        self.fetch_rows(self.client.get(&self.table_url).query(&[
            ("select", "*".to_string()),
            ("type", format!("eq.{}", kind.as_str())),
            ("order", "created_at.desc".to_string()),
        ]))
    }

    fn count(&self, kind: DocumentKind) -> std::result::Result<usize, Error> {
        let response = self.send(
            self.client
                .head(&self.table_url)
                .header("Prefer", "count=exact")
                .query(&[("select", "*".to_string()), ("type", format!("eq.{}", kind.as_str()))]),
        )?;
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| Error::Storage("missing Content-Range in count response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        assert_eq!(
            table_url("https://abc.supabase.co/", "documents"),
            "https://abc.supabase.co/rest/v1/documents"
        );
        assert_eq!(
            table_url(" https://abc.supabase.co ", "documents"),
            "https://abc.supabase.co/rest/v1/documents"
        );
    }

    #[test]
    fn test_content_range() {
        assert_eq!(parse_content_range("0-9/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_missing_settings() {
        let settings = RemoteSettings {
            url: String::new(),
            api_key: "key".into(),
            table: "documents".into(),
            timeout_secs: 30,
        };
        assert!(matches!(
            RemoteDocumentRepository::new(&settings),
            Err(Error::Config(ConfigError::MissingRemote(_)))
        ));
    }
}
