use std::time::Duration;

use thiserror::Error;

use crate::model::{NewOffer, Offer};

/// Connection settings for one hosted table.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base REST endpoint, e.g. `https://xyz.example.co/rest/v1/`.
    pub endpoint: String,
    pub api_key: String,
    pub table: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("API key contains characters not allowed in a header value")]
    InvalidApiKey,

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("store rejected the request: {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to decode store response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for a single table endpoint. All predicates, ordering and
/// row payloads travel in the query string / JSON body; the store owns the
/// authoritative data.
#[derive(Clone, Debug)]
pub struct StoreClient {
    http: reqwest::Client,
    rows_url: reqwest::Url,
}

fn trim_body(body: &str) -> String {
    let one_line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.len() > 240 {
        let mut cut = 240;
        while !one_line.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &one_line[..cut])
    } else {
        one_line
    }
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let mut endpoint = config.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = reqwest::Url::parse(&endpoint).map_err(|_| StoreError::InvalidEndpoint {
            url: config.endpoint.clone(),
        })?;
        let rows_url = base
            .join(config.table.trim_matches('/'))
            .map_err(|_| StoreError::InvalidEndpoint {
                url: config.endpoint.clone(),
            })?;

        let key_value = reqwest::header::HeaderValue::from_str(&config.api_key)
            .map_err(|_| StoreError::InvalidApiKey)?;
        let bearer = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| StoreError::InvalidApiKey)?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("apikey", key_value);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)));
        if let Some(proxy_url) = config.proxy.as_deref() {
            let proxy =
                reqwest::Proxy::all(proxy_url).map_err(|e| StoreError::ProxySetup {
                    proxy: proxy_url.to_string(),
                    source: e,
                })?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::ClientBuild { source: e })?;

        Ok(Self { http, rows_url })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body: trim_body(&body),
        })
    }

    /// Issue one read with the translated filter parameters.
    pub async fn select(&self, params: &[(String, String)]) -> Result<Vec<Offer>, StoreError> {
        let response = self
            .http
            .get(self.rows_url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| StoreError::Transport { source: e })?;
        let response = Self::check(response).await?;
        response
            .json::<Vec<Offer>>()
            .await
            .map_err(|e| StoreError::Decode { source: e })
    }

    /// Insert one row. The store assigns the identifier.
    pub async fn insert(&self, offer: &NewOffer) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.rows_url.clone())
            .header("Prefer", "return=minimal")
            .json(offer)
            .send()
            .await
            .map_err(|e| StoreError::Transport { source: e })?;
        Self::check(response).await?;
        Ok(())
    }

    /// Delete one row by identifier.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.rows_url.clone())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| StoreError::Transport { source: e })?;
        Self::check(response).await?;
        Ok(())
    }
}
