use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use super::{RecordSource, SourceError};
use crate::model::{Address, MenuItem};

pub const DEFAULT_BASE_URL: &str = "https://pysoftware.com/v1";

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

#[derive(Clone, Debug)]
pub struct HttpSourceOptions {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub header: Option<String>,
}

impl Default for HttpSourceOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
            header: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(options: &HttpSourceOptions) -> Result<Self, SourceError> {
        let base_url = options.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| SourceError::InvalidBaseUrl {
            url: options.base_url.clone(),
            message: e.to_string(),
        })?;
        let client = build_client(
            options.proxy.as_deref(),
            options.header.as_deref(),
            options.timeout_seconds,
        )?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = self.endpoint(path);
        let resp = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SourceError::Request {
                url: url.clone(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await.map_err(|e| SourceError::Request {
            url: url.clone(),
            source: e,
        })?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Decode { url, source: e })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn menu_items(&self) -> Result<Vec<MenuItem>, SourceError> {
        self.get_json("menu_items").await
    }

    async fn total_count(&self) -> Result<u64, SourceError> {
        self.get_json("customer_numbers").await
    }

    async fn address(&self, id: u64) -> Result<Address, SourceError> {
        self.get_json(&format!("address_inventory/{id}")).await
    }
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), SourceError> {
    let invalid = || SourceError::InvalidHeader {
        header: raw.to_string(),
    };
    let (key, value) = raw.split_once(':').ok_or_else(invalid)?;
    let key = HeaderName::from_str(key.trim()).map_err(|_| invalid())?;
    let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((key, value))
}

fn build_client(
    proxy: Option<&str>,
    header: Option<&str>,
    timeout_seconds: u64,
) -> Result<reqwest::Client, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT),
    );
    if let Some(raw) = header.filter(|h| !h.trim().is_empty()) {
        let (key, value) = parse_header(raw)?;
        headers.append(key, value);
    }

    let timeout = Duration::from_secs(if timeout_seconds == 0 {
        10
    } else {
        timeout_seconds
    });
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| SourceError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| SourceError::HttpClientBuild { source: e })
}
