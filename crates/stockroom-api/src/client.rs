// Catalog service HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization, JSON vs multipart
// body dispatch, and status-aware response parsing. One remote attempt per
// call: retries and fallback belong to the layer above.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{DeleteOutcome, FormField, FormValue, ProductBody, ProductRecord};
use crate::transport::TransportConfig;

/// Error body shape used by the catalog service (`{statusCode, message, error}`).
/// `message` is a string, or a list of strings for validation failures.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Raw async client for the product catalog REST service.
///
/// All methods return decoded payloads or an [`Error`]; the caller decides
/// what a failure means.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a client from a base URL (e.g. `http://localhost:3000/api/`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the path ends with `/` so relative joins append instead of
    /// replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::BaseUrl(raw.to_owned()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("products")?)
    }

    /// `{base}/products/{id}` with the id percent-encoded as one segment.
    fn item_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| Error::BaseUrl(self.base_url.to_string()))?
            .push(id);
        Ok(url)
    }

    // ── Public API ───────────────────────────────────────────────────

    /// `GET /products`
    pub async fn list_products(&self) -> Result<Vec<ProductRecord>, Error> {
        let url = self.collection_url()?;
        debug!("GET {url}");
        let resp = self.send(self.http.get(url)).await?;
        handle_response(resp).await
    }

    /// `GET /products/:id`
    pub async fn get_product(&self, id: &str) -> Result<ProductRecord, Error> {
        let url = self.item_url(id)?;
        debug!("GET {url}");
        let resp = self.send(self.http.get(url)).await?;
        handle_response(resp).await
    }

    /// `POST /products`
    pub async fn create_product(&self, body: ProductBody) -> Result<ProductRecord, Error> {
        let url = self.collection_url()?;
        debug!("POST {url}");
        let builder = attach_body(self.http.post(url), body)?;
        let resp = self.send(builder).await?;
        handle_response(resp).await
    }

    /// `PUT /products/:id`
    pub async fn update_product(
        &self,
        id: &str,
        body: ProductBody,
    ) -> Result<ProductRecord, Error> {
        let url = self.item_url(id)?;
        debug!("PUT {url}");
        let builder = attach_body(self.http.put(url), body)?;
        let resp = self.send(builder).await?;
        handle_response(resp).await
    }

    /// `PATCH /products/:id`
    pub async fn patch_product(&self, id: &str, body: ProductBody) -> Result<ProductRecord, Error> {
        let url = self.item_url(id)?;
        debug!("PATCH {url}");
        let builder = attach_body(self.http.patch(url), body)?;
        let resp = self.send(builder).await?;
        handle_response(resp).await
    }

    /// `DELETE /products/:id`
    ///
    /// A 2xx response counts as deleted unless the body explicitly says
    /// `{"deleted": false}`; the service may also answer with the removed
    /// document or an empty body.
    pub async fn delete_product(&self, id: &str) -> Result<DeleteOutcome, Error> {
        let url = self.item_url(id)?;
        debug!("DELETE {url}");
        let resp = self.send(self.http.delete(url)).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let outcome = serde_json::from_str::<DeleteOutcome>(&body)
            .unwrap_or(DeleteOutcome { deleted: true });
        trace!(deleted = outcome.deleted, "delete response parsed");
        Ok(outcome)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })
    }
}

// ── Body encoding ───────────────────────────────────────────────────

fn attach_body(
    builder: reqwest::RequestBuilder,
    body: ProductBody,
) -> Result<reqwest::RequestBuilder, Error> {
    match body {
        ProductBody::Json(value) => Ok(builder.json(&value)),
        ProductBody::Multipart(fields) => Ok(builder.multipart(into_form(fields)?)),
    }
}

fn into_form(fields: Vec<FormField>) -> Result<Form, Error> {
    let mut form = Form::new();
    for field in fields {
        form = match field.value {
            FormValue::Text(text) => form.text(field.name, text),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.to_vec())
                    .file_name(file_name)
                    .mime_str(&content_type)?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|err| match err.message {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => err.error,
        })
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.chars().take(200).collect()
            }
        });

    Error::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = CatalogClient::normalize_base_url("http://localhost:3000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/");
    }

    #[test]
    fn item_url_encodes_id_as_single_segment() {
        let client =
            CatalogClient::with_client(reqwest::Client::new(), "http://localhost:3000/api/")
                .unwrap();
        let url = client.item_url("a/b c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/products/a%2Fb%20c");
    }

    #[test]
    fn rejects_cannot_be_a_base_url() {
        assert!(matches!(
            CatalogClient::normalize_base_url("mailto:ops@example.com"),
            Err(Error::BaseUrl(_))
        ));
    }
}
