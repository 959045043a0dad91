//! reqwest-backed [`DonationApi`].

use donmo_schemas::{Amount, CheckResponse, DonationRecord, Quote, StatusResponse};
use reqwest::{header, Method, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, DonationApi};

/// HTTP client for the donation API.
///
/// Every request carries the merchant public key in the `pk` header. The key
/// is never logged.
#[derive(Clone)]
pub struct HttpDonationClient {
    http: reqwest::Client,
    base_url: Url,
    public_key: String,
}

impl std::fmt::Debug for HttpDonationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDonationClient")
            .field("base_url", &self.base_url.as_str())
            .field("public_key", &"<REDACTED>")
            .finish()
    }
}

impl HttpDonationClient {
    pub fn new(base_url: &str, public_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_http(reqwest::Client::new(), base_url, public_key)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        public_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: cannot be a base url"
            )));
        }
        Ok(Self {
            http,
            base_url,
            public_key: public_key.into(),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for s in segments {
                path.push(s);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("pk", self.public_key.as_str())
    }

    async fn send(&self, req: reqwest::RequestBuilder, op: &'static str) -> Result<Reply, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("{op}: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("{op}: reading body: {e}")))?;
        debug!(op, status, bytes = body.len(), "donation api reply");
        Ok(Reply {
            op,
            status,
            body: body.to_vec(),
        })
    }
}

struct Reply {
    op: &'static str,
    status: u16,
    body: Vec<u8>,
}

impl Reply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a payload whose meaning depends on the HTTP status line.
    fn payload<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Rejected {
                status: self.status,
            });
        }
        self.decode()
    }

    /// Decode a body that carries its own `status` field. An undecodable
    /// body on an HTTP failure is reported as that failure.
    fn status_body(&self) -> Result<StatusResponse, ApiError> {
        match self.decode::<StatusResponse>() {
            Ok(body) => Ok(body),
            Err(_) if !self.is_success() => Err(ApiError::Rejected {
                status: self.status,
            }),
            Err(e) => Err(e),
        }
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(format!("{}: {e}", self.op)))
    }
}

#[async_trait::async_trait]
impl DonationApi for HttpDonationClient {
    async fn quote(&self, order_amount: Amount) -> Result<Quote, ApiError> {
        let url = self.endpoint(&["calculate"])?;
        let req = self
            .request(Method::GET, url)
            .query(&[("orderAmount", order_amount.to_f64().to_string())]);
        self.send(req, "quote").await?.payload()
    }

    async fn check(&self, order_id: &str) -> Result<Option<Amount>, ApiError> {
        let url = self.endpoint(&["check", order_id])?;
        let body: CheckResponse = self
            .send(self.request(Method::GET, url), "check")
            .await?
            .payload()?;
        Ok(body.recorded_amount())
    }

    async fn create(&self, record: &DonationRecord) -> Result<(), ApiError> {
        let url = self.endpoint(&[])?;
        let req = self.request(Method::POST, url).json(record);
        let body = self.send(req, "create").await?.status_body()?;
        if !body.create_accepted() {
            return Err(ApiError::Rejected {
                status: body.status.unwrap_or(0),
            });
        }
        Ok(())
    }

    async fn cancel(&self, order_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["cancel", order_id])?;
        let req = self
            .request(Method::PUT, url)
            .header(header::CONTENT_TYPE, "application/json");
        let body = self.send(req, "cancel").await?.status_body()?;
        if !body.cancel_accepted() {
            return Err(ApiError::Rejected {
                status: body.status.unwrap_or(0),
            });
        }
        Ok(())
    }
}
