use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::credentials::Credentials;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the `/api/v1` member routes, authenticated with the
/// saved user token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Envelope of single-item responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Body of list endpoints, which are not wrapped in the envelope.
#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl ApiClient {
    pub fn new(creds: &Credentials) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: creds.server_url.trim_end_matches('/').to_string(),
            token: creds.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, api_url(&self.base_url, path))
            .bearer_auth(&self.token)
    }

    fn dispatch(&self, builder: RequestBuilder) -> anyhow::Result<Response> {
        builder
            .send()
            .map_err(|e| anyhow::anyhow!("Could not reach {}: {e}", self.base_url))
    }

    fn send(&self, builder: RequestBuilder) -> anyhow::Result<Response> {
        let resp = self.dispatch(builder)?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(error_from(resp))
        }
    }

    fn unwrap_data<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
        let envelope: ApiResponse<T> = resp.json()?;
        envelope
            .data
            .ok_or_else(|| anyhow::anyhow!("Server returned an empty response"))
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.send(self.request(Method::GET, path))?;
        Self::unwrap_data(resp)
    }

    /// Like [`ApiClient::get`], but a 404 is `Ok(None)`.
    pub fn get_optional<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<Option<T>> {
        let resp = self.dispatch(self.request(Method::GET, path))?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Self::unwrap_data(resp).map(Some),
            _ => Err(error_from(resp)),
        }
    }

    /// For list endpoints, whose body is a [`PaginatedResponse`].
    pub fn get_raw<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        Ok(self.send(self.request(Method::GET, path))?.json()?)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self.send(self.request(Method::POST, path).json(body))?;
        Self::unwrap_data(resp)
    }

    pub fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self.send(self.request(Method::PUT, path).json(body))?;
        Self::unwrap_data(resp)
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.send(self.request(Method::DELETE, path))?;
        Ok(())
    }
}

fn api_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/api/v1{path}")
}

fn error_from(resp: Response) -> anyhow::Error {
    let status = resp.status();
    let detail = resp
        .json::<ApiResponse<()>>()
        .ok()
        .and_then(|body| body.error);

    match (status, detail) {
        (StatusCode::UNAUTHORIZED, _) => anyhow::anyhow!(
            "The server rejected your token. Run 'skillswap auth login' again."
        ),
        (_, Some(message)) => anyhow::anyhow!(message),
        (_, None) => anyhow::anyhow!("Server error {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(
            api_url("https://swap.example.com", "/requests/abc/accept"),
            "https://swap.example.com/api/v1/requests/abc/accept"
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new(&Credentials {
            server_url: "http://localhost:8080/".to_string(),
            token: "skillswap_abcdefgh_secret".to_string(),
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_envelope_deserializes_error() {
        let body: ApiResponse<()> =
            serde_json::from_str(r#"{"data":null,"error":"Swap request not found"}"#).unwrap();
        assert!(body.data.is_none());
        assert_eq!(body.error.as_deref(), Some("Swap request not found"));
    }
}
