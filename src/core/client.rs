//! Vault KV v2 client adapter over the HTTP API.
//!
//! Requests go to `<address>/v1/<path>` with the token in `X-Vault-Token`.
//! Writes wrap the payload as `{"data": {...}}`; reads expect the KV v2
//! response shape `{"data": {"data": {...}, "metadata": {...}}}`.

use crate::constants;
use crate::error::{Result, SeedError};
use crate::models::kv::KeyValueSet;
use crate::models::token::{LookupSelfResponse, TokenInfo};
use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use zeroize::Zeroizing;

/// Operations the seeding flow needs from a secret backend.
pub trait SecretStore {
    /// Attach `token` and confirm it with a self-lookup.
    fn authenticate(&mut self, token: &str) -> Result<TokenInfo>;

    /// Write `data` to `path` inside the KV v2 envelope.
    fn write_secret(&self, path: &str, data: &KeyValueSet) -> Result<()>;

    /// Read `path` and return the string stored under `key`.
    fn read_secret(&self, path: &str, key: &str) -> Result<String>;
}

impl<S: SecretStore + ?Sized> SecretStore for &mut S {
    fn authenticate(&mut self, token: &str) -> Result<TokenInfo> {
        (**self).authenticate(token)
    }

    fn write_secret(&self, path: &str, data: &KeyValueSet) -> Result<()> {
        (**self).write_secret(path, data)
    }

    fn read_secret(&self, path: &str, key: &str) -> Result<String> {
        (**self).read_secret(path, key)
    }
}

#[derive(Serialize)]
struct WriteEnvelope<'a> {
    data: &'a KeyValueSet,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Live connection handle to a Vault server.
pub struct Session {
    address: String,
    namespace: Option<String>,
    client: Client,
    token: Option<Zeroizing<String>>,
}

impl Session {
    /// Build an HTTP client bound to `address`.
    ///
    /// No request is made; only the address and client configuration are
    /// checked here.
    pub fn connect(address: &str, namespace: Option<&str>, timeout: Duration) -> Result<Self> {
        let config_error = |message: String| SeedError::ConnectionConfig {
            address: address.to_string(),
            message,
        };

        let url = Url::parse(address).map_err(|e| config_error(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(config_error(format!(
                "unsupported scheme '{}' (expected http or https)",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(config_error("address has no host".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| config_error(e.to_string()))?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            namespace: namespace
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
            client,
            token: None,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.address,
            constants::API_PREFIX,
            path.trim_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> reqwest::Result<Response> {
        let url = self.endpoint(path);
        debug!(%method, %url, "vault request");
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(constants::TOKEN_HEADER, token.as_str());
        }
        if let Some(namespace) = &self.namespace {
            builder = builder.header(constants::NAMESPACE_HEADER, namespace);
        }
        if let Some(payload) = body {
            builder = builder.json(&payload);
        }
        builder.send()
    }

    fn lookup_self(&self) -> Result<TokenInfo> {
        let response = self
            .request(Method::GET, constants::LOOKUP_SELF_PATH, None)
            .map_err(|e| SeedError::Authentication(e.to_string()))?;
        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(SeedError::Authentication(describe_failure(status, &body)));
        }
        let lookup: LookupSelfResponse = serde_json::from_str(&body)
            .map_err(|e| SeedError::Authentication(format!("decode token lookup: {e}")))?;
        lookup
            .data
            .ok_or_else(|| SeedError::Authentication("token lookup returned no data".into()))
    }
}

impl SecretStore for Session {
    fn authenticate(&mut self, token: &str) -> Result<TokenInfo> {
        self.token = Some(Zeroizing::new(token.to_string()));
        match self.lookup_self() {
            Ok(info) => {
                debug!(
                    display_name = info.display_name(),
                    policies = ?info.policies,
                    ttl = ?info.ttl,
                    "token lookup ok"
                );
                Ok(info)
            }
            Err(e) => {
                self.token = None;
                Err(e)
            }
        }
    }

    fn write_secret(&self, path: &str, data: &KeyValueSet) -> Result<()> {
        let write_error = |message: String| SeedError::Write {
            path: path.to_string(),
            message,
        };

        let payload =
            serde_json::to_value(WriteEnvelope { data }).map_err(|e| write_error(e.to_string()))?;
        let response = self
            .request(Method::POST, path, Some(payload))
            .map_err(|e| write_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(write_error(describe_failure(status, &body)));
        }
        debug!(path, keys = data.len(), "secret written");
        Ok(())
    }

    fn read_secret(&self, path: &str, key: &str) -> Result<String> {
        let read_error = |message: String| SeedError::Read {
            path: path.to_string(),
            message,
        };

        let response = self
            .request(Method::GET, path, None)
            .map_err(|e| read_error(e.to_string()))?;
        let status = response.status();
        let body = response.text().map_err(|e| read_error(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(SeedError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(read_error(describe_failure(status, &body)));
        }

        let secret: Option<Value> = if body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&body).map_err(|e| read_error(format!("decode response: {e}")))?)
        };
        extract_value(secret.as_ref(), path, key)
    }
}

/// Pull `key` out of a KV v2 read response.
///
/// `secret` is the whole response body; the payload lives under
/// `data.data`. A missing or `null` payload is `NotFound`, a payload that is
/// not an object or a non-string value is `MalformedResponse`.
pub fn extract_value(secret: Option<&Value>, path: &str, key: &str) -> Result<String> {
    let payload = secret
        .and_then(|s| s.get(constants::ENVELOPE_KEY))
        .and_then(|d| d.get(constants::ENVELOPE_KEY))
        .filter(|p| !p.is_null())
        .ok_or_else(|| SeedError::NotFound {
            path: path.to_string(),
        })?;

    let fields = payload.as_object().ok_or_else(|| SeedError::MalformedResponse {
        path: path.to_string(),
    })?;

    match fields.get(key) {
        None => Err(SeedError::KeyNotFound {
            key: key.to_string(),
            path: path.to_string(),
        }),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(SeedError::MalformedResponse {
            path: path.to_string(),
        }),
    }
}

/// Render a failed response as `<status>: <vault errors>`.
fn describe_failure(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if !parsed.errors.is_empty() {
        return format!("{}: {}", status, parsed.errors.join("; "));
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    }
}
