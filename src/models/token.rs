//! Token self-lookup response model.

use serde::Deserialize;

/// Body of `GET /v1/auth/token/lookup-self`.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupSelfResponse {
    #[serde(default)]
    pub data: Option<TokenInfo>,
}

/// Subset of token metadata worth logging. The token id is not kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl TokenInfo {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("unknown")
    }
}
