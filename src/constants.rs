//! Centralized defaults for the Vault connection and secret layout.

/// Default Vault address (local dev server).
pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";

/// Default token, matching a dev server started with `-dev-root-token-id=root`.
pub const DEFAULT_VAULT_TOKEN: &str = "root";

/// Default KV v2 secret path.
pub const DEFAULT_SECRET_PATH: &str = "secret/data/stormsync/development";

/// Default HTTP timeout for Vault requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Upper bound for the HTTP timeout, in seconds.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 3600;

/// Token self-lookup endpoint, relative to the API root.
pub const LOOKUP_SELF_PATH: &str = "auth/token/lookup-self";

/// API version prefix for every Vault request.
pub const API_PREFIX: &str = "v1";

/// Header carrying the client token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// Header carrying the enterprise namespace.
pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Key wrapping the payload in KV v2 request and response bodies.
pub const ENVELOPE_KEY: &str = "data";

/// Tag used when forwarding run summaries to journald.
pub const JOURNALD_TAG: &str = "stormsync-vault";
