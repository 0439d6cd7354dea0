//! In-memory [`SecretStore`] that mimics Vault KV v2 payloads.
//!
//! Responses are kept as raw JSON bodies so callers can plant malformed or
//! partial responses and watch how the read path reacts.

use crate::core::client::{extract_value, SecretStore};
use crate::error::{Result, SeedError};
use crate::models::kv::KeyValueSet;
use crate::models::token::TokenInfo;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

const DENIED: &str = "403 Forbidden: permission denied";

#[derive(Debug, Default)]
pub struct MemoryStore {
    tokens: HashSet<String>,
    authenticated: bool,
    bodies: RefCell<HashMap<String, Value>>,
    write_denied: Option<String>,
    auth_calls: Cell<usize>,
    write_calls: Cell<usize>,
    read_calls: Cell<usize>,
}

impl MemoryStore {
    /// A store that accepts exactly `token`.
    pub fn with_token(token: &str) -> Self {
        let mut store = Self::default();
        store.tokens.insert(token.to_string());
        store
    }

    /// Replace the stored response body for `path`.
    pub fn set_body(&self, path: &str, body: Value) {
        self.bodies.borrow_mut().insert(path.to_string(), body);
    }

    /// Make every write fail with `message`, as a policy denial would.
    pub fn deny_writes(&mut self, message: &str) {
        self.write_denied = Some(message.to_string());
    }

    pub fn body(&self, path: &str) -> Option<Value> {
        self.bodies.borrow().get(path).cloned()
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.get()
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.get()
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.get()
    }

    /// Total number of backend operations attempted.
    pub fn calls(&self) -> usize {
        self.auth_calls() + self.write_calls() + self.read_calls()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl SecretStore for MemoryStore {
    fn authenticate(&mut self, token: &str) -> Result<TokenInfo> {
        bump(&self.auth_calls);
        self.authenticated = self.tokens.contains(token);
        if !self.authenticated {
            return Err(SeedError::Authentication(DENIED.into()));
        }
        Ok(TokenInfo {
            display_name: Some("token".into()),
            policies: vec!["root".into()],
            ttl: Some(0),
        })
    }

    fn write_secret(&self, path: &str, data: &KeyValueSet) -> Result<()> {
        bump(&self.write_calls);
        let denial = if self.authenticated {
            self.write_denied.clone()
        } else {
            Some(DENIED.to_string())
        };
        if let Some(message) = denial {
            return Err(SeedError::Write {
                path: path.to_string(),
                message,
            });
        }

        let mut bodies = self.bodies.borrow_mut();
        let version = bodies
            .get(path)
            .and_then(|b| b.pointer("/data/metadata/version"))
            .and_then(Value::as_u64)
            .unwrap_or(0)
            + 1;
        bodies.insert(
            path.to_string(),
            json!({
                "data": {
                    "data": data,
                    "metadata": { "version": version, "destroyed": false },
                }
            }),
        );
        Ok(())
    }

    fn read_secret(&self, path: &str, key: &str) -> Result<String> {
        bump(&self.read_calls);
        if !self.authenticated {
            return Err(SeedError::Read {
                path: path.to_string(),
                message: DENIED.into(),
            });
        }
        extract_value(self.bodies.borrow().get(path), path, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "secret/data/app";

    fn data(pairs: &[(&str, &str)]) -> KeyValueSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_rejects_unknown_token() {
        let mut store = MemoryStore::with_token("root");
        let err = store.authenticate("guess").unwrap_err();
        assert!(matches!(err, SeedError::Authentication(_)));
    }

    #[test]
    fn test_write_requires_authentication() {
        let store = MemoryStore::with_token("root");
        let err = store.write_secret(PATH, &data(&[("a", "1")])).unwrap_err();
        assert!(matches!(err, SeedError::Write { .. }));
        assert!(store.body(PATH).is_none());
    }

    #[test]
    fn test_write_bumps_version() {
        let mut store = MemoryStore::with_token("root");
        store.authenticate("root").unwrap();
        store.write_secret(PATH, &data(&[("a", "1")])).unwrap();
        store.write_secret(PATH, &data(&[("a", "2")])).unwrap();
        let body = store.body(PATH).unwrap();
        assert_eq!(body.pointer("/data/metadata/version"), Some(&json!(2)));
        assert_eq!(store.read_secret(PATH, "a").unwrap(), "2");
    }

    #[test]
    fn test_read_unknown_path_is_not_found() {
        let mut store = MemoryStore::with_token("root");
        store.authenticate("root").unwrap();
        let err = store.read_secret("secret/data/none", "a").unwrap_err();
        assert!(matches!(err, SeedError::NotFound { .. }));
    }
}
