//! Connection settings with environment fallback
//!
//! Explicit settings always win; the environment only fills the gaps. Blank
//! values (empty or whitespace) count as absent on both sides, so an empty
//! `TYPESENSE_API_KEY` cannot silently authenticate with nothing.

use crate::error::{Error, Result};

/// Environment variable consulted when no explicit API key is set
pub const API_KEY_ENV: &str = "TYPESENSE_API_KEY";

/// Environment variable consulted when no explicit server address is set
pub const API_ADDRESS_ENV: &str = "TYPESENSE_API_ADDRESS";

/// Partial connection settings as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_address: Option<String>,
}

/// Fully resolved connection credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_address: String,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<Credentials> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup.
    ///
    /// Reports every missing field at once rather than stopping at the first.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = pick(self.api_key.as_deref(), lookup(API_KEY_ENV));
        let api_address = pick(self.api_address.as_deref(), lookup(API_ADDRESS_ENV));

        match (api_key, api_address) {
            (Some(api_key), Some(api_address)) => Ok(Credentials {
                api_key,
                api_address,
            }),
            (api_key, api_address) => {
                let mut fields = Vec::new();
                if api_key.is_none() {
                    fields.push(format!("api_key ({API_KEY_ENV})"));
                }
                if api_address.is_none() {
                    fields.push(format!("api_address ({API_ADDRESS_ENV})"));
                }
                Err(Error::MissingCredentials { fields })
            }
        }
    }
}

/// First non-blank value, explicit before fallback.
fn pick(explicit: Option<&str>, fallback: Option<String>) -> Option<String> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(fallback)
        .find(|value| !value.trim().is_empty())
}
