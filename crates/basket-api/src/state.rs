//! # Application State
//!
//! Shared state for the Axum application.
//! Contains configuration, the repositories and the services built on them.

use crate::auth::TokenSigner;
use basket_core::{
    AddressBookService, CartStore, Deadlines, OrderLedger, SharedAccounts, SharedCatalog,
    ShopError, ShopResult,
};
use basket_store::{MemoryAccountStore, MemoryCatalog};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Shared secret for identity tokens
    pub token_secret: String,
    /// Maximum identity token age
    pub token_ttl: Duration,
    /// Store call limits
    pub deadlines: Deadlines,
    /// Explicit catalog file; searched for when unset
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present).
    ///
    /// `TOKEN_SECRET` is required; everything else has a default.
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ShopResult<Self> {
        let token_secret = lookup("TOKEN_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ShopError::Configuration("TOKEN_SECRET not set".to_string()))?;

        let cart_timeout = parse_or(&lookup, "CART_TIMEOUT_SECS", 5u64)?;
        let read_timeout = parse_or(&lookup, "READ_TIMEOUT_SECS", 100u64)?;
        if cart_timeout == 0 || read_timeout == 0 {
            return Err(ShopError::Configuration(
                "store timeouts must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080u16)?,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            token_secret,
            token_ttl: Duration::from_secs(parse_or(&lookup, "TOKEN_TTL_SECS", 86_400u64)?),
            deadlines: Deadlines::new(
                Duration::from_secs(cart_timeout),
                Duration::from_secs(read_timeout),
            ),
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ShopResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ShopError::Configuration(format!(
                    "invalid bind address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("deadlines", &self.deadlines)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> ShopResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ShopError::Configuration(format!("{} is invalid: {}", key, e))),
        None => Ok(default),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: SharedCatalog,
    pub accounts: SharedAccounts,
    pub cart: CartStore,
    pub addresses: AddressBookService,
    pub ledger: OrderLedger,
    pub tokens: TokenSigner,
}

impl AppState {
    /// Create state from the environment with in-memory storage
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let catalog = MemoryCatalog::load(config.catalog_path.as_deref())?;

        Ok(Self::with_repositories(
            config,
            Arc::new(catalog),
            Arc::new(MemoryAccountStore::new()),
        ))
    }

    /// Wire the services over the given repositories
    pub fn with_repositories(
        config: AppConfig,
        catalog: SharedCatalog,
        accounts: SharedAccounts,
    ) -> Self {
        let deadlines = config.deadlines;
        let tokens = TokenSigner::new(config.token_secret.clone(), config.token_ttl);

        Self {
            cart: CartStore::new(catalog.clone(), accounts.clone(), deadlines),
            addresses: AddressBookService::new(accounts.clone(), deadlines),
            ledger: OrderLedger::new(catalog.clone(), accounts.clone(), deadlines),
            config: Arc::new(config),
            catalog,
            accounts,
            tokens,
        }
    }
}
