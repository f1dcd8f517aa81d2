//! # Identifiers
//!
//! Strongly typed document and entity identifiers. Each wraps a UUID v4;
//! parsing a malformed string fails with the variant naming the identifier.

use crate::error::ShopError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $invalid:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ShopError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($invalid("identifier is empty".to_string()));
                }
                Uuid::parse_str(trimmed)
                    .map(Self)
                    .map_err(|_| $invalid(trimmed.to_string()))
            }
        }
    };
}

identifier!(
    /// Account (user document) identifier
    AccountId,
    ShopError::InvalidAccountId
);
identifier!(
    /// Catalog product identifier
    ProductId,
    ShopError::InvalidProductId
);
identifier!(
    /// Stored address identifier
    AddressId,
    ShopError::InvalidRequest
);
identifier!(
    /// Order identifier
    OrderId,
    ShopError::InvalidRequest
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let id = AccountId::new();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_malformed_ids_name_their_kind() {
        assert!(matches!(
            "not-a-uuid".parse::<AccountId>(),
            Err(ShopError::InvalidAccountId(_))
        ));
        assert!(matches!(
            "".parse::<ProductId>(),
            Err(ShopError::InvalidProductId(_))
        ));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ProductId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
