//! # Address Book
//!
//! Each account holds at most one home and one work address. Slots are keyed
//! by role, so an edit always lands on the address it names.

use crate::error::{ShopError, ShopResult};
use crate::ids::AddressId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Role of a stored address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressSlot {
    Home,
    Work,
}

impl AddressSlot {
    /// Fill order used by [`AddressBook::add`]
    pub const ALL: [AddressSlot; 2] = [AddressSlot::Home, AddressSlot::Work];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressSlot::Home => "home",
            AddressSlot::Work => "work",
        }
    }
}

impl fmt::Display for AddressSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressSlot {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(AddressSlot::Home),
            "work" => Ok(AddressSlot::Work),
            other => Err(ShopError::InvalidRequest(format!(
                "unknown address slot '{}' (expected home or work)",
                other
            ))),
        }
    }
}

/// Editable address fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub house: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl AddressFields {
    pub fn new(
        house: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            house: house.into(),
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Every field is required
    pub fn validate(&self) -> ShopResult<()> {
        let fields = [
            ("house", &self.house),
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ShopError::InvalidRequest(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// A stored address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

impl Address {
    /// Create an address with a fresh identifier
    pub fn new(fields: AddressFields) -> Self {
        Self {
            id: AddressId::new(),
            fields,
        }
    }
}

/// Slot-keyed address collection embedded in an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    slots: BTreeMap<AddressSlot, Address>,
}

impl AddressBook {
    pub const CAPACITY: usize = AddressSlot::ALL.len();

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= Self::CAPACITY
    }

    pub fn get(&self, slot: AddressSlot) -> Option<&Address> {
        self.slots.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AddressSlot, &Address)> {
        self.slots.iter().map(|(slot, address)| (*slot, address))
    }

    /// Store `address` in the first free slot (home, then work)
    pub fn add(&mut self, address: Address) -> ShopResult<AddressSlot> {
        let slot = AddressSlot::ALL
            .into_iter()
            .find(|slot| !self.slots.contains_key(slot))
            .ok_or(ShopError::SlotLimitExceeded {
                capacity: Self::CAPACITY,
            })?;
        self.slots.insert(slot, address);
        Ok(slot)
    }

    /// Overwrite the fields of the address in `slot`, keeping its id
    pub fn edit(&mut self, slot: AddressSlot, fields: AddressFields) -> ShopResult<()> {
        let address = self
            .slots
            .get_mut(&slot)
            .ok_or(ShopError::AddressSlotNotFound { slot })?;
        address.fields = fields;
        Ok(())
    }

    /// Remove every address
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
