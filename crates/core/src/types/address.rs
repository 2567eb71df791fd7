//! Customer address discriminator.

use serde::{Deserialize, Serialize};

/// Error returned for an unknown address type name or id.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressTypeError {
    /// The name is not `shipping` or `billing`.
    #[error("unknown address type: {0:?}")]
    UnknownName(String),
    /// The stored discriminator is not a known id.
    #[error("unknown address type id: {0}")]
    UnknownId(i32),
}

/// Whether an address is used for shipping or billing.
///
/// Rows in `customer_address_type` are seeded with id 1 for shipping and id 2
/// for billing; [`AddressType::id`] and [`AddressType::from_id`] are the only
/// places those numbers appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    Shipping,
    Billing,
}

impl AddressType {
    /// Database id of this address type.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Shipping => 1,
            Self::Billing => 2,
        }
    }

    /// Map a stored discriminator back to the enum.
    ///
    /// # Errors
    ///
    /// Returns [`AddressTypeError::UnknownId`] for anything other than 1 or 2.
    pub fn from_id(id: i32) -> Result<Self, AddressTypeError> {
        match id {
            1 => Ok(Self::Shipping),
            2 => Ok(Self::Billing),
            other => Err(AddressTypeError::UnknownId(other)),
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Billing => write!(f, "billing"),
        }
    }
}

impl std::str::FromStr for AddressType {
    type Err = AddressTypeError;

    /// Parses the type name case-insensitively (`"Shipping"`, `"billing"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shipping" => Ok(Self::Shipping),
            "billing" => Ok(Self::Billing),
            _ => Err(AddressTypeError::UnknownName(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_mapping() {
        assert_eq!(AddressType::Shipping.id(), 1);
        assert_eq!(AddressType::Billing.id(), 2);
        assert_eq!(AddressType::from_id(1), Ok(AddressType::Shipping));
        assert_eq!(AddressType::from_id(2), Ok(AddressType::Billing));
        assert_eq!(AddressType::from_id(3), Err(AddressTypeError::UnknownId(3)));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Shipping".parse(), Ok(AddressType::Shipping));
        assert_eq!(" BILLING ".parse(), Ok(AddressType::Billing));
        assert!("home".parse::<AddressType>().is_err());
    }
}
