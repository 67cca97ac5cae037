//! Product status enum, stored as a plain string column.

use crate::error::CoreError;

/// Product visibility status. Stored in the `status` TEXT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    /// Parse from the database / request value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: active, inactive"
            ))),
        }
    }

    /// The stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn round_trips_known_values() {
        assert_eq!(ProductStatus::from_name("active").unwrap(), ProductStatus::Active);
        assert_eq!(ProductStatus::from_name("inactive").unwrap().as_str(), "inactive");
    }

    #[test]
    fn rejects_unknown_values() {
        assert_matches!(
            ProductStatus::from_name("archived"),
            Err(CoreError::Validation(_))
        );
    }
}
