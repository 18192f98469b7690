//! Enum types for CHARTER entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTITY TYPE
// ============================================================================

/// Entity type discriminator for error reporting and storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityType {
    Blueprint,
    FieldSlot,
    Contract,
    FieldValue,
}

// ============================================================================
// FIELD TYPE
// ============================================================================

/// Kind of a field slot on a blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    /// Free-form text
    Text,
    /// Calendar date
    Date,
    /// Signature placeholder
    Signature,
    /// Boolean tick box
    Checkbox,
}

impl FieldType {
    /// All recognized field kinds, in declaration order.
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Signature,
        FieldType::Checkbox,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Date => "DATE",
            FieldType::Signature => "SIGNATURE",
            FieldType::Checkbox => "CHECKBOX",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, FieldTypeParseError> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "date" => Ok(FieldType::Date),
            "signature" => Ok(FieldType::Signature),
            "checkbox" => Ok(FieldType::Checkbox),
            _ => Err(FieldTypeParseError(s.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for FieldType {
    type Err = FieldTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid field type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypeParseError(pub String);

impl fmt::Display for FieldTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid field type: {}", self.0)
    }
}

impl std::error::Error for FieldTypeParseError {}

// ============================================================================
// CONTRACT STATUS
// ============================================================================

/// Lifecycle status of a contract.
///
/// Variants are declared in lifecycle order, so the derived `Ord` is the
/// order in which a contract visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractStatus {
    /// Freshly instantiated from a blueprint
    #[default]
    Created,
    /// Approved internally, not yet sent out
    Approved,
    /// Sent to the counterparty for signature
    Sent,
    /// Signed (terminal)
    Signed,
}

impl ContractStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Created,
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ContractStatus::Created => "CREATED",
            ContractStatus::Approved => "APPROVED",
            ContractStatus::Sent => "SENT",
            ContractStatus::Signed => "SIGNED",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ContractStatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(ContractStatus::Created),
            "approved" => Ok(ContractStatus::Approved),
            "sent" => Ok(ContractStatus::Sent),
            "signed" => Ok(ContractStatus::Signed),
            _ => Err(ContractStatusParseError(s.to_string())),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for ContractStatus {
    type Err = ContractStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid contract status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractStatusParseError(pub String);

impl fmt::Display for ContractStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid contract status: {}", self.0)
    }
}

impl std::error::Error for ContractStatusParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_status_roundtrip() {
        for status in ContractStatus::ALL {
            let db_str = status.as_db_str();
            let parsed = ContractStatus::from_db_str(db_str).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_contract_status_parse_is_case_insensitive() {
        assert_eq!("signed".parse::<ContractStatus>().unwrap(), ContractStatus::Signed);
        assert_eq!(" Approved ".parse::<ContractStatus>().unwrap(), ContractStatus::Approved);
    }

    #[test]
    fn test_contract_status_rejects_unknown() {
        let err = ContractStatus::from_db_str("REVOKED").unwrap_err();
        assert_eq!(err, ContractStatusParseError("REVOKED".to_string()));
        assert!(err.to_string().contains("REVOKED"));
    }

    #[test]
    fn test_contract_status_order_is_lifecycle_order() {
        assert!(ContractStatus::Created < ContractStatus::Approved);
        assert!(ContractStatus::Approved < ContractStatus::Sent);
        assert!(ContractStatus::Sent < ContractStatus::Signed);
        assert_eq!(ContractStatus::default(), ContractStatus::Created);
    }

    #[test]
    fn test_contract_status_serde_uses_db_names() {
        let json = serde_json::to_string(&ContractStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        let back: ContractStatus = serde_json::from_str("\"SENT\"").unwrap();
        assert_eq!(back, ContractStatus::Sent);
    }

    #[test]
    fn test_field_type_roundtrip() {
        for kind in FieldType::ALL {
            assert_eq!(FieldType::from_db_str(kind.as_db_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_field_type_rejects_unknown() {
        assert!(FieldType::from_db_str("dropdown").is_err());
        assert!(FieldType::from_db_str("").is_err());
    }
}
