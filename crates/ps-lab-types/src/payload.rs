//! Detection query payload
//!
//! Only the two fields the hierarchy filter reads are modelled; the rest of
//! the criteria belong to the filter-selection UI and the backend and are
//! carried verbatim in `other`.

use serde::{Deserialize, Serialize};

/// What kind of target the query was scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    /// Search by permission-set group API names
    #[serde(rename = "PSG")]
    PermissionSetGroup,
    /// Search by permission-set API names
    #[serde(rename = "PS")]
    PermissionSet,
    /// Search by assigned user
    #[serde(rename = "User")]
    User,
}

impl PermissionType {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::PermissionSetGroup => "PSG",
            PermissionType::PermissionSet => "PS",
            PermissionType::User => "User",
        }
    }

    /// Label used by the filter-criteria UI
    pub fn display_name(&self) -> &'static str {
        match self {
            PermissionType::PermissionSetGroup => "Permission Set Group",
            PermissionType::PermissionSet => "Permission Set",
            PermissionType::User => "User",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePermissionTypeError(pub String);

impl std::fmt::Display for ParsePermissionTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown permission type '{}' (expected PSG, PS or User)", self.0)
    }
}

impl std::error::Error for ParsePermissionTypeError {}

impl std::str::FromStr for PermissionType {
    type Err = ParsePermissionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PSG" => Ok(PermissionType::PermissionSetGroup),
            "PS" => Ok(PermissionType::PermissionSet),
            "User" => Ok(PermissionType::User),
            other => Err(ParsePermissionTypeError(other.to_string())),
        }
    }
}

/// Query descriptor the filter consumes read-only
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<PermissionType>,
    /// Comma-joined target API names
    #[serde(
        rename = "permissionsAPINames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub permissions_api_names: Option<String>,
    /// Criteria this crate does not interpret (`permission`, `metadataNames`, ...)
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl FilterPayload {
    pub fn new(permission_type: Option<PermissionType>, names: Option<&str>) -> Self {
        Self {
            permission_type,
            permissions_api_names: names.map(str::to_string),
            other: serde_json::Map::new(),
        }
    }

    /// Group-search payload
    pub fn groups(names: Option<&str>) -> Self {
        Self::new(Some(PermissionType::PermissionSetGroup), names)
    }

    /// Permission-set search payload
    pub fn permission_sets(names: Option<&str>) -> Self {
        Self::new(Some(PermissionType::PermissionSet), names)
    }

    /// No criteria at all (the shape a user-scoped hierarchy request sends)
    pub fn is_empty(&self) -> bool {
        self.permission_type.is_none()
            && self.permissions_api_names.is_none()
            && self.other.is_empty()
    }

    pub fn is_type(&self, permission_type: PermissionType) -> bool {
        self.permission_type == Some(permission_type)
    }

    /// Target names split on `,` and trimmed; `None` when no names were given
    pub fn target_names(&self) -> Option<Vec<&str>> {
        let raw = self.permissions_api_names.as_deref()?;
        let names: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names_trims() {
        let payload = FilterPayload::groups(Some(" G1 , G2,,"));
        assert_eq!(payload.target_names(), Some(vec!["G1", "G2"]));
    }

    #[test]
    fn test_blank_names_are_none() {
        assert_eq!(FilterPayload::groups(Some(" , ")).target_names(), None);
        assert_eq!(FilterPayload::groups(None).target_names(), None);
    }

    #[test]
    fn test_wire_shape() {
        let payload: FilterPayload =
            serde_json::from_str(r#"{"permissionType":"PS","permissionsAPINames":"A"}"#).unwrap();
        assert!(payload.is_type(PermissionType::PermissionSet));
        assert_eq!(payload.permissions_api_names.as_deref(), Some("A"));

        let empty: FilterPayload = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_uninterpreted_criteria_are_not_empty() {
        let payload: FilterPayload =
            serde_json::from_str(r#"{"permission":"ViewSetup","metadataNames":"Account"}"#)
                .unwrap();
        assert!(!payload.is_empty());
        assert_eq!(payload.permission_type, None);
        assert_eq!(payload.other["permission"], "ViewSetup");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["metadataNames"], "Account");
    }

    #[test]
    fn test_parse_permission_type() {
        assert_eq!(
            "PSG".parse::<PermissionType>(),
            Ok(PermissionType::PermissionSetGroup)
        );
        assert!("Profile".parse::<PermissionType>().is_err());
    }
}
