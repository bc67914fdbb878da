use crate::model::value::TokenValue;
use serde::{Deserialize, Serialize};

/// Mode name assumed when an entry does not carry one
pub const DEFAULT_MODE: &str = "default";

/// One (token × mode) fact.
///
/// Field names follow the design tool's export (`variableId`, `collectionId`,
/// ...). Everything except the value and the path is optional in raw data;
/// see [`Entry::resolved_collection`] and [`Entry::resolved_mode`] for the
/// fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Dot-separated semantic path; empty when the source omitted it
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub value: TokenValue,
    #[serde(rename = "type", default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl Entry {
    /// Create an id-less entry
    pub fn new(
        path: impl Into<String>,
        collection: impl Into<String>,
        mode: impl Into<String>,
        value: TokenValue,
    ) -> Self {
        Self {
            variable_id: None,
            collection_id: None,
            mode_id: None,
            collection: Some(collection.into()),
            mode: Some(mode.into()),
            path: path.into(),
            value,
            token_type: String::new(),
            description: None,
            scopes: None,
        }
    }

    pub fn with_variable_id(mut self, id: impl Into<String>) -> Self {
        self.variable_id = Some(id.into());
        self
    }

    /// Attach the design tool's internal collection and mode ids
    pub fn with_structure_ids(
        mut self,
        collection_id: impl Into<String>,
        mode_id: impl Into<String>,
    ) -> Self {
        self.collection_id = Some(collection_id.into());
        self.mode_id = Some(mode_id.into());
        self
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stable variable id, ignoring empty strings
    pub fn stable_id(&self) -> Option<&str> {
        self.variable_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Collection name, falling back to the first path segment
    pub fn resolved_collection(&self) -> &str {
        match self.collection.as_deref() {
            Some(name) => name,
            None => self.path.split('.').next().unwrap_or_default(),
        }
    }

    /// Mode name, falling back to [`DEFAULT_MODE`]
    pub fn resolved_mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_MODE)
    }
}
