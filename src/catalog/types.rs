use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Two fixed-format element lines for one tracked object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Parse into sgp4 elements, validating line format and checksums.
    pub fn to_elements(&self, name: Option<String>) -> Result<sgp4::Elements, sgp4::TleError> {
        sgp4::Elements::from_tle(name, self.line1.as_bytes(), self.line2.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub norad_id: u32,
    pub name: String,
    #[serde(flatten)]
    pub elements: ElementSet,
    pub status: Status,
    pub launch_date: Option<String>,
    pub operator: Option<String>,
    pub purpose: Option<String>,
}

impl CatalogEntry {
    /// Copy of this entry carrying a replacement element set.
    pub fn with_elements(&self, elements: ElementSet) -> Self {
        Self {
            elements,
            ..self.clone()
        }
    }
}
