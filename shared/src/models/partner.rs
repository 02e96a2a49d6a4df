//! Partner, project and architect records

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::{InventoryError, InventoryResult};
use crate::validation::{normalize_optional_text, validate_record_name};

/// Customer or architect partner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub vat: String,
    pub reference: String,
    pub email: String,
}

/// Stone project a hold can be attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
}

/// Input for creating a customer or architect
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartnerInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 32))]
    pub vat: Option<String>,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
}

/// Report a validation failure against the first offending field
fn invalid_field(errors: ValidationErrors) -> InventoryError {
    let field = errors
        .field_errors()
        .keys()
        .min()
        .copied()
        .unwrap_or("name");
    InventoryError::invalid(field, &errors.to_string())
}

/// Partner fields after trimming, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartner {
    pub name: String,
    pub vat: Option<String>,
    pub reference: Option<String>,
}

impl CreatePartnerInput {
    pub fn normalize(&self) -> InventoryResult<NewPartner> {
        self.validate().map_err(invalid_field)?;
        Ok(NewPartner {
            name: validate_record_name("name", &self.name)?,
            vat: normalize_optional_text(self.vat.as_deref()),
            reference: normalize_optional_text(self.reference.as_deref()),
        })
    }
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl CreateProjectInput {
    pub fn normalized_name(&self) -> InventoryResult<String> {
        self.validate().map_err(invalid_field)?;
        validate_record_name("name", &self.name)
    }
}
