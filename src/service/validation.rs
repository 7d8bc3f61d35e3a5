//! Property validation chain: independent checks, first failure wins.

use crate::error::AppError;
use crate::model::Property;

pub(crate) trait Validator: Send + Sync {
    fn check(&self, property: &Property) -> Result<(), AppError>;
}

/// Checks run in registration order; the first failure is returned as-is.
pub(crate) struct Validators {
    values: Vec<Box<dyn Validator>>,
}

impl Validators {
    pub(crate) fn new() -> Self {
        Self {
            values: vec![Box::new(NameValidator)],
        }
    }

    pub(crate) fn check(&self, property: &Property) -> Result<(), AppError> {
        for validator in &self.values {
            validator.check(property)?;
        }
        Ok(())
    }
}

struct NameValidator;

impl Validator for NameValidator {
    fn check(&self, property: &Property) -> Result<(), AppError> {
        if property.name.is_empty() {
            return Err(AppError::empty_field(Property::ENTITY, "name"));
        }
        if property.name.contains(char::is_whitespace) {
            return Err(AppError::invalid(
                Property::ENTITY,
                "'name' cannot contain spaces.",
            ));
        }
        Ok(())
    }
}
