//! Input validation for trip creation and transitions
//!
//! Structural rules (ranges, lengths, nesting) are declared with
//! `#[derive(Validate)]` on the input types; rules the derive cannot express
//! live in [`validators`]. Both are reported through
//! [`ValidationError::FieldErrors`] with dotted field paths.

pub mod validators;

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::trip::{CreateTripInput, Location, MAX_RATE_PER_UNIT, TripPatch};

/// Validate a [`CreateTripInput`] before it reaches the store
pub fn validate_create_input(input: &CreateTripInput) -> Result<(), ValidationError> {
    let mut errors = match input.validate() {
        Ok(()) => Vec::new(),
        Err(e) => flatten(&e),
    };

    // NaN slips through range checks
    if let Err(message) = validators::finite_positive(input.shipment.quantity) {
        let field = "shipment.quantity";
        if !errors.iter().any(|e| e.field == field) {
            errors.push(FieldValidationError {
                field: field.to_string(),
                message,
            });
        }
    }

    check_contact("pickup", &input.pickup, &mut errors);
    check_contact("delivery", &input.delivery, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(ValidationError::FieldErrors(errors))
    }
}

/// Validate the transporter id supplied to `accept`
pub fn validate_transporter_id(transporter_id: &str) -> Result<(), ValidationError> {
    validators::non_blank(transporter_id)
        .map_err(|message| ValidationError::field("transporter_id", message))
}

/// Validate the pricing fields of an administrative patch
///
/// Overrides skip the lifecycle, not the bounds that keep totals meaningful.
pub fn validate_patch(patch: &TripPatch) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if let Some(rate) = patch.rate_per_unit {
        if !(1..=MAX_RATE_PER_UNIT).contains(&rate) {
            errors.push(FieldValidationError {
                field: "rate_per_unit".to_string(),
                message: format!("must be between 1 and {} RWF", MAX_RATE_PER_UNIT),
            });
        }
    }

    if let Some(shipment) = &patch.shipment {
        if let Err(e) = shipment.validate() {
            flatten_into("shipment", &e, &mut errors);
        }
        if let Err(message) = validators::finite_positive(shipment.quantity) {
            if !errors.iter().any(|e| e.field == "shipment.quantity") {
                errors.push(FieldValidationError {
                    field: "shipment.quantity".to_string(),
                    message,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(ValidationError::FieldErrors(errors))
    }
}

fn check_contact(prefix: &str, location: &Location, errors: &mut Vec<FieldValidationError>) {
    let Some(phone) = &location.contact_phone else {
        return;
    };
    if let Err(message) = validators::phone(phone) {
        errors.push(FieldValidationError {
            field: format!("{}.contact_phone", prefix),
            message,
        });
    }
}

/// Flatten nested `validator` errors into dotted-path field errors
fn flatten(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut out = Vec::new();
    flatten_into("", errors, &mut out);
    out
}

fn flatten_into(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldValidationError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_into(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_into(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
