//! Field-level validation rules for the order form.
//!
//! Each rule looks at one raw field value and either passes or returns a
//! [`ValidationError`] whose `Display` is the message shown to the customer.
//! [`validate`] runs every rule and collects all failures.

use crate::catalog::Product;
use crate::order::{Customer, OrderForm};
use crate::types::{Email, EmailError, Phone, PhoneError};

/// A single failed validation rule.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{}", missing_field_message(.field))]
    MissingField {
        /// Form field name.
        field: &'static str,
    },
    /// The email field is not a valid address.
    #[error("Enter a valid email address")]
    InvalidEmail(#[source] EmailError),
    /// The phone field is not `ddd-ddd-dddd`.
    #[error("Phone number should be in format: xxx-xxx-xxxx")]
    InvalidPhone(#[source] PhoneError),
    /// A quantity field contains something other than digits.
    #[error("Enter a positive number in product quantity")]
    InvalidQuantity {
        /// Form field name.
        field: &'static str,
    },
}

impl ValidationError {
    /// Stable error code, suitable for templates and logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MissingField",
            Self::InvalidEmail(_) => "InvalidEmail",
            Self::InvalidPhone(_) => "InvalidPhone",
            Self::InvalidQuantity { .. } => "InvalidQuantity",
        }
    }

    /// Name of the form field the error concerns.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidQuantity { field } => *field,
            Self::InvalidEmail(_) => "email",
            Self::InvalidPhone(_) => "phone",
        }
    }
}

fn missing_field_message(field: &str) -> String {
    let article = if field.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    };
    format!("Must have {article} {field}")
}

/// Fails with [`ValidationError::MissingField`] if `value` is blank.
///
/// # Errors
///
/// Returns `MissingField` for empty or whitespace-only values.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

/// Parses `value` as an email address.
///
/// # Errors
///
/// Returns `InvalidEmail` carrying the parse failure; an empty value is invalid.
pub fn check_email(value: &str) -> Result<Email, ValidationError> {
    Email::parse(value).map_err(ValidationError::InvalidEmail)
}

/// Parses `value` as a `ddd-ddd-dddd` phone number.
///
/// # Errors
///
/// Returns `InvalidPhone` for anything else, including the empty string.
pub fn check_phone(value: &str) -> Result<Phone, ValidationError> {
    Phone::parse(value).map_err(ValidationError::InvalidPhone)
}

/// Checks that a quantity is made only of ASCII digits and fits in a `u32`.
///
/// The empty string passes: an untouched quantity box means zero.
///
/// # Errors
///
/// Returns `InvalidQuantity` for signs, decimal points, spaces, letters or
/// counts too large to price.
pub fn check_quantity(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let digits_only = value.bytes().all(|b| b.is_ascii_digit());
    if digits_only && (value.is_empty() || value.parse::<u32>().is_ok()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidQuantity { field })
    }
}

/// Runs every rule against a submission.
///
/// Errors are returned in form order and none short-circuits another.
///
/// # Errors
///
/// Returns every failed rule if at least one failed.
pub fn validate(form: &OrderForm) -> Result<Customer, Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("name", &form.name),
        ("address", &form.address),
        ("city", &form.city),
        ("province", &form.province),
    ] {
        if let Err(e) = require(field, value) {
            errors.push(e);
        }
    }

    let email = check_email(&form.email).map_err(|e| errors.push(e)).ok();
    let phone = check_phone(&form.phone).map_err(|e| errors.push(e)).ok();

    for product in Product::ALL {
        if let Err(e) = check_quantity(product.field_name(), form.quantity(product)) {
            errors.push(e);
        }
    }

    match (email, phone) {
        (Some(email), Some(phone)) if errors.is_empty() => Ok(Customer {
            name: form.name.trim().to_owned(),
            address: form.address.trim().to_owned(),
            city: form.city.trim().to_owned(),
            province: form.province.trim().to_owned(),
            email,
            phone,
        }),
        _ => Err(errors),
    }
}
