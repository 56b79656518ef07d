// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::Value;

use super::error_handling::{FieldErrors, ServiceError};

#[derive(Debug, PartialEq, Eq)]
pub enum ValidatorEnum {
    Valid(String),
    Invalid(String),
}

/// Validates a required text field with a maximum length counted in characters.
///
/// Surrounding whitespace is trimmed first, so a whitespace only value is treated as
/// missing. On success the trimmed value is returned for storage.
pub fn validate_required_text(name: &str, value: Option<&Value>, max: usize) -> ValidatorEnum {
    let value = match value {
        None | Some(Value::Null) => {
            return ValidatorEnum::Invalid(format!("The {} field is required.", name))
        }
        Some(Value::String(value)) => value.trim(),
        Some(_) => return ValidatorEnum::Invalid(format!("The {} field must be a string.", name)),
    };

    if value.is_empty() {
        return ValidatorEnum::Invalid(format!("The {} field is required.", name));
    }
    if value.chars().count() > max {
        return ValidatorEnum::Invalid(format!(
            "The {} field must not be greater than {} characters.",
            name, max
        ));
    }

    ValidatorEnum::Valid(value.to_string())
}

/// Builds the 422 error for a failed validation, keeping one reason per invalid field
/// and leaving valid fields out.
pub fn validations_handler(validations: Vec<(&str, ValidatorEnum)>) -> ServiceError {
    let errors = validations
        .into_iter()
        .filter_map(|(name, validator)| match validator {
            ValidatorEnum::Invalid(message) => Some((name.to_string(), message)),
            ValidatorEnum::Valid(_) => None,
        })
        .collect::<FieldErrors>();

    ServiceError::unprocessable_entity(errors)
}
