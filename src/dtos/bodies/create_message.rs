// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use entities::message::{CONTENT_MAX_LENGTH, USERNAME_MAX_LENGTH};

use crate::common::{validate_required_text, validations_handler, ServiceError, ValidatorEnum};

/// Raw append request. Fields stay untyped so a wrong type is reported per field
/// instead of rejecting the whole body.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CreateMessage {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub username: String,
    pub content: String,
}

impl CreateMessage {
    pub fn new(username: &str, content: &str) -> Self {
        Self {
            username: Some(Value::String(username.to_string())),
            content: Some(Value::String(content.to_string())),
        }
    }

    pub fn validate(self) -> Result<ValidMessage, ServiceError> {
        let username =
            validate_required_text("username", self.username.as_ref(), USERNAME_MAX_LENGTH);
        let content = validate_required_text("content", self.content.as_ref(), CONTENT_MAX_LENGTH);

        match (username, content) {
            (ValidatorEnum::Valid(username), ValidatorEnum::Valid(content)) => {
                Ok(ValidMessage { username, content })
            }
            (username, content) => Err(validations_handler(vec![
                ("username", username),
                ("content", content),
            ])),
        }
    }
}
