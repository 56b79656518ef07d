// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::common::FieldErrors;

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Failure {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Failure {
    pub fn errors(errors: FieldErrors) -> Self {
        Self {
            success: false,
            errors: Some(errors),
            message: None,
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            success: false,
            errors: None,
            message: Some(message.to_string()),
        }
    }
}
