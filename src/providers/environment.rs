// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::env;

use anyhow::{bail, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Reads `ENVIRONMENT`, falling back to `default` when it is unset.
    pub fn new(default: Environment) -> Result<Self, Error> {
        match env::var("ENVIRONMENT") {
            Ok(environment) => match environment.to_lowercase().as_str() {
                "development" | "dev" => Ok(Environment::Development),
                "production" | "prod" => Ok(Environment::Production),
                other => bail!("Invalid environment: {}", other),
            },
            Err(_) => Ok(default),
        }
    }

    pub fn is_production(&self) -> bool {
        match self {
            Environment::Development => false,
            Environment::Production => true,
        }
    }
}
