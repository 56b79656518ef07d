// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_graphql::{Data, Error, Result};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

const APP_KEY_FIELD: &str = "app_key";

/// Checks the `connection_init` payload of a push channel connection against the
/// configured app key. Without a key every connection is accepted.
#[derive(Clone, Debug, Default)]
pub struct PushGuard {
    app_key: Option<Secret<String>>,
}

impl PushGuard {
    pub fn new(app_key: Option<Secret<String>>) -> Self {
        Self { app_key }
    }

    pub fn check(&self, payload: &Value) -> Result<Data> {
        let app_key = match &self.app_key {
            Some(app_key) => app_key,
            None => return Ok(Data::default()),
        };

        match payload.get(APP_KEY_FIELD).and_then(Value::as_str) {
            Some(key) if key == app_key.expose_secret().as_str() => Ok(Data::default()),
            Some(_) => {
                tracing::warn!("Push connection refused: invalid app key");
                Err(Error::new("Invalid app key"))
            }
            None => {
                tracing::warn!("Push connection refused: missing app key");
                Err(Error::new("Missing app key"))
            }
        }
    }
}
