// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::env;

use anyhow::{Context, Error};
use secrecy::Secret;

use crate::providers::Environment;

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) environment: Environment,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) database_url: Secret<String>,
    pub(crate) database_max_connections: u32,
    pub(crate) push_app_key: Option<Secret<String>>,
}

type Host = String;
type Port = u16;
type MaxConnections = u32;

impl Config {
    pub fn new() -> Result<Self, Error> {
        let default_environment = match dotenvy::dotenv() {
            Ok(_) => Environment::Development,
            Err(_) => Environment::Production,
        };
        let environment = Environment::new(default_environment)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a number.")?;
        let database_url =
            env::var("DATABASE_URL").context("Missing the DATABASE_URL environment variable.")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a number.")?;
        let push_app_key = env::var("PUSH_APP_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(Secret::new);

        if push_app_key.is_none() && environment.is_production() {
            tracing::warn!("PUSH_APP_KEY is not set, the push channel accepts any client");
        }

        Ok(Self {
            environment,
            host,
            port,
            database_url: Secret::new(database_url),
            database_max_connections,
            push_app_key,
        })
    }

    pub fn app_config(&self) -> (Host, Port) {
        (self.host.to_owned(), self.port)
    }

    pub fn database_config(&self) -> (&Secret<String>, MaxConnections) {
        (&self.database_url, self.database_max_connections)
    }

    pub fn push_app_key(&self) -> Option<Secret<String>> {
        self.push_app_key.to_owned()
    }

    pub fn get_environment(&self) -> Environment {
        self.environment
    }
}
