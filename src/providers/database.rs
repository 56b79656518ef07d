// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use anyhow::Error;
use migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};
use secrecy::{ExposeSecret, Secret};

#[derive(Clone, Debug)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    pub async fn new(url: &Secret<String>, max_connections: u32) -> Result<Self, Error> {
        let mut options = ConnectOptions::new(url.expose_secret().to_owned());
        options
            .max_connections(max_connections)
            .sqlx_logging(false);
        let connection = sea_orm::Database::connect(options).await?;

        Ok(Self { connection })
    }

    /// Applies every pending migration.
    pub async fn migrate(&self) -> Result<(), Error> {
        Migrator::up(&self.connection, None).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
