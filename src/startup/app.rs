// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{io, net::TcpListener};

use actix_web::{dev::Server, web, HttpServer};
use anyhow::Error;
use tracing_actix_web::TracingLogger;

use crate::config::Config;
use crate::controllers::{
    health_controller::health_router,
    messages_controller::{json_config, messages_router},
};
use crate::guards::PushGuard;
use crate::providers::{Broadcaster, Database};

use super::schema_builder::{
    build_schema, graphql_playgroud_route, graphql_route, graphql_ws_route,
};

pub struct App {
    port: u16,
    server: Server,
}

impl App {
    /// Connects to the database, applies pending migrations and binds the configured
    /// address.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let (host, port) = config.app_config();
        let (database_url, max_connections) = config.database_config();
        let db = Database::new(database_url, max_connections).await?;
        db.migrate().await?;
        let listener = TcpListener::bind(format!("{}:{}", host, port))?;
        Ok(Self::build(&config, db, Broadcaster::new(), listener)?)
    }

    pub fn build(
        config: &Config,
        db: Database,
        broadcaster: Broadcaster,
        listener: TcpListener,
    ) -> Result<Self, io::Error> {
        let port = listener.local_addr()?.port();
        let config = config.to_owned();
        let server = HttpServer::new(move || {
            actix_web::App::new()
                .wrap(TracingLogger::default())
                .configure(Self::build_app_config(&config, &db, &broadcaster))
        })
        .listen(listener)?
        .run();
        tracing::info!(port, "Listening");
        Ok(Self { port, server })
    }

    pub fn build_app_config(
        config: &Config,
        db: &Database,
        broadcaster: &Broadcaster,
    ) -> impl FnOnce(&mut web::ServiceConfig) {
        let db = db.to_owned();
        let broadcaster = broadcaster.to_owned();
        let schema = build_schema(&db, &broadcaster);
        let push_guard = PushGuard::new(config.push_app_key());

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(db))
                .app_data(web::Data::new(broadcaster))
                .app_data(web::Data::new(schema))
                .app_data(web::Data::new(push_guard))
                .app_data(json_config())
                .service(
                    web::scope("/api")
                        .service(health_router())
                        .service(messages_router())
                        .service(graphql_route())
                        .service(graphql_playgroud_route())
                        .service(graphql_ws_route()),
                );
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn start_server(self) -> Result<(), io::Error> {
        self.server.await
    }
}
