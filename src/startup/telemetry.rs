// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use anyhow::Error;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

pub struct Telemetry;

impl Telemetry {
    /// Bunyan formatted JSON logs, filtered by `RUST_LOG` or `env_filter` when unset.
    pub fn get_subscriber<Sink>(
        name: &str,
        env_filter: &str,
        sink: Sink,
    ) -> impl Subscriber + Send + Sync
    where
        Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
        let formatting_layer = BunyanFormattingLayer::new(name.to_string(), sink);
        Registry::default()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(formatting_layer)
    }

    pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), Error> {
        LogTracer::init()?;
        set_global_default(subscriber)?;
        Ok(())
    }
}
