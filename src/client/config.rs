// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use secrecy::Secret;

use super::push::PushConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(100);

const LOG_FILE: &str = "client.log";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub scroll_delay: Duration,
    pub storage_dir: PathBuf,
    pub push: Option<PushConfig>,
}

impl ClientConfig {
    pub fn new(api_url: &str, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            scroll_delay: DEFAULT_SCROLL_DELAY,
            storage_dir: storage_dir.into(),
            push: None,
        }
    }
}

/// Terminal shoutbox client.
#[derive(Parser, Debug)]
#[command(name = "shoutbox-client", version, about)]
pub struct ClientArgs {
    /// Base URL of the shoutbox API.
    #[arg(long, env = "SHOUTBOX_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Seconds between two refreshes of the message list.
    #[arg(long, env = "SHOUTBOX_POLL_INTERVAL_SECS", default_value_t = 5)]
    pub poll_interval_secs: u64,

    /// Directory holding the locally persisted username.
    #[arg(long, env = "SHOUTBOX_STORAGE_DIR", default_value = ".shoutbox")]
    pub storage_dir: PathBuf,

    /// Number of messages visible at once.
    #[arg(long, env = "SHOUTBOX_VIEW_HEIGHT", default_value_t = 10)]
    pub height: usize,

    /// Where logs are written, the terminal is reserved for the shoutbox.
    /// Defaults to `client.log` in the storage directory.
    #[arg(long, env = "SHOUTBOX_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "SHOUTBOX_PUSH_APP_KEY", hide_env_values = true)]
    pub push_app_key: Option<String>,

    #[arg(long, env = "SHOUTBOX_PUSH_HOST")]
    pub push_host: Option<String>,

    /// Defaults to 443 for https and 80 otherwise.
    #[arg(long, env = "SHOUTBOX_PUSH_PORT")]
    pub push_port: Option<u16>,

    #[arg(long, env = "SHOUTBOX_PUSH_SCHEME", default_value = "https")]
    pub push_scheme: String,
}

impl ClientArgs {
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .to_owned()
            .unwrap_or_else(|| self.storage_dir.join(LOG_FILE))
    }

    /// The push channel is only configured when both an app key and a host are given.
    pub fn into_config(self) -> ClientConfig {
        let push = match (self.push_app_key, self.push_host) {
            (Some(app_key), Some(host)) if !app_key.is_empty() && !host.is_empty() => {
                Some(PushConfig {
                    app_key: Secret::new(app_key),
                    host,
                    port: self.push_port,
                    scheme: self.push_scheme,
                })
            }
            _ => None,
        };

        ClientConfig {
            api_url: self.api_url,
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            scroll_delay: DEFAULT_SCROLL_DELAY,
            storage_dir: self.storage_dir,
            push,
        }
    }
}
