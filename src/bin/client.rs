// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use shoutbox::client::{ClientArgs, Shoutbox, TerminalView};
use shoutbox::startup::Telemetry;

const NAME_COMMAND: &str = "/name";
const QUIT_COMMAND: &str = "/quit";
const UP_COMMAND: &str = "/up";
const DOWN_COMMAND: &str = "/down";
const LATEST_COMMAND: &str = "/latest";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ClientArgs::parse();
    let log_file = args.log_file();
    if let Some(dir) = log_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("Could not create the log directory.")?;
    }
    let sink = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Could not open {}.", log_file.display()))?;
    let subscriber = Telemetry::get_subscriber("shoutbox-client", "warn", Mutex::new(sink));
    Telemetry::init_subscriber(subscriber)?;

    let height = args.height;
    let page = height.max(1) as isize;
    let config = args.into_config();
    let view = TerminalView::new(std::io::stdout(), height);
    let shoutbox = Shoutbox::new(&config, view)?.mount();

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches(['\r', '\n']);
        let mounted = match line.trim() {
            QUIT_COMMAND => break,
            UP_COMMAND => shoutbox.scroll(-page),
            DOWN_COMMAND => shoutbox.scroll(page),
            LATEST_COMMAND => shoutbox.scroll_to_latest(),
            _ => match line
                .strip_prefix(NAME_COMMAND)
                .filter(|rest| rest.is_empty() || rest.starts_with(' '))
            {
                Some(username) => shoutbox.set_username(username.trim()),
                None => shoutbox.set_content(line) && shoutbox.submit(),
            },
        };

        if !mounted {
            break;
        }
    }

    shoutbox.unmount().await?;
    Ok(())
}
