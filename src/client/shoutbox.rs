// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::api::ApiClient;
use super::config::ClientConfig;
use super::error::ClientError;
use super::push::{PushChannel, PushConfig};
use super::render::ShoutboxView;
use super::state::{Action, ShoutboxState, SubmitPhase};
use super::storage::{LocalStorage, USERNAME_KEY};

const PUSH_RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub enum Command {
    SetUsername(String),
    SetContent(String),
    Submit,
    /// Moves the view by the given number of lines, negative is towards older messages.
    Scroll(isize),
    ScrollToLatest,
    Unmount,
}

enum Event {
    Action(Action),
    ScrollToLatest,
}

/// A mounted shoutbox. Dropping the handle unmounts it as well.
pub struct ShoutboxHandle {
    commands: UnboundedSender<Command>,
    task: JoinHandle<ShoutboxState>,
}

impl ShoutboxHandle {
    /// Returns false once the shoutbox is no longer mounted.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn set_username(&self, username: &str) -> bool {
        self.send(Command::SetUsername(username.to_string()))
    }

    pub fn set_content(&self, content: &str) -> bool {
        self.send(Command::SetContent(content.to_string()))
    }

    /// A submit sent while another one is in flight runs once that one completes.
    pub fn submit(&self) -> bool {
        self.send(Command::Submit)
    }

    pub fn scroll(&self, lines: isize) -> bool {
        self.send(Command::Scroll(lines))
    }

    pub fn scroll_to_latest(&self) -> bool {
        self.send(Command::ScrollToLatest)
    }

    /// Stops the refresh timer and the push channel and returns the final state.
    /// Requests still in flight finish on their own and their results are dropped.
    pub async fn unmount(self) -> Result<ShoutboxState, ClientError> {
        self.send(Command::Unmount);
        self.task
            .await
            .map_err(|e| ClientError::Stopped(e.to_string()))
    }
}

pub struct Shoutbox<V> {
    api: ApiClient,
    storage: LocalStorage,
    view: V,
    push: Option<PushConfig>,
    poll_interval: Duration,
    scroll_delay: Duration,
    submit_queued: bool,
}

impl<V: ShoutboxView + 'static> Shoutbox<V> {
    pub fn new(config: &ClientConfig, view: V) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiClient::new(&config.api_url)?,
            storage: LocalStorage::new(&config.storage_dir),
            view,
            push: config.push.to_owned(),
            poll_interval: config.poll_interval,
            scroll_delay: config.scroll_delay,
            submit_queued: false,
        })
    }

    pub fn mount(self) -> ShoutboxHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(receiver));
        ShoutboxHandle { commands, task }
    }

    async fn run(mut self, mut commands: UnboundedReceiver<Command>) -> ShoutboxState {
        let username = match self.storage.get_item(USERNAME_KEY) {
            Ok(username) => username.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error.message = %e, "Could not read the stored username");
                String::new()
            }
        };
        let mut state = ShoutboxState::new(username);
        let (events, mut receiver) = mpsc::unbounded_channel::<Event>();
        let push_task = self
            .push
            .to_owned()
            .map(|push| tokio::spawn(listen_for_pushes(push, events.clone())));

        // The first tick completes immediately and doubles as the initial load.
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.view.render(&state);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Unmount) | None => break,
                    Some(command) => state = self.handle_command(state, command, &events),
                },
                Some(event) = receiver.recv() => state = self.handle_event(state, event, &events),
                _ = ticker.tick() => self.load_messages(&events),
            }
        }

        if let Some(push_task) = push_task {
            push_task.abort();
        }
        tracing::debug!("Shoutbox unmounted");
        state
    }

    fn handle_command(
        &mut self,
        state: ShoutboxState,
        command: Command,
        events: &UnboundedSender<Event>,
    ) -> ShoutboxState {
        let state = match command {
            Command::SetUsername(username) => {
                if let Err(e) = self.storage.set_item(USERNAME_KEY, &username) {
                    tracing::warn!(error.message = %e, "Could not persist the username");
                }
                state.reduce(Action::UsernameChanged(username))
            }
            Command::SetContent(content) => state.reduce(Action::ContentChanged(content)),
            Command::Submit if state.can_submit() => self.start_submit(state, events),
            Command::Submit => {
                if state.phase() == SubmitPhase::Submitting {
                    self.submit_queued = true;
                }
                return state;
            }
            Command::Scroll(lines) => {
                self.view.scroll_by(&state, lines);
                return state;
            }
            Command::ScrollToLatest => {
                self.view.scroll_to_latest(&state);
                return state;
            }
            Command::Unmount => return state,
        };
        self.view.render(&state);
        state
    }

    fn handle_event(
        &mut self,
        state: ShoutboxState,
        event: Event,
        events: &UnboundedSender<Event>,
    ) -> ShoutboxState {
        match event {
            Event::Action(action) => {
                if matches!(action, Action::SubmitSucceeded(_)) {
                    let events = events.clone();
                    let delay = self.scroll_delay;
                    tokio::spawn(async move {
                        time::sleep(delay).await;
                        let _ = events.send(Event::ScrollToLatest);
                    });
                }
                let completes_submit = matches!(
                    action,
                    Action::SubmitSucceeded(_) | Action::SubmitRejected(_) | Action::SubmitFailed(_)
                );
                let mut state = state.reduce(action);
                if completes_submit && self.submit_queued {
                    self.submit_queued = false;
                    if state.can_submit() {
                        state = self.start_submit(state, events);
                    }
                }
                self.view.render(&state);
                state
            }
            Event::ScrollToLatest => {
                self.view.scroll_to_latest(&state);
                state
            }
        }
    }

    fn start_submit(&self, state: ShoutboxState, events: &UnboundedSender<Event>) -> ShoutboxState {
        self.create_message(&state, events);
        state.reduce(Action::SubmitStarted)
    }

    fn load_messages(&self, events: &UnboundedSender<Event>) {
        let api = self.api.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let action = match api.list_messages().await {
                Ok(messages) => Action::MessagesLoaded(messages),
                Err(e) => {
                    tracing::warn!(error.message = %e, "Could not refresh messages");
                    Action::LoadFailed(e.to_string())
                }
            };
            let _ = events.send(Event::Action(action));
        });
    }

    fn create_message(&self, state: &ShoutboxState, events: &UnboundedSender<Event>) {
        let api = self.api.clone();
        let events = events.clone();
        let username = state.username().to_string();
        let content = state.content().to_string();
        tokio::spawn(async move {
            let action = match api.create_message(&username, &content).await {
                Ok(message) => Action::SubmitSucceeded(message),
                Err(ClientError::Validation(errors)) => Action::SubmitRejected(errors),
                Err(e) => {
                    tracing::warn!(error.message = %e, "Could not send the message");
                    Action::SubmitFailed(e.to_string())
                }
            };
            let _ = events.send(Event::Action(action));
        });
    }
}

/// Feeds pushed messages into the shoutbox until it unmounts. Polling keeps running
/// regardless, so a broken channel only costs latency.
async fn listen_for_pushes(config: PushConfig, events: UnboundedSender<Event>) {
    while !events.is_closed() {
        match PushChannel::connect(&config).await {
            Ok(mut channel) => loop {
                match channel.next_message().await {
                    Ok(Some(message)) => {
                        if events.send(Event::Action(Action::MessagePushed(message))).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Push channel disconnected");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error.message = %e, "Push channel error");
                        break;
                    }
                }
            },
            Err(e) => {
                tracing::error!(error.message = %e, "Push channel error");
            }
        }
        time::sleep(PUSH_RECONNECT_DELAY).await;
    }
}
