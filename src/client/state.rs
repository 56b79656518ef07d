// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Client state as an immutable-update reducer.
//!
//! Local messages are the last list the server returned plus an overlay of messages
//! this client learned about on its own (its own submits and push notifications).
//! Both are keyed by id, so a refresh that races a submit never shows a message twice.

use crate::dtos::objects::Message;
use crate::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone)]
pub enum Action {
    MessagesLoaded(Vec<Message>),
    LoadFailed(String),
    MessagePushed(Message),
    UsernameChanged(String),
    ContentChanged(String),
    SubmitStarted,
    SubmitSucceeded(Message),
    SubmitRejected(FieldErrors),
    SubmitFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoutboxState {
    server_messages: Vec<Message>,
    pending: Vec<Message>,
    username: String,
    content: String,
    errors: FieldErrors,
    load_notice: Option<String>,
    submit_notice: Option<String>,
    submitting: Option<String>,
    phase: SubmitPhase,
}

impl ShoutboxState {
    pub fn new(username: String) -> Self {
        Self {
            username,
            ..Default::default()
        }
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::MessagesLoaded(messages) => self.messages_loaded(messages),
            Action::LoadFailed(reason) => Self {
                load_notice: Some(reason),
                ..self
            },
            Action::MessagePushed(message) => self.with_pending(message),
            Action::UsernameChanged(username) => Self { username, ..self },
            Action::ContentChanged(content) => Self { content, ..self },
            Action::SubmitStarted => Self {
                errors: FieldErrors::new(),
                submit_notice: None,
                submitting: Some(self.content.to_owned()),
                phase: SubmitPhase::Submitting,
                ..self
            },
            Action::SubmitSucceeded(message) => {
                let state = self.with_pending(message);
                // A draft typed while the request was in flight is kept.
                let content = match state.submitting {
                    Some(ref sent) if *sent == state.content => String::new(),
                    _ => state.content.to_owned(),
                };
                Self {
                    content,
                    submitting: None,
                    phase: SubmitPhase::Idle,
                    ..state
                }
            }
            Action::SubmitRejected(errors) => Self {
                errors,
                submitting: None,
                phase: SubmitPhase::Idle,
                ..self
            },
            Action::SubmitFailed(reason) => Self {
                submit_notice: Some(reason),
                submitting: None,
                phase: SubmitPhase::Idle,
                ..self
            },
        }
    }

    /// Replaces the server list. Overlay entries the list now contains are dropped, and
    /// so are entries older than its newest id, since ids only grow.
    fn messages_loaded(self, messages: Vec<Message>) -> Self {
        let newest = messages.iter().map(|message| message.id).max();
        let pending = self
            .pending
            .into_iter()
            .filter(|message| {
                !messages.iter().any(|loaded| loaded.id == message.id)
                    && newest.map_or(true, |newest| message.id > newest)
            })
            .collect();

        Self {
            server_messages: messages,
            pending,
            load_notice: None,
            ..self
        }
    }

    fn with_pending(mut self, message: Message) -> Self {
        if !self.contains(message.id) {
            self.pending.push(message);
        }
        self
    }

    fn contains(&self, id: i32) -> bool {
        self.server_messages
            .iter()
            .chain(self.pending.iter())
            .any(|message| message.id == id)
    }

    /// Every known message, oldest first.
    pub fn messages(&self) -> Vec<&Message> {
        let mut messages = self
            .server_messages
            .iter()
            .chain(self.pending.iter())
            .collect::<Vec<&Message>>();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        messages
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// A failed submit outranks a failed refresh. Only a successful refresh clears the
    /// latter, only the next submit clears the former.
    pub fn notice(&self) -> Option<&str> {
        self.submit_notice
            .as_deref()
            .or(self.load_notice.as_deref())
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn can_submit(&self) -> bool {
        !self.username.is_empty() && !self.content.is_empty() && self.phase == SubmitPhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn message(id: i32, username: &str) -> Message {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap() + Duration::seconds(id as i64);
        Message {
            id,
            username: username.to_string(),
            content: format!("message {}", id),
            created_at,
            updated_at: created_at,
        }
    }

    fn ids(state: &ShoutboxState) -> Vec<i32> {
        state.messages().iter().map(|message| message.id).collect()
    }

    fn draft(username: &str, content: &str) -> ShoutboxState {
        ShoutboxState::new(username.to_string()).reduce(Action::ContentChanged(content.to_string()))
    }

    #[test]
    fn test_messages_loaded_replaces_list() {
        let state = ShoutboxState::default()
            .reduce(Action::MessagesLoaded(vec![message(1, "a"), message(2, "b")]))
            .reduce(Action::MessagesLoaded(vec![message(1, "a")]));
        assert_eq!(ids(&state), vec![1]);
    }

    #[test]
    fn test_submit_disabled_without_username_or_content() {
        assert!(!draft("", "hi").can_submit());
        assert!(!draft("alice", "").can_submit());
        assert!(draft("alice", "hi").can_submit());
        assert!(!draft("alice", "hi").reduce(Action::SubmitStarted).can_submit());
    }

    #[test]
    fn test_submit_success_clears_content_and_appends() {
        let state = draft("alice", "hi")
            .reduce(Action::MessagesLoaded(vec![message(1, "bob")]))
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(message(2, "alice")));
        assert_eq!(state.content(), "");
        assert_eq!(state.username(), "alice");
        assert_eq!(state.phase(), SubmitPhase::Idle);
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_refresh_after_optimistic_append_does_not_duplicate() {
        let state = draft("alice", "hi")
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(message(2, "alice")))
            .reduce(Action::MessagesLoaded(vec![message(1, "bob"), message(2, "alice")]));
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_stale_refresh_keeps_optimistic_message() {
        // The list was requested before the submit committed.
        let state = draft("alice", "hi")
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitSucceeded(message(2, "alice")))
            .reduce(Action::MessagesLoaded(vec![message(1, "bob")]));
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_overlay_dropped_once_newer_list_arrives() {
        let state = ShoutboxState::default()
            .reduce(Action::MessagePushed(message(2, "alice")))
            .reduce(Action::MessagesLoaded(vec![message(1, "bob"), message(3, "carol")]));
        assert_eq!(ids(&state), vec![1, 3]);
    }

    #[test]
    fn test_pushed_messages_are_deduplicated() {
        let state = ShoutboxState::default()
            .reduce(Action::MessagesLoaded(vec![message(1, "bob")]))
            .reduce(Action::MessagePushed(message(1, "bob")))
            .reduce(Action::MessagePushed(message(2, "carol")))
            .reduce(Action::MessagePushed(message(2, "carol")));
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_rejected_submit_keeps_draft() {
        let mut errors = FieldErrors::new();
        errors.insert("username".to_string(), "too long".to_string());
        let state = draft("alice", "hi")
            .reduce(Action::MessagesLoaded(vec![message(1, "bob")]))
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitRejected(errors.clone()));
        assert_eq!(state.content(), "hi");
        assert_eq!(state.errors(), &errors);
        assert_eq!(ids(&state), vec![1]);
        assert!(state.can_submit());

        let state = state.reduce(Action::SubmitStarted);
        assert!(state.errors().is_empty());
    }

    #[test]
    fn test_failed_submit_sets_notice() {
        let state = draft("alice", "hi")
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitFailed("offline".to_string()));
        assert_eq!(state.notice(), Some("offline"));
        assert_eq!(state.content(), "hi");
        assert!(state.errors().is_empty());
        assert_eq!(state.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn test_draft_typed_while_submitting_survives_success() {
        let state = draft("alice", "first")
            .reduce(Action::SubmitStarted)
            .reduce(Action::ContentChanged("second".to_string()))
            .reduce(Action::SubmitSucceeded(message(1, "alice")));
        assert_eq!(state.content(), "second");
        assert_eq!(ids(&state), vec![1]);
        assert!(state.can_submit());
    }

    #[test]
    fn test_refresh_keeps_failed_submit_notice() {
        let state = draft("alice", "hi")
            .reduce(Action::LoadFailed("refresh failed".to_string()))
            .reduce(Action::SubmitStarted)
            .reduce(Action::SubmitFailed("send failed".to_string()));
        assert_eq!(state.notice(), Some("send failed"));

        let state = state.reduce(Action::MessagesLoaded(vec![message(1, "bob")]));
        assert_eq!(state.notice(), Some("send failed"));

        let state = state.reduce(Action::SubmitStarted);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_failed_load_keeps_messages() {
        let state = ShoutboxState::default()
            .reduce(Action::MessagesLoaded(vec![message(1, "bob")]))
            .reduce(Action::LoadFailed("offline".to_string()));
        assert_eq!(ids(&state), vec![1]);
        assert_eq!(state.notice(), Some("offline"));

        let state = state.reduce(Action::MessagesLoaded(vec![message(1, "bob")]));
        assert_eq!(state.notice(), None);
    }
}
