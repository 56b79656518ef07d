// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::dtos::objects::Message;

use super::state::{ShoutboxState, SubmitPhase};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub trait ShoutboxView: Send {
    fn render(&mut self, state: &ShoutboxState);

    /// Brings the newest message into view.
    fn scroll_to_latest(&mut self, state: &ShoutboxState);

    /// Moves the view by `lines`, negative is towards older messages.
    fn scroll_by(&mut self, state: &ShoutboxState, lines: isize);
}

/// Hour and minute on a 24-hour clock, in the given time zone.
pub fn format_time_of_day<Tz>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created_at.with_timezone(tz).format("%H:%M").to_string()
}

pub fn format_message<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "[{}] {}: {}",
        format_time_of_day(&message.created_at, tz),
        message.username,
        message.content
    )
}

/// Fixed-height window over the message list. While the window shows the newest
/// message it follows new ones, once scrolled up it stays where it is.
pub struct TerminalView<W, Tz = Local> {
    out: W,
    tz: Tz,
    height: usize,
    offset: usize,
    shown: usize,
}

impl<W: Write + Send> TerminalView<W, Local> {
    pub fn new(out: W, height: usize) -> Self {
        Self::with_timezone(out, height, Local)
    }
}

impl<W, Tz> TerminalView<W, Tz>
where
    W: Write + Send,
    Tz: TimeZone + Send,
    Tz::Offset: Display,
{
    pub fn with_timezone(out: W, height: usize, tz: Tz) -> Self {
        Self {
            out,
            tz,
            height: height.max(1),
            offset: 0,
            shown: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, state: &ShoutboxState) -> std::io::Result<()> {
        let messages = state.messages();
        let last_offset = messages.len().saturating_sub(self.height);
        if self.offset + self.height >= self.shown {
            self.offset = last_offset;
        }
        self.offset = self.offset.min(last_offset);
        self.shown = messages.len();
        let end = (self.offset + self.height).min(messages.len());

        write!(self.out, "{}", CLEAR_SCREEN)?;
        writeln!(
            self.out,
            "Shoutbox ({}-{} of {})",
            if messages.is_empty() { 0 } else { self.offset + 1 },
            end,
            messages.len()
        )?;
        for message in &messages[self.offset..end] {
            writeln!(self.out, "{}", format_message(message, &self.tz))?;
        }
        for (field, reason) in state.errors() {
            writeln!(self.out, "! {}: {}", field, reason)?;
        }
        if let Some(notice) = state.notice() {
            writeln!(self.out, "! {}", notice)?;
        }

        let status = match state.phase() {
            SubmitPhase::Submitting => "sending...",
            SubmitPhase::Idle if state.username().is_empty() => "set a name with /name <username>",
            SubmitPhase::Idle => "enter sends, /up /down /latest scroll, /quit leaves",
        };
        writeln!(
            self.out,
            "{} | {}",
            if state.username().is_empty() {
                "(no username)"
            } else {
                state.username()
            },
            status
        )?;
        self.out.flush()
    }
}

impl<W, Tz> ShoutboxView for TerminalView<W, Tz>
where
    W: Write + Send,
    Tz: TimeZone + Send,
    Tz::Offset: Display,
{
    fn render(&mut self, state: &ShoutboxState) {
        if let Err(e) = self.draw(state) {
            tracing::warn!(error.message = %e, "Failed to render the shoutbox");
        }
    }

    fn scroll_to_latest(&mut self, state: &ShoutboxState) {
        self.offset = state.messages().len().saturating_sub(self.height);
        self.render(state);
    }

    fn scroll_by(&mut self, state: &ShoutboxState, lines: isize) {
        let last_offset = state.messages().len().saturating_sub(self.height);
        self.offset = self.offset.saturating_add_signed(lines).min(last_offset);
        self.render(state);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset};

    use crate::client::state::Action;

    use super::*;

    fn message(id: i32) -> Message {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 20, 21, 5, 0).unwrap()
            + Duration::minutes(id as i64);
        Message {
            id,
            username: format!("user{}", id),
            content: format!("content {}", id),
            created_at,
            updated_at: created_at,
        }
    }

    fn state_with(count: i32) -> ShoutboxState {
        ShoutboxState::new("alice".to_string())
            .reduce(Action::MessagesLoaded((1..=count).map(message).collect()))
    }

    fn output(view: TerminalView<Vec<u8>, Utc>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_time_of_day_uses_24_hour_clock() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 20, 21, 5, 59).unwrap();
        assert_eq!(format_time_of_day(&created_at, &Utc), "21:05");

        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(format_time_of_day(&created_at, &tz), "00:05");
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message(&message(1), &Utc), "[21:06] user1: content 1");
    }

    fn last_frame(view: TerminalView<Vec<u8>, Utc>) -> String {
        let out = output(view);
        out.rsplit(CLEAR_SCREEN).next().unwrap_or_default().to_string()
    }

    #[test]
    fn test_window_follows_new_messages_at_bottom() {
        let mut view = TerminalView::with_timezone(Vec::new(), 3, Utc);
        for count in 3..=8 {
            view.render(&state_with(count));
        }
        assert_eq!(view.offset(), 5);

        let frame = last_frame(view);
        assert!(frame.contains("Shoutbox (6-8 of 8)"));
        assert!(frame.contains("user8: content 8"));
        assert!(!frame.contains("user5"));
    }

    #[test]
    fn test_scrolled_up_window_keeps_position() {
        let mut view = TerminalView::with_timezone(Vec::new(), 2, Utc);
        view.render(&state_with(5));
        assert_eq!(view.offset(), 3);

        view.scroll_by(&state_with(5), -2);
        assert_eq!(view.offset(), 1);
        view.render(&state_with(7));
        assert_eq!(view.offset(), 1);

        let frame = last_frame(view);
        assert!(frame.contains("Shoutbox (2-3 of 7)"));
        assert!(frame.contains("user2: content 2"));
        assert!(!frame.contains("user7"));
    }

    #[test]
    fn test_scroll_by_is_clamped() {
        let mut view = TerminalView::with_timezone(Vec::new(), 2, Utc);
        let state = state_with(5);
        view.render(&state);

        view.scroll_by(&state, -10);
        assert_eq!(view.offset(), 0);
        view.scroll_by(&state, 1);
        assert_eq!(view.offset(), 1);
        view.scroll_by(&state, 10);
        assert_eq!(view.offset(), 3);

        // Back at the bottom the window follows again.
        view.render(&state_with(6));
        assert_eq!(view.offset(), 4);
    }

    #[test]
    fn test_scroll_to_latest_shows_newest() {
        let mut view = TerminalView::with_timezone(Vec::new(), 2, Utc);
        view.render(&state_with(3));
        view.scroll_by(&state_with(3), -1);
        assert_eq!(view.offset(), 0);
        view.scroll_to_latest(&state_with(5));
        assert_eq!(view.offset(), 3);

        let out = output(view);
        assert!(out.contains("Shoutbox (4-5 of 5)"));
        assert!(out.contains("user5: content 5"));
    }

    #[test]
    fn test_renders_errors_and_notice() {
        let mut errors = crate::FieldErrors::new();
        errors.insert("content".to_string(), "The content field is required.".to_string());
        let state = state_with(0)
            .reduce(Action::SubmitRejected(errors))
            .reduce(Action::LoadFailed("Could not reach the server".to_string()));

        let mut view = TerminalView::with_timezone(Vec::new(), 2, Utc);
        view.render(&state);
        let out = output(view);
        assert!(out.contains("Shoutbox (0-0 of 0)"));
        assert!(out.contains("! content: The content field is required."));
        assert!(out.contains("! Could not reach the server"));
    }
}
