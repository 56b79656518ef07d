// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tokio::sync::broadcast::{self, Receiver, Sender};

use crate::dtos::objects::Message;

const CHANNEL_CAPACITY: usize = 64;

/// In-process fan-out of newly created messages to the push channel subscribers.
#[derive(Clone, Debug)]
pub struct Broadcaster {
    sender: Sender<Message>,
}

impl Broadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Returns how many subscribers received the message. Zero is not an error.
    pub fn publish(&self, message: Message) -> usize {
        match self.sender.send(message) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> Receiver<Message> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
