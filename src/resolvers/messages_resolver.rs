// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_graphql::{Context, Object, Result, Subscription};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::common::GraphQLError;
use crate::dtos::{bodies::CreateMessage, objects::Message};
use crate::providers::{Broadcaster, Database};
use crate::services::messages_service;

#[derive(Default)]
pub struct MessagesQuery;

#[Object]
impl MessagesQuery {
    async fn messages(&self, ctx: &Context<'_>) -> Result<Vec<Message>> {
        let db = ctx.data::<Database>()?;
        Ok(messages_service::list_messages(db)
            .await
            .map_err(GraphQLError::from)?)
    }
}

#[derive(Default)]
pub struct MessagesMutation;

#[Object]
impl MessagesMutation {
    async fn create_message(
        &self,
        ctx: &Context<'_>,
        username: String,
        content: String,
    ) -> Result<Message> {
        let db = ctx.data::<Database>()?;
        let broadcaster = ctx.data::<Broadcaster>()?;
        Ok(messages_service::create_message(
            db,
            broadcaster,
            CreateMessage::new(&username, &content),
        )
        .await
        .map_err(GraphQLError::from)?)
    }
}

#[derive(Default)]
pub struct MessagesSubscription;

#[Subscription]
impl MessagesSubscription {
    /// Every message created after the subscription starts. A subscriber that falls
    /// too far behind skips the messages it missed.
    async fn message_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Message>> {
        let receiver = ctx.data::<Broadcaster>()?.subscribe();
        Ok(BroadcastStream::new(receiver).filter_map(|message| message.ok()))
    }
}
