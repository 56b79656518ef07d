// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use sea_orm::{ActiveModelTrait, Set};

use entities::message::{ActiveModel, Entity};

use crate::common::ServiceError;
use crate::dtos::{bodies::CreateMessage, objects::Message};
use crate::providers::{Broadcaster, Database};

#[tracing::instrument(name = "messages_service::list_messages", skip_all)]
pub async fn list_messages(db: &Database) -> Result<Vec<Message>, ServiceError> {
    let messages = Entity::find_oldest().all(db.get_connection()).await?;
    tracing::trace!(count = messages.len(), "Listed messages");
    Ok(messages.into_iter().map(Message::from).collect())
}

#[tracing::instrument(name = "messages_service::create_message", skip_all)]
pub async fn create_message(
    db: &Database,
    broadcaster: &Broadcaster,
    body: CreateMessage,
) -> Result<Message, ServiceError> {
    let body = body.validate()?;
    let message = ActiveModel {
        username: Set(body.username),
        content: Set(body.content),
        ..Default::default()
    }
    .insert(db.get_connection())
    .await?;
    tracing::trace!(id = %message.id, "Successfully created message");

    let message = Message::from(message);
    let receivers = broadcaster.publish(message.clone());
    tracing::debug!(id = %message.id, receivers, "Published message");
    Ok(message)
}
