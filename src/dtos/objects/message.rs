// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_graphql::SimpleObject;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use entities::message::Model;

/// A stored message as it travels over the wire, both in the REST envelope and in
/// GraphQL responses. Field names are snake case on every surface.
#[derive(SimpleObject, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[graphql(rename_fields = "snake_case")]
pub struct Message {
    pub id: i32,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Message {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            username: value.username,
            content: value.content,
            created_at: Utc.from_utc_datetime(&value.created_at),
            updated_at: Utc.from_utc_datetime(&value.updated_at),
        }
    }
}
