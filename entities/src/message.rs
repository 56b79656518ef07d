// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, QueryOrder};

pub const USERNAME_MAX_LENGTH: usize = 20;
pub const CONTENT_MAX_LENGTH: usize = 120;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(Some(20))")]
    pub username: String,
    #[sea_orm(column_type = "String(Some(120))")]
    pub content: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(mut self, _: &C, insert: bool) -> Result<Self, DbErr> {
        let current_time = Utc::now().naive_utc();
        self.updated_at = ActiveValue::Set(current_time);
        if insert {
            self.created_at = ActiveValue::Set(current_time);
        }
        Ok(self)
    }
}

impl Entity {
    /// Every message, oldest first. Messages created within the same tick keep
    /// their insertion order through the id.
    pub fn find_oldest() -> Select<Entity> {
        Self::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
    }
}
