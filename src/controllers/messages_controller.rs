// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, Scope};

use crate::common::ServiceError;
use crate::dtos::{bodies, responses};
use crate::providers::{Broadcaster, Database};
use crate::services::messages_service;

async fn list_messages(db: web::Data<Database>) -> Result<HttpResponse, ServiceError> {
    let messages = messages_service::list_messages(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(responses::Success::new(messages)))
}

async fn create_message(
    db: web::Data<Database>,
    broadcaster: web::Data<Broadcaster>,
    body: web::Json<bodies::CreateMessage>,
) -> Result<HttpResponse, ServiceError> {
    let message =
        messages_service::create_message(db.get_ref(), broadcaster.get_ref(), body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(responses::Success::new(message)))
}

/// Turns body extraction failures into the same envelope every other error uses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error: JsonPayloadError, _: &HttpRequest| {
        let message = match error {
            JsonPayloadError::ContentType => "Content type must be application/json",
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                "Request body is too large"
            }
            _ => "Request body must be a JSON object",
        };
        ServiceError::bad_request(message, Some(error)).into()
    })
}

pub fn messages_router() -> Scope {
    web::scope("/messages")
        .route("", web::get().to(list_messages))
        .route("", web::post().to(create_message))
}
