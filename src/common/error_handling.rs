// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fmt::Display;

use actix_web::{error, http::StatusCode, HttpResponse};
use async_graphql::{Error, ErrorExtensions, Value};
use derive_more::Display;
use sea_orm::DbErr;

use crate::dtos::responses::Failure;

pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Field name to human readable reason, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Display)]
pub enum ServiceError {
    InternalServerError(String),
    BadRequest(String),
    #[display(fmt = "The given data was invalid")]
    UnprocessableEntity(FieldErrors),
}

impl ServiceError {
    pub fn internal_server_error<E: Display>(message: &str, cause: Option<E>) -> Self {
        if let Some(cause) = cause {
            tracing::error!(error.message = %cause, "{}", message);
        }
        Self::InternalServerError(message.to_string())
    }

    pub fn bad_request<E: Display>(message: &str, cause: Option<E>) -> Self {
        if let Some(cause) = cause {
            tracing::warn!(error.message = %cause, "{}", message);
        }
        Self::BadRequest(message.to_string())
    }

    pub fn unprocessable_entity(errors: FieldErrors) -> Self {
        tracing::debug!(?errors, "Validation failed");
        Self::UnprocessableEntity(errors)
    }
}

impl From<DbErr> for ServiceError {
    fn from(error: DbErr) -> Self {
        ServiceError::internal_server_error(SOMETHING_WENT_WRONG, Some(error))
    }
}

impl error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match *self {
            ServiceError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match *self {
            ServiceError::InternalServerError(ref message) => {
                HttpResponse::InternalServerError().json(Failure::message(message))
            }
            ServiceError::BadRequest(ref message) => {
                HttpResponse::BadRequest().json(Failure::message(message))
            }
            ServiceError::UnprocessableEntity(ref errors) => {
                HttpResponse::UnprocessableEntity().json(Failure::errors(errors.to_owned()))
            }
        }
    }
}

#[derive(Debug)]
pub enum GraphQLError {
    InternalServerError(String),
    BadRequest(String),
    UnprocessableEntity(FieldErrors),
}

impl From<ServiceError> for GraphQLError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InternalServerError(message) => {
                GraphQLError::InternalServerError(message)
            }
            ServiceError::BadRequest(message) => GraphQLError::BadRequest(message),
            ServiceError::UnprocessableEntity(errors) => GraphQLError::UnprocessableEntity(errors),
        }
    }
}

impl From<GraphQLError> for Error {
    fn from(error: GraphQLError) -> Self {
        match error {
            GraphQLError::InternalServerError(message) => {
                Error::new(message).extend_with(|_, e| {
                    e.set("type", "Internal Server Error");
                    e.set("code", "500");
                })
            }
            GraphQLError::BadRequest(message) => Error::new(message).extend_with(|_, e| {
                e.set("type", "Bad Request");
                e.set("code", "400");
            }),
            GraphQLError::UnprocessableEntity(errors) => {
                let errors = serde_json::to_value(&errors)
                    .ok()
                    .and_then(|errors| Value::from_json(errors).ok())
                    .unwrap_or(Value::Null);
                Error::new("The given data was invalid").extend_with(move |_, e| {
                    e.set("type", "Unprocessable Entity");
                    e.set("code", "422");
                    e.set("errors", errors.clone());
                })
            }
        }
    }
}
