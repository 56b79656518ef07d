// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::dtos::{
    objects::Message,
    responses::{Failure, Success},
};

use super::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP access to the message store.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8080/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    pub async fn list_messages(&self) -> Result<Vec<Message>, ClientError> {
        let response = self.http.get(self.messages_url()).send().await?;
        let (status, body) = read_response(response).await?;

        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        Ok(parse::<Success<Vec<Message>>>(&body)?.data)
    }

    pub async fn create_message(&self, username: &str, content: &str) -> Result<Message, ClientError> {
        let response = self
            .http
            .post(self.messages_url())
            .json(&json!({ "username": username, "content": content }))
            .send()
            .await?;
        let (status, body) = read_response(response).await?;

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let failure = parse::<Failure>(&body)?;
            return Err(ClientError::Validation(failure.errors.unwrap_or_default()));
        }
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        Ok(parse::<Success<Message>>(&body)?.data)
    }
}

async fn read_response(response: Response) -> Result<(StatusCode, Vec<u8>), ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    Ok((status, body.to_vec()))
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|e| ClientError::Malformed(e.to_string()))
}
