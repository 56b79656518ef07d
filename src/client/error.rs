// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use reqwest::StatusCode;
use thiserror::Error;

use crate::FieldErrors;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("The given data was invalid")]
    Validation(FieldErrors),
    #[error("The server responded with {0}")]
    Status(StatusCode),
    #[error("Could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Local storage failed: {0}")]
    Storage(String),
    #[error("Push channel failed: {0}")]
    Push(String),
    #[error("The shoutbox stopped unexpectedly: {0}")]
    Stopped(String),
}

impl From<std::io::Error> for ClientError {
    fn from(error: std::io::Error) -> Self {
        ClientError::Storage(error.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Push(error.to_string())
    }
}
