// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Client side of the push channel: a `graphql-transport-ws` subscription to
//! `messageCreated`.

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};

use crate::dtos::objects::Message;

use super::error::ClientError;

const PROTOCOL: &str = "graphql-transport-ws";
const PUSH_PATH: &str = "/api/graphql/ws";
const SUBSCRIPTION_ID: &str = "message-created";
const SUBSCRIPTION: &str =
    "subscription { messageCreated { id username content created_at updated_at } }";

#[derive(Clone, Debug)]
pub struct PushConfig {
    pub app_key: Secret<String>,
    pub host: String,
    pub port: Option<u16>,
    pub scheme: String,
}

impl PushConfig {
    pub fn is_tls(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("https")
    }

    pub fn url(&self) -> String {
        let (scheme, default_port) = if self.is_tls() {
            ("wss", 443)
        } else {
            ("ws", 80)
        };
        format!(
            "{}://{}:{}{}",
            scheme,
            self.host,
            self.port.unwrap_or(default_port),
            PUSH_PATH
        )
    }
}

#[derive(Deserialize, Debug)]
struct ServerFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Value>,
}

pub struct PushChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushChannel {
    /// Opens the connection, authenticates with the app key and subscribes. Returns once
    /// the server acknowledged the connection.
    pub async fn connect(config: &PushConfig) -> Result<Self, ClientError> {
        let mut request = config.url().into_client_request()?;
        request
            .headers_mut()
            .insert("sec-websocket-protocol", HeaderValue::from_static(PROTOCOL));
        let (stream, _) = connect_async(request).await?;
        let mut channel = Self { stream };

        channel
            .send(json!({
                "type": "connection_init",
                "payload": { "app_key": config.app_key.expose_secret() },
            }))
            .await?;
        channel.wait_for_ack().await?;
        channel
            .send(json!({
                "id": SUBSCRIPTION_ID,
                "type": "subscribe",
                "payload": { "query": SUBSCRIPTION },
            }))
            .await?;
        tracing::info!(url = %config.url(), "Push channel connected");
        Ok(channel)
    }

    async fn send(&mut self, frame: Value) -> Result<(), ClientError> {
        self.stream.send(WsMessage::Text(frame.to_string())).await?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<ServerFrame>, ClientError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    let frame = serde_json::from_str::<ServerFrame>(&text)
                        .map_err(|e| ClientError::Malformed(e.to_string()))?;

                    if frame.kind == "ping" {
                        self.send(json!({ "type": "pong" })).await?;
                        continue;
                    }

                    return Ok(Some(frame));
                }
                Some(Ok(WsMessage::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    async fn wait_for_ack(&mut self) -> Result<(), ClientError> {
        match self.next_frame().await? {
            Some(frame) if frame.kind == "connection_ack" => Ok(()),
            Some(frame) => Err(ClientError::Push(format!(
                "Expected connection_ack, got {}",
                frame.kind
            ))),
            None => Err(ClientError::Push(
                "Connection closed during handshake".to_string(),
            )),
        }
    }

    /// Waits for the next created message. `None` means the server ended the
    /// subscription or closed the connection.
    pub async fn next_message(&mut self) -> Result<Option<Message>, ClientError> {
        while let Some(frame) = self.next_frame().await? {
            match frame.kind.as_str() {
                "next" => {
                    let message = frame
                        .payload
                        .as_ref()
                        .and_then(|payload| payload.pointer("/data/messageCreated"))
                        .cloned()
                        .ok_or_else(|| ClientError::Malformed("Missing messageCreated".to_string()))?;
                    let message = serde_json::from_value::<Message>(message)
                        .map_err(|e| ClientError::Malformed(e.to_string()))?;
                    return Ok(Some(message));
                }
                "error" => {
                    return Err(ClientError::Push(
                        frame
                            .payload
                            .map(|payload| payload.to_string())
                            .unwrap_or_else(|| "Subscription error".to_string()),
                    ))
                }
                "complete" => return Ok(None),
                _ => continue,
            }
        }

        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
