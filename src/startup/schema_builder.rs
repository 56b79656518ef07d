// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use actix_web::{
    guard,
    web::{resource, Data, Payload},
    HttpRequest, HttpResponse, Resource, Result,
};
use async_graphql::{
    http::{playground_source, GraphQLPlaygroundConfig},
    MergedObject, Schema,
};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};

use crate::guards::PushGuard;
use crate::providers::{Broadcaster, Database};
use crate::resolvers::{health_resolver, messages_resolver};

const GRAPHQL_PATH: &str = "/api/graphql";
const GRAPHQL_WS_PATH: &str = "/api/graphql/ws";

#[derive(MergedObject, Default)]
pub struct MutationRoot(messages_resolver::MessagesMutation);

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    messages_resolver::MessagesQuery,
    health_resolver::HealthQuery,
);

pub type SubscriptionRoot = messages_resolver::MessagesSubscription;

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

pub fn build_schema(database: &Database, broadcaster: &Broadcaster) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot::default(),
    )
    .data(database.to_owned())
    .data(broadcaster.to_owned())
    .finish()
}

async fn graphql_post(schema: Data<AppSchema>, gql_req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(gql_req.into_inner()).await.into()
}

async fn graphql_get() -> Result<HttpResponse> {
    let source = playground_source(
        GraphQLPlaygroundConfig::new(GRAPHQL_PATH).subscription_endpoint(GRAPHQL_WS_PATH),
    );
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(source))
}

async fn graphql_ws(
    schema: Data<AppSchema>,
    push_guard: Data<PushGuard>,
    req: HttpRequest,
    payload: Payload,
) -> Result<HttpResponse> {
    let push_guard = push_guard.get_ref().to_owned();
    tracing::debug!("Opening push channel connection");
    GraphQLSubscription::new(Schema::clone(&*schema))
        .on_connection_init(move |value| async move { push_guard.check(&value) })
        .start(&req, payload)
}

pub fn graphql_route() -> Resource {
    resource("/graphql").guard(guard::Post()).to(graphql_post)
}

pub fn graphql_playgroud_route() -> Resource {
    resource("/graphql").guard(guard::Get()).to(graphql_get)
}

pub fn graphql_ws_route() -> Resource {
    resource("/graphql/ws")
        .guard(guard::Get())
        .guard(guard::Header("upgrade", "websocket"))
        .to(graphql_ws)
}
