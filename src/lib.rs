// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub mod client;
mod common;
pub mod config;
mod controllers;
pub mod dtos;
mod guards;
pub mod providers;
mod resolvers;
mod services;
pub mod startup;

pub use common::FieldErrors;
