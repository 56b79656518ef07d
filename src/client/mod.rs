// Copyright (c) 2023 Afonso Barracha
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub use api::*;
pub use config::*;
pub use error::*;
pub use push::*;
pub use render::*;
pub use shoutbox::*;
pub use state::*;
pub use storage::*;

pub mod api;
pub mod config;
pub mod error;
pub mod push;
pub mod render;
pub mod shoutbox;
pub mod state;
pub mod storage;
