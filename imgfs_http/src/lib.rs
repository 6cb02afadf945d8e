// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP frontend exposing the ImgFS engine over HTTP/1.1, component G of
//! the design: routing, parameter extraction, and body handling only — the
//! storage semantics live entirely in `imgfs_db`.

mod error;
mod routes;
mod server;

pub use routes::{router, AppState};
pub use server::serve;
