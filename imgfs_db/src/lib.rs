// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage engine for ImgFS: a single-file photo store where many small
//! images are packed into one append-mostly container with a fixed-size
//! metadata table at the head.
//!
//! This crate implements components A–F of the design (container I/O,
//! header/metadata model, dedup, lazy resize, engine operations, and the
//! concurrency gate). The HTTP frontend lives in `imgfs_http`.

mod config;
mod container;
mod dedup;
mod engine;
mod errors;
mod header;
mod metadata;
mod resize;

pub use config::{ImgFsConfig, DEFAULT_MAX_FILES, DEFAULT_SMALL_RES, DEFAULT_THUMB_RES, MAX_SMALL_RES, MAX_THUMB_RES};
pub use engine::{Engine, ListMode};
pub use errors::Error;
pub use header::{Header, CONTAINER_NAME, HEADER_SIZE, NAME_SIZE};
pub use metadata::{
    resolution_from_str, Slot, IMG_ID_SIZE, MAX_IMG_ID, NB_RES, ORIG_RES, SLOT_SIZE, SMALL_RES,
    THUMB_RES,
};
