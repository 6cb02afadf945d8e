// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Error kinds produced by the ImgFS storage engine.
///
/// Mirrors the abstract error taxonomy of the on-disk format: argument
/// errors, container-state errors, environment errors, and the single
/// capability error for unimplemented list modes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("not enough arguments")]
    NotEnoughArguments,
    #[error("invalid command")]
    InvalidCommand,
    #[error("invalid image id")]
    InvalidImgId,
    #[error("invalid max_files value")]
    MaxFiles,
    #[error("invalid resolution")]
    Resolutions,

    #[error("imgFS is full")]
    ImgfsFull,
    #[error("image not found")]
    ImageNotFound,
    #[error("duplicate image id")]
    DuplicateId,

    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("out of memory")]
    OutOfMemory,
    #[error("image library error: {0}")]
    ImgLib(String),
    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("not implemented")]
    NotImplemented,

    #[error("{0}")]
    Other(String),
}

impl From<Error> for String {
    fn from(e: Error) -> Self {
        e.to_string()
    }
}
