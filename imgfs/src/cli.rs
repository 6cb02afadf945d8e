// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// `imgfscmd` — a single-file photo store.
#[derive(Debug, Parser)]
#[command(name = "imgfscmd", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the header and the list of valid images in a container.
    List { file: PathBuf },

    /// Creates a new, empty container.
    Create {
        file: PathBuf,
        #[arg(long, default_value_t = imgfs_db::DEFAULT_MAX_FILES)]
        max_files: u32,
        #[arg(long, default_value_t = imgfs_db::DEFAULT_THUMB_RES.0)]
        thumb_w: u16,
        #[arg(long, default_value_t = imgfs_db::DEFAULT_THUMB_RES.1)]
        thumb_h: u16,
        #[arg(long, default_value_t = imgfs_db::DEFAULT_SMALL_RES.0)]
        small_w: u16,
        #[arg(long, default_value_t = imgfs_db::DEFAULT_SMALL_RES.1)]
        small_h: u16,
    },

    /// Reads one image at the requested resolution and writes it to stdout.
    Read {
        file: PathBuf,
        img_id: String,
        #[arg(default_value = "orig")]
        resolution: String,
    },

    /// Inserts the image at `path` under `img_id`.
    Insert {
        file: PathBuf,
        img_id: String,
        path: PathBuf,
    },

    /// Deletes an image by id (tombstone, payload bytes are retained).
    Delete { file: PathBuf, img_id: String },

    /// Serves a container over HTTP until `SIGINT`/`SIGTERM`.
    Serve {
        file: PathBuf,
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
}
