// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::errors::Error;

pub const DEFAULT_MAX_FILES: u32 = 128;
pub const DEFAULT_THUMB_RES: (u16, u16) = (64, 64);
pub const DEFAULT_SMALL_RES: (u16, u16) = (256, 256);
pub const MAX_THUMB_RES: u16 = 128;
pub const MAX_SMALL_RES: u16 = 512;

/// Create-time configuration for a container: how many slots it has and what
/// resolutions it derives on demand. Immutable once the container exists:
/// `max_files`/`resized_res` never change after `create`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImgFsConfig {
    pub max_files: u32,
    pub thumb_res: (u16, u16),
    pub small_res: (u16, u16),
}

impl Default for ImgFsConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            thumb_res: DEFAULT_THUMB_RES,
            small_res: DEFAULT_SMALL_RES,
        }
    }
}

impl ImgFsConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_files == 0 {
            return Err(Error::MaxFiles);
        }
        let (tw, th) = self.thumb_res;
        let (sw, sh) = self.small_res;
        if tw == 0 || th == 0 || tw > MAX_THUMB_RES || th > MAX_THUMB_RES {
            return Err(Error::Resolutions);
        }
        if sw == 0 || sh == 0 || sw > MAX_SMALL_RES || sh > MAX_SMALL_RES {
            return Err(Error::Resolutions);
        }
        Ok(())
    }

    /// Packs the four resolutions into the on-disk `resized_res` order:
    /// `{thumb_w, thumb_h, small_w, small_h}`.
    pub fn resized_res(&self) -> [u16; 4] {
        [self.thumb_res.0, self.thumb_res.1, self.small_res.0, self.small_res.1]
    }
}
