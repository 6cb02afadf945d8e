// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::Error;

/// The label written into every container created by this implementation.
pub const CONTAINER_NAME: &str = "EPFL ImgFS 2024";

/// Number of bytes reserved for `Header::name`, NUL-terminated.
pub const NAME_SIZE: usize = 32;

/// Total on-disk size of the header, including reserved padding up to the
/// first metadata slot.
pub const HEADER_SIZE: usize = 64;

/// In-memory mirror of the fixed header at offset 0 of a container.
///
/// Layout (little-endian, `HEADER_SIZE` bytes total):
///
/// | offset | size | field           |
/// |--------|------|-----------------|
/// | 0      | 32   | name            |
/// | 32     | 4    | version         |
/// | 36     | 4    | nb_files        |
/// | 40     | 4    | max_files       |
/// | 44     | 8    | resized_res[4]  |
/// | 52     | 12   | reserved        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: [u8; NAME_SIZE],
    pub version: u32,
    pub nb_files: u32,
    pub max_files: u32,
    /// `{thumb_w, thumb_h, small_w, small_h}`.
    pub resized_res: [u16; 4],
}

impl Header {
    /// Builds a fresh header for `create`: `version` and `nb_files` start at
    /// zero; `max_files` and the declared resolutions are immutable
    /// afterwards.
    pub fn new(max_files: u32, resized_res: [u16; 4]) -> Self {
        let mut name = [0u8; NAME_SIZE];
        let bytes = CONTAINER_NAME.as_bytes();
        name[..bytes.len()].copy_from_slice(bytes);
        Self {
            name,
            version: 0,
            nb_files: 0,
            max_files,
            resized_res,
        }
    }

    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..NAME_SIZE].copy_from_slice(&self.name);
        buf[32..36].copy_from_slice(&self.version.to_le_bytes());
        buf[36..40].copy_from_slice(&self.nb_files.to_le_bytes());
        buf[40..44].copy_from_slice(&self.max_files.to_le_bytes());
        for (i, v) in self.resized_res.iter().enumerate() {
            let off = 44 + i * 2;
            buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
        }
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short header read",
            )));
        }
        let mut name = [0u8; NAME_SIZE];
        name.copy_from_slice(&buf[0..NAME_SIZE]);
        let version = u32::from_le_bytes(buf[32..36].try_into().unwrap());
        let nb_files = u32::from_le_bytes(buf[36..40].try_into().unwrap());
        let max_files = u32::from_le_bytes(buf[40..44].try_into().unwrap());
        let mut resized_res = [0u16; 4];
        for (i, v) in resized_res.iter_mut().enumerate() {
            let off = 44 + i * 2;
            *v = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        }
        Ok(Self {
            name,
            version,
            nb_files,
            max_files,
            resized_res,
        })
    }
}

const _: () = assert!(HEADER_SIZE >= 44 + 8);
