// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::Error;

/// Largest printable identifier a slot can hold, not counting the NUL
/// terminator.
pub const MAX_IMG_ID: usize = 127;

/// Size, in bytes, of the `img_id` field including its NUL terminator.
pub const IMG_ID_SIZE: usize = MAX_IMG_ID + 1;

/// Number of declared resolutions per image.
pub const NB_RES: usize = 3;

pub const THUMB_RES: usize = 0;
pub const SMALL_RES: usize = 1;
pub const ORIG_RES: usize = 2;

/// Total on-disk size of one metadata slot, including reserved padding.
pub const SLOT_SIZE: usize = 256;

const IS_VALID_OFFSET: usize = 204;
const RESERVED_MIN: usize = IS_VALID_OFFSET + 2;
const _: () = assert!(SLOT_SIZE >= RESERVED_MIN);

pub const EMPTY: u16 = 0;
pub const NON_EMPTY: u16 = 1;

/// Maps a CLI/HTTP resolution name to its index, case-sensitively:
/// `thumb`/`thumbnail` → [`THUMB_RES`], `small` → [`SMALL_RES`],
/// `orig`/`original` → [`ORIG_RES`]; anything else is `ERR_RESOLUTIONS`.
pub fn resolution_from_str(s: &str) -> Result<usize, Error> {
    match s {
        "thumb" | "thumbnail" => Ok(THUMB_RES),
        "small" => Ok(SMALL_RES),
        "orig" | "original" => Ok(ORIG_RES),
        _ => Err(Error::Resolutions),
    }
}

/// One fixed-size metadata record.
///
/// Layout (little-endian, `SLOT_SIZE` bytes total):
///
/// | offset | size | field         |
/// |--------|------|---------------|
/// | 0      | 128  | img_id        |
/// | 128    | 32   | SHA           |
/// | 160    | 8    | orig_res[2]   |
/// | 168    | 12   | size[3]       |
/// | 180    | 24   | offset[3]     |
/// | 204    | 2    | is_valid      |
/// | 206    | 50   | reserved      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub img_id: [u8; IMG_ID_SIZE],
    pub sha: [u8; 32],
    pub orig_res: [u32; 2],
    pub size: [u32; NB_RES],
    pub offset: [u64; NB_RES],
    pub is_valid: u16,
}

impl Slot {
    pub fn empty() -> Self {
        Self {
            img_id: [0u8; IMG_ID_SIZE],
            sha: [0u8; 32],
            orig_res: [0; 2],
            size: [0; NB_RES],
            offset: [0; NB_RES],
            is_valid: EMPTY,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid == NON_EMPTY
    }

    pub fn img_id_str(&self) -> String {
        let end = self
            .img_id
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.img_id.len());
        String::from_utf8_lossy(&self.img_id[..end]).into_owned()
    }

    /// Copies `id`, truncated to `MAX_IMG_ID` bytes, into the fixed buffer
    /// and NUL-terminates it.
    pub fn set_img_id(&mut self, id: &str) {
        self.img_id = [0u8; IMG_ID_SIZE];
        let bytes = id.as_bytes();
        let n = bytes.len().min(MAX_IMG_ID);
        self.img_id[..n].copy_from_slice(&bytes[..n]);
    }

    pub fn sha_hex(&self) -> String {
        hex::encode(self.sha)
    }

    pub fn to_bytes(&self) -> [u8; SLOT_SIZE] {
        let mut buf = [0u8; SLOT_SIZE];
        buf[0..IMG_ID_SIZE].copy_from_slice(&self.img_id);
        let mut off = IMG_ID_SIZE;
        buf[off..off + 32].copy_from_slice(&self.sha);
        off += 32;
        for v in self.orig_res {
            buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
            off += 4;
        }
        for v in self.size {
            buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
            off += 4;
        }
        for v in self.offset {
            buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
            off += 8;
        }
        buf[off..off + 2].copy_from_slice(&self.is_valid.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < SLOT_SIZE {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short slot read",
            )));
        }
        let mut img_id = [0u8; IMG_ID_SIZE];
        img_id.copy_from_slice(&buf[0..IMG_ID_SIZE]);
        let mut off = IMG_ID_SIZE;
        let mut sha = [0u8; 32];
        sha.copy_from_slice(&buf[off..off + 32]);
        off += 32;
        let mut orig_res = [0u32; 2];
        for v in orig_res.iter_mut() {
            *v = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
            off += 4;
        }
        let mut size = [0u32; NB_RES];
        for v in size.iter_mut() {
            *v = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
            off += 4;
        }
        let mut offset = [0u64; NB_RES];
        for v in offset.iter_mut() {
            *v = u64::from_le_bytes(buf[off..off + 8].try_into().unwrap());
            off += 8;
        }
        let is_valid = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        Ok(Self {
            img_id,
            sha,
            orig_res,
            size,
            offset,
            is_valid,
        })
    }
}
