// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::ImgFsConfig;
use crate::container::Container;
use crate::dedup::dedup;
use crate::errors::Error;
use crate::header::Header;
use crate::metadata::{Slot, NON_EMPTY, ORIG_RES};
use crate::resize::{decode_dimensions, lazily_resize};

/// Output mode for [`Engine::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Stdout,
    Json,
}

#[derive(Serialize)]
struct ImagesJson {
    #[serde(rename = "Images")]
    images: Vec<String>,
}

struct State {
    container: Container,
    header: Header,
    table: Vec<Slot>,
}

/// An open container and its in-memory mirror, with the single
/// process-wide exclusion gate guarding every operation.
///
/// The gate and the open container are fields of one explicit handle
/// instead of global mutable state, so shutdown is simply dropping the
/// `Engine`.
pub struct Engine {
    state: Mutex<State>,
}

fn load_table(container: &mut Container, header: &Header) -> Result<Vec<Slot>, Error> {
    (0..header.max_files)
        .map(|i| container.read_slot(i))
        .collect()
}

impl Engine {
    /// Creates a brand new container on disk and returns an engine bound to
    /// it.
    pub fn create<P: AsRef<Path>>(path: P, config: &ImgFsConfig) -> Result<Self, Error> {
        config.validate()?;
        let header = Header::new(config.max_files, config.resized_res());
        let mut container = Container::create(path, &header)?;
        let table = load_table(&mut container, &header)?;
        Ok(Self {
            state: Mutex::new(State {
                container,
                header,
                table,
            }),
        })
    }

    /// Opens an existing container, reading its header and full metadata
    /// table into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut container = Container::open(path)?;
        let header = container.read_header()?;
        let table = load_table(&mut container, &header)?;
        Ok(Self {
            state: Mutex::new(State {
                container,
                header,
                table,
            }),
        })
    }

    /// Lists every valid image id, as a printable report or as JSON.
    pub fn list(&self, mode: ListMode) -> Result<String, Error> {
        let state = self.state.lock();
        let ids: Vec<String> = state
            .table
            .iter()
            .filter(|s| s.is_valid())
            .map(|s| s.img_id_str())
            .collect();

        match mode {
            ListMode::Json => {
                let json = ImagesJson { images: ids };
                serde_json::to_string(&json).map_err(|e| Error::Runtime(e.to_string()))
            }
            ListMode::Stdout => {
                let mut out = String::new();
                out.push_str(&format!(
                    "*** IMGFS FILE HEADER ***\nname: {}, version: {}, nb_files: {}/{}\n",
                    state.header.name_str(),
                    state.header.version,
                    state.header.nb_files,
                    state.header.max_files
                ));
                if ids.is_empty() {
                    out.push_str("<< empty imgFS >>\n");
                } else {
                    for s in state.table.iter().filter(|s| s.is_valid()) {
                        out.push_str(&format!(
                            "img_id: {}  SHA256: {}  orig: {}x{}\n",
                            s.img_id_str(),
                            s.sha_hex(),
                            s.orig_res[0],
                            s.orig_res[1]
                        ));
                    }
                }
                Ok(out)
            }
        }
    }

    /// Inserts a new image under `img_id`, deduplicating identical content
    /// against existing slots. Disk writes happen in the crash-safer order:
    /// zero slot on disk, write payload, write slot (now valid), write
    /// header last — so a crash mid-insert never leaves a slot marked
    /// valid with a half-written payload.
    pub fn insert(&self, buf: &[u8], img_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock();
        if state.header.nb_files == state.header.max_files {
            return Err(Error::ImgfsFull);
        }

        let index = state
            .table
            .iter()
            .position(|s| !s.is_valid())
            .ok_or(Error::ImgfsFull)? as u32;

        state.container.write_slot(index, &Slot::empty())?;

        let (width, height) = decode_dimensions(buf)?;

        let mut new_slot = Slot::empty();
        new_slot.set_img_id(img_id);
        new_slot.sha = Sha256::digest(buf).into();
        new_slot.orig_res = [width, height];
        new_slot.is_valid = NON_EMPTY;

        let idx = index as usize;
        state.table[idx] = new_slot;
        state.header.nb_files += 1;

        if let Err(e) = dedup(&mut state.table, idx) {
            state.table[idx] = Slot::empty();
            state.header.nb_files -= 1;
            return Err(e);
        }

        if state.table[idx].offset[ORIG_RES] == 0 {
            let offset = state.container.append_payload(buf)?;
            state.table[idx].offset[ORIG_RES] = offset;
            state.table[idx].size[ORIG_RES] = buf.len() as u32;
        }

        let slot_bytes = state.table[idx].clone();
        state.container.write_slot(index, &slot_bytes)?;

        state.header.version += 1;
        state.container.write_header(&state.header)?;

        tracing::info!(img_id, index, "inserted image");
        Ok(())
    }

    /// Reads one image at the requested resolution, deriving and caching it
    /// first if it hasn't been produced yet.
    pub fn read(&self, img_id: &str, r: usize) -> Result<Vec<u8>, Error> {
        let mut state = self.state.lock();
        let idx = state
            .table
            .iter()
            .position(|s| s.is_valid() && s.img_id_str() == img_id)
            .ok_or(Error::ImageNotFound)?;

        let header = state.header.clone();
        {
            let State { container, table, .. } = &mut *state;
            lazily_resize(container, table, idx, r, &header)?;
        }

        let slot = &state.table[idx];
        let (offset, len) = (slot.offset[r], slot.size[r]);
        state.container.read_payload(offset, len)
    }

    /// Tombstones the slot for `img_id`. Payload bytes are retained: other
    /// slots may still reference them through dedup.
    pub fn delete(&self, img_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock();
        let idx = state
            .table
            .iter()
            .position(|s| s.is_valid() && s.img_id_str() == img_id)
            .ok_or(Error::ImageNotFound)?;

        state.table[idx].is_valid = crate::metadata::EMPTY;
        let slot = state.table[idx].clone();
        state.container.write_slot(idx as u32, &slot)?;

        state.header.nb_files -= 1;
        state.header.version += 1;
        state.container.write_header(&state.header)?;

        tracing::info!(img_id, "deleted image");
        Ok(())
    }

    /// Current header values, mostly useful for tests and the CLI's
    /// `list`/`create` reporting.
    pub fn header(&self) -> Header {
        self.state.lock().header.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn sample_jpeg(w: u32, h: u32, seed: u8) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(w, h, |x, y| Rgb([(x as u8).wrapping_add(seed), y as u8, seed]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    fn engine(dir: &std::path::Path, max_files: u32) -> Engine {
        let cfg = ImgFsConfig {
            max_files,
            ..Default::default()
        };
        Engine::create(dir.join("t.imgfs"), &cfg).unwrap()
    }

    #[test]
    fn end_to_end_scenario_from_spec() {
        let dir = tempfile::tempdir().unwrap();
        let e = engine(dir.path(), 10);
        assert_eq!(e.header().nb_files, 0);
        assert_eq!(e.header().version, 0);

        let jpeg_a = sample_jpeg(64, 48, 1);
        e.insert(&jpeg_a, "cat1").unwrap();
        let json = e.list(ListMode::Json).unwrap();
        assert_eq!(json, r#"{"Images":["cat1"]}"#);
        assert_eq!(e.header().nb_files, 1);
        assert_eq!(e.header().version, 1);

        e.insert(&jpeg_a, "cat2").unwrap();
        assert_eq!(e.header().nb_files, 2);
        let len_after_second_insert = dir.path().join("t.imgfs").metadata().unwrap().len();

        let err = e.insert(&jpeg_a, "cat1").unwrap_err();
        assert!(matches!(err, Error::DuplicateId));
        assert_eq!(e.header().nb_files, 2);

        let thumb1 = e.read("cat2", crate::metadata::THUMB_RES).unwrap();
        let thumb2 = e.read("cat2", crate::metadata::THUMB_RES).unwrap();
        assert_eq!(thumb1, thumb2);
        let len_after_first_read = dir.path().join("t.imgfs").metadata().unwrap().len();
        assert!(len_after_first_read > len_after_second_insert);
        let thumb3 = e.read("cat2", crate::metadata::THUMB_RES).unwrap();
        let len_after_second_read = dir.path().join("t.imgfs").metadata().unwrap().len();
        assert_eq!(len_after_first_read, len_after_second_read);
        assert_eq!(thumb2, thumb3);

        e.delete("cat1").unwrap();
        assert_eq!(e.header().nb_files, 1);
        assert_eq!(e.header().version, 3);
        let orig = e.read("cat2", crate::metadata::ORIG_RES).unwrap();
        assert_eq!(orig, jpeg_a);
    }

    #[test]
    fn insert_when_full_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let e = engine(dir.path(), 1);
        e.insert(&sample_jpeg(16, 16, 1), "only").unwrap();
        let err = e.insert(&sample_jpeg(16, 16, 2), "second").unwrap_err();
        assert!(matches!(err, Error::ImgfsFull));
        assert_eq!(e.header().nb_files, 1);
    }

    #[test]
    fn delete_missing_id_is_noop_error() {
        let dir = tempfile::tempdir().unwrap();
        let e = engine(dir.path(), 4);
        let version_before = e.header().version;
        let err = e.delete("nope").unwrap_err();
        assert!(matches!(err, Error::ImageNotFound));
        assert_eq!(e.header().version, version_before);
    }

    #[test]
    fn durability_across_close_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.imgfs");
        let jpeg = sample_jpeg(32, 32, 5);
        {
            let cfg = ImgFsConfig::default();
            let e = Engine::create(&path, &cfg).unwrap();
            e.insert(&jpeg, "durable").unwrap();
        }
        let e = Engine::open(&path).unwrap();
        let back = e.read("durable", crate::metadata::ORIG_RES).unwrap();
        assert_eq!(back, jpeg);
    }
}
