// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::Error;
use crate::header::{Header, HEADER_SIZE};
use crate::metadata::{Slot, SLOT_SIZE};

/// Positioned access to the backing file of one container.
///
/// `Container` owns the single `File` handle shared by every engine
/// operation; it has no notion of the in-memory metadata table — that lives
/// one layer up, in [`crate::engine::Engine`], which is the only component
/// allowed to hold a `Container`.
#[derive(Debug)]
pub struct Container {
    file: File,
    path: PathBuf,
}

fn slot_offset(index: u32) -> u64 {
    HEADER_SIZE as u64 + index as u64 * SLOT_SIZE as u64
}

impl Container {
    /// Creates a brand new container file, truncating any existing file at
    /// `path`. Writes `header` and `max_files` zeroed slots.
    pub fn create<P: AsRef<Path>>(path: P, header: &Header) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;
        let mut container = Self {
            file,
            path: path.as_ref().to_path_buf(),
        };
        container.write_header(header)?;
        let empty = Slot::empty();
        for i in 0..header.max_files {
            container.write_slot(i, &empty)?;
        }
        tracing::info!(
            path = %container.path.display(),
            max_files = header.max_files,
            "1 + {} item(s) written",
            header.max_files
        );
        Ok(container)
    }

    /// Opens an existing container in read-write mode.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_ref())?;
        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_header(&mut self) -> Result<Header, Error> {
        let mut buf = [0u8; HEADER_SIZE];
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_exact(&mut buf)?;
        Header::from_bytes(&buf)
    }

    pub fn write_header(&mut self, header: &Header) -> Result<(), Error> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header.to_bytes())?;
        Ok(())
    }

    pub fn read_slot(&mut self, index: u32) -> Result<Slot, Error> {
        let mut buf = [0u8; SLOT_SIZE];
        self.file.seek(SeekFrom::Start(slot_offset(index)))?;
        self.file.read_exact(&mut buf)?;
        Slot::from_bytes(&buf)
    }

    pub fn write_slot(&mut self, index: u32, slot: &Slot) -> Result<(), Error> {
        self.file.seek(SeekFrom::Start(slot_offset(index)))?;
        self.file.write_all(&slot.to_bytes())?;
        Ok(())
    }

    pub fn read_payload(&mut self, offset: u64, len: u32) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; len as usize];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Appends `data` at the end of the file and returns the offset it was
    /// written at.
    pub fn append_payload(&mut self, data: &[u8]) -> Result<u64, Error> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(data)?;
        Ok(offset)
    }
}
