// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::Cursor;

use crate::container::Container;
use crate::errors::Error;
use crate::header::Header;
use crate::metadata::{Slot, NB_RES, ORIG_RES};

/// Derives resolution `r` for slot `i` on first demand and persists it in
/// the container.
///
/// A no-op for `ORIG_RES` (always present) and for any resolution already
/// populated (`size[r] != 0`) — a second call after a first success leaves
/// the file length unchanged. `header.version` is intentionally not
/// touched: version tracks logical mutation, not cache population.
pub fn lazily_resize(
    container: &mut Container,
    table: &mut [Slot],
    i: usize,
    r: usize,
    header: &Header,
) -> Result<(), Error> {
    if r >= NB_RES {
        return Err(Error::Resolutions);
    }
    let slot = table.get(i).ok_or(Error::InvalidImgId)?;
    if !slot.is_valid() {
        return Err(Error::InvalidImgId);
    }
    if r == ORIG_RES || slot.size[r] != 0 {
        return Ok(());
    }

    let orig_offset = slot.offset[ORIG_RES];
    let orig_len = slot.size[ORIG_RES];
    let orig_bytes = container.read_payload(orig_offset, orig_len)?;

    let decoded =
        image::load_from_memory(&orig_bytes).map_err(|e| Error::ImgLib(e.to_string()))?;

    let target_w = header.resized_res[2 * r] as u32;
    let target_h = header.resized_res[2 * r + 1] as u32;
    let resized = decoded.resize(target_w, target_h, image::imageops::FilterType::Triangle);

    let mut encoded = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Jpeg)
        .map_err(|e| Error::ImgLib(e.to_string()))?;

    let new_offset = container.append_payload(&encoded)?;
    let slot = &mut table[i];
    slot.offset[r] = new_offset;
    slot.size[r] = encoded.len() as u32;
    container.write_slot(i as u32, slot)?;

    tracing::debug!(index = i, resolution = r, bytes = encoded.len(), "derived resolution");
    Ok(())
}

/// Decodes `buf` just far enough to learn the original image's dimensions.
pub fn decode_dimensions(buf: &[u8]) -> Result<(u32, u32), Error> {
    let decoded = image::load_from_memory(buf).map_err(|e| Error::ImgLib(e.to_string()))?;
    Ok((decoded.width(), decoded.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{NON_EMPTY, SMALL_RES, THUMB_RES};
    use image::{ImageBuffer, Rgb};

    fn sample_jpeg(w: u32, h: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(w, h, |x, y| {
            Rgb([(x % 255) as u8, (y % 255) as u8, 128])
        });
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[test]
    fn out_of_range_resolution_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut container = Container::create(dir.path().join("t.imgfs"), &Header::new(2, [64, 64, 256, 256])).unwrap();
        let mut table = vec![Slot::empty()];
        let header = Header::new(2, [64, 64, 256, 256]);
        let err = lazily_resize(&mut container, &mut table, 0, 9, &header).unwrap_err();
        assert!(matches!(err, Error::Resolutions));
    }

    #[test]
    fn invalid_slot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut container = Container::create(dir.path().join("t.imgfs"), &Header::new(2, [64, 64, 256, 256])).unwrap();
        let mut table = vec![Slot::empty()];
        let header = Header::new(2, [64, 64, 256, 256]);
        let err = lazily_resize(&mut container, &mut table, 0, THUMB_RES, &header).unwrap_err();
        assert!(matches!(err, Error::InvalidImgId));
    }

    #[test]
    fn derives_and_caches_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let header = Header::new(2, [64, 64, 256, 256]);
        let mut container = Container::create(dir.path().join("t.imgfs"), &header).unwrap();
        let payload = sample_jpeg(300, 200);
        let offset = container.append_payload(&payload).unwrap();

        let mut slot = Slot::empty();
        slot.set_img_id("cat1");
        slot.is_valid = NON_EMPTY;
        slot.orig_res = [300, 200];
        slot.offset[ORIG_RES] = offset;
        slot.size[ORIG_RES] = payload.len() as u32;
        container.write_slot(0, &slot).unwrap();
        let mut table = vec![slot];

        lazily_resize(&mut container, &mut table, 0, THUMB_RES, &header).unwrap();
        assert!(table[0].size[THUMB_RES] > 0);
        let len_after_first = container.path().metadata().unwrap().len();

        lazily_resize(&mut container, &mut table, 0, THUMB_RES, &header).unwrap();
        let len_after_second = container.path().metadata().unwrap().len();
        assert_eq!(len_after_first, len_after_second);

        let err = lazily_resize(&mut container, &mut table, 0, SMALL_RES, &header);
        assert!(err.is_ok());
        assert!(table[0].size[SMALL_RES] > 0);
    }
}
