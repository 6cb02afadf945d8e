// SPDX-License-Identifier: MIT OR Apache-2.0

use image::{ImageBuffer, Rgb};
use imgfs_db::{Engine, Error, ImgFsConfig, ListMode, ORIG_RES};
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

#[test]
fn create_produces_expected_file_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.imgfs");
    let config = ImgFsConfig {
        max_files: 10,
        ..Default::default()
    };
    let engine = Engine::create(&path, &config).unwrap();
    let header = engine.header();
    assert_eq!(header.version, 0);
    assert_eq!(header.nb_files, 0);

    let expected = imgfs_db::HEADER_SIZE as u64 + 10 * imgfs_db::SLOT_SIZE as u64;
    assert_eq!(path.metadata().unwrap().len(), expected);
}

#[test]
fn insert_round_trip_through_orig_res() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImgFsConfig::default();
    let engine = Engine::create(dir.path().join("t.imgfs"), &config).unwrap();
    let jpeg = sample_jpeg(50, 40, 3);
    engine.insert(&jpeg, "roundtrip").unwrap();
    let back = engine.read("roundtrip", ORIG_RES).unwrap();
    assert_eq!(back, jpeg);
}

#[test]
fn delete_then_list_json_omits_id() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImgFsConfig::default();
    let engine = Engine::create(dir.path().join("t.imgfs"), &config).unwrap();
    engine.insert(&sample_jpeg(10, 10, 1), "a").unwrap();
    engine.insert(&sample_jpeg(10, 10, 2), "b").unwrap();
    engine.delete("a").unwrap();
    let json = engine.list(ListMode::Json).unwrap();
    assert_eq!(json, r#"{"Images":["b"]}"#);
}

#[test]
fn dedup_keeps_file_length_unchanged_on_matching_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.imgfs");
    let config = ImgFsConfig {
        max_files: 10,
        ..Default::default()
    };
    let engine = Engine::create(&path, &config).unwrap();
    let jpeg = sample_jpeg(20, 20, 9);

    engine.insert(&jpeg, "cat1").unwrap();
    let len_after_first = path.metadata().unwrap().len();

    engine.insert(&jpeg, "cat2").unwrap();
    let len_after_second = path.metadata().unwrap().len();
    assert_eq!(len_after_first, len_after_second);
}

#[test]
fn duplicate_id_rollback_leaves_counts_and_disk_slot_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImgFsConfig {
        max_files: 10,
        ..Default::default()
    };
    let engine = Engine::create(dir.path().join("t.imgfs"), &config).unwrap();
    engine.insert(&sample_jpeg(5, 5, 1), "cat1").unwrap();
    let version_before = engine.header().version;

    let err = engine.insert(&sample_jpeg(5, 5, 2), "cat1").unwrap_err();
    assert!(matches!(err, Error::DuplicateId));
    assert_eq!(engine.header().nb_files, 1);
    assert_eq!(engine.header().version, version_before);
}

#[test]
fn imgfs_full_rejects_without_mutating_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImgFsConfig {
        max_files: 1,
        ..Default::default()
    };
    let engine = Engine::create(dir.path().join("t.imgfs"), &config).unwrap();
    engine.insert(&sample_jpeg(5, 5, 1), "only").unwrap();
    let err = engine.insert(&sample_jpeg(5, 5, 2), "second").unwrap_err();
    assert!(matches!(err, Error::ImgfsFull));
    assert_eq!(engine.header().nb_files, 1);
}

#[test]
fn reopen_after_insert_preserves_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.imgfs");
    let jpeg = sample_jpeg(30, 30, 4);
    {
        let engine = Engine::create(&path, &ImgFsConfig::default()).unwrap();
        engine.insert(&jpeg, "persisted").unwrap();
    }
    let engine = Engine::open(&path).unwrap();
    assert_eq!(engine.header().nb_files, 1);
    let json = engine.list(ListMode::Json).unwrap();
    assert_eq!(json, r#"{"Images":["persisted"]}"#);
}
