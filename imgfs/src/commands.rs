// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use imgfs_db::{resolution_from_str, Engine, ImgFsConfig, ListMode};

use crate::cli::Command;

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Create {
            file,
            max_files,
            thumb_w,
            thumb_h,
            small_w,
            small_h,
        } => create(&file, max_files, (thumb_w, thumb_h), (small_w, small_h)),
        Command::List { file } => list(&file),
        Command::Read {
            file,
            img_id,
            resolution,
        } => read(&file, &img_id, &resolution),
        Command::Insert { file, img_id, path } => insert(&file, &img_id, &path),
        Command::Delete { file, img_id } => delete(&file, &img_id),
        Command::Serve { file, addr } => serve(&file, addr),
    }
}

fn create(file: &Path, max_files: u32, thumb_res: (u16, u16), small_res: (u16, u16)) -> anyhow::Result<()> {
    let config = ImgFsConfig {
        max_files,
        thumb_res,
        small_res,
    };
    let engine = Engine::create(file, &config).context("creating container")?;
    let header = engine.header();
    println!("1 + {} item(s) written", header.max_files);
    Ok(())
}

fn list(file: &Path) -> anyhow::Result<()> {
    let engine = Engine::open(file).context("opening container")?;
    print!("{}", engine.list(ListMode::Stdout)?);
    Ok(())
}

fn read(file: &Path, img_id: &str, resolution: &str) -> anyhow::Result<()> {
    use std::io::Write;
    let engine = Engine::open(file).context("opening container")?;
    let r = resolution_from_str(resolution)?;
    let bytes = engine.read(img_id, r)?;
    std::io::stdout().write_all(&bytes)?;
    Ok(())
}

fn insert(file: &Path, img_id: &str, path: &Path) -> anyhow::Result<()> {
    let engine = Engine::open(file).context("opening container")?;
    let buf = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    engine.insert(&buf, img_id)?;
    Ok(())
}

fn delete(file: &Path, img_id: &str) -> anyhow::Result<()> {
    let engine = Engine::open(file).context("opening container")?;
    engine.delete(img_id)?;
    Ok(())
}

fn serve(file: &Path, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let engine = Arc::new(Engine::open(file).context("opening container")?);
    let index_html = include_str!("../../static/index.html").to_string();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(imgfs_http::serve(engine, addr, index_html))
}
