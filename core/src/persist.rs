use crate::annotator::Annotator;
use crate::config::EngineConfig;
use crate::engine::{Engine, EngineState};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u64,
    pub created_at: String,
    pub version: u32,
}

pub struct SnapshotPaths {
    pub root: PathBuf,
}

impl SnapshotPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn state(&self) -> PathBuf { self.root.join("engine.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// A snapshot exists once its meta file has been written.
    pub fn exists(&self) -> bool { self.meta().is_file() }
}

pub fn save_state(paths: &SnapshotPaths, state: &EngineState) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.state())?;
    let bytes = bincode::serialize(state)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_state(paths: &SnapshotPaths) -> Result<EngineState> {
    let mut f = File::open(paths.state()).with_context(|| format!("opening {}", paths.state().display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let state = bincode::deserialize(&buf).context("decoding engine state")?;
    Ok(state)
}

pub fn save_meta(paths: &SnapshotPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &SnapshotPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Write the full engine state followed by its meta file.
pub fn save_snapshot<A: Annotator>(paths: &SnapshotPaths, engine: &Engine<A>) -> Result<MetaFile> {
    save_state(paths, engine.state())?;
    let meta = MetaFile {
        num_docs: engine.document_count() as u64,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: SNAPSHOT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "snapshot saved");
    Ok(meta)
}

/// Rebuild an engine from a snapshot directory.
pub fn load_snapshot<A: Annotator>(paths: &SnapshotPaths, annotator: A, config: EngineConfig) -> Result<Engine<A>> {
    let meta = load_meta(paths)?;
    if meta.version != SNAPSHOT_VERSION {
        bail!("unsupported snapshot version {} (expected {})", meta.version, SNAPSHOT_VERSION);
    }
    let state = load_state(paths)?;
    if state.store.size() as u64 != meta.num_docs {
        bail!("snapshot meta lists {} documents but state holds {}", meta.num_docs, state.store.size());
    }
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "snapshot loaded");
    Ok(Engine::from_state(state, annotator, config))
}
