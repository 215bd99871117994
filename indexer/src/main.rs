use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use newsdex_core::persist::{load_snapshot, save_snapshot, SnapshotPaths};
use newsdex_core::{Engine, EngineConfig, EntityRetention, RegexAnnotator, DEFAULT_TRIGGER};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    #[serde(default)]
    title: Option<String>,
    body: String,
}

impl InputDoc {
    fn into_pair(self) -> (String, String) {
        match self.title {
            Some(title) if !title.trim().is_empty() => (self.id, format!("{title}.\n\n{}", self.body)),
            _ => (self.id, self.body),
        }
    }
}

#[derive(Parser)]
#[command(name = "newsdex")]
#[command(about = "Maintain and query a TF-IDF and entity co-occurrence snapshot", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: Common,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Snapshot directory (falls back to $NEWSDEX_SNAPSHOT, then ./snapshot)
    #[arg(long, global = true)]
    snapshot: Option<String>,
    /// JSON engine config file
    #[arg(long, global = true)]
    config: Option<String>,
    /// Retract entity data when documents are removed
    #[arg(long, global = true, default_value_t = false)]
    retract_entities: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add documents from JSON/JSONL feed files or a directory of them
    Ingest {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Start from an empty engine instead of the existing snapshot
        #[arg(long, default_value_t = false)]
        fresh: bool,
        /// Treat duplicate ids as failures
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Remove documents by id
    Remove {
        ids: Vec<String>,
    },
    /// Ranked TF-IDF query
    Query {
        q: String,
        #[arg(long)]
        k: Option<usize>,
        /// "or" or "and"
        #[arg(long, default_value = "or")]
        mode: String,
    },
    /// Ids of documents containing none of the terms
    Not {
        terms: Vec<String>,
    },
    /// Entities co-occurring with an entity
    Assoc {
        entity: String,
        #[arg(long, default_value_t = 10)]
        n: usize,
    },
    /// Entities most mentioned by documents matching every query term
    Related {
        q: String,
        #[arg(long, default_value_t = 10)]
        docs: usize,
        #[arg(long, default_value_t = 10)]
        n: usize,
    },
    /// First sentence of the best document matching every query term
    Headline {
        q: String,
        /// Word where the article body starts
        #[arg(long, default_value = DEFAULT_TRIGGER)]
        trigger: String,
    },
}

#[derive(Serialize)]
struct Hit {
    id: String,
    score: f64,
}

#[derive(Serialize)]
struct Ranked {
    entity: String,
    weight: u32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = engine_config(&cli.common)?;
    let paths = SnapshotPaths::new(snapshot_dir(cli.common.snapshot.clone()));

    match cli.command {
        Commands::Ingest { input, fresh, strict } => ingest(&paths, config, &input, fresh, strict),
        Commands::Remove { ids } => {
            let mut engine = open(&paths, config)?;
            for id in &ids {
                engine.remove(id)?;
            }
            save_snapshot(&paths, &engine)?;
            Ok(())
        }
        Commands::Query { q, k, mode } => {
            let engine = open(&paths, config)?;
            let k = k.unwrap_or(engine.config().default_k);
            let hits: Vec<Hit> = engine.query(&q, k, &mode)?.into_iter().map(|(id, score)| Hit { id, score }).collect();
            print_json(&hits)
        }
        Commands::Not { terms } => {
            let engine = open(&paths, config)?;
            print_json(&engine.match_not(terms.as_slice()))
        }
        Commands::Assoc { entity, n } => {
            let engine = open(&paths, config)?;
            print_json(&ranked(engine.top_associations(&entity, n)?))
        }
        Commands::Related { q, docs, n } => {
            let engine = open(&paths, config)?;
            print_json(&ranked(engine.entities_for_query(&q, docs, n)?))
        }
        Commands::Headline { q, trigger } => {
            let engine = open(&paths, config)?;
            match engine.headline(&q, &trigger)? {
                Some(sentence) => println!("{sentence}"),
                None => bail!("no document contains every term of {q:?}"),
            }
            Ok(())
        }
    }
}

fn snapshot_dir(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var("NEWSDEX_SNAPSHOT").ok())
        .unwrap_or_else(|| "./snapshot".into())
}

fn engine_config(common: &Common) -> Result<EngineConfig> {
    let mut config = match &common.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::default(),
    };
    if common.retract_entities {
        config.entity_retention = EntityRetention::Retract;
    }
    Ok(config)
}

fn open(paths: &SnapshotPaths, config: EngineConfig) -> Result<Engine> {
    if paths.exists() {
        load_snapshot(paths, RegexAnnotator, config)
    } else {
        tracing::warn!(root = %paths.root.display(), "no snapshot found, starting empty");
        Ok(Engine::new(RegexAnnotator, config))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ranked(pairs: Vec<(String, u32)>) -> Vec<Ranked> {
    pairs.into_iter().map(|(entity, weight)| Ranked { entity, weight }).collect()
}

fn ingest(paths: &SnapshotPaths, config: EngineConfig, input: &str, fresh: bool, strict: bool) -> Result<()> {
    let mut engine = if fresh { Engine::new(RegexAnnotator, config) } else { open(paths, config)? };

    let mut total_added = 0;
    let mut total_duplicates = 0;
    let mut faults = Vec::new();
    for file in feed_files(Path::new(input)) {
        let docs = read_feed(&file)?;
        let report = engine.add_batch(docs);
        total_added += report.added.len();
        total_duplicates += report.duplicates().count();
        tracing::info!(file = %file.display(), added = report.added.len(), failed = report.failures.len(), "feed ingested");
        faults.extend(report.failures.into_iter().filter(|(_, e)| strict || !e.is_duplicate()));
    }

    // partial progress is kept even when some items failed
    save_snapshot(paths, &engine)?;
    tracing::info!(added = total_added, duplicates = total_duplicates, num_docs = engine.document_count(), "ingest complete");

    if !faults.is_empty() {
        for (id, err) in &faults {
            tracing::error!(id = %id, error = %err, "document rejected");
        }
        bail!("{} document(s) rejected", faults.len());
    }
    Ok(())
}

fn feed_files(input_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

/// Read a feed file into (id, text) pairs. JSONL holds one document per line;
/// JSON holds a document, an array of documents, or an object mapping id to text.
fn read_feed(file: &Path) -> Result<Vec<(String, String)>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();

    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let doc: InputDoc = serde_json::from_str(&line)?;
            docs.push(doc.into_pair());
        }
        return Ok(docs);
    }

    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                docs.push(doc.into_pair());
            }
        }
        serde_json::Value::Object(ref obj) if obj.contains_key("id") => {
            let doc: InputDoc = serde_json::from_value(json)?;
            docs.push(doc.into_pair());
        }
        serde_json::Value::Object(_) => {
            let map: BTreeMap<String, String> = serde_json::from_value(json)?;
            docs.extend(map);
        }
        _ => {}
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_every_feed_shape() {
        let dir = tempdir().unwrap();
        let jsonl = dir.path().join("a.jsonl");
        fs::write(&jsonl, "{\"id\":\"1\",\"body\":\"one\"}\n\n{\"id\":\"2\",\"title\":\"Two\",\"body\":\"two\"}\n").unwrap();
        let docs = read_feed(&jsonl).unwrap();
        assert_eq!(docs, vec![("1".to_string(), "one".to_string()), ("2".to_string(), "Two.\n\ntwo".to_string())]);

        let map = dir.path().join("b.json");
        fs::write(&map, r#"{"u1": "first", "u2": "second"}"#).unwrap();
        assert_eq!(read_feed(&map).unwrap().len(), 2);

        let single = dir.path().join("c.json");
        fs::write(&single, r#"{"id": "x", "body": "solo"}"#).unwrap();
        assert_eq!(read_feed(&single).unwrap(), vec![("x".to_string(), "solo".to_string())]);

        assert_eq!(feed_files(dir.path()).len(), 3);
    }

    #[test]
    fn ingest_tolerates_duplicates_unless_strict() {
        let dir = tempdir().unwrap();
        let feed = dir.path().join("feed.json");
        fs::write(&feed, r#"[{"id":"a","body":"Seoul rain."},{"id":"a","body":"again"},{"id":"b","body":"Tokyo sun."}]"#).unwrap();
        let paths = SnapshotPaths::new(dir.path().join("snap"));
        ingest(&paths, EngineConfig::default(), feed.to_str().unwrap(), true, false).unwrap();
        let engine = open(&paths, EngineConfig::default()).unwrap();
        assert_eq!(engine.document_count(), 2);

        assert!(ingest(&paths, EngineConfig::default(), feed.to_str().unwrap(), true, true).is_err());
        // the non-duplicate items still landed in the snapshot
        assert_eq!(open(&paths, EngineConfig::default()).unwrap().document_count(), 2);
    }
}
