use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codec::CodecSet;

const ARTIFACT_VERSION: u32 = 1;

/// Persisted fitted codecs plus the cutoff they were fitted alongside. The
/// forest itself is not serialized: it is seeded and refit deterministically
/// at startup, so loading the codecs is enough to reproduce the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactFile {
    version: u32,
    cutoff: String,
    codecs: CodecSet,
}

pub fn save_codecs(path: &Path, codecs: &CodecSet, cutoff: NaiveDate) -> Result<()> {
    let file = ArtifactFile {
        version: ARTIFACT_VERSION,
        cutoff: cutoff.format("%Y-%m-%d").to_string(),
        codecs: codecs.clone(),
    };
    let json = serde_json::to_string_pretty(&file).context("serialize codec artifacts")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .with_context(|| format!("write codec artifacts {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("swap codec artifacts into {}", path.display()))?;
    Ok(())
}

pub fn load_codecs(path: &Path) -> Result<CodecSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read codec artifacts {}", path.display()))?;
    let file: ArtifactFile =
        serde_json::from_str(&raw).context("decode codec artifacts json")?;
    if file.version != ARTIFACT_VERSION {
        return Err(anyhow!(
            "codec artifacts version {} does not match expected {}",
            file.version,
            ARTIFACT_VERSION
        ));
    }
    let mut codecs = file.codecs;
    codecs.rebuild_indexes();
    if codecs.venue.is_empty() || codecs.opponent.is_empty() {
        return Err(anyhow!("codec artifacts contain an empty codec"));
    }
    Ok(codecs)
}
