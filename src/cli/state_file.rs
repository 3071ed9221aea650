use anyhow::{Context, Result};
use gadgetledger::{InMemoryStore, StoreSnapshot};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Loads the store from a JSON snapshot. A missing file is an empty ledger.
pub async fn load_store(path: &Path) -> Result<InMemoryStore> {
    if !tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to probe state file '{}'", path.display()))?
    {
        return Ok(InMemoryStore::new());
    }

    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read state file '{}'", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_slice(&raw)
        .with_context(|| format!("Failed to parse state file '{}'", path.display()))?;
    Ok(InMemoryStore::from_snapshot(snapshot)?)
}

/// Writes the store snapshot next to `path` and renames it into place.
pub async fn save_store(store: &InMemoryStore, path: &Path) -> Result<()> {
    let snapshot = store.snapshot().await;
    let bytes = serde_json::to_vec_pretty(&snapshot).context("Failed to encode state snapshot")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("resolve current directory for state file")?,
    };
    let target = path.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in '{}'", dir.display()))?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target)
            .with_context(|| format!("Failed to replace state file '{}'", target.display()))?;
        Ok(())
    })
    .await
    .context("state writer task panicked")?
}
