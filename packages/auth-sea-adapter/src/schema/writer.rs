use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{generate, AuthSchema};
use crate::errors::{AdapterError, AdapterResult};

pub const DEFAULT_OUTPUT_DIR: &str = "./src/entities";

/// Write one entity module per table plus `mod.rs` into `dir`, creating it if
/// needed. Progress lines go to `progress`; returns the written paths.
pub async fn write_entities(
    dir: &Path,
    schema: &AuthSchema,
    progress: &mut (dyn Write + Send),
) -> AdapterResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AdapterError::io(dir, e))?;

    let mut written = Vec::new();
    for file in generate(schema) {
        let path = dir.join(&file.name);
        tokio::fs::write(&path, file.contents.as_bytes())
            .await
            .map_err(|e| AdapterError::io(&path, e))?;
        writeln!(progress, "✓ Generated {}", file.name).map_err(|e| AdapterError::io(&path, e))?;
        written.push(path);
    }

    writeln!(progress, "\nEntities created successfully in {}", dir.display())
        .map_err(|e| AdapterError::io(dir, e))?;
    info!(dir = %dir.display(), files = written.len(), "entities generated");
    Ok(written)
}
