use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::redact::RedactionMap;

/// Print `path` with every placeholder swapped back for its original.
pub fn run(path: &Path, map_path: &Path) -> Result<()> {
    let map = RedactionMap::load(map_path)?;
    let text = std::fs::read_to_string(path)?;
    let restored = map.restore(&text)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(restored.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
