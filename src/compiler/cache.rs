//! Flat-file persistence for compiled grammar tables.
//!
//! Two lines per element: the name, then the pattern source. There is no
//! escaping; a name or pattern containing a newline would corrupt the file,
//! which cannot happen for DTD element names. A trailing name line with no
//! pattern line is ignored, matching the pairwise read.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::CacheError;

use super::{ElementPattern, GrammarTable};

/// Writes the table, sorted by element name so cache files are reproducible.
pub fn write_cache(table: &GrammarTable, path: &Path) -> Result<(), CacheError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for (name, pattern) in table.entries() {
        writeln!(writer, "{}", name)?;
        writeln!(writer, "{}", pattern)?;
    }
    writer.flush()?;
    debug!("wrote grammar cache with {} entries to {}", table.len(), path.display());
    Ok(())
}

/// Reads a table back. Any IO or pattern failure fails the whole load;
/// callers fall back to parsing the DTD itself.
pub fn read_cache(path: &Path) -> Result<GrammarTable, CacheError> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();
    let mut patterns = HashMap::new();
    loop {
        let name = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let pattern = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let compiled = ElementPattern::from_source(pattern)
            .map_err(|source| CacheError::Pattern {
                element: name.clone(),
                source,
            })?;
        patterns.insert(name, compiled);
    }
    debug!("read grammar cache with {} entries from {}", patterns.len(), path.display());
    Ok(GrammarTable { patterns })
}
