//! External parameter-entity resolution.
//!
//! The scanner expands internal parameter entities from its own value table.
//! Everything else goes through an [`EntityExpander`], injected at
//! construction, so callers decide how (and whether) external entities load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Replacement input for one external parameter entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedEntity {
    pub text: String,
    /// Identifier of the nested input stream; shows up in error positions.
    pub identifier: String,
}

/// Resolves external parameter entities referenced from a DTD.
///
/// Returning `None` makes the scanner drop the reference and carry on; a DTD
/// with unresolvable entities still parses.
pub trait EntityExpander {
    fn expand(&mut self, name: &str) -> Option<ExpandedEntity>;

    /// Called when a declaration binds `name` to an external system id.
    fn declare(&mut self, _name: &str, _system_id: &str) {}
}

/// Expander that resolves nothing; every external reference is skipped.
#[derive(Debug, Default)]
pub struct NoExpansion;

impl EntityExpander for NoExpansion {
    fn expand(&mut self, _name: &str) -> Option<ExpandedEntity> {
        None
    }
}

/// Resolves declared system ids as files relative to a base directory,
/// typically the directory of the DTD being parsed.
#[derive(Debug)]
pub struct FileExpander {
    base_dir: PathBuf,
    declared: HashMap<String, String>,
}

impl FileExpander {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        FileExpander {
            base_dir: base_dir.as_ref().to_path_buf(),
            declared: HashMap::new(),
        }
    }
}

impl EntityExpander for FileExpander {
    fn expand(&mut self, name: &str) -> Option<ExpandedEntity> {
        let system_id = self.declared.get(name)?;
        let path = self.base_dir.join(system_id);
        match fs::read_to_string(&path) {
            Ok(text) => Some(ExpandedEntity {
                text,
                identifier: system_id.clone(),
            }),
            Err(err) => {
                warn!(
                    "external entity {} not readable at {}: {}",
                    name,
                    path.display(),
                    err
                );
                None
            }
        }
    }

    fn declare(&mut self, name: &str, system_id: &str) {
        self.declared.insert(name.to_string(), system_id.to_string());
    }
}
