//! Compiles content models into regexes over a children encoding.
//!
//! A node's children are flattened to a string before matching: `#PCDATA` if
//! the node itself carries text, then each element child's name followed by
//! `#`. Every declared element gets one regex over that alphabet, and a node
//! is valid when its whole encoding matches. The table of compiled patterns
//! can be persisted as a flat cache file (see [`cache`]).

pub mod cache;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CompileError;
use crate::parser::{ContentModel, Dtd};

/// Separator appended to each element name in the children encoding.
pub const DELIMITER: char = '#';
/// Literal standing for text content in the children encoding.
pub const PCDATA: &str = "#PCDATA";

/// Lazy-compiled regex matching one encoded name group, for prettifying
/// patterns in error messages.
static NAME_GROUP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\?:([^()#]+)#\)").unwrap());

/// One element's compiled children pattern.
#[derive(Debug, Clone)]
pub struct ElementPattern {
    pattern: String,
    regex: Regex,
}

impl ElementPattern {
    /// Compiles an element's content model. `None` content (an element seen
    /// only in an ATTLIST) compiles like `ANY`.
    pub fn compile(
        element: &str,
        model: Option<&ContentModel>,
    ) -> Result<ElementPattern, CompileError> {
        let mut pattern = String::new();
        if let Some(model) = model {
            render(model, &mut pattern);
        }
        ElementPattern::from_source(pattern).map_err(|source| CompileError::Pattern {
            element: element.to_string(),
            source,
        })
    }

    fn from_source(pattern: String) -> Result<ElementPattern, regex::Error> {
        let regex = Regex::new(&pattern)?;
        Ok(ElementPattern { pattern, regex })
    }

    /// The pattern text, as written to the cache.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the entire children encoding matches. A prefix match is not
    /// enough: the leftmost match must reproduce the whole subject.
    pub fn matches_exactly(&self, children: &str) -> bool {
        match self.regex.find(children) {
            Some(found) => found.as_str() == children,
            None => false,
        }
    }
}

fn render(model: &ContentModel, out: &mut String) {
    match model {
        // ANY and EMPTY both compile to the empty pattern, which full-match
        // semantics turn into "no children allowed".
        ContentModel::Any | ContentModel::Empty => {}
        ContentModel::PcData => out.push_str(PCDATA),
        ContentModel::Name { name, .. } => {
            out.push_str("(?:");
            out.push_str(&regex::escape(name));
            out.push(DELIMITER);
            out.push(')');
        }
        ContentModel::Choice { items, .. } => {
            render_group(items, "|", out);
        }
        ContentModel::Sequence { items, .. } => {
            render_group(items, "", out);
        }
        ContentModel::Mixed { items, .. } => {
            // the implicit #PCDATA head counts as an alternative
            let wrap = !items.is_empty();
            if wrap {
                out.push_str("(?:");
            }
            out.push_str(PCDATA);
            for item in items {
                out.push('|');
                render(item, out);
            }
            if wrap {
                out.push(')');
            }
        }
    }
    out.push_str(model.cardinality().suffix());
}

fn render_group(items: &[ContentModel], separator: &str, out: &mut String) {
    let wrap = items.len() > 1;
    if wrap {
        out.push_str("(?:");
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        render(item, out);
    }
    if wrap {
        out.push(')');
    }
}

/// Human-readable form of a compiled pattern for error messages: name groups
/// lose the delimiter, group wrappers lose the `?:`.
///
/// `(?:(?:title#)(?:chapter#)+)` becomes `((title)(chapter)+)`.
pub fn describe_pattern(pattern: &str) -> String {
    NAME_GROUP_REGEX
        .replace_all(pattern, "($1)")
        .replace("?:", "")
}

/// Compiled children patterns for every declared element.
#[derive(Debug, Default)]
pub struct GrammarTable {
    patterns: HashMap<String, ElementPattern>,
}

impl GrammarTable {
    /// Compiles every element of a parsed DTD.
    pub fn compile(dtd: &Dtd) -> Result<GrammarTable, CompileError> {
        let mut patterns = HashMap::new();
        for (name, element) in &dtd.elements {
            let pattern = ElementPattern::compile(name, element.content.as_ref())?;
            patterns.insert(name.clone(), pattern);
        }
        Ok(GrammarTable { patterns })
    }

    pub fn pattern(&self, element: &str) -> Option<&ElementPattern> {
        self.patterns.get(element)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `(name, pattern)` pairs sorted by name. The cache writer and the dump
    /// tool both want deterministic order.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .patterns
            .iter()
            .map(|(name, pattern)| (name.as_str(), pattern.pattern()))
            .collect();
        entries.sort();
        entries
    }
}
