//! Validates a document tree against a compiled grammar table.
//!
//! The walk is a plain pre-order recursion. A node's own children sequence is
//! checked first, then every child is validated in turn regardless of the
//! outcome, so one bad node never hides problems further down. Violations are
//! collected as data; nothing here returns early with an error.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::compiler::{self, describe_pattern, GrammarTable, DELIMITER, PCDATA};
use crate::error::{CacheError, DtdError};
use crate::parser::{Dtd, DtdParser};
use crate::scanner::{EntityExpander, Scanner};

/// Read-only view of the tree under validation. Only naming, text presence,
/// and ordered children matter; everything else about the host document model
/// stays outside.
pub trait DocumentNode {
    /// Element name, or `None` for pure text/anonymous nodes.
    fn element_name(&self) -> Option<&str>;
    /// Whether this node itself carries text content (not its descendants).
    fn has_text(&self) -> bool;
    fn children(&self) -> Vec<&Self>;
}

/// Encodes a node's children for matching: `#PCDATA` when the node carries
/// text, then each element child's name followed by the delimiter. Children
/// without an element identity contribute nothing.
pub fn encode_children<N: DocumentNode>(node: &N) -> String {
    let mut encoded = String::new();
    if node.has_text() {
        encoded.push_str(PCDATA);
    }
    for child in node.children() {
        if let Some(name) = child.element_name() {
            encoded.push_str(name);
            encoded.push(DELIMITER);
        }
    }
    encoded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong at one place in the tree. These are data, not exceptions;
/// a full pass collects every one of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentError {
    /// The element has no entry in the grammar table.
    UndefinedElement { name: String },
    /// The children encoding did not fully match the element's pattern.
    InvalidChildSequence {
        name: String,
        /// Readable form of the allowed-children pattern.
        allowed: String,
        /// The children encoding that failed to match.
        found: String,
    },
    /// No grammar table at all. `identifier` is the DTD that failed to load,
    /// or `None` when none was ever assigned.
    MissingDtd { identifier: Option<String> },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::UndefinedElement { name } => {
                write!(f, "Definition for {} not found", name)
            }
            ContentError::InvalidChildSequence { .. } => {
                write!(f, "Unexpected child node or missing child node")
            }
            ContentError::MissingDtd { identifier: None } => write!(f, "DTD not assigned."),
            ContentError::MissingDtd {
                identifier: Some(identifier),
            } => write!(f, "{} not found.", identifier),
        }
    }
}

/// One collected problem. `target` borrows the offending node from the
/// validated tree; `beginning_of_error` is reserved for callers that can
/// locate the first offending child, the walk itself never sets it.
#[derive(Debug)]
pub struct ValidationItem<'t, N: DocumentNode> {
    pub severity: Severity,
    pub error: ContentError,
    pub target: Option<&'t N>,
    pub beginning_of_error: Option<&'t N>,
}

impl<'t, N: DocumentNode> ValidationItem<'t, N> {
    fn error_at(error: ContentError, target: Option<&'t N>) -> Self {
        ValidationItem {
            severity: Severity::Error,
            error,
            target,
            beginning_of_error: None,
        }
    }
}

/// Outcome of one validation pass. Reports are rebuilt wholesale per pass,
/// never patched incrementally.
#[derive(Debug)]
pub struct ValidationReport<'t, N: DocumentNode> {
    items: Vec<ValidationItem<'t, N>>,
    valid: bool,
}

impl<'t, N: DocumentNode> ValidationReport<'t, N> {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn items(&self) -> &[ValidationItem<'t, N>] {
        &self.items
    }
}

/// Validator configured with (or without) a grammar table.
#[derive(Debug, Default)]
pub struct ContentValidator {
    table: Option<GrammarTable>,
    dtd_identifier: Option<String>,
}

impl ContentValidator {
    /// Validator over an already-compiled table.
    pub fn with_table(table: GrammarTable) -> Self {
        debug!("content validator ready, {} element patterns", table.len());
        ContentValidator {
            table: Some(table),
            dtd_identifier: None,
        }
    }

    /// Parses and compiles DTD text. External parameter entities resolve
    /// through `expander`.
    pub fn from_dtd(
        identifier: &str,
        text: &str,
        expander: Box<dyn EntityExpander>,
    ) -> Result<Self, DtdError> {
        let scanner = Scanner::with_expander(identifier, text, expander);
        let dtd = DtdParser::new(scanner).parse(true)?;
        ContentValidator::from_parsed(&dtd)
    }

    /// Compiles an already-parsed DTD.
    pub fn from_parsed(dtd: &Dtd) -> Result<Self, DtdError> {
        let table = GrammarTable::compile(dtd)?;
        Ok(ContentValidator::with_table(table))
    }

    /// Restores a table from a grammar cache file.
    pub fn from_cache(path: &std::path::Path) -> Result<Self, CacheError> {
        let table = compiler::cache::read_cache(path)?;
        Ok(ContentValidator::with_table(table))
    }

    /// Records a DTD that could not be loaded at all. Validation then
    /// reports a single [`ContentError::MissingDtd`].
    pub fn missing(identifier: impl Into<String>) -> Self {
        ContentValidator {
            table: None,
            dtd_identifier: Some(identifier.into()),
        }
    }

    /// Walks the whole tree and collects every violation. Without a grammar
    /// table the report holds one `MissingDtd` item and no traversal happens.
    pub fn validate<'t, N: DocumentNode>(&self, root: &'t N) -> ValidationReport<'t, N> {
        let table = match &self.table {
            Some(table) => table,
            None => {
                let error = ContentError::MissingDtd {
                    identifier: self.dtd_identifier.clone(),
                };
                return ValidationReport {
                    items: vec![ValidationItem::error_at(error, None)],
                    valid: false,
                };
            }
        };

        let mut items = Vec::new();
        let valid = validate_node(table, root, &mut items);
        debug!("validation pass finished: valid={}, {} items", valid, items.len());
        ValidationReport { items, valid }
    }
}

fn validate_node<'t, N: DocumentNode>(
    table: &GrammarTable,
    node: &'t N,
    items: &mut Vec<ValidationItem<'t, N>>,
) -> bool {
    let mut result = check_content(table, node, items);
    for child in node.children() {
        // non-short-circuiting: every subtree is visited
        result = result & validate_node(table, child, items);
    }
    result
}

fn check_content<'t, N: DocumentNode>(
    table: &GrammarTable,
    node: &'t N,
    items: &mut Vec<ValidationItem<'t, N>>,
) -> bool {
    let name = match node.element_name() {
        Some(name) => name,
        // pure text nodes are vacuously valid
        None => return true,
    };

    let found = encode_children(node);
    let pattern = match table.pattern(name) {
        Some(pattern) => pattern,
        None => {
            let error = ContentError::UndefinedElement {
                name: name.to_string(),
            };
            items.push(ValidationItem::error_at(error, Some(node)));
            return false;
        }
    };

    if pattern.matches_exactly(&found) {
        return true;
    }
    let error = ContentError::InvalidChildSequence {
        name: name.to_string(),
        allowed: describe_pattern(pattern.pattern()),
        found,
    };
    items.push(ValidationItem::error_at(error, Some(node)));
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{elem, elem_with_text, text};

    const BOOK_DTD: &str = "<!ELEMENT book (title, chapter+)>\
                            <!ELEMENT title (#PCDATA)>\
                            <!ELEMENT chapter (#PCDATA)>";

    fn book_validator() -> ContentValidator {
        ContentValidator::from_dtd("book.dtd", BOOK_DTD, Box::new(crate::scanner::NoExpansion))
            .unwrap()
    }

    #[test]
    fn conforming_document_is_valid() {
        let doc = elem(
            "book",
            vec![
                elem_with_text("title", "X"),
                elem_with_text("chapter", "a"),
                elem_with_text("chapter", "b"),
            ],
        );
        let report = book_validator().validate(&doc);
        assert!(report.is_valid());
        assert!(report.items().is_empty());
    }

    #[test]
    fn missing_required_child_is_one_sequence_error() {
        let doc = elem("book", vec![elem_with_text("chapter", "a")]);
        let report = book_validator().validate(&doc);

        assert!(!report.is_valid());
        assert_eq!(report.items().len(), 1);
        let item = &report.items()[0];
        assert_eq!(item.severity, Severity::Error);
        assert!(matches!(
            &item.error,
            ContentError::InvalidChildSequence { name, allowed, found }
                if name == "book" && allowed == "((title)(chapter)+)" && found == "chapter#"
        ));
        assert_eq!(item.target.unwrap().element_name(), Some("book"));
        assert!(item.beginning_of_error.is_none());
    }

    #[test]
    fn extra_child_fails_the_full_match() {
        // (bar) allows exactly one bar; a prefix match must not count
        let validator = ContentValidator::from_dtd(
            "t.dtd",
            "<!ELEMENT foo (bar)><!ELEMENT bar EMPTY>",
            Box::new(crate::scanner::NoExpansion),
        )
        .unwrap();
        let doc = elem("foo", vec![elem("bar", vec![]), elem("bar", vec![])]);
        let report = validator.validate(&doc);

        assert!(!report.is_valid());
        assert_eq!(report.items().len(), 1);
        assert!(matches!(
            &report.items()[0].error,
            ContentError::InvalidChildSequence { found, .. } if found == "bar#bar#"
        ));
    }

    #[test]
    fn undefined_element_reports_without_sequence_check() {
        let doc = elem("book", vec![elem_with_text("title", "X"), elem("spine", vec![])]);
        let report = book_validator().validate(&doc);

        assert!(!report.is_valid());
        // book's sequence is wrong AND spine is undefined
        assert_eq!(report.items().len(), 2);
        assert!(report.items().iter().any(|item| matches!(
            &item.error,
            ContentError::UndefinedElement { name } if name == "spine"
        )));
    }

    #[test]
    fn descendants_are_still_checked_under_an_invalid_parent() {
        // book misses its title, but the chapters below must still be visited
        let bad_chapter = elem("chapter", vec![elem("bogus", vec![])]);
        let doc = elem("book", vec![bad_chapter]);
        let report = book_validator().validate(&doc);

        assert!(!report.is_valid());
        let kinds: Vec<&ContentError> =
            report.items().iter().map(|item| &item.error).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], ContentError::InvalidChildSequence { name, .. } if name == "book"));
        assert!(matches!(kinds[1], ContentError::InvalidChildSequence { name, .. } if name == "chapter"));
        assert!(matches!(kinds[2], ContentError::UndefinedElement { name } if name == "bogus"));
    }

    #[test]
    fn text_nodes_are_vacuously_valid() {
        let validator = ContentValidator::from_dtd(
            "t.dtd",
            "<!ELEMENT p (#PCDATA | em)*><!ELEMENT em (#PCDATA)>",
            Box::new(crate::scanner::NoExpansion),
        )
        .unwrap();
        // mixed content: anonymous text children between elements
        let doc = elem("p", vec![text("hello "), elem_with_text("em", "world"), text("!")]);
        let report = validator.validate(&doc);
        assert!(report.is_valid());
    }

    #[test]
    fn node_with_direct_text_encodes_pcdata() {
        let doc = elem_with_text("title", "X");
        assert_eq!(encode_children(&doc), "#PCDATA");

        let mixed = elem(
            "book",
            vec![elem_with_text("title", "X"), elem_with_text("chapter", "a")],
        );
        assert_eq!(encode_children(&mixed), "title#chapter#");
    }

    #[test]
    fn missing_dtd_reports_once_and_skips_traversal() {
        let validator = ContentValidator::missing("dtbook-2005-3.dtd");
        let doc = elem("book", vec![elem("junk", vec![])]);
        let report = validator.validate(&doc);

        assert!(!report.is_valid());
        assert_eq!(report.items().len(), 1);
        let item = &report.items()[0];
        assert!(item.target.is_none());
        assert_eq!(item.error.to_string(), "dtbook-2005-3.dtd not found.");
    }

    #[test]
    fn unassigned_dtd_has_its_own_message() {
        let validator = ContentValidator::default();
        let doc = elem("book", vec![]);
        let report = validator.validate(&doc);

        assert_eq!(report.items().len(), 1);
        assert_eq!(report.items()[0].error.to_string(), "DTD not assigned.");
    }

    #[test]
    fn empty_table_marks_every_element_undefined() {
        let validator = ContentValidator::with_table(Default::default());
        let doc = elem("a", vec![elem("b", vec![])]);
        let report = validator.validate(&doc);

        assert!(!report.is_valid());
        assert_eq!(report.items().len(), 2);
    }

    #[test]
    fn error_messages_match_the_report_surface() {
        assert_eq!(
            ContentError::UndefinedElement {
                name: "spine".to_string()
            }
            .to_string(),
            "Definition for spine not found"
        );
        assert_eq!(
            ContentError::InvalidChildSequence {
                name: "book".to_string(),
                allowed: "((title)(chapter)+)".to_string(),
                found: "chapter#".to_string(),
            }
            .to_string(),
            "Unexpected child node or missing child node"
        );
    }
}
