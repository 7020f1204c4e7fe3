//! The DTD data model built by the parser.
//!
//! Content models form one tagged union; consumers match exhaustively rather
//! than probing node types. `Display` renders the declaration syntax back out,
//! which the dump tool and error descriptions both lean on.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Occurrence suffix of a content particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    One,
    ZeroOrOne,
    ZeroOrMany,
    OneOrMany,
}

impl Cardinality {
    /// The suffix as written in a DTD and in generated patterns.
    pub fn suffix(self) -> &'static str {
        match self {
            Cardinality::One => "",
            Cardinality::ZeroOrOne => "?",
            Cardinality::ZeroOrMany => "*",
            Cardinality::OneOrMany => "+",
        }
    }
}

/// An element's content specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentModel {
    Any,
    Empty,
    /// `#PCDATA` inside a group; also the head of every [`ContentModel::Mixed`].
    PcData,
    Name {
        name: String,
        cardinality: Cardinality,
    },
    /// `(a | b | c)` with a trailing cardinality.
    Choice {
        items: Vec<ContentModel>,
        cardinality: Cardinality,
    },
    /// `(a, b, c)` with a trailing cardinality.
    Sequence {
        items: Vec<ContentModel>,
        cardinality: Cardinality,
    },
    /// `(#PCDATA | a | b)*`; `items` holds only the names after the head.
    Mixed {
        items: Vec<ContentModel>,
        cardinality: Cardinality,
    },
}

impl ContentModel {
    /// Replaces the occurrence suffix. No-op on the kinds that cannot carry
    /// one.
    pub fn set_cardinality(&mut self, cardinality: Cardinality) {
        match self {
            ContentModel::Name { cardinality: c, .. }
            | ContentModel::Choice { cardinality: c, .. }
            | ContentModel::Sequence { cardinality: c, .. }
            | ContentModel::Mixed { cardinality: c, .. } => *c = cardinality,
            ContentModel::Any | ContentModel::Empty | ContentModel::PcData => {}
        }
    }

    /// The occurrence suffix carried by this node. The keyword kinds have
    /// none and report [`Cardinality::One`].
    pub fn cardinality(&self) -> Cardinality {
        match self {
            ContentModel::Name { cardinality, .. }
            | ContentModel::Choice { cardinality, .. }
            | ContentModel::Sequence { cardinality, .. }
            | ContentModel::Mixed { cardinality, .. } => *cardinality,
            ContentModel::Any | ContentModel::Empty | ContentModel::PcData => Cardinality::One,
        }
    }

    /// Collects every element name the model references, for root guessing.
    pub fn collect_names<'m>(&'m self, out: &mut Vec<&'m str>) {
        match self {
            ContentModel::Name { name, .. } => out.push(name),
            ContentModel::Choice { items, .. }
            | ContentModel::Sequence { items, .. }
            | ContentModel::Mixed { items, .. } => {
                for item in items {
                    item.collect_names(out);
                }
            }
            ContentModel::Any | ContentModel::Empty | ContentModel::PcData => {}
        }
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_group(
            f: &mut fmt::Formatter<'_>,
            items: &[ContentModel],
            separator: char,
        ) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, "{}", separator)?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            ContentModel::Any => write!(f, "ANY"),
            ContentModel::Empty => write!(f, "EMPTY"),
            ContentModel::PcData => write!(f, "#PCDATA"),
            ContentModel::Name { name, cardinality } => {
                write!(f, "{}{}", name, cardinality.suffix())
            }
            ContentModel::Choice { items, cardinality } => {
                write!(f, "(")?;
                write_group(f, items, '|')?;
                write!(f, "){}", cardinality.suffix())
            }
            ContentModel::Sequence { items, cardinality } => {
                write!(f, "(")?;
                write_group(f, items, ',')?;
                write!(f, "){}", cardinality.suffix())
            }
            ContentModel::Mixed { items, cardinality } => {
                write!(f, "(#PCDATA")?;
                for item in items {
                    write!(f, "|{}", item)?;
                }
                write!(f, "){}", cardinality.suffix())
            }
        }
    }
}

/// An element declaration. `content` is `None` when only an `ATTLIST`
/// mentioned the element so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtdElement {
    pub name: String,
    pub content: Option<ContentModel>,
    pub attributes: HashMap<String, DtdAttribute>,
}

impl DtdElement {
    pub fn new(name: impl Into<String>) -> Self {
        DtdElement {
            name: name.into(),
            content: None,
            attributes: HashMap::new(),
        }
    }
}

/// One attribute definition out of an `ATTLIST`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtdAttribute {
    pub name: String,
    pub attr_type: AttributeType,
    pub default: DefaultDecl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttributeType {
    /// CDATA, ID, IDREF and friends; kept as the declared word.
    Named(String),
    /// `(token | token | ...)`
    Enumeration(Vec<String>),
    /// `NOTATION (name | name | ...)`
    Notation(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DefaultDecl {
    Required,
    Implied,
    Fixed(String),
    Value(String),
    /// The declaration ended without a default clause; tolerated, not valid
    /// XML.
    None,
}

/// An entity declaration. First definition of a name wins; later ones are
/// parsed and dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtdEntity {
    pub name: String,
    pub is_parameter: bool,
    pub value: Option<String>,
    pub system_id: Option<String>,
    pub public_id: Option<String>,
    pub ndata: Option<String>,
}

impl DtdEntity {
    pub fn new(name: impl Into<String>, is_parameter: bool) -> Self {
        DtdEntity {
            name: name.into(),
            is_parameter,
            value: None,
            system_id: None,
            public_id: None,
            ndata: None,
        }
    }
}

/// A notation declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DtdNotation {
    pub name: String,
    pub system_id: Option<String>,
    pub public_id: Option<String>,
}

/// Everything parsed out of one DTD.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dtd {
    pub elements: HashMap<String, DtdElement>,
    pub entities: HashMap<String, DtdEntity>,
    pub notations: HashMap<String, DtdNotation>,
    /// Filled by root guessing when requested and unambiguous.
    pub root_element: Option<String>,
}

impl Dtd {
    pub fn new() -> Self {
        Dtd::default()
    }

    pub fn element(&self, name: &str) -> Option<&DtdElement> {
        self.elements.get(name)
    }
}
