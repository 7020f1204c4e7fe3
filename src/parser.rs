//! Recursive-descent parser for DTD declarations.
//!
//! One pass over the token stream builds a [`Dtd`]. The parser is lenient the
//! way long-lived DTD tooling has to be: unknown `<!WORD ...>` declarations
//! are skipped to their closing `>`, processing instructions are consumed and
//! dropped, and IGNORE conditional sections are skipped wholesale. Everything
//! else that deviates from the declaration grammar is a [`ParseError`].

pub mod model;

use std::collections::HashSet;

use tracing::debug;

use crate::error::ParseError;
use crate::scanner::{Scanner, Token, TokenKind};

pub use model::{
    AttributeType, Cardinality, ContentModel, DefaultDecl, Dtd, DtdAttribute, DtdElement,
    DtdEntity, DtdNotation,
};

pub struct DtdParser {
    scanner: Scanner,
    dtd: Dtd,
}

impl DtdParser {
    pub fn new(scanner: Scanner) -> Self {
        DtdParser {
            scanner,
            dtd: Dtd::new(),
        }
    }

    /// Parser over in-memory DTD text with no external entity resolution.
    pub fn from_text(identifier: impl Into<String>, text: &str) -> Self {
        DtdParser::new(Scanner::new(identifier, text))
    }

    /// Parses every top-level construct until end of input.
    ///
    /// With `guess_root`, afterwards removes every element name referenced in
    /// some content model from the set of declared elements; a single
    /// survivor becomes [`Dtd::root_element`].
    pub fn parse(mut self, guess_root: bool) -> Result<Dtd, ParseError> {
        loop {
            let token = self.scanner.peek()?;
            if token.kind == TokenKind::Eof {
                break;
            }
            self.parse_top_level()?;
        }
        if guess_root {
            self.guess_root();
        }
        Ok(self.dtd)
    }

    fn parse_top_level(&mut self) -> Result<(), ParseError> {
        let token = self.scanner.get()?;
        match token.kind {
            TokenKind::LtQues => {
                // Processing instructions have no declaration payload; consume
                // through the ?> and move on.
                let mut text = String::new();
                loop {
                    text.push_str(&self.scanner.get_until('?'));
                    let next = self.scanner.peek()?;
                    match next.kind {
                        TokenKind::Gt => {
                            self.scanner.get()?;
                            break;
                        }
                        TokenKind::Eof => {
                            return Err(
                                self.syntax_error("Unterminated processing instruction")
                            );
                        }
                        // a '?' inside the body; keep what was read and go on
                        _ => {
                            self.scanner.get()?;
                            text.push('?');
                            text.push_str(next.text());
                        }
                    }
                }
                debug!("skipping processing instruction: {}", text);
                Ok(())
            }
            TokenKind::Conditional => {
                let word = self.expect(TokenKind::Identifier)?;
                match word.text() {
                    "IGNORE" => Ok(self.scanner.skip_conditional()?),
                    "INCLUDE" => {
                        self.scanner.skip_until('[');
                        Ok(())
                    }
                    other => {
                        Err(self.syntax_error(format!("Invalid token in conditional: {}", other)))
                    }
                }
            }
            // The ]]> closing an INCLUDE section arrives here; nothing to do.
            TokenKind::EndConditional => Ok(()),
            TokenKind::Comment => Ok(()),
            TokenKind::LtBang => {
                let word = self.expect(TokenKind::Identifier)?;
                match word.text() {
                    "ELEMENT" => self.parse_element(),
                    "ATTLIST" => self.parse_attlist(),
                    "ENTITY" => self.parse_entity(),
                    "NOTATION" => self.parse_notation(),
                    other => {
                        debug!("skipping unsupported declaration <!{}", other);
                        self.skip_until_token(TokenKind::Gt)
                    }
                }
            }
            _ => Err(self.syntax_error(format!("Unexpected token: {}", token))),
        }
    }

    fn skip_until_token(&mut self, stop: TokenKind) -> Result<(), ParseError> {
        let mut token = self.scanner.get()?;
        while token.kind != stop {
            token = self.scanner.get()?;
        }
        Ok(())
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.scanner.get()?;
        if token.kind != expected {
            return Err(self.syntax_error(format!("Expected {} instead of {}", expected, token)));
        }
        Ok(token)
    }

    // ---- <!ELEMENT ----

    fn parse_element(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Identifier)?.text().to_string();

        match self.dtd.elements.get(&name) {
            None => {
                self.dtd
                    .elements
                    .insert(name.clone(), DtdElement::new(name.clone()));
            }
            // An ATTLIST may have created the element without content; only a
            // second content definition is an error.
            Some(element) if element.content.is_some() => {
                return Err(
                    self.syntax_error(format!("Found second definition of element: {}", name))
                );
            }
            Some(_) => {}
        }

        let content = self.parse_content_spec()?;
        if let Some(element) = self.dtd.elements.get_mut(&name) {
            element.content = content;
        }

        self.expect(TokenKind::Gt)?;
        Ok(())
    }

    fn parse_content_spec(&mut self) -> Result<Option<ContentModel>, ParseError> {
        let token = self.scanner.get()?;
        match token.kind {
            TokenKind::Identifier => match token.text() {
                "EMPTY" => Ok(Some(ContentModel::Empty)),
                "ANY" => Ok(Some(ContentModel::Any)),
                other => {
                    Err(self.syntax_error(format!("Invalid token in content spec: {}", other)))
                }
            },
            TokenKind::LParen => {
                let next = self.scanner.peek()?;
                match next.kind {
                    TokenKind::Identifier if next.text() == "#PCDATA" => {
                        Ok(Some(self.parse_mixed()?))
                    }
                    TokenKind::Identifier | TokenKind::LParen => Ok(Some(self.parse_children()?)),
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    /// `(#PCDATA)` or `(#PCDATA | name | ...)*`. The `*` is required as soon
    /// as names appear.
    fn parse_mixed(&mut self) -> Result<ContentModel, ParseError> {
        let mut items = Vec::new();
        let mut pcdata_only = true;

        // the #PCDATA head, already peeked by the caller
        self.scanner.get()?;

        loop {
            let token = self.scanner.get()?;
            match token.kind {
                TokenKind::RParen => {
                    let next = self.scanner.peek()?;
                    if next.kind == TokenKind::Asterisk {
                        self.scanner.get()?;
                        return Ok(ContentModel::Mixed {
                            items,
                            cardinality: Cardinality::ZeroOrMany,
                        });
                    }
                    if !pcdata_only {
                        return Err(self.syntax_error(format!(
                            "Invalid token in Mixed content type, '*' required after (#PCDATA|xx ...): {}",
                            next.kind
                        )));
                    }
                    return Ok(ContentModel::Mixed {
                        items,
                        cardinality: Cardinality::One,
                    });
                }
                TokenKind::Pipe => {
                    let name = self.expect(TokenKind::Identifier)?;
                    items.push(ContentModel::Name {
                        name: name.text().to_string(),
                        cardinality: Cardinality::One,
                    });
                    pcdata_only = false;
                }
                _ => {
                    return Err(self.syntax_error(format!(
                        "Invalid token in Mixed content type: {}",
                        token.kind
                    )));
                }
            }
        }
    }

    fn parse_children(&mut self) -> Result<ContentModel, ParseError> {
        let mut group = self.parse_choice_sequence()?;
        let cardinality = self.parse_cardinality()?;
        group.set_cardinality(cardinality);
        Ok(group)
    }

    /// Content particles joined by all `|` or all `,` up to the closing
    /// paren. A single particle without separators becomes a one-item
    /// sequence.
    fn parse_choice_sequence(&mut self) -> Result<ContentModel, ParseError> {
        let mut separator: Option<TokenKind> = None;
        let mut items = Vec::new();

        loop {
            let item = self.parse_cp()?;
            let token = self.scanner.get()?;
            match token.kind {
                TokenKind::Pipe | TokenKind::Comma => {
                    if let Some(current) = separator {
                        if current != token.kind {
                            return Err(
                                self.syntax_error("Can't mix separators in a choice/sequence")
                            );
                        }
                    }
                    separator = Some(token.kind);
                    items.push(item);
                }
                TokenKind::RParen => {
                    items.push(item);
                    let cardinality = Cardinality::One;
                    return Ok(if separator == Some(TokenKind::Pipe) {
                        ContentModel::Choice { items, cardinality }
                    } else {
                        ContentModel::Sequence { items, cardinality }
                    });
                }
                _ => {
                    return Err(self.syntax_error(format!(
                        "Found invalid token in sequence: {}",
                        token.kind
                    )));
                }
            }
        }
    }

    fn parse_cp(&mut self) -> Result<ContentModel, ParseError> {
        let token = self.scanner.get()?;
        let mut item = match token.kind {
            TokenKind::Identifier => ContentModel::Name {
                name: token.text().to_string(),
                cardinality: Cardinality::One,
            },
            TokenKind::LParen => self.parse_choice_sequence()?,
            _ => {
                return Err(self.syntax_error(format!(
                    "Found invalid token in sequence: {}",
                    token.kind
                )));
            }
        };
        let cardinality = self.parse_cardinality()?;
        item.set_cardinality(cardinality);
        Ok(item)
    }

    fn parse_cardinality(&mut self) -> Result<Cardinality, ParseError> {
        let token = self.scanner.peek()?;
        let cardinality = match token.kind {
            TokenKind::Ques => Cardinality::ZeroOrOne,
            TokenKind::Asterisk => Cardinality::ZeroOrMany,
            TokenKind::Plus => Cardinality::OneOrMany,
            _ => return Ok(Cardinality::One),
        };
        self.scanner.get()?;
        Ok(cardinality)
    }

    // ---- <!ATTLIST ----

    fn parse_attlist(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Identifier)?.text().to_string();

        self.dtd
            .elements
            .entry(name.clone())
            .or_insert_with(|| DtdElement::new(name.clone()));

        while self.scanner.peek()?.kind != TokenKind::Gt {
            self.parse_attdef(&name)?;
        }
        self.expect(TokenKind::Gt)?;
        Ok(())
    }

    fn parse_attdef(&mut self, element_name: &str) -> Result<(), ParseError> {
        let attr_name = self.expect(TokenKind::Identifier)?.text().to_string();

        let type_token = self.scanner.get()?;
        let attr_type = match type_token.kind {
            TokenKind::Identifier if type_token.text() == "NOTATION" => {
                AttributeType::Notation(self.parse_notation_list()?)
            }
            TokenKind::Identifier => AttributeType::Named(type_token.text().to_string()),
            TokenKind::LParen => AttributeType::Enumeration(self.parse_enumeration()?),
            _ => {
                return Err(self.syntax_error(format!(
                    "Invalid token in attribute type: {}",
                    type_token.kind
                )));
            }
        };

        let next = self.scanner.peek()?;
        let default = match next.kind {
            TokenKind::Identifier => {
                self.scanner.get()?;
                match next.text() {
                    "#FIXED" => {
                        let value = self.scanner.get()?;
                        DefaultDecl::Fixed(value.text().to_string())
                    }
                    "#REQUIRED" => DefaultDecl::Required,
                    "#IMPLIED" => DefaultDecl::Implied,
                    other => {
                        return Err(self.syntax_error(format!(
                            "Invalid token in attribute declaration: {}",
                            other
                        )));
                    }
                }
            }
            TokenKind::String => {
                self.scanner.get()?;
                DefaultDecl::Value(next.text().to_string())
            }
            _ => DefaultDecl::None,
        };

        if let Some(element) = self.dtd.elements.get_mut(element_name) {
            element.attributes.insert(
                attr_name.clone(),
                DtdAttribute {
                    name: attr_name,
                    attr_type,
                    default,
                },
            );
        }
        Ok(())
    }

    fn parse_notation_list(&mut self) -> Result<Vec<String>, ParseError> {
        let open = self.scanner.get()?;
        if open.kind != TokenKind::LParen {
            return Err(self.syntax_error(format!("Invalid token in notation: {}", open.kind)));
        }

        let mut items = Vec::new();
        loop {
            let token = self.scanner.get()?;
            if token.kind != TokenKind::Identifier {
                return Err(
                    self.syntax_error(format!("Invalid token in notation: {}", token.kind))
                );
            }
            items.push(token.text().to_string());

            let next = self.scanner.peek()?;
            match next.kind {
                TokenKind::RParen => {
                    self.scanner.get()?;
                    return Ok(items);
                }
                TokenKind::Pipe => {
                    self.scanner.get()?;
                }
                other => {
                    return Err(self.syntax_error(format!("Invalid token in notation: {}", other)));
                }
            }
        }
    }

    /// Enumerated attribute values; name tokens are allowed to start with a
    /// digit here, so NMTOKEN is legal alongside IDENTIFIER.
    fn parse_enumeration(&mut self) -> Result<Vec<String>, ParseError> {
        let mut items = Vec::new();
        loop {
            let token = self.scanner.get()?;
            if token.kind != TokenKind::Identifier && token.kind != TokenKind::Nmtoken {
                return Err(
                    self.syntax_error(format!("Invalid token in enumeration: {}", token.kind))
                );
            }
            items.push(token.text().to_string());

            let next = self.scanner.peek()?;
            match next.kind {
                TokenKind::RParen => {
                    self.scanner.get()?;
                    return Ok(items);
                }
                TokenKind::Pipe => {
                    self.scanner.get()?;
                }
                other => {
                    return Err(
                        self.syntax_error(format!("Invalid token in enumeration: {}", other))
                    );
                }
            }
        }
    }

    // ---- <!ENTITY ----

    fn parse_entity(&mut self) -> Result<(), ParseError> {
        let mut token = self.scanner.get()?;

        let is_parameter = token.kind == TokenKind::Percent;
        if is_parameter {
            token = self.expect(TokenKind::Identifier)?;
        } else if token.kind != TokenKind::Identifier {
            return Err(self.syntax_error("Invalid entity declaration"));
        }
        let name = token.text().to_string();

        // First definition of a name wins; later ones parse into a throwaway.
        let skip = self.dtd.entities.contains_key(&name);

        let mut entity = DtdEntity::new(name.clone(), is_parameter);
        self.parse_entity_def(&mut entity)?;

        if is_parameter && !skip {
            if let Some(value) = &entity.value {
                self.scanner.add_entity(&name, value);
            }
            if let Some(system_id) = &entity.system_id {
                self.scanner.declare_external_entity(&name, system_id);
            }
        }
        if !skip {
            self.dtd.entities.insert(name, entity);
        }
        Ok(())
    }

    fn parse_entity_def(&mut self, entity: &mut DtdEntity) -> Result<(), ParseError> {
        let token = self.scanner.get()?;
        match token.kind {
            TokenKind::String => {
                if entity.value.is_none() {
                    entity.value = Some(token.text().to_string());
                }
            }
            TokenKind::Identifier => {
                match token.text() {
                    "SYSTEM" => {
                        let system = self.expect(TokenKind::String)?;
                        entity.system_id = Some(system.text().to_string());
                    }
                    "PUBLIC" => {
                        let public = self.expect(TokenKind::String)?;
                        let system = self.expect(TokenKind::String)?;
                        entity.public_id = Some(public.text().to_string());
                        entity.system_id = Some(system.text().to_string());
                    }
                    _ => {
                        return Err(self.syntax_error("Invalid External ID specification"));
                    }
                }

                // NDATA is only valid on general external entities.
                if !entity.is_parameter {
                    let next = self.scanner.peek()?;
                    if next.kind == TokenKind::Identifier {
                        if next.text() != "NDATA" {
                            return Err(self.syntax_error("Invalid NData declaration"));
                        }
                        self.scanner.get()?;
                        let ndata = self.expect(TokenKind::Identifier)?;
                        entity.ndata = Some(ndata.text().to_string());
                    }
                }
            }
            _ => {
                return Err(self.syntax_error("Invalid entity definition"));
            }
        }
        self.expect(TokenKind::Gt)?;
        Ok(())
    }

    // ---- <!NOTATION ----

    fn parse_notation(&mut self) -> Result<(), ParseError> {
        let name = self.expect(TokenKind::Identifier)?.text().to_string();
        let mut notation = DtdNotation {
            name: name.clone(),
            system_id: None,
            public_id: None,
        };

        let kind = self.expect(TokenKind::Identifier)?;
        match kind.text() {
            "SYSTEM" => {
                let system = self.expect(TokenKind::String)?;
                notation.system_id = Some(system.text().to_string());
            }
            "PUBLIC" => {
                let public = self.expect(TokenKind::String)?;
                notation.public_id = Some(public.text().to_string());
                // PUBLIC without a system literal is legal in a NOTATION
                if self.scanner.peek()?.kind == TokenKind::String {
                    let system = self.scanner.get()?;
                    notation.system_id = Some(system.text().to_string());
                }
            }
            _ => {}
        }
        self.expect(TokenKind::Gt)?;

        self.dtd.notations.insert(name, notation);
        Ok(())
    }

    // ---- root guessing ----

    fn guess_root(&mut self) {
        let mut candidates: HashSet<String> = self.dtd.elements.keys().cloned().collect();

        let mut referenced = Vec::new();
        for element in self.dtd.elements.values() {
            if let Some(content) = &element.content {
                content.collect_names(&mut referenced);
            }
        }
        for name in referenced {
            candidates.remove(name);
        }

        if candidates.len() == 1 {
            self.dtd.root_element = candidates.into_iter().next();
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            identifier: self.scanner.identifier().to_string(),
            line: self.scanner.line(),
            column: self.scanner.column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Dtd {
        DtdParser::from_text("test.dtd", text).parse(true).unwrap()
    }

    fn parse_err(text: &str) -> ParseError {
        DtdParser::from_text("test.dtd", text)
            .parse(false)
            .unwrap_err()
    }

    #[test]
    fn sequence_with_cardinalities() {
        let dtd = parse("<!ELEMENT book (title, chapter+)>");
        let book = dtd.element("book").unwrap();
        assert_eq!(
            book.content,
            Some(ContentModel::Sequence {
                items: vec![
                    ContentModel::Name {
                        name: "title".to_string(),
                        cardinality: Cardinality::One,
                    },
                    ContentModel::Name {
                        name: "chapter".to_string(),
                        cardinality: Cardinality::OneOrMany,
                    },
                ],
                cardinality: Cardinality::One,
            })
        );
    }

    #[test]
    fn single_item_becomes_a_sequence() {
        let dtd = parse("<!ELEMENT chapter (para)>");
        assert_eq!(
            dtd.element("chapter").unwrap().content,
            Some(ContentModel::Sequence {
                items: vec![ContentModel::Name {
                    name: "para".to_string(),
                    cardinality: Cardinality::One,
                }],
                cardinality: Cardinality::One,
            })
        );
    }

    #[test]
    fn nested_groups_carry_their_own_cardinality() {
        let dtd = parse("<!ELEMENT doc (head, (p | list)*)>");
        let content = dtd.element("doc").unwrap().content.clone().unwrap();
        assert_eq!(content.to_string(), "(head,(p|list)*)");
    }

    #[test]
    fn empty_and_any_keywords() {
        let dtd = parse("<!ELEMENT br EMPTY><!ELEMENT x ANY>");
        assert_eq!(dtd.element("br").unwrap().content, Some(ContentModel::Empty));
        assert_eq!(dtd.element("x").unwrap().content, Some(ContentModel::Any));
    }

    #[test]
    fn mixed_with_names_requires_star() {
        let err = parse_err("<!ELEMENT p (#PCDATA | em)>");
        let message = err.to_string();
        assert!(message.contains("'*' required"), "got: {message}");
    }

    #[test]
    fn pcdata_alone_allows_no_star() {
        let dtd = parse("<!ELEMENT title (#PCDATA)>");
        assert_eq!(
            dtd.element("title").unwrap().content,
            Some(ContentModel::Mixed {
                items: vec![],
                cardinality: Cardinality::One,
            })
        );
    }

    #[test]
    fn mixed_with_star_collects_names() {
        let dtd = parse("<!ELEMENT p (#PCDATA | em | strong)*>");
        let content = dtd.element("p").unwrap().content.clone().unwrap();
        assert_eq!(content.to_string(), "(#PCDATA|em|strong)*");
    }

    #[test]
    fn separators_cannot_mix() {
        let err = parse_err("<!ELEMENT bad (a, b | c)>");
        assert!(err
            .to_string()
            .contains("Can't mix separators in a choice/sequence"));
    }

    #[test]
    fn second_element_definition_is_an_error() {
        let err = parse_err("<!ELEMENT a EMPTY><!ELEMENT a ANY>");
        assert!(err
            .to_string()
            .contains("Found second definition of element: a"));
    }

    #[test]
    fn attlist_before_element_creates_a_placeholder() {
        let dtd = parse("<!ATTLIST img src CDATA #REQUIRED><!ELEMENT img EMPTY>");
        let img = dtd.element("img").unwrap();
        assert_eq!(img.content, Some(ContentModel::Empty));
        let src = img.attributes.get("src").unwrap();
        assert_eq!(src.attr_type, AttributeType::Named("CDATA".to_string()));
        assert_eq!(src.default, DefaultDecl::Required);
    }

    #[test]
    fn attribute_shapes() {
        let dtd = parse(
            "<!ELEMENT note (#PCDATA)> \
             <!ATTLIST note \
               kind (todo | 2do | done) \"todo\" \
               ref NOTATION (tex | png) #IMPLIED \
               version CDATA #FIXED \"1.0\">",
        );
        let note = dtd.element("note").unwrap();

        let kind = note.attributes.get("kind").unwrap();
        assert_eq!(
            kind.attr_type,
            AttributeType::Enumeration(vec![
                "todo".to_string(),
                "2do".to_string(),
                "done".to_string(),
            ])
        );
        assert_eq!(kind.default, DefaultDecl::Value("todo".to_string()));

        let reference = note.attributes.get("ref").unwrap();
        assert_eq!(
            reference.attr_type,
            AttributeType::Notation(vec!["tex".to_string(), "png".to_string()])
        );
        assert_eq!(reference.default, DefaultDecl::Implied);

        let version = note.attributes.get("version").unwrap();
        assert_eq!(version.default, DefaultDecl::Fixed("1.0".to_string()));
    }

    #[test]
    fn internal_parameter_entity_expands_in_later_declarations() {
        let dtd = parse(
            "<!ENTITY % inline \"em | strong\">\
             <!ELEMENT p (#PCDATA | %inline;)*>",
        );
        let content = dtd.element("p").unwrap().content.clone().unwrap();
        assert_eq!(content.to_string(), "(#PCDATA|em|strong)*");
    }

    #[test]
    fn first_entity_definition_wins() {
        let dtd = parse(
            "<!ENTITY % version \"1.0\">\
             <!ENTITY % version \"2.0\">",
        );
        assert_eq!(
            dtd.entities.get("version").unwrap().value,
            Some("1.0".to_string())
        );
    }

    #[test]
    fn external_entities_keep_their_ids() {
        let dtd = parse(
            "<!ENTITY % chapters SYSTEM \"chapters.ent\">\
             <!ENTITY logo PUBLIC \"-//ACME//Logo//EN\" \"logo.gif\" NDATA gif>",
        );
        let chapters = dtd.entities.get("chapters").unwrap();
        assert!(chapters.is_parameter);
        assert_eq!(chapters.system_id, Some("chapters.ent".to_string()));
        assert_eq!(chapters.ndata, None);

        let logo = dtd.entities.get("logo").unwrap();
        assert!(!logo.is_parameter);
        assert_eq!(logo.public_id, Some("-//ACME//Logo//EN".to_string()));
        assert_eq!(logo.system_id, Some("logo.gif".to_string()));
        assert_eq!(logo.ndata, Some("gif".to_string()));
    }

    #[test]
    fn notations_parse_both_id_forms() {
        let dtd = parse(
            "<!NOTATION gif SYSTEM \"image/gif\">\
             <!NOTATION tex PUBLIC \"+//ISBN 0-201-13448-9//NOTATION TeX//EN\">",
        );
        assert_eq!(
            dtd.notations.get("gif").unwrap().system_id,
            Some("image/gif".to_string())
        );
        let tex = dtd.notations.get("tex").unwrap();
        assert!(tex.system_id.is_none());
        assert!(tex.public_id.is_some());
    }

    #[test]
    fn root_element_is_guessed_by_elimination() {
        let dtd = parse(
            "<!ELEMENT book (title, chapter+)>\
             <!ELEMENT title (#PCDATA)>\
             <!ELEMENT chapter (title, para*)>\
             <!ELEMENT para (#PCDATA)>",
        );
        assert_eq!(dtd.root_element, Some("book".to_string()));
    }

    #[test]
    fn ambiguous_roots_stay_unset() {
        let dtd = parse("<!ELEMENT a EMPTY><!ELEMENT b EMPTY>");
        assert_eq!(dtd.root_element, None);
    }

    #[test]
    fn ignore_sections_are_skipped() {
        let dtd = parse(
            "<![ IGNORE [ <!ELEMENT hidden EMPTY> <![ nested ]]> still hidden ]]>\
             <!ELEMENT seen EMPTY>",
        );
        assert!(dtd.element("hidden").is_none());
        assert!(dtd.element("seen").is_some());
    }

    #[test]
    fn include_sections_are_parsed() {
        let dtd = parse("<![ INCLUDE [ <!ELEMENT inside EMPTY> ]]>");
        assert!(dtd.element("inside").is_some());
    }

    #[test]
    fn conditional_words_come_from_entities() {
        let dtd = parse(
            "<!ENTITY % draft \"IGNORE\">\
             <![ %draft; [ <!ELEMENT hidden EMPTY> ]]>",
        );
        assert!(dtd.element("hidden").is_none());
    }

    #[test]
    fn unknown_conditional_word_is_an_error() {
        let err = parse_err("<![ MAYBE [ ]]>");
        assert!(err.to_string().contains("Invalid token in conditional: MAYBE"));
    }

    #[test]
    fn unknown_declarations_are_skipped() {
        let dtd = parse("<!SHORTREF whatever \"x\" y><!ELEMENT a EMPTY>");
        assert!(dtd.element("a").is_some());
    }

    #[test]
    fn processing_instructions_are_consumed() {
        let dtd = parse("<?xml version=\"1.0\"?><!ELEMENT a EMPTY>");
        assert!(dtd.element("a").is_some());
    }

    #[test]
    fn stray_tokens_are_rejected() {
        let err = parse_err(")");
        assert!(err.to_string().contains("Unexpected token: RPAREN"));
    }

    #[test]
    fn expect_reports_both_kinds() {
        let err = parse_err("<!ELEMENT (bad) EMPTY>");
        assert!(err
            .to_string()
            .contains("Expected IDENTIFIER instead of LPAREN"));
    }
}
