//! DTD tokenizer with nested entity-expansion streams.
//!
//! The scanner reads characters from a stack of input streams. Parsing starts
//! on the DTD text itself; expanding an external parameter entity pushes a new
//! stream, and exhausting it pops back to the suspended one. Internal
//! parameter entities splice their replacement text ahead of the stream
//! instead of pushing a frame.
//!
//! Tokens come out through [`Scanner::peek`] / [`Scanner::get`] with a single
//! token of lookahead; the character layer keeps a single pushback slot, which
//! is all the token rules need.

pub mod chars;
mod expand;
pub mod tokens;

use std::collections::{HashMap, VecDeque};
use std::mem;

use tracing::debug;

use crate::error::ScanError;

pub use expand::{EntityExpander, ExpandedEntity, FileExpander, NoExpansion};
pub use tokens::{Token, TokenKind};

/// One level of input. Dropping a frame releases its buffer; no close
/// bookkeeping is needed when the stack pops.
struct StreamFrame {
    identifier: String,
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    prev_cr: bool,
}

impl StreamFrame {
    fn new(identifier: String, text: &str) -> Self {
        StreamFrame {
            identifier,
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            prev_cr: false,
        }
    }

    fn next(&mut self) -> Option<char> {
        let ch = *self.chars.get(self.pos)?;
        self.pos += 1;
        self.column += 1;
        if ch == '\n' || ch == '\r' {
            // \r\n counts as a single line break
            if !(ch == '\n' && self.prev_cr) {
                self.line += 1;
            }
            self.prev_cr = ch == '\r';
            self.column = 1;
        } else {
            self.prev_cr = false;
        }
        Some(ch)
    }
}

pub struct Scanner {
    frame: StreamFrame,
    suspended: Vec<StreamFrame>,
    next_token: Option<Token>,
    pushback: Option<char>,
    expand_buffer: VecDeque<char>,
    entity_values: HashMap<String, String>,
    expander: Box<dyn EntityExpander>,
    at_eof: bool,
}

impl Scanner {
    /// Scanner over `text` with no external entity resolution.
    pub fn new(identifier: impl Into<String>, text: &str) -> Self {
        Scanner::with_expander(identifier, text, Box::new(NoExpansion))
    }

    pub fn with_expander(
        identifier: impl Into<String>,
        text: &str,
        expander: Box<dyn EntityExpander>,
    ) -> Self {
        Scanner {
            frame: StreamFrame::new(identifier.into(), text),
            suspended: Vec::new(),
            next_token: None,
            pushback: None,
            expand_buffer: VecDeque::new(),
            entity_values: HashMap::new(),
            expander,
            at_eof: false,
        }
    }

    /// Identifier of the stream currently being read. Inside an expanded
    /// external entity this is the entity's identifier, not the top input.
    pub fn identifier(&self) -> &str {
        &self.frame.identifier
    }

    pub fn line(&self) -> u32 {
        self.frame.line
    }

    pub fn column(&self) -> u32 {
        self.frame.column
    }

    /// Registers an internal parameter entity. Later `%name;` references
    /// splice `value` into the character stream.
    pub fn add_entity(&mut self, name: &str, value: &str) {
        self.entity_values
            .insert(format!("%{};", name), value.to_string());
    }

    /// Reports an external parameter-entity declaration to the expander.
    pub fn declare_external_entity(&mut self, name: &str, system_id: &str) {
        self.expander.declare(name, system_id);
    }

    /// Next token without consuming it.
    pub fn peek(&mut self) -> Result<Token, ScanError> {
        match &self.next_token {
            Some(token) => Ok(token.clone()),
            None => {
                let token = self.read_next_token()?;
                self.next_token = Some(token.clone());
                Ok(token)
            }
        }
    }

    /// Next token, consuming it.
    pub fn get(&mut self) -> Result<Token, ScanError> {
        match self.next_token.take() {
            Some(token) => Ok(token),
            None => self.read_next_token(),
        }
    }

    /// Raw characters up to (and consuming) `stop`; end of input also stops.
    /// Used for processing-instruction bodies, which are not tokenized.
    pub fn get_until(&mut self, stop: char) -> String {
        let mut buff = String::new();
        while let Some(ch) = self.read_char() {
            if ch == stop {
                break;
            }
            buff.push(ch);
        }
        buff
    }

    /// Discards raw characters up to (and consuming) `stop`.
    pub fn skip_until(&mut self, stop: char) {
        while let Some(ch) = self.read_char() {
            if ch == stop {
                return;
            }
        }
    }

    /// Consumes a balanced conditional-section body up to its `]]>`,
    /// tracking nested `<![` / `]]>` pairs. Everything inside is ignored.
    pub fn skip_conditional(&mut self) -> Result<(), ScanError> {
        let mut depth = 0u32;
        let mut ch: Option<char> = None;
        loop {
            if ch != Some(']') {
                ch = self.read_char();
            }
            if ch == Some(']') {
                ch = self.read_char();
                if ch == Some(']') {
                    ch = self.read_char();
                    if ch == Some('>') {
                        if depth == 0 {
                            return Ok(());
                        }
                        depth -= 1;
                    }
                }
            }
            if ch == Some('<') {
                ch = self.read_char();
                if ch == Some('!') {
                    ch = self.read_char();
                    if ch == Some('[') {
                        depth += 1;
                    }
                }
            }
            if ch.is_none() {
                return Err(self.error("Unterminated conditional section"));
            }
        }
    }

    // ---- character layer ----

    /// Read priority: spliced expansion text, pushback, current frame.
    /// An exhausted frame pops back to the suspended one underneath.
    fn read_char(&mut self) -> Option<char> {
        if let Some(ch) = self.expand_buffer.pop_front() {
            return Some(ch);
        }
        if let Some(ch) = self.pushback.take() {
            return Some(ch);
        }
        self.read_from_frames()
    }

    fn peek_char(&mut self) -> Option<char> {
        if let Some(&ch) = self.expand_buffer.front() {
            return Some(ch);
        }
        if self.pushback.is_none() {
            self.pushback = self.read_from_frames();
        }
        self.pushback
    }

    fn read_from_frames(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.frame.next() {
                return Some(ch);
            }
            let parent = self.suspended.pop()?;
            self.frame = parent;
        }
    }

    /// Splices replacement text in front of whatever expansion text is left,
    /// so nested references expand before the enclosing remainder.
    fn splice_expansion(&mut self, text: &str) {
        let mut fresh: VecDeque<char> = text.chars().collect();
        fresh.append(&mut self.expand_buffer);
        self.expand_buffer = fresh;
    }

    /// Expands `%name;`. Internal table first, then the injected expander;
    /// unresolvable references are consumed and dropped so that DTDs with
    /// missing entities still parse.
    fn expand_reference(&mut self, reference: &str) {
        if let Some(value) = self.entity_values.get(reference) {
            let value = value.clone();
            self.splice_expansion(&value);
            return;
        }
        let name = &reference[1..reference.len() - 1];
        match self.expander.expand(name) {
            Some(entity) => {
                debug!("expanding external parameter entity {}", name);
                let nested = StreamFrame::new(entity.identifier, &entity.text);
                let current = mem::replace(&mut self.frame, nested);
                self.suspended.push(current);
            }
            None => {
                debug!("parameter entity {} not resolvable, skipping reference", name);
            }
        }
    }

    // ---- token layer ----

    fn read_next_token(&mut self) -> Result<Token, ScanError> {
        loop {
            let ch = match self.read_char() {
                Some(ch) => ch,
                None => {
                    if self.at_eof {
                        return Err(self.error("Read past EOF"));
                    }
                    self.at_eof = true;
                    return Ok(Token::of(TokenKind::Eof));
                }
            };
            match ch {
                '<' => return self.scan_after_lt(),
                // ?> stays two tokens: in <!ELEMENT blah (foo)?> the ? is a
                // cardinality, not part of a ?> pair.
                '?' => return Ok(Token::of(TokenKind::Ques)),
                '"' | '\'' => return Ok(self.scan_literal(ch)),
                '(' => return Ok(Token::of(TokenKind::LParen)),
                ')' => return Ok(Token::of(TokenKind::RParen)),
                '|' => return Ok(Token::of(TokenKind::Pipe)),
                '>' => return Ok(Token::of(TokenKind::Gt)),
                '=' => return Ok(Token::of(TokenKind::Equal)),
                '*' => return Ok(Token::of(TokenKind::Asterisk)),
                '+' => return Ok(Token::of(TokenKind::Plus)),
                ',' => return Ok(Token::of(TokenKind::Comma)),
                ']' => {
                    if self.read_char() != Some(']') {
                        return Err(self.error("Illegal character in input stream: ]"));
                    }
                    if self.read_char() != Some('>') {
                        return Err(self.error("Illegal character in input stream: ]"));
                    }
                    return Ok(Token::of(TokenKind::EndConditional));
                }
                '#' => {
                    let mut buff = String::from("#");
                    if let Some(c) = self.peek_char() {
                        if chars::is_identifier_start(c) {
                            self.read_char();
                            buff.push(c);
                            self.read_name_tail(&mut buff);
                        }
                    }
                    return Ok(Token::with_value(TokenKind::Identifier, buff));
                }
                '&' | '%' => {
                    if let Some(token) = self.scan_reference(ch)? {
                        return Ok(token);
                    }
                    // parameter reference expanded (or dropped) into the stream
                }
                c if chars::is_identifier_start(c) => {
                    let mut buff = String::new();
                    buff.push(c);
                    self.read_name_tail(&mut buff);
                    return Ok(Token::with_value(TokenKind::Identifier, buff));
                }
                c if chars::is_name_char(c) => {
                    let mut buff = String::new();
                    buff.push(c);
                    self.read_name_tail(&mut buff);
                    return Ok(Token::with_value(TokenKind::Nmtoken, buff));
                }
                c if c.is_whitespace() => {}
                c => {
                    return Err(self.error(format!("Illegal character in input stream: {}", c)));
                }
            }
        }
    }

    fn scan_after_lt(&mut self) -> Result<Token, ScanError> {
        match self.peek_char() {
            Some('!') => {
                self.read_char();
                if self.peek_char() == Some('[') {
                    self.read_char();
                    return Ok(Token::of(TokenKind::Conditional));
                }
                if self.peek_char() != Some('-') {
                    return Ok(Token::of(TokenKind::LtBang));
                }
                self.read_char();
                if self.peek_char() != Some('-') {
                    let trailing = self.read_char().map(String::from).unwrap_or_default();
                    return Err(self.error(format!("Invalid character sequence <!-{}", trailing)));
                }
                self.read_char();
                self.scan_comment()
            }
            Some('?') => {
                self.read_char();
                Ok(Token::of(TokenKind::LtQues))
            }
            _ => Ok(Token::of(TokenKind::Lt)),
        }
    }

    fn scan_comment(&mut self) -> Result<Token, ScanError> {
        let mut buff = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error(format!("Unterminated comment: <!--{}", buff)));
                }
                Some('-') => {
                    self.read_char();
                    match self.peek_char() {
                        None => {
                            return Err(self.error(format!("Unterminated comment: <!--{}", buff)));
                        }
                        Some('-') => {
                            self.read_char();
                            if self.peek_char() == Some('>') {
                                self.read_char();
                                return Ok(Token::with_value(TokenKind::Comment, buff));
                            }
                            let trailing = self.read_char().map(String::from).unwrap_or_default();
                            return Err(
                                self.error(format!("Invalid character sequence --{}", trailing))
                            );
                        }
                        Some(_) => buff.push('-'),
                    }
                }
                Some(_) => {
                    if let Some(c) = self.read_char() {
                        buff.push(c);
                    }
                }
            }
        }
    }

    /// Quoted literal. Backslash escapes the next character. End of input
    /// before the closing quote ends the literal with what was read.
    fn scan_literal(&mut self, quote: char) -> Token {
        let mut buff = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => break,
                None => break,
                Some('\\') => {
                    self.read_char();
                    if let Some(escaped) = self.read_char() {
                        buff.push(escaped);
                    }
                }
                Some(c) => {
                    self.read_char();
                    buff.push(c);
                }
            }
        }
        self.read_char();
        Token::with_value(TokenKind::String, buff)
    }

    /// `&name;` and `%name;` references, plus the bare `%` of an entity
    /// declaration. General references are surfaced as identifiers with the
    /// reference literal intact; parameter references expand in place and
    /// yield no token.
    fn scan_reference(&mut self, first: char) -> Result<Option<Token>, ScanError> {
        if first == '%' {
            if let Some(c) = self.peek_char() {
                if c.is_whitespace() {
                    return Ok(Some(Token::of(TokenKind::Percent)));
                }
            }
        }

        let mut buff = String::new();
        buff.push(first);
        if let Some(c) = self.peek_char() {
            if chars::is_identifier_start(c) {
                self.read_char();
                buff.push(c);
                self.read_name_tail(&mut buff);
            }
        }
        if self.read_char() != Some(';') {
            return Err(self.error(format!("Expected ';' after reference {}", buff)));
        }
        buff.push(';');

        if first == '%' {
            self.expand_reference(&buff);
            Ok(None)
        } else {
            Ok(Some(Token::with_value(TokenKind::Identifier, buff)))
        }
    }

    fn read_name_tail(&mut self, buff: &mut String) {
        while let Some(c) = self.peek_char() {
            if !chars::is_name_char(c) {
                break;
            }
            self.read_char();
            buff.push(c);
        }
    }

    fn error(&self, message: impl Into<String>) -> ScanError {
        ScanError::new(
            message,
            self.frame.identifier.clone(),
            self.frame.line,
            self.frame.column,
        )
    }
}
