//! Token definitions for the DTD scanner.
//!
//! One closed enum covers every token the scanner can produce. Parser error
//! messages print the upper-case kind names, so `Display` is part of the
//! public surface here, not a debugging aid.

use std::fmt;

use serde::Serialize;

/// All token kinds a DTD can tokenize into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// `<`
    Lt,
    /// `<!`
    LtBang,
    /// `<?`
    LtQues,
    /// `>`
    Gt,
    /// `?>` folded into one token. Never produced: folding would break
    /// `(foo)?>`, where the `?` is a cardinality. Kept so the kind set is
    /// closed over the wire format.
    QuesGt,
    /// `?`
    Ques,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `+`
    Plus,
    /// `*`
    Asterisk,
    /// `=`
    Equal,
    /// `%` followed by whitespace, marking a parameter-entity declaration.
    Percent,
    /// Quoted literal, either single- or double-quoted.
    String,
    /// A name: identifier start plus name chars, or a `#`-prefixed keyword
    /// such as `#PCDATA`, or an unexpanded general reference `&name;`.
    Identifier,
    /// A name token that does not begin with an identifier-start character.
    Nmtoken,
    /// `<!-- ... -->`, value is the text between the markers.
    Comment,
    /// `<![`
    Conditional,
    /// `]]>`
    EndConditional,
    /// End of all input streams. Produced exactly once.
    Eof,
}

impl TokenKind {
    /// Kinds that carry a lexeme.
    pub fn has_value(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Identifier | TokenKind::Nmtoken | TokenKind::Comment
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Lt => "LT",
            TokenKind::LtBang => "LTBANG",
            TokenKind::LtQues => "LTQUES",
            TokenKind::Gt => "GT",
            TokenKind::QuesGt => "QUESGT",
            TokenKind::Ques => "QUES",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Pipe => "PIPE",
            TokenKind::Plus => "PLUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Equal => "EQUAL",
            TokenKind::Percent => "PERCENT",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Nmtoken => "NMTOKEN",
            TokenKind::Comment => "COMMENT",
            TokenKind::Conditional => "CONDITIONAL",
            TokenKind::EndConditional => "ENDCONDITIONAL",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A scanned token. `value` is `Some` only for kinds that carry a lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
}

impl Token {
    pub fn of(kind: TokenKind) -> Self {
        Token { kind, value: None }
    }

    pub fn with_value(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: Some(value.into()),
        }
    }

    /// Lexeme or empty string; parser keywords compare against this.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({})", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_match_the_wire_vocabulary() {
        assert_eq!(TokenKind::LtBang.to_string(), "LTBANG");
        assert_eq!(TokenKind::EndConditional.to_string(), "ENDCONDITIONAL");
        assert_eq!(TokenKind::Eof.to_string(), "EOF");
    }

    #[test]
    fn token_display_includes_the_lexeme_when_present() {
        let bare = Token::of(TokenKind::Gt);
        assert_eq!(bare.to_string(), "GT");

        let named = Token::with_value(TokenKind::Identifier, "chapter");
        assert_eq!(named.to_string(), "IDENTIFIER(chapter)");
    }

    #[test]
    fn value_carrying_kinds_are_flagged() {
        assert!(TokenKind::String.has_value());
        assert!(TokenKind::Comment.has_value());
        assert!(!TokenKind::Percent.has_value());
        assert!(!TokenKind::Eof.has_value());
    }
}
