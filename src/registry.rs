//! type names and the signature notation

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::Peekable;
use std::str::CharIndices;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::flag::{Atom, Tag};
use crate::pattern::Pattern;

/// What names mean in a signature: every atom and class by its name, plus
/// whatever got registered. Constructed once and passed where needed.
#[derive(Debug, Clone)]
pub struct Registry {
    names: IndexMap<String, Pattern>,
}

impl Default for Registry {
    fn default() -> Self {
        let atoms = Atom::ALL
            .iter()
            .map(|a| (a.name().to_string(), Pattern::atom(*a)));
        let classes = Tag::CLASSES
            .iter()
            .map(|(n, t)| (n.to_string(), Pattern::atom(*t)));
        Registry {
            names: atoms.chain(classes).collect(),
        }
    }
}

impl Registry {
    /// replaces any previous meaning of `name`
    pub fn register(&mut self, name: &str, pattern: Pattern) {
        self.names.insert(name.to_string(), pattern);
    }

    pub fn lookup(&self, name: &str) -> Option<&Pattern> {
        self.names.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Parses eg. `Int → [Int] → Int`, `(Int, String)`, `{x ∷ Float}` or
    /// `Maybe Int`; lowercase names are generic.
    pub fn parse(&self, signature: &str) -> Result<Pattern> {
        let mut parser = Parser {
            reg: self,
            tokens: Lexer::new(signature).peekable(),
        };
        let r = parser.sig().and_then(|p| match parser.tokens.next() {
            Some(Token(_, TokenKind::End)) | None => Ok(p),
            Some(Token(at, found)) => Err(Error::Unexpected {
                found: found.to_string(),
                expected: "end of signature",
                at,
            }),
        });
        if let Err(err) = &r {
            debug!(signature, %err, "signature rejected");
        }
        r
    }
}

// lexing {{{
#[derive(PartialEq, Debug, Clone)]
enum TokenKind {
    Unknown(char),
    Name(String),
    Arrow,
    Bar,
    Comma,
    Has,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            TokenKind::Unknown(c) => write!(f, "character '{c}'"),
            TokenKind::Name(n) => write!(f, "name '{n}'"),
            TokenKind::Arrow => write!(f, "arrow"),
            TokenKind::Bar => write!(f, "operator '|'"),
            TokenKind::Comma => write!(f, "operator ','"),
            TokenKind::Has => write!(f, "operator '∷'"),
            TokenKind::OpenParen => write!(f, "open '('"),
            TokenKind::CloseParen => write!(f, "close ')'"),
            TokenKind::OpenBracket => write!(f, "open '['"),
            TokenKind::CloseBracket => write!(f, "close ']'"),
            TokenKind::OpenBrace => write!(f, "open '{{'"),
            TokenKind::CloseBrace => write!(f, "close '}}'"),
            TokenKind::End => write!(f, "end of signature"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
struct Token(usize, TokenKind);

/// yields `End` once the input is consumed, then stops
struct Lexer<'a> {
    stream: Peekable<CharIndices<'a>>,
    len: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            stream: source.char_indices().peekable(),
            len: source.len(),
            done: false,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        use TokenKind::*;

        if self.done {
            return None;
        }
        let Some((at, c)) = self.stream.find(|c| !c.1.is_whitespace()) else {
            self.done = true;
            return Some(Token(self.len, End));
        };

        let mut follows = |want: char| {
            self.stream.next_if(|&(_, c)| c == want).is_some()
        };
        let kind = match c {
            '→' | '⇒' => Arrow,
            '-' | '=' if follows('>') => Arrow,
            ':' if follows(':') => Has,
            '∷' => Has,
            '|' => Bar,
            ',' => Comma,
            '(' => OpenParen,
            ')' => CloseParen,
            '[' => OpenBracket,
            ']' => CloseBracket,
            '{' => OpenBrace,
            '}' => CloseBrace,
            c if c.is_alphanumeric() || '_' == c => {
                let mut name = String::from(c);
                while let Some((_, c)) = self
                    .stream
                    .next_if(|&(_, c)| c.is_alphanumeric() || '_' == c)
                {
                    name.push(c);
                }
                Name(name)
            }
            c => Unknown(c),
        };
        Some(Token(at, kind))
    }
}
// }}}

// parsing {{{
struct Parser<'a> {
    reg: &'a Registry,
    tokens: Peekable<Lexer<'a>>,
}

/// names that take the term following them as their element
const CONTAINERS: &[Atom] = &[Atom::List, Atom::Vector, Atom::Just, Atom::Either, Atom::Or];

impl Parser<'_> {
    fn peek(&mut self) -> &TokenKind {
        match self.tokens.peek() {
            Some(Token(_, k)) => k,
            None => &TokenKind::End,
        }
    }

    fn advance(&mut self) -> Token {
        self.tokens
            .next()
            .unwrap_or(Token(usize::MAX, TokenKind::End))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<()> {
        match self.advance() {
            Token(_, k) if k == kind => Ok(()),
            Token(_, TokenKind::End) => Err(Error::UnexpectedEnd { expected }),
            Token(at, found) => Err(Error::Unexpected {
                found: found.to_string(),
                expected,
                at,
            }),
        }
    }

    /// `term (→ term)*`, all but the last being the arguments
    fn sig(&mut self) -> Result<Pattern> {
        let mut terms = vec![self.term()?];
        while let TokenKind::Arrow = self.peek() {
            self.advance();
            terms.push(self.term()?);
        }
        let ret = terms.pop().unwrap_or_else(Pattern::generic);
        Ok(if terms.is_empty() {
            ret
        } else {
            Pattern::function(terms, ret)
        })
    }

    fn term(&mut self) -> Result<Pattern> {
        match self.advance() {
            Token(at, TokenKind::Name(name)) => self.named(at, name),

            Token(_, TokenKind::OpenBracket) => {
                let elem = self.sig()?;
                self.expect(TokenKind::CloseBracket, "close ']'")?;
                Ok(Pattern::list(elem))
            }

            Token(_, TokenKind::OpenParen) => {
                let mut items = vec![self.sig()?];
                while let TokenKind::Comma = self.peek() {
                    self.advance();
                    items.push(self.sig()?);
                }
                self.expect(TokenKind::CloseParen, "close ')'")?;
                Ok(match items.len() {
                    1 => items.remove(0),
                    2 => {
                        let right = items.remove(1);
                        Pattern::pair(items.remove(0), right)
                    }
                    _ => Pattern::tuple(items),
                })
            }

            Token(_, TokenKind::OpenBrace) => {
                let mut fields = Vec::new();
                loop {
                    let key = match self.advance() {
                        Token(_, TokenKind::Name(key)) => key,
                        Token(_, TokenKind::End) => {
                            return Err(Error::UnexpectedEnd {
                                expected: "field name",
                            })
                        }
                        Token(at, found) => {
                            return Err(Error::Unexpected {
                                found: found.to_string(),
                                expected: "field name",
                                at,
                            })
                        }
                    };
                    self.expect(TokenKind::Has, "operator '∷'")?;
                    fields.push((key, self.sig()?));
                    match self.peek() {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        _ => break,
                    }
                }
                self.expect(TokenKind::CloseBrace, "close '}'")?;
                Ok(Pattern::record(
                    fields.iter().map(|(k, p)| (k.as_str(), p.clone())),
                ))
            }

            Token(_, TokenKind::End) => Err(Error::UnexpectedEnd { expected: "a type" }),
            Token(at, found) => Err(Error::Unexpected {
                found: found.to_string(),
                expected: "a type",
                at,
            }),
        }
    }

    fn named(&mut self, at: usize, name: String) -> Result<Pattern> {
        if name.starts_with(|c: char| c.is_lowercase() || '_' == c) {
            return Ok(Pattern::generic());
        }
        let found = self
            .reg
            .lookup(&name)
            .cloned()
            .ok_or(Error::UnknownType { name, at })?;

        if let Pattern::Atom(tag) = found {
            let container = matches!(tag, Tag::Atom(a) if CONTAINERS.contains(&a))
                || Tag::MAYBE == tag
                || Tag::ALTERNATE == tag;
            if container && self.starts_term() {
                return Ok(Pattern::wrapped(tag, self.term()?));
            }
            let mut tag = tag;
            while let TokenKind::Bar = self.peek() {
                self.advance();
                tag = tag | self.union_member()?;
            }
            return Ok(Pattern::Atom(tag));
        }
        Ok(found)
    }

    fn union_member(&mut self) -> Result<Tag> {
        match self.advance() {
            Token(at, TokenKind::Name(name)) => match self.reg.lookup(&name) {
                Some(Pattern::Atom(t)) => Ok(*t),
                Some(_) => Err(Error::Unexpected {
                    found: format!("composed type '{name}'"),
                    expected: "a tag in a union",
                    at,
                }),
                None => Err(Error::UnknownType { name, at }),
            },
            Token(_, TokenKind::End) => Err(Error::UnexpectedEnd {
                expected: "a tag in a union",
            }),
            Token(at, found) => Err(Error::Unexpected {
                found: found.to_string(),
                expected: "a tag in a union",
                at,
            }),
        }
    }

    fn starts_term(&mut self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Name(_) | TokenKind::OpenBracket | TokenKind::OpenParen | TokenKind::OpenBrace
        )
    }
}
// }}}
