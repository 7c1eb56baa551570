//! Parser for shard files.
//!
//! Two stages: tokens become a [`Value`] tree, then the tree is read as a
//! list of `[key, [label, target...]]` entries.

use super::lexer::{Lexer, Pos, Token};
use crate::entry::{IndexEntry, Target, decode_entities};
use crate::error::ParseError;
use std::collections::HashSet;

/// A literal value in a shard file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(i64),
    Bool(bool),
    Null,
    List(Vec<Value>),
}

impl Value {
    fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness of a generator link flag.
    fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Number(n) => Some(*n != 0),
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Deepest array nesting accepted; generator output never exceeds 4.
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    shard: &'a str,
    tokens: Vec<(Token, Pos)>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(shard: &'a str, input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(shard, input).tokenize()?;
        Ok(Self {
            shard,
            tokens,
            position: 0,
            depth: 0,
        })
    }

    fn current(&self) -> &(Token, Pos) {
        // tokenize() always ends with Eof, and we never advance past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().0.clone();
        if token != Token::Eof {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current().0 == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {}", expected.describe())))
        }
    }

    fn unexpected(&self, context: &str) -> ParseError {
        let (token, pos) = self.current();
        ParseError::Syntax {
            shard: self.shard.to_string(),
            line: pos.line,
            column: pos.column,
            message: format!("{}, found {}", context, token.describe()),
        }
    }

    /// document := [ "var" ident "=" ] array [ ";" ] EOF
    fn parse_document(&mut self) -> Result<Vec<Value>, ParseError> {
        if self.current().0 == Token::Ident("var".to_string()) {
            self.advance();
            if !matches!(self.current().0, Token::Ident(_)) {
                return Err(self.unexpected("expected variable name"));
            }
            self.advance();
            self.expect(Token::Equals)?;
        }

        if self.current().0 != Token::LeftBracket {
            return Err(self.unexpected("expected '['"));
        }
        let items = self.parse_list()?;

        if self.current().0 == Token::Semicolon {
            self.advance();
        }
        if self.current().0 != Token::Eof {
            return Err(self.unexpected("expected end of input"));
        }
        Ok(items)
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.current().0.clone() {
            Token::Str(s) => {
                self.advance();
                Ok(Value::Str(s))
            }
            Token::Number(n) => {
                self.advance();
                Ok(Value::Number(n))
            }
            Token::Ident(name) => {
                let value = match name.as_str() {
                    "null" | "undefined" => Value::Null,
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => return Err(self.unexpected("expected a value")),
                };
                self.advance();
                Ok(value)
            }
            Token::LeftBracket => Ok(Value::List(self.parse_list()?)),
            _ => Err(self.unexpected("expected a value")),
        }
    }

    /// list := "[" [ value ( "," value )* [ "," ] ] "]"
    fn parse_list(&mut self) -> Result<Vec<Value>, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.unexpected(&format!("arrays nested deeper than {}", MAX_DEPTH)));
        }
        self.expect(Token::LeftBracket)?;
        self.depth += 1;
        let mut items = Vec::new();
        loop {
            if self.current().0 == Token::RightBracket {
                self.advance();
                self.depth -= 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            match self.current().0 {
                Token::Comma => {
                    self.advance();
                }
                Token::RightBracket => {}
                _ => return Err(self.unexpected("expected ',' or ']'")),
            }
        }
    }
}

/// Parse a shard source into its top-level list of values.
pub fn parse_values(shard: &str, input: &str) -> Result<Vec<Value>, ParseError> {
    Parser::new(shard, input)?.parse_document()
}

/// Parse a shard source into index entries.
///
/// Accepted entry shapes:
/// - `[key, [label, url]]`
/// - `[key, [label, [[name, url], ...]]]`
/// - `[key, [label, [url, flag, scope], [url, flag, scope], ...]]`
pub fn parse_entries(shard: &str, input: &str) -> Result<Vec<IndexEntry>, ParseError> {
    let values = parse_values(shard, input)?;
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut entries = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        let entry = read_entry(shard, index, value)?;
        if !seen.insert((entry.key.clone(), entry.label.clone())) {
            return Err(ParseError::DuplicateKey {
                shard: shard.to_string(),
                key: entry.key,
                label: entry.label,
            });
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn read_entry(shard: &str, index: usize, value: &Value) -> Result<IndexEntry, ParseError> {
    let missing = |field| ParseError::MissingField {
        shard: shard.to_string(),
        entry: index,
        field,
    };

    let fields = value.as_list().ok_or_else(|| missing("key"))?;
    let key = fields
        .first()
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| missing("key"))?
        .to_ascii_lowercase();

    let body = fields.get(1).and_then(Value::as_list).ok_or_else(|| missing("label"))?;
    let label = body
        .first()
        .and_then(Value::as_str)
        .map(decode_entities)
        .ok_or_else(|| missing("label"))?;

    let raws = &body[1..];
    let mut targets = Vec::new();
    for raw in raws {
        read_targets(raw, &label, raws.len(), &mut targets).ok_or_else(|| missing("target"))?;
    }

    if targets.is_empty() {
        return Err(ParseError::EmptyTargets {
            shard: shard.to_string(),
            key,
        });
    }

    Ok(IndexEntry {
        key,
        label,
        targets,
    })
}

/// Append the targets described by one raw target value; `None` if it is malformed.
fn read_targets(
    raw: &Value,
    label: &str,
    sibling_count: usize,
    out: &mut Vec<Target>,
) -> Option<()> {
    match raw {
        Value::Str(url) => {
            out.push(Target::new(label, url.as_str()));
            Some(())
        }
        Value::List(items) => {
            if let Some(target) = read_link(items, label, sibling_count) {
                out.push(target);
                return Some(());
            }
            if let Some(target) = read_pair(items) {
                out.push(target);
                return Some(());
            }
            if !items.is_empty() && items.iter().all(|i| i.as_list().is_some()) {
                for item in items {
                    out.push(read_pair(item.as_list()?)?);
                }
                return Some(());
            }
            None
        }
        _ => None,
    }
}

/// `[url, flag, scope]` as written by the generator.
///
/// With a single target the scope is the enclosing namespace or class and
/// the label is appended; with several, each scope is already the full name.
fn read_link(items: &[Value], label: &str, sibling_count: usize) -> Option<Target> {
    let url = items.first()?.as_str()?;
    let local = items.get(1)?.as_flag()?;
    let scope = match items.get(2) {
        Some(Value::Str(s)) => decode_entities(s),
        Some(Value::Null) | None => String::new(),
        Some(_) => return None,
    };

    let qualified_name = if scope.is_empty() {
        label.to_string()
    } else if sibling_count == 1 {
        format!("{}::{}", scope, label)
    } else {
        scope
    };

    Some(Target {
        qualified_name,
        url: url.to_string(),
        local,
    })
}

/// `[qualifiedName, url]`.
fn read_pair(items: &[Value]) -> Option<Target> {
    match items {
        [Value::Str(name), Value::Str(url)] => Some(Target::new(decode_entities(name), url.as_str())),
        _ => None,
    }
}
