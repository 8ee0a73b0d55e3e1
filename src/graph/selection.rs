// Field selections: a parser for `{ field(arg: value) { sub } }` documents
// and the query-shape inspector that decides whether a fetch is needed

use serde_json::{Map, Number, Value};

use crate::error::{ProxyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Mutation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub args: Map<String, Value>,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operation: Operation,
    pub selection: Selection,
}

/// True unless every requested field is one the caller already holds.
pub fn needs_fetch<'a>(requested: impl IntoIterator<Item = &'a str>, identifying: &[&str]) -> bool {
    requested.into_iter().any(|name| !identifying.contains(&name))
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl Field {
    /// Key under which this field's value is emitted
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Non-null argument value
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    pub fn arg_str(&self, name: &str) -> Result<Option<String>> {
        match self.arg(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ProxyError::invalid(format!(
                "Argument '{}' of '{}' must be a string, got {}",
                name, self.name, other
            ))),
        }
    }

    pub fn require_str(&self, name: &str) -> Result<String> {
        self.arg_str(name)?
            .ok_or_else(|| ProxyError::invalid(format!("Missing argument '{}' for '{}'", name, self.name)))
    }

    pub fn arg_u32(&self, name: &str) -> Result<Option<u32>> {
        match self.arg(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    ProxyError::invalid(format!(
                        "Argument '{}' of '{}' must be a non-negative integer, got {}",
                        name, self.name, value
                    ))
                }),
        }
    }

    pub fn require_u32(&self, name: &str) -> Result<u32> {
        self.arg_u32(name)?
            .ok_or_else(|| ProxyError::invalid(format!("Missing argument '{}' for '{}'", name, self.name)))
    }

    pub fn arg_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.arg(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ProxyError::invalid(format!(
                "Argument '{}' of '{}' must be a boolean, got {}",
                name, self.name, other
            ))),
        }
    }
}

/// Parse a document. A bare selection is a query; a leading `mutation`
/// keyword selects the mutation root.
pub fn parse_document(source: &str) -> Result<Document> {
    let mut parser = Parser::new(source);
    parser.skip_ignored();

    let operation = match parser.peek_name().as_deref() {
        Some("query") => {
            parser.name()?;
            Operation::Query
        }
        Some("mutation") => {
            parser.name()?;
            Operation::Mutation
        }
        _ => Operation::Query,
    };
    parser.skip_ignored();

    let selection = parser.selection()?;
    parser.skip_ignored();
    if !parser.at_end() {
        return Err(parser.error("unexpected input after the selection"));
    }
    Ok(Document { operation, selection })
}

/// Parse a bare `{ ... }` selection
pub fn parse_selection(source: &str) -> Result<Selection> {
    let document = parse_document(source)?;
    Ok(document.selection)
}

/// Deepest nesting of selections and argument values a document may use
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0, depth: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ProxyError {
        ProxyError::Parse {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("selection nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_ignored();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn peek_name(&self) -> Option<String> {
        let name: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        starts_ok.then_some(name)
    }

    fn name(&mut self) -> Result<String> {
        self.skip_ignored();
        let name = self.peek_name().ok_or_else(|| self.error("expected a name"))?;
        self.pos += name.len();
        Ok(name)
    }

    fn selection(&mut self) -> Result<Selection> {
        self.expect('{')?;
        self.descend()?;
        let mut fields = Vec::new();
        loop {
            self.skip_ignored();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(_) => fields.push(self.field()?),
                None => return Err(self.error("unterminated selection")),
            }
        }
        if fields.is_empty() {
            return Err(self.error("empty selection"));
        }
        self.ascend();
        Ok(Selection { fields })
    }

    fn field(&mut self) -> Result<Field> {
        let mut name = self.name()?;
        let mut alias = None;

        self.skip_ignored();
        if self.peek() == Some(':') {
            self.bump();
            alias = Some(name);
            name = self.name()?;
            self.skip_ignored();
        }

        let mut args = Map::new();
        if self.peek() == Some('(') {
            self.bump();
            loop {
                self.skip_ignored();
                if self.peek() == Some(')') {
                    self.bump();
                    break;
                }
                let arg_name = self.name()?;
                self.expect(':')?;
                let value = self.value()?;
                args.insert(arg_name, value);
            }
            self.skip_ignored();
        }

        let selection = if self.peek() == Some('{') {
            self.selection()?
        } else {
            Selection::default()
        };

        Ok(Field {
            alias,
            name,
            args,
            selection,
        })
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_ignored();
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('[') => {
                self.bump();
                self.descend()?;
                let mut items = Vec::new();
                loop {
                    self.skip_ignored();
                    if self.peek() == Some(']') {
                        self.bump();
                        break;
                    }
                    items.push(self.value()?);
                }
                self.ascend();
                Ok(Value::Array(items))
            }
            Some('{') => {
                self.bump();
                self.descend()?;
                let mut map = Map::new();
                loop {
                    self.skip_ignored();
                    if self.peek() == Some('}') {
                        self.bump();
                        break;
                    }
                    let key = if self.peek() == Some('"') { self.string()? } else { self.name()? };
                    self.expect(':')?;
                    map.insert(key, self.value()?);
                }
                self.ascend();
                Ok(Value::Object(map))
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(_) => {
                let word = self.name()?;
                Ok(match word.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    _ => Value::String(word),
                })
            }
            None => Err(self.error("expected a value")),
        }
    }

    fn string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('u') => out.push(self.unicode_escape()?),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    /// Four hex digits after `\u`; a surrogate pair continues with a second `\uXXXX`
    fn unicode_escape(&mut self) -> Result<char> {
        let high = self.hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("invalid unicode escape"));
        }
        if !self.rest().starts_with("\\u") {
            return Err(self.error("unpaired surrogate in unicode escape"));
        }
        self.pos += 2;
        let low = self.hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error("unpaired surrogate in unicode escape"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn hex4(&mut self) -> Result<u32> {
        let digits = self.rest().get(..4).filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(self.error("expected four hex digits in unicode escape"));
        };
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E')
        {
            self.bump();
        }
        let text = &self.source[start..self.pos];
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number '{}'", text)))
    }
}
