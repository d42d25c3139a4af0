//! Path expressions: where a value lives inside a JSON document.
//!
//! The ontology stores each path as a literal sequence, for example
//! `('Parameterisation', 'Cell', 'Density [kg.m-3]')` or
//! `['Electrolyte', 'species', 0]`. Strings are object keys, non-negative
//! integers are array indices.

use std::fmt;

use nom::{
    branch::alt,
    character::complete::{anychar, char, digit1, multispace0, none_of},
    combinator::{all_consuming, map, map_res, opt},
    multi::{many0, separated_list0},
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};
use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::PathError;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathComponent {
    /// Object member key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl PathComponent {
    /// The index this component addresses in an array, if any.
    ///
    /// Keys made only of ASCII digits are coerced, matching how paths
    /// written as strings still address list items.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathComponent::Index(i) => Some(*i),
            PathComponent::Key(key) => {
                let key = key.trim();
                if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
                    key.parse().ok()
                } else {
                    None
                }
            }
        }
    }
}

impl From<&str> for PathComponent {
    fn from(key: &str) -> Self {
        PathComponent::Key(key.to_owned())
    }
}

impl From<usize> for PathComponent {
    fn from(index: usize) -> Self {
        PathComponent::Index(index)
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathComponent::Key(key) => f.write_str(key),
            PathComponent::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An ordered sequence of keys and indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathExpression(Vec<PathComponent>);

impl PathExpression {
    /// Creates a path from its components.
    #[must_use]
    pub fn new(components: Vec<PathComponent>) -> Self {
        Self(components)
    }

    /// Parses a path literal.
    ///
    /// Whitespace around string components is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Syntax`] if `text` is not a parenthesized or
    /// bracketed sequence of quoted strings and non-negative integers.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        match literal(text) {
            Ok((_, components)) => Ok(Self(components)),
            Err(err) => {
                let reason = match err {
                    nom::Err::Error(e) | nom::Err::Failure(e) if e.input.is_empty() => {
                        "unexpected end of literal".to_owned()
                    }
                    nom::Err::Error(e) | nom::Err::Failure(e) => {
                        let near: String = e.input.chars().take(16).collect();
                        format!("unexpected input near `{near}`")
                    }
                    nom::Err::Incomplete(_) => "unexpected end of literal".to_owned(),
                };
                Err(PathError::Syntax {
                    text: text.to_owned(),
                    reason,
                })
            }
        }
    }

    /// Parses a path literal, recording a warning and returning an empty
    /// path if the literal is malformed.
    pub fn parse_lenient(text: &str, diagnostics: &mut Diagnostics) -> Self {
        match Self::parse(text) {
            Ok(path) => path,
            Err(err) => {
                diagnostics.push(Diagnostic::warn("path", err.to_string()));
                Self::default()
            }
        }
    }

    /// The components of this path.
    #[must_use]
    pub fn components(&self) -> &[PathComponent] {
        &self.0
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any component is the object key `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0
            .iter()
            .any(|c| matches!(c, PathComponent::Key(k) if k.trim() == key))
    }

    /// The first component, if it is an object key.
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        match self.0.first() {
            Some(PathComponent::Key(key)) => Some(key.trim()),
            _ => None,
        }
    }

    /// Returns true if `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &PathExpression) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns this path extended by one component.
    #[must_use]
    pub fn child(&self, component: PathComponent) -> Self {
        let mut components = self.0.clone();
        components.push(component);
        Self(components)
    }

    /// Serializes the path as a tuple literal that [`parse`](Self::parse) accepts.
    #[must_use]
    pub fn to_literal(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|c| match c {
                PathComponent::Key(key) => {
                    format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
                }
                PathComponent::Index(i) => i.to_string(),
            })
            .collect();
        if parts.len() == 1 {
            format!("({},)", parts[0])
        } else {
            format!("({})", parts.join(", "))
        }
    }

    /// Reads the value at this path, or `None` if any step is missing,
    /// out of range or applied to the wrong type.
    #[must_use]
    pub fn get<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        let mut node = document;
        for component in &self.0 {
            node = match (node, component) {
                (Value::Object(map), PathComponent::Key(key)) => map.get(key.trim())?,
                (Value::Array(items), c) => items.get(c.as_index()?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Writes `value` at this path.
    ///
    /// Missing object members are created, arrays are padded with empty
    /// objects to reach an index, and `null` nodes along the way are
    /// replaced by the container the next component needs (an array before
    /// an index, an object before a key). The final component's value is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] for an empty path, or
    /// [`PathError::TypeConflict`] when a component meets a scalar or the
    /// wrong kind of container.
    pub fn set(&self, document: &mut Value, value: Value) -> Result<(), PathError> {
        let Some((last, parents)) = self.0.split_last() else {
            return Err(PathError::EmptyPath);
        };
        let mut node = document;
        for component in parents {
            node = descend(node, component).map_err(|found| self.conflict(component, found))?;
        }
        prepare_container(node, last);
        match node {
            Value::Object(map) => match last {
                PathComponent::Key(key) => {
                    map.insert(key.trim().to_owned(), value);
                    Ok(())
                }
                PathComponent::Index(_) => Err(self.conflict(last, "an object")),
            },
            Value::Array(items) => {
                let index = last.as_index().ok_or_else(|| self.conflict(last, "an array"))?;
                if index < items.len() {
                    items[index] = value;
                } else {
                    items.resize_with(index, empty_object);
                    items.push(value);
                }
                Ok(())
            }
            other => Err(self.conflict(last, json_type(other))),
        }
    }

    fn conflict(&self, component: &PathComponent, found: &'static str) -> PathError {
        PathError::TypeConflict {
            path: self.to_string(),
            component: component.to_string(),
            found,
        }
    }
}

impl fmt::Display for PathExpression {
    /// Dotted form with bracketed indices, e.g. `Electrolyte.species[0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            match component {
                PathComponent::Key(key) if i == 0 => f.write_str(key)?,
                PathComponent::Key(key) => write!(f, ".{key}")?,
                PathComponent::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<Vec<PathComponent>> for PathExpression {
    fn from(components: Vec<PathComponent>) -> Self {
        Self(components)
    }
}

impl FromIterator<PathComponent> for PathExpression {
    fn from_iter<T: IntoIterator<Item = PathComponent>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn prepare_container(node: &mut Value, next: &PathComponent) {
    if node.is_null() {
        *node = match next {
            PathComponent::Index(_) => Value::Array(Vec::new()),
            PathComponent::Key(_) => empty_object(),
        };
    }
}

fn descend<'v>(node: &'v mut Value, component: &PathComponent) -> Result<&'v mut Value, &'static str> {
    prepare_container(node, component);
    match node {
        Value::Object(map) => match component {
            PathComponent::Key(key) => Ok(map.entry(key.trim().to_owned()).or_insert(Value::Null)),
            PathComponent::Index(_) => Err("an object"),
        },
        Value::Array(items) => {
            let index = component.as_index().ok_or("an array")?;
            if items.len() <= index {
                items.resize_with(index, empty_object);
                items.push(Value::Null);
            }
            Ok(&mut items[index])
        }
        other => Err(json_type(other)),
    }
}

// --- literal grammar -------------------------------------------------------

fn literal(input: &str) -> IResult<&str, Vec<PathComponent>> {
    all_consuming(delimited(
        multispace0,
        alt((
            delimited(char('('), components, preceded(multispace0, char(')'))),
            delimited(char('['), components, preceded(multispace0, char(']'))),
        )),
        multispace0,
    ))
    .parse(input)
}

fn components(input: &str) -> IResult<&str, Vec<PathComponent>> {
    terminated(
        separated_list0(
            delimited(multispace0, char(','), multispace0),
            preceded(multispace0, component),
        ),
        opt(preceded(multispace0, char(','))),
    )
    .parse(input)
}

fn component(input: &str) -> IResult<&str, PathComponent> {
    alt((
        map(single_quoted, key_component),
        map(double_quoted, key_component),
        map_res(digit1, |digits: &str| digits.parse::<usize>().map(PathComponent::Index)),
    ))
    .parse(input)
}

fn key_component(key: String) -> PathComponent {
    PathComponent::Key(key.trim().to_owned())
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    quoted('\'', input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    quoted('"', input)
}

fn quoted(quote: char, input: &str) -> IResult<&str, String> {
    let plain = if quote == '\'' { "\\'" } else { "\\\"" };
    delimited(
        char(quote),
        many0(alt((
            preceded(char('\\'), anychar).map(unescape),
            none_of(plain),
        ))),
        char(quote),
    )
    .map(|chars: Vec<char>| chars.into_iter().collect())
    .parse(input)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}
