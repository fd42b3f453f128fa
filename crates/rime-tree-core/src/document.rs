//! Decoded documents
//!
//! The tree builder never sees YAML text. A [`DocumentParser`] turns raw text
//! into a [`ParsedNode`], a closed sum of scalar, mapping and sequence nodes
//! that keeps document order.

use crate::{Result, RimeTreeError};
use std::fmt;
use std::path::Path;

/// A decoded scalar, keeping the type the document gave it
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert back to a plain YAML value
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            ScalarValue::Null => serde_yaml::Value::Null,
            ScalarValue::Bool(b) => serde_yaml::Value::Bool(*b),
            ScalarValue::Integer(n) => serde_yaml::Value::Number((*n).into()),
            ScalarValue::Float(f) => serde_yaml::Value::Number((*f).into()),
            ScalarValue::String(s) => serde_yaml::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Integer(n) => write!(f, "{n}"),
            ScalarValue::Float(x) => write!(f, "{}", serde_yaml::Number::from(*x)),
            ScalarValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Integer(n)
    }
}

impl From<i32> for ScalarValue {
    fn from(n: i32) -> Self {
        ScalarValue::Integer(n.into())
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl From<f64> for ScalarValue {
    fn from(x: f64) -> Self {
        ScalarValue::Float(x)
    }
}

/// A decoded document node
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    Scalar(ScalarValue),
    /// Key/value pairs in document order
    Mapping(Vec<(String, ParsedNode)>),
    Sequence(Vec<ParsedNode>),
}

impl From<serde_yaml::Value> for ParsedNode {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => ParsedNode::Scalar(ScalarValue::Null),
            serde_yaml::Value::Bool(b) => ParsedNode::Scalar(ScalarValue::Bool(b)),
            serde_yaml::Value::Number(n) => ParsedNode::Scalar(number_scalar(&n)),
            serde_yaml::Value::String(s) => ParsedNode::Scalar(ScalarValue::String(s)),
            serde_yaml::Value::Sequence(items) => {
                ParsedNode::Sequence(items.into_iter().map(ParsedNode::from).collect())
            }
            serde_yaml::Value::Mapping(map) => ParsedNode::Mapping(
                map.into_iter()
                    .map(|(k, v)| (key_text(k), ParsedNode::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => ParsedNode::from(tagged.value),
        }
    }
}

fn number_scalar(n: &serde_yaml::Number) -> ScalarValue {
    if let Some(i) = n.as_i64() {
        ScalarValue::Integer(i)
    } else {
        // u64 beyond i64::MAX and real floats both land here
        ScalarValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Render a mapping key as text; Rime keys are nearly always strings, but
/// `1: a` or `true: b` are legal YAML
fn key_text(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => key_text(tagged.value),
        complex => serde_yaml::to_string(&complex)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Decodes raw document text into a [`ParsedNode`]
pub trait DocumentParser: Send + Sync {
    /// Parse `text`, read from `path`; `path` is only used for error context
    fn parse(&self, path: &Path, text: &str) -> Result<ParsedNode>;
}

/// YAML documents via `serde_yaml`
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentParser;

impl DocumentParser for YamlDocumentParser {
    fn parse(&self, path: &Path, text: &str) -> Result<ParsedNode> {
        let blank = text.lines().all(|line| {
            let line = line.trim_start();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(ParsedNode::Scalar(ScalarValue::Null));
        }

        let value: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| RimeTreeError::document_syntax(path, e.to_string()))?;
        Ok(ParsedNode::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedNode {
        YamlDocumentParser
            .parse(Path::new("test.yaml"), text)
            .unwrap()
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let node = parse("zeta: 1\nalpha: 2\nmid: 3\n");
        let ParsedNode::Mapping(pairs) = node else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_scalar_types() {
        let node = parse("int: 9\nfloat: 1.5\ntext: '9'\nflag: true\nnothing: ~\n");
        let ParsedNode::Mapping(pairs) = node else {
            panic!("expected mapping");
        };
        assert_eq!(pairs[0].1, ParsedNode::Scalar(ScalarValue::Integer(9)));
        assert_eq!(pairs[1].1, ParsedNode::Scalar(ScalarValue::Float(1.5)));
        assert_eq!(pairs[2].1, ParsedNode::Scalar(ScalarValue::String("9".into())));
        assert_eq!(pairs[3].1, ParsedNode::Scalar(ScalarValue::Bool(true)));
        assert_eq!(pairs[4].1, ParsedNode::Scalar(ScalarValue::Null));
    }

    #[test]
    fn test_non_string_keys_become_text() {
        let node = parse("1: a\ntrue: b\n");
        let ParsedNode::Mapping(pairs) = node else {
            panic!("expected mapping");
        };
        assert_eq!(pairs[0].0, "1");
        assert_eq!(pairs[1].0, "true");
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let node = parse("key: !custom value\n");
        assert_eq!(
            node,
            ParsedNode::Mapping(vec![(
                "key".to_string(),
                ParsedNode::Scalar(ScalarValue::String("value".into()))
            )])
        );
    }

    #[test]
    fn test_empty_document_is_null() {
        assert_eq!(parse(""), ParsedNode::Scalar(ScalarValue::Null));
        assert_eq!(parse("# only a comment\n"), ParsedNode::Scalar(ScalarValue::Null));
    }

    #[test]
    fn test_syntax_error() {
        let err = YamlDocumentParser
            .parse(Path::new("bad.yaml"), "key: [unclosed\n")
            .unwrap_err();
        assert!(matches!(err, RimeTreeError::DocumentSyntax { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(ScalarValue::Integer(9).to_string(), "9");
        assert_eq!(ScalarValue::Float(1.5).to_string(), "1.5");
        assert_eq!(ScalarValue::from("abc").to_string(), "abc");
        assert_eq!(ScalarValue::Null.to_string(), "null");
    }
}
