//! Block-style YAML writer with per-scalar quoting control.
//!
//! Output conventions:
//! - mappings keep insertion order;
//! - two-space indent, and sequence items under a key are indented one level
//!   (`key:\n  - item`) rather than flush with the key;
//! - empty collections are written in flow style (`[]`, `{}`);
//! - [`YamlNode::SingleQuoted`] is always written as `'...'`, while
//!   [`YamlNode::Str`] is plain unless YAML would read it back as something
//!   other than a string.
//!
//! The same tree serializes through serde, which is how the JSON rendering
//! is produced.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

const INDENT: usize = 2;

/// An ordered YAML document tree
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNode {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    SingleQuoted(String),
    Seq(Vec<YamlNode>),
    Map(Vec<(String, YamlNode)>),
}

impl YamlNode {
    /// Mapping from `(key, value)` pairs, order preserved
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, YamlNode)>) -> Self {
        YamlNode::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn str(value: impl Into<String>) -> Self {
        YamlNode::Str(value.into())
    }

    /// Sequence of plain strings
    pub fn str_seq(values: &[String]) -> Self {
        YamlNode::Seq(values.iter().cloned().map(YamlNode::Str).collect())
    }
}

impl Serialize for YamlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YamlNode::Bool(b) => serializer.serialize_bool(*b),
            YamlNode::Int(i) => serializer.serialize_i64(*i),
            YamlNode::Float(f) => serializer.serialize_f64(*f),
            YamlNode::Str(s) | YamlNode::SingleQuoted(s) => serializer.serialize_str(s),
            YamlNode::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            YamlNode::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Render a document. A top-level mapping is written without braces; any
/// other root is written as a single node.
pub fn to_yaml_string(node: &YamlNode) -> String {
    let mut out = String::new();
    match node {
        YamlNode::Map(entries) if !entries.is_empty() => write_map_entries(&mut out, entries, 0, false),
        YamlNode::Seq(items) if !items.is_empty() => write_seq_items(&mut out, items, 0),
        other => {
            out.push_str(&inline_node(other));
            out.push('\n');
        }
    }
    out
}

/// Write `key: value` lines at `indent`. With `inline_first`, the first key
/// continues the current line (it follows a `- ` sequence marker).
fn write_map_entries(out: &mut String, entries: &[(String, YamlNode)], indent: usize, inline_first: bool) {
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 || !inline_first {
            push_indent(out, indent);
        }
        out.push_str(&format_scalar(key));
        out.push(':');

        match value {
            YamlNode::Map(children) if !children.is_empty() => {
                out.push('\n');
                write_map_entries(out, children, indent + INDENT, false);
            }
            YamlNode::Seq(items) if !items.is_empty() => {
                out.push('\n');
                write_seq_items(out, items, indent + INDENT);
            }
            other => {
                out.push(' ');
                out.push_str(&inline_node(other));
                out.push('\n');
            }
        }
    }
}

fn write_seq_items(out: &mut String, items: &[YamlNode], indent: usize) {
    for item in items {
        push_indent(out, indent);
        out.push('-');

        match item {
            YamlNode::Map(entries) if !entries.is_empty() => {
                out.push(' ');
                write_map_entries(out, entries, indent + INDENT, true);
            }
            YamlNode::Seq(nested) if !nested.is_empty() => {
                out.push('\n');
                write_seq_items(out, nested, indent + INDENT);
            }
            other => {
                out.push(' ');
                out.push_str(&inline_node(other));
                out.push('\n');
            }
        }
    }
}

/// Scalars and empty collections, which fit on one line
fn inline_node(node: &YamlNode) -> String {
    match node {
        YamlNode::Bool(b) => b.to_string(),
        YamlNode::Int(i) => i.to_string(),
        YamlNode::Float(f) => format_float(*f),
        YamlNode::Str(s) => format_scalar(s),
        YamlNode::SingleQuoted(s) => {
            if s.chars().any(char::is_control) {
                double_quoted(s)
            } else {
                single_quoted(s)
            }
        }
        YamlNode::Seq(_) => "[]".to_string(),
        YamlNode::Map(_) => "{}".to_string(),
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        let inf = if f > 0.0 { ".inf" } else { "-.inf" };
        inf.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Plain when safe, otherwise quoted
fn format_scalar(s: &str) -> String {
    if s.chars().any(char::is_control) {
        double_quoted(s)
    } else if needs_quotes(s) {
        single_quoted(s)
    } else {
        s.to_string()
    }
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Would a plain scalar be misread, or fail to parse?
fn needs_quotes(s: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    const RESERVED: &[&str] = &[
        "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
    ];

    let Some(first) = s.chars().next() else {
        return true;
    };

    if s.trim() != s
        || INDICATORS.contains(&first)
        || s.ends_with(':')
        || s.contains(": ")
        || s.contains(" #")
        || RESERVED.iter().any(|word| word.eq_ignore_ascii_case(s))
    {
        return true;
    }

    // Numbers, dates and times all start with a digit or a dot-digit
    first.is_ascii_digit()
        || (first == '+' && s.len() > 1)
        || (first == '.' && s[1..].starts_with(|c: char| c.is_ascii_digit() || c.is_ascii_alphabetic()))
}
