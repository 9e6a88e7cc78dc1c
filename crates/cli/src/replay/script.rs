// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay script parsing
//!
//! One directive per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! define echoKeys 2
//! span request
//! @request set user:1 "Ada Lovelace"
//! @request pipeline
//! incr visits
//! exec
//! finish request
//! direct get user:1
//! ```

use crate::error::ReplayError;
use kvt_core::{KeyCount, Value};

/// A parsed directive with its 1-based line number
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub directive: Directive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Register a script
    Define { name: String, keys: KeyCount },
    /// Open a caller-held span, optionally under another
    Span {
        label: String,
        parent: Option<String>,
    },
    /// Finish a caller-held span
    Finish { label: String },
    /// Traced call; also opens a batch when the command is `pipeline`
    Call {
        context: Option<String>,
        name: String,
        args: Vec<Value>,
    },
    /// Untraced call on the raw client
    Direct { name: String, args: Vec<Value> },
    /// Execute the open batch
    Exec,
}

impl Directive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Define { .. } => "define",
            Directive::Span { .. } => "span",
            Directive::Finish { .. } => "finish",
            Directive::Call { .. } => "call",
            Directive::Direct { .. } => "direct",
            Directive::Exec => "exec",
        }
    }
}

/// Parse a whole script
pub fn parse(source: &str) -> Result<Vec<Line>, ReplayError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let tokens = tokenize(text).map_err(|message| ReplayError::Syntax {
            line: number,
            message,
        })?;
        if tokens.is_empty() {
            continue;
        }
        let directive = parse_directive(tokens).map_err(|message| ReplayError::Syntax {
            line: number,
            message,
        })?;
        lines.push(Line { number, directive });
    }
    Ok(lines)
}

/// A whitespace-separated word; quoted words are always strings
#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    quoted: bool,
}

impl Token {
    fn into_value(self) -> Value {
        if !self.quoted {
            if let Ok(n) = self.text.parse::<i64>() {
                return Value::Int(n);
            }
        }
        Value::Str(self.text)
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' {
            break;
        }
        if c == '"' {
            chars.next();
            let mut word = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => word.push('\n'),
                        Some(escaped) => word.push(escaped),
                        None => return Err("unterminated quoted string".to_string()),
                    },
                    Some(ch) => word.push(ch),
                    None => return Err("unterminated quoted string".to_string()),
                }
            }
            tokens.push(Token {
                text: word,
                quoted: true,
            });
            continue;
        }
        let mut word = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            word.push(ch);
            chars.next();
        }
        tokens.push(Token {
            text: word,
            quoted: false,
        });
    }
    Ok(tokens)
}

fn parse_directive(tokens: Vec<Token>) -> Result<Directive, String> {
    let mut tokens = tokens.into_iter();
    let Some(first) = tokens.next() else {
        return Err("empty directive".to_string());
    };

    // `@label cmd ...` routes a traced call under a caller-held span
    if let Some(label) = first.text.strip_prefix('@').filter(|_| !first.quoted) {
        if label.is_empty() {
            return Err("missing span label after '@'".to_string());
        }
        let name = tokens
            .next()
            .ok_or_else(|| format!("missing command after '@{}'", label))?;
        return Ok(Directive::Call {
            context: Some(label.to_string()),
            name: name.text,
            args: tokens.map(Token::into_value).collect(),
        });
    }

    let rest: Vec<Token> = tokens.collect();
    match (first.quoted, first.text.as_str()) {
        (false, "define") => {
            let [name, keys] = exactly::<2>(rest, "define NAME KEYS")?;
            let keys = keys.text.parse::<KeyCount>()?;
            Ok(Directive::Define {
                name: name.text,
                keys,
            })
        }
        (false, "span") => match rest.len() {
            1 | 2 => {
                let mut rest = rest.into_iter();
                let label = rest.next().map(|t| t.text).unwrap_or_default();
                Ok(Directive::Span {
                    label,
                    parent: rest.next().map(|t| t.text),
                })
            }
            _ => Err("usage: span LABEL [PARENT]".to_string()),
        },
        (false, "finish") => {
            let [label] = exactly::<1>(rest, "finish LABEL")?;
            Ok(Directive::Finish { label: label.text })
        }
        (false, "direct") => {
            let mut rest = rest.into_iter();
            let name = rest
                .next()
                .ok_or_else(|| "usage: direct CMD [ARGS...]".to_string())?;
            Ok(Directive::Direct {
                name: name.text,
                args: rest.map(Token::into_value).collect(),
            })
        }
        (false, "exec") if rest.is_empty() => Ok(Directive::Exec),
        (false, "exec") => Err("exec takes no arguments".to_string()),
        _ => Ok(Directive::Call {
            context: None,
            name: first.text,
            args: rest.into_iter().map(Token::into_value).collect(),
        }),
    }
}

fn exactly<const N: usize>(tokens: Vec<Token>, usage: &str) -> Result<[Token; N], String> {
    tokens
        .try_into()
        .map_err(|_| format!("usage: {}", usage))
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
