use std::{
    fmt::{self, Display, Write},
    iter::Peekable,
    str::CharIndices,
};

/// Positional placeholder syntax understood by a native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `?`, one per occurrence (MySQL).
    QuestionMark,
    /// `$1`, `$2`, ... reused for repeated names (PostgreSQL).
    Dollar,
}

/// A query whose `:name` placeholders were rewritten to positional ones.
///
/// `slots()[i]` is the name bound to the `i`-th positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    original: String,
    sql: String,
    slots: Vec<String>,
}

impl NamedQuery {
    /// Rewrite every `:identifier` appearing outside string literals, quoted
    /// identifiers and comments. `::` and `:=` are kept verbatim.
    pub fn parse(original: impl Into<String>, style: PlaceholderStyle) -> Self {
        let original = original.into();
        let mut sql = String::with_capacity(original.len());
        let mut slots: Vec<String> = Vec::new();
        let mut chars = original.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let next = chars.peek().copied();
            match (c, next) {
                ('\'' | '"' | '`', _) => {
                    sql.push(c);
                    copy_quoted(&mut chars, &mut sql, c, style == PlaceholderStyle::QuestionMark);
                }
                ('-', Some((_, '-'))) => {
                    let start = sql.len();
                    sql.push(c);
                    copy_until(&mut chars, &mut sql, start, "\n");
                }
                ('/', Some((_, '*'))) => {
                    let start = sql.len();
                    sql.push(c);
                    sql.push('*');
                    chars.next();
                    copy_until(&mut chars, &mut sql, start + 2, "*/");
                }
                ('$', _) if style == PlaceholderStyle::Dollar => {
                    if let Some(tag) = dollar_tag(&original[i..]) {
                        sql.push_str(tag);
                        for _ in 1..tag.len() {
                            chars.next();
                        }
                        let start = sql.len();
                        copy_until(&mut chars, &mut sql, start, tag);
                    } else {
                        sql.push(c);
                    }
                }
                (':', Some((_, ':' | '='))) => {
                    sql.push(c);
                    if let Some((_, next)) = chars.next() {
                        sql.push(next);
                    }
                }
                (':', Some((start, first))) if first.is_ascii_alphabetic() || first == '_' => {
                    let mut end = start;
                    while let Some(&(j, v)) = chars.peek() {
                        if !(v.is_ascii_alphanumeric() || v == '_') {
                            break;
                        }
                        end = j + v.len_utf8();
                        chars.next();
                    }
                    let name = &original[start..end];
                    match style {
                        PlaceholderStyle::QuestionMark => {
                            slots.push(name.to_string());
                            sql.push('?');
                        }
                        PlaceholderStyle::Dollar => {
                            let position = match slots.iter().position(|v| v == name) {
                                Some(position) => position,
                                None => {
                                    slots.push(name.to_string());
                                    slots.len() - 1
                                }
                            };
                            let _ = write!(sql, "${}", position + 1);
                        }
                    }
                }
                _ => sql.push(c),
            }
        }
        Self {
            original,
            sql,
            slots,
        }
    }

    /// The query as written by the caller.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The query sent to the native client.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Positional indexes (from 0) that take the value of `name`.
    pub fn positions<'s>(&'s self, name: &'s str) -> impl Iterator<Item = usize> + 's {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, v)| *v == name)
            .map(|(i, _)| i)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|v| v == name)
    }
}

impl Display for NamedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Copy characters until the text written since `start` ends with `terminator` (inclusive).
fn copy_until(chars: &mut Peekable<CharIndices>, out: &mut String, start: usize, terminator: &str) {
    for (_, c) in chars.by_ref() {
        out.push(c);
        if out[start..].ends_with(terminator) {
            break;
        }
    }
}

fn copy_quoted(chars: &mut Peekable<CharIndices>, out: &mut String, quote: char, backslash: bool) {
    let mut escaped = false;
    for (_, c) in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if backslash && c == '\\' && quote != '`' {
            escaped = true;
        } else if c == quote {
            break;
        }
    }
}

/// The opening `$tag$` of a dollar-quoted string at the start of `input`, if any.
fn dollar_tag(input: &str) -> Option<&str> {
    let rest = &input[1..];
    let len = rest
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)?;
    if rest[len..].starts_with('$') && !rest[..len].starts_with(|c: char| c.is_ascii_digit()) {
        Some(&input[..len + 2])
    } else {
        None
    }
}
