use std::borrow::Cow;

/// Consume the prefix of `input` matching `predicate` and return it.
pub fn consume_while<'s>(input: &mut &'s str, mut predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len = input
        .char_indices()
        .find(|(_, c)| !predicate(c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let result = &input[..len];
    *input = &input[len..];
    result
}

/// Mask the value of every `password=` segment of a connection string.
pub fn redact_password(value: &str) -> Cow<'_, str> {
    if !value.contains("password=") {
        return Cow::Borrowed(value);
    }
    let (prefix, rest) = value.split_once(':').unwrap_or(("", value));
    let rest = rest
        .split(';')
        .map(|segment| {
            if segment.starts_with("password=") {
                "password=***"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join(";");
    Cow::Owned(if prefix.is_empty() {
        rest
    } else {
        format!("{prefix}:{rest}")
    })
}

/// Longest prefix of `value` not exceeding `len` bytes that ends on a char boundary.
pub fn prefix_within(value: &str, len: usize) -> &str {
    if value.len() <= len {
        return value;
    }
    let mut end = len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::prefix_within(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
