pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Like `separated_by` but the callback can fail, the first error stops the iteration.
pub fn try_separated_by<T, F, E>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<(), E>
where
    F: FnMut(&mut String, T) -> Result<(), E>,
{
    let mut first = true;
    for v in values {
        if !first {
            out.push_str(separator);
        }
        first = false;
        f(out, v)?;
    }
    Ok(())
}

/// Longest prefix of `value` not exceeding `max` bytes that ends on a char boundary.
pub fn truncated(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let end = value
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= max)
        .last()
        .unwrap_or(0);
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncated(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
