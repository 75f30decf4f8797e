// Template name normalization

/// Generic stand-in for user-defined template arguments
pub const PLACEHOLDER: &str = "T";

const STD_PREFIX: &str = "std::";

/// Normalize an instantiation name for aggregation
///
/// Whitespace around `<`, `>` and `,` is removed. Inside the first
/// template argument list, every argument not in the `std::` namespace is
/// replaced by [`PLACEHOLDER`].
pub fn normalize_template_name(name: &str) -> String {
    let compact = compact_punctuation(name);

    let Some(open) = compact.find('<') else {
        return compact;
    };
    let Some(close) = matching_close(&compact, open) else {
        return compact;
    };

    let inner = &compact[open + 1..close];
    if inner.is_empty() {
        return compact;
    }

    let params: Vec<&str> = split_top_level(inner)
        .into_iter()
        .map(|param| {
            if param.starts_with(STD_PREFIX) {
                param
            } else {
                PLACEHOLDER
            }
        })
        .collect();

    format!(
        "{}<{}>{}",
        &compact[..open],
        params.join(","),
        &compact[close + 1..]
    )
}

/// Standard-library and compiler-internal templates
pub fn is_std_template(name: &str) -> bool {
    let name = name.trim_start();
    name.starts_with(STD_PREFIX) || name.starts_with("__")
}

fn compact_punctuation(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut after_punct = false;

    for c in name.trim().chars() {
        if matches!(c, '<' | '>' | ',') {
            let trimmed = out.trim_end().len();
            out.truncate(trimmed);
            out.push(c);
            after_punct = true;
        } else if c.is_whitespace() {
            if !after_punct {
                out.push(c);
            }
        } else {
            out.push(c);
            after_punct = false;
        }
    }
    out
}

/// Index of the `>` closing the `<` at `open`
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside brackets
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (idx, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
