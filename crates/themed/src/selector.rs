//! Selector helpers for the `:theme-root` marker.
//!
//! `:theme-root` marks the part of a selector that sits on the element
//! carrying the theme class:
//!
//! ```css
//! :theme-root(*) { color: @theme color; }      /* -> *.mint { .. } */
//! :theme-root.expanded { width: @theme width; } /* -> .mint.expanded { .. } */
//! ```

const THEME_ROOT: &str = ":theme-root";

pub fn has_theme_root(selector: &str) -> bool {
    selector.contains(THEME_ROOT)
}

/// Removes `:theme-root` markers from every branch of a selector list;
/// `:theme-root(X)` is replaced by `X`.
pub fn strip_theme_root(selector: &str) -> String {
    if !has_theme_root(selector) {
        return selector.to_string();
    }

    split_selector_list(selector)
        .iter()
        .map(|branch| strip_marker(branch).trim().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Removes the markers from a single selector, leaving surrounding
/// whitespace in place.
pub fn strip_marker(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;

    while let Some(pos) = rest.find(THEME_ROOT) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + THEME_ROOT.len()..];

        if let Some(inner) = rest.strip_prefix('(') {
            if let Some(close) = matching_paren(inner) {
                out.push_str(&inner[..close]);
                rest = &inner[close + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Splits a selector list on top-level commas. Branches are trimmed and
/// newlines inside them dropped.
pub fn split_selector_list(selector: &str) -> Vec<String> {
    let mut branches = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in selector.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                branches.push(clean_branch(&selector[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    branches.push(clean_branch(&selector[start..]));
    branches
}

fn clean_branch(branch: &str) -> String {
    branch.replace(['\n', '\r'], "").trim().to_string()
}

/// Byte offset of the `)` closing an already opened parenthesis.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
