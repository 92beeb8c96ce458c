//! Scoped custom-property names.
//!
//! With the `modules` option set, generated custom properties are renamed the
//! way CSS modules rename classes, so tokens from different stylesheets do not
//! collide:
//!
//! | `modules` | `--color` becomes |
//! |---|---|
//! | unset | `--color` |
//! | `"[name]-[local]"` for `button.css` | `--button-color` |
//! | `"default"` for `button.css` | `--button-color-1a2b3c` (hash of the stylesheet) |
//! | a function | whatever it returns |
//!
//! Template placeholders: `[local]`, `[name]`, `[ext]`, `[folder]`, `[path]`,
//! `[hash]`, `[hash:<len>]` and `[hash:<hex|base64>:<len>]`. Hashes are md5
//! digests of the local name.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Signature of a naming function: `(local name, file path, stylesheet) -> name`.
pub type ScopedNameFn = dyn Fn(&str, &str, &str) -> String + Send + Sync;

/// How generated custom properties are named.
#[derive(Clone)]
pub enum ScopedName {
    /// A placeholder template, or `default` for `<file>-<local>-<hash>`.
    Template(String),
    Function(Arc<ScopedNameFn>),
}

impl ScopedName {
    pub fn template(template: impl Into<String>) -> Self {
        ScopedName::Template(template.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &str) -> String + Send + Sync + 'static,
    {
        ScopedName::Function(Arc::new(f))
    }
}

impl fmt::Debug for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedName::Template(template) => f.debug_tuple("Template").field(template).finish(),
            ScopedName::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Renames local identifiers for one stylesheet.
pub struct Localizer<'a> {
    scoped: Option<&'a ScopedName>,
    path: Option<&'a Path>,
    css: &'a str,
}

impl<'a> Localizer<'a> {
    pub fn new(scoped: Option<&'a ScopedName>, path: Option<&'a Path>, css: &'a str) -> Self {
        Self { scoped, path, css }
    }

    pub fn localize(&self, name: &str) -> String {
        match self.scoped {
            None => name.to_string(),
            Some(ScopedName::Template(template)) if template == "default" => {
                let file = self
                    .path
                    .and_then(|p| p.file_stem())
                    .and_then(|s| s.to_str())
                    .unwrap_or("default");
                let hash = format!("{:x}", md5::compute(self.css));
                format!("{}-{}-{}", file, name, &hash[..6])
            }
            Some(ScopedName::Template(template)) => localize_identifier(template, name, self.path),
            Some(ScopedName::Function(f)) => {
                let path = self
                    .path
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                f(name, &path, self.css)
            }
        }
    }
}

/// Expands a naming template for `name` and turns the result into a valid
/// identifier.
pub fn localize_identifier(template: &str, name: &str, path: Option<&Path>) -> String {
    let interpolated = interpolate(template, name, path);
    let sanitized = sanitize(&interpolated);
    replace_local(&escape(&sanitized), name)
}

fn interpolate(template: &str, name: &str, path: Option<&Path>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let placeholder = &after[..close];
        match expand(placeholder, name, path) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('[');
                out.push_str(placeholder);
                out.push(']');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Expands one placeholder, or `None` to leave it in place.
fn expand(placeholder: &str, name: &str, path: Option<&Path>) -> Option<String> {
    let file_part = |f: fn(&Path) -> Option<&std::ffi::OsStr>, default: &str| {
        path.and_then(f)
            .and_then(|s| s.to_str())
            .unwrap_or(default)
            .to_string()
    };

    match placeholder {
        "name" => Some(file_part(Path::file_stem, "file")),
        "ext" => Some(file_part(Path::extension, "bin")),
        "folder" => Some(
            path.and_then(Path::parent)
                .and_then(Path::file_name)
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        ),
        "path" => Some(
            path.and_then(Path::parent)
                .map(|p| format!("{}/", p.display()))
                .unwrap_or_default(),
        ),
        _ => expand_hash(placeholder, name),
    }
}

fn expand_hash(placeholder: &str, name: &str) -> Option<String> {
    let mut parts = placeholder.split(':');
    if parts.next()? != "hash" {
        return None;
    }

    let (digest_type, length) = match (parts.next(), parts.next()) {
        (None, _) => ("hex", None),
        (Some(len), None) => ("hex", Some(len.parse::<usize>().ok()?)),
        (Some(kind), Some(len)) => (kind, Some(len.parse::<usize>().ok()?)),
    };

    let digest = md5::compute(name);
    let encoded = match digest_type {
        "hex" => format!("{:x}", digest),
        "base64" => URL_SAFE_NO_PAD.encode(digest.0),
        _ => return None,
    };

    Some(match length {
        Some(len) if len < encoded.len() => encoded[..len].to_string(),
        _ => encoded,
    })
}

fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 1);

    let bytes = value.as_bytes();
    let needs_prefix = match bytes {
        [b'-', b'-', ..] => true,
        [b'-', d, ..] if d.is_ascii_digit() => true,
        [d, ..] if d.is_ascii_digit() => true,
        _ => false,
    };
    if needs_prefix {
        out.push('_');
    }

    let mut leading_dots = true;
    for c in value.chars() {
        if leading_dots && c == '.' {
            continue;
        }
        if leading_dots {
            if value.starts_with('.') {
                out.push('-');
            }
            leading_dots = false;
        }

        let reserved = matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*');
        let control = c.is_control();
        if reserved || control || c == '.' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    if leading_dots && value.starts_with('.') {
        out.push('-');
    }

    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) > 0x7E => {
                out.push_str(&format!("\\{:X} ", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

fn replace_local(value: &str, name: &str) -> String {
    const LOCAL: &str = "[local]";
    let mut out = String::with_capacity(value.len() + name.len());
    let mut rest = value;

    while let Some(pos) = rest.to_ascii_lowercase().find(LOCAL) {
        out.push_str(&rest[..pos]);
        out.push_str(name);
        rest = &rest[pos + LOCAL.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> &'static Path {
        Path::new("/app/foo.css")
    }

    #[test]
    fn test_local_is_unchanged() {
        assert_eq!(
            localize_identifier("[local]", "background", Some(file())),
            "background"
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            localize_identifier("[name]-[local]", "background", Some(file())),
            "foo-background"
        );
    }

    #[test]
    fn test_folder() {
        assert_eq!(
            localize_identifier("[folder]-[name]-[local]", "background", Some(file())),
            "app-foo-background"
        );
    }

    #[test]
    fn test_ext_and_defaults() {
        assert_eq!(localize_identifier("[name]_[ext]", "x", Some(file())), "foo_css");
        assert_eq!(localize_identifier("[name]_[ext]", "x", None), "file_bin");
    }

    #[test]
    fn test_hash_digests() {
        assert_eq!(
            localize_identifier("h[hash:8]", "background", Some(file())),
            "hd229bbf3"
        );
        assert_eq!(
            localize_identifier("x[hash:base64:7]", "background", Some(file())),
            "x0im78x6"
        );
        assert_eq!(
            localize_identifier("x[hash:base64:7]", "background", None),
            "x0im78x6"
        );
    }

    #[test]
    fn test_leading_digit_is_prefixed() {
        assert_eq!(localize_identifier("1-[local]", "a", None), "_1-a");
        assert_eq!(localize_identifier("--[local]", "a", None), "_--a");
    }

    #[test]
    fn test_reserved_characters() {
        assert_eq!(localize_identifier("a:b.[local]", "c", None), "a-b-c");
        assert_eq!(localize_identifier("..[local]", "c", None), "-c");
    }

    #[test]
    fn test_local_is_case_insensitive() {
        assert_eq!(localize_identifier("[LOCAL]-x", "c", None), "c-x");
    }

    #[test]
    fn test_default_template_hashes_stylesheet() {
        let scoped = ScopedName::template("default");
        let localizer = Localizer::new(Some(&scoped), Some(file()), ".a { color: red; }");
        let name = localizer.localize("color");

        let hash = format!("{:x}", md5::compute(".a { color: red; }"));
        assert_eq!(name, format!("foo-color-{}", &hash[..6]));
    }

    #[test]
    fn test_default_template_without_path() {
        let scoped = ScopedName::template("default");
        let localizer = Localizer::new(Some(&scoped), None, "");
        assert!(localizer.localize("color").starts_with("default-color-"));
    }

    #[test]
    fn test_function() {
        let scoped = ScopedName::function(|name, path, _| format!("{}-{}", path.len(), name));
        let localizer = Localizer::new(Some(&scoped), Some(file()), "");
        assert_eq!(localizer.localize("color"), "12-color");
    }

    #[test]
    fn test_unset_is_identity() {
        let localizer = Localizer::new(None, Some(file()), "");
        assert_eq!(localizer.localize("colors-purple"), "colors-purple");
    }
}
