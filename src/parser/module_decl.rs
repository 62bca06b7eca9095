//! Heuristic extractor for `@Module({...})` declarations.
//!
//! This is structural extraction, not a grammar: the decorator's argument
//! span is located, each of the `imports`, `exports`, `providers` and
//! `controllers` bracketed lists is cut out with depth-aware bracket
//! matching, and every top-level entry is reduced to the identifier it
//! references. Anything that cannot be understood degrades to an empty list.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::types::{dedup, ModuleNode, ModuleSource};

/// Marker that identifies a module document.
pub const MODULE_MARKER: &str = "@Module(";

/// Import tokens that never name a real module.
const IMPORT_DENY_LIST: &[&str] = &[
    "Module",
    "forwardRef",
    "forRoot",
    "forRootAsync",
    "forFeature",
    "forFeatureAsync",
    "register",
    "registerAsync",
    "forChild",
];

const PROVIDER_SUFFIXES: &[&str] = &[
    "Service",
    "Repository",
    "Handler",
    "Guard",
    "Interceptor",
    "Provider",
    "Factory",
    "Resolver",
    "Gateway",
    "Strategy",
    "Pipe",
    "Filter",
];

const CONTROLLER_SUFFIXES: &[&str] = &["Controller", "Resolver"];

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(imports|exports|providers|controllers)\s*:\s*\[").expect("valid field regex")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid class regex")
});

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*").expect("valid identifier regex"));

static USE_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\buse(?:Class|Existing)\s*:\s*([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("valid useClass regex")
});

static PROVIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bprovide\s*:\s*([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid provide regex")
});

/// Turns the raw text of one module document into a [`ModuleNode`].
///
/// Implementations must never fail hard: a document without a module
/// declaration yields `None`, and unparseable fields yield empty lists.
pub trait ModuleExtractor {
    /// Extracts the module declared in `source`, if any.
    fn extract(&self, source: &ModuleSource) -> Option<ModuleNode>;
}

/// Bracket-matching extractor for decorator-style module declarations.
///
/// # Example
///
/// ```
/// use modscope::parser::{DecoratorExtractor, ModuleExtractor, ModuleSource};
///
/// let source = ModuleSource::new(
///     "src/app.module.ts",
///     "@Module({ imports: [UsersModule, TypeOrmModule.forRoot()], providers: [AppService] })\n\
///      export class AppModule {}",
/// );
///
/// let node = DecoratorExtractor.extract(&source).unwrap();
/// assert_eq!(node.name, "AppModule");
/// assert_eq!(node.imports, vec!["UsersModule", "TypeOrmModule"]);
/// assert_eq!(node.providers, vec!["AppService"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratorExtractor;

impl ModuleExtractor for DecoratorExtractor {
    fn extract(&self, source: &ModuleSource) -> Option<ModuleNode> {
        let text = strip_comments(&source.text);
        let marker = text.find(MODULE_MARKER)?;
        let args_start = marker + MODULE_MARKER.len();
        let args_end = match_close(&text, marker + MODULE_MARKER.len() - 1).unwrap_or(text.len());
        let args = &text[args_start..args_end];

        let name = CLASS_RE
            .captures(&text[args_end..])
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| name_from_path(&source.path));

        if name.is_empty() {
            debug!(path = %source.path, "module declaration without a usable name");
            return None;
        }

        let fields = FieldLists::collect(args);

        let imports = dedup(
            fields
                .imports
                .iter()
                .filter_map(|entry| normalize_entry(entry))
                .filter(|ident| !IMPORT_DENY_LIST.contains(&ident.as_str()))
                .filter(|ident| {
                    if *ident == name {
                        debug!(module = %name, "dropping self-import");
                        false
                    } else {
                        true
                    }
                }),
        );

        let exports = dedup(
            fields
                .exports
                .iter()
                .filter_map(|entry| normalize_entry(entry))
                .filter(|ident| ident != "Module"),
        );

        let providers = dedup(
            fields
                .providers
                .iter()
                .filter_map(|entry| provider_name(entry))
                .filter(|ident| has_suffix(ident, PROVIDER_SUFFIXES)),
        );

        let controllers = dedup(
            fields
                .controllers
                .iter()
                .filter_map(|entry| normalize_entry(entry))
                .filter(|ident| has_suffix(ident, CONTROLLER_SUFFIXES)),
        );

        let node = ModuleNode {
            name,
            source_path: source.path.clone(),
            imports,
            exports,
            providers,
            controllers,
        };

        debug!(
            module = %node.name,
            imports = node.imports.len(),
            providers = node.providers.len(),
            controllers = node.controllers.len(),
            "extracted module"
        );

        Some(node)
    }
}

/// Extracts a module with the default [`DecoratorExtractor`].
pub fn extract_module(source: &ModuleSource) -> Option<ModuleNode> {
    DecoratorExtractor.extract(source)
}

/// Top-level entries of the four field lists.
#[derive(Debug, Default)]
struct FieldLists<'a> {
    imports: Vec<&'a str>,
    exports: Vec<&'a str>,
    providers: Vec<&'a str>,
    controllers: Vec<&'a str>,
}

impl<'a> FieldLists<'a> {
    /// Finds the first top-level occurrence of every field.
    ///
    /// Markers nested inside an already captured list (e.g. the `imports`
    /// of a `forRoot({...})` call) or inside string literals are ignored.
    fn collect(args: &'a str) -> Self {
        let masked = blank_strings(args);
        let mut lists = Self::default();
        let mut seen: Vec<&str> = Vec::new();
        let mut consumed: Vec<Range<usize>> = Vec::new();

        for caps in FIELD_RE.captures_iter(&masked) {
            let (Some(whole), Some(field)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if seen.contains(&field.as_str())
                || consumed.iter().any(|r| r.contains(&whole.start()))
            {
                continue;
            }
            seen.push(field.as_str());

            let open = whole.end() - 1;
            let Some(close) = match_close(args, open) else {
                // Unterminated list: the field stays empty.
                continue;
            };
            consumed.push(open..close);

            let entries = split_top_level(&args[open + 1..close]);
            match field.as_str() {
                "imports" => lists.imports = entries,
                "exports" => lists.exports = entries,
                "providers" => lists.providers = entries,
                "controllers" => lists.controllers = entries,
                _ => {}
            }
        }

        lists
    }
}

/// Returns the index of the bracket closing the one at `open`.
fn match_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'[' | b'(' | b'{' => depth += 1,
            b']' | b')' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Splits a list body on commas that are not nested in brackets or strings.
fn split_top_level(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'[' | b'(' | b'{' => depth += 1,
            b']' | b')' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                entries.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    entries.push(body[start..].trim());

    entries.retain(|e| !e.is_empty());
    entries
}

/// Returns the index just past the string literal starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Blanks out the contents of string literals, keeping the quotes and every
/// byte offset.
fn blank_strings(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\'' | b'"' | b'`') {
            let end = skip_string(bytes, i).min(bytes.len());
            let inner_end = if end > i + 1 && bytes[end - 1] == bytes[i] {
                end - 1
            } else {
                end
            };
            out[i + 1..inner_end].fill(b' ');
            i = end;
        } else {
            i += 1;
        }
    }

    // Whole multi-byte sequences are replaced, so the buffer is still valid UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Blanks out `//` and `/* */` comments, leaving string literals intact.
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                let end = skip_string(bytes, i).min(bytes.len());
                out.extend_from_slice(&bytes[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..]
                    .find("*/")
                    .map(|p| i + 2 + p + 2)
                    .unwrap_or(bytes.len());
                out.extend(bytes[i..end].iter().map(|&b| if b == b'\n' { b'\n' } else { b' ' }));
                i = end;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    // Only ASCII bytes were replaced, so the buffer is still valid UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Reduces a list entry to the identifier it references.
///
/// `forwardRef(() => X)` becomes `X`, `X.forRoot({...})` becomes `X`,
/// spreads and literals yield `None`.
fn normalize_entry(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.starts_with("...") {
        return None;
    }

    if entry.starts_with("forwardRef") {
        let target = &entry[entry.find("=>")? + 2..];
        let target = target.trim().trim_end_matches(')').trim();
        return normalize_entry(target);
    }

    IDENT_RE.find(entry).map(|m| m.as_str().to_string())
}

/// Provider entries may be bare classes or `{ provide, useClass }` literals.
fn provider_name(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.starts_with('{') {
        return USE_CLASS_RE
            .captures(entry)
            .or_else(|| PROVIDE_RE.captures(entry))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }
    normalize_entry(entry)
}

fn has_suffix(ident: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|s| ident.len() > s.len() && ident.ends_with(s))
}

/// `src/users/users.module.ts` -> `users`
fn name_from_path(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(|f| f.split('.').next())
        .unwrap_or_default()
        .to_string()
}
