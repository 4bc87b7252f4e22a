//! Kotlin identifier resolution
//!
//! File names become PascalCase identifiers. After a whole batch is converted,
//! [`IdentifierTable::aggregate`] makes the names unique across directories.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Prefix for names that would not start with a letter
pub const FALLBACK_PREFIX: &str = "Icon";

/// Suffix for names that collide with a Kotlin keyword
pub const RESERVED_SUFFIX: &str = "Icon";

/// Suffix for duplicated names whose file sits at the input root
pub const ROOT_SUFFIX: &str = "Root";

/// Members the icon pack object declares itself
pub const PACK_MEMBERS: &[&str] = &["All", "Count", "GetByName"];

const SEPARATORS: &[char] = &['_', '-', ' ', '.', '@', '#', '(', ')', '[', ']'];

/// Kotlin hard, soft and modifier keywords that are awkward as top-level names
const KOTLIN_KEYWORDS: &[&str] = &[
    "abstract", "actual", "annotation", "as", "break", "by", "catch", "class", "companion",
    "const", "constructor", "continue", "crossinline", "data", "delegate", "do", "dynamic",
    "else", "enum", "expect", "external", "false", "field", "file", "final", "finally", "for",
    "fun", "get", "if", "import", "in", "infix", "init", "inline", "inner", "interface",
    "internal", "is", "lateinit", "noinline", "null", "object", "open", "operator", "out",
    "override", "package", "param", "private", "property", "protected", "public", "receiver",
    "reified", "return", "sealed", "set", "setparam", "super", "suspend", "tailrec", "this",
    "throw", "true", "try", "typealias", "typeof", "val", "value", "var", "vararg", "when",
    "where", "while",
];

/// Uppercase the first character, lowercase the rest
fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn is_reserved(name: &str) -> bool {
    KOTLIN_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// Split on separators, keep alphanumerics and title-case each segment
fn pascal_segments(name: &str) -> Vec<String> {
    name.split(SEPARATORS)
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .map(|segment| title_case(&segment))
        .collect()
}

/// Convert an arbitrary name (usually a file stem) to a safe Kotlin identifier.
///
/// The result is non-empty, starts with an ASCII letter, contains only ASCII
/// alphanumerics and is not a Kotlin keyword.
pub fn to_identifier(name: &str) -> String {
    let segments = pascal_segments(name);
    let mut ident = String::new();

    for (i, segment) in segments.iter().enumerate() {
        if i == 0 && segment.chars().all(|c| c.is_ascii_digit()) {
            ident.push_str(FALLBACK_PREFIX);
        }
        ident.push_str(segment);
    }

    if !ident.starts_with(|c: char| c.is_ascii_alphabetic()) {
        ident.insert_str(0, FALLBACK_PREFIX);
    }
    if is_reserved(&ident) {
        ident.push_str(RESERVED_SUFFIX);
    }
    ident
}

/// Directory segments between the input root and a source file
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Namespace(Vec<String>);

impl Namespace {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Namespace of a file given its path relative to the input root
    pub fn from_relative_path(path: &Path) -> Self {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        Self(
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The immediate parent directory, if any
    pub fn parent_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Directory path mirroring the input layout
    pub fn to_path(&self) -> PathBuf {
        self.0.iter().collect()
    }

    /// Fully qualified Kotlin package under `base`
    pub fn package(&self, base: &str) -> String {
        let mut package = base.to_string();
        for segment in &self.0 {
            let segment = package_segment(segment);
            if segment.is_empty() {
                continue;
            }
            if !package.is_empty() {
                package.push('.');
            }
            package.push_str(&segment);
        }
        package
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Lowercase a directory name into a valid package segment
pub fn package_segment(name: &str) -> String {
    let mut segment: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string();

    if segment.starts_with(|c: char| c.is_ascii_digit()) {
        segment.insert_str(0, "pkg_");
    }
    if is_reserved(&segment) {
        segment.push('_');
    }
    segment
}

/// Where an identifier in the table came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableEntry {
    /// The name the unit itself declares
    pub identifier: String,
    pub namespace: Namespace,
}

/// Batch-wide map from unique identifier to originating unit
#[derive(Clone, Debug, Default)]
pub struct IdentifierTable {
    entries: IndexMap<String, TableEntry>,
}

impl IdentifierTable {
    /// Resolve names across a whole batch, given `(identifier, namespace)` in input order.
    ///
    /// Every member of a duplicated name gets its parent directory appended (or
    /// [`ROOT_SUFFIX`]). Names that clash with [`PACK_MEMBERS`] get [`RESERVED_SUFFIX`].
    /// Names still equal after that get `2`, `3`, ... in input order. The table iterates
    /// in name order.
    pub fn aggregate<'a, I>(units: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Namespace)>,
    {
        let units: Vec<(&str, &Namespace)> = units.into_iter().collect();

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for (name, _) in &units {
            *counts.entry(*name).or_default() += 1;
        }

        let mut entries: IndexMap<String, TableEntry> = IndexMap::with_capacity(units.len());
        for (name, namespace) in &units {
            let mut resolved = name.to_string();
            if counts[name] > 1 {
                let suffix = namespace
                    .parent_name()
                    .map(|parent| pascal_segments(parent).concat())
                    .filter(|suffix| !suffix.is_empty())
                    .unwrap_or_else(|| ROOT_SUFFIX.to_string());
                resolved.push_str(&suffix);
            }
            if PACK_MEMBERS.contains(&resolved.as_str()) {
                resolved.push_str(RESERVED_SUFFIX);
            }

            if entries.contains_key(&resolved) {
                let mut ordinal = 2;
                while entries.contains_key(&format!("{resolved}{ordinal}")) {
                    ordinal += 1;
                }
                resolved = format!("{resolved}{ordinal}");
            }

            if resolved != *name {
                debug!(
                    from = name,
                    to = %resolved,
                    namespace = %namespace,
                    "Renamed icon"
                );
            }
            entries.insert(
                resolved,
                TableEntry {
                    identifier: name.to_string(),
                    namespace: (*namespace).clone(),
                },
            );
        }

        entries.sort_keys();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&TableEntry> {
        self.entries.get(name)
    }

    /// `(unique name, entry)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
