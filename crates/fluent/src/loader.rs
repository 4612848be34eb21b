//! Locale registry with fallback chains.
//!
//! The [`FluentLoader`] owns one [`FluentBundle`] per locale and resolves
//! messages by walking a caller-supplied chain of locales, such as
//! `["fr-CA", "fr", "en"]`.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use icu_locale_core::Locale;
use log::debug;
use walkdir::WalkDir;

use crate::bundle::FluentBundle;
use crate::error::{LoadError, LoadWarning};
use crate::parser::ast::{Message, MessageReference, Pattern, Resource, Term};
use crate::parser::{ParseError, ParseMode, parse, parse_bytes, parse_message_reference};
use crate::resolver::{DEFAULT_MAX_DEPTH, FluentArgs, FormatError, Formatted, Lookup, Scope};

/// Registry of per-locale bundles.
///
/// Loading the same locale twice merges: the later resource wins for every
/// identifier it defines, and the replacement is reported as a
/// [`LoadWarning`].
///
/// # Example
///
/// ```
/// use fluent::{FluentLoader, args};
///
/// let mut loader = FluentLoader::builder()
///     .fallback(vec!["en".to_string()])
///     .build();
///
/// loader.add_resource_str("en", "hello = Hello!\nbye = Bye!\n").unwrap();
/// loader.add_resource_str("fr", "hello = Bonjour !\n").unwrap();
///
/// let hello = loader.format_message(&["fr", "en"], "hello", &args! {}).unwrap();
/// assert_eq!(hello.as_deref(), Some("Bonjour !"));
///
/// // Missing in French, found in English.
/// let bye = loader.format_message(&["fr", "en"], "bye", &args! {}).unwrap();
/// assert_eq!(bye.as_deref(), Some("Bye!"));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct FluentLoader {
    /// Reject malformed entries instead of skipping them.
    #[builder(default)]
    strict: bool,

    /// Limit on nested message and term references while formatting.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Locale chain used when a caller passes an empty chain.
    #[builder(default)]
    fallback: Vec<String>,

    /// Bundles keyed by canonical locale tag.
    #[builder(skip)]
    bundles: HashMap<String, FluentBundle>,
}

impl Default for FluentLoader {
    fn default() -> Self {
        FluentLoader::builder().build()
    }
}

impl FluentLoader {
    /// Create an empty lenient loader.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse `text` and merge it into the bundle for `locale`.
    pub fn add_resource_str(
        &mut self,
        locale: &str,
        text: &str,
    ) -> Result<Vec<LoadWarning>, LoadError> {
        let resource =
            parse(text, self.mode()).map_err(|err| parse_failure(Path::new("<string>"), err))?;
        self.add_resource(locale, resource)
    }

    /// Read and parse a file, and merge it into the bundle for `locale`.
    pub fn add_resource_file(
        &mut self,
        locale: &str,
        path: impl AsRef<Path>,
    ) -> Result<Vec<LoadWarning>, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let resource = parse_bytes(&bytes, self.mode()).map_err(|err| parse_failure(path, err))?;
        debug!("loaded '{}' for '{locale}'", path.display());
        self.add_resource(locale, resource)
    }

    /// Merge an already parsed resource into the bundle for `locale`.
    pub fn add_resource(
        &mut self,
        locale: &str,
        resource: Resource,
    ) -> Result<Vec<LoadWarning>, LoadError> {
        let tag = canonical_locale(locale)?;
        Ok(self
            .bundles
            .entry(tag.clone())
            .or_insert_with(|| FluentBundle::new(tag))
            .add_resource(resource))
    }

    /// Recursively load every `.ftl` file below `dir`.
    ///
    /// The locale of a file is the name of the directory that contains it,
    /// so `locales/en-US/main.ftl` is loaded into `en-US`. Files are visited
    /// in sorted order so that merges are deterministic. Symbolic links to
    /// directories are not followed.
    pub fn add_directory(&mut self, dir: impl AsRef<Path>) -> Result<Vec<LoadWarning>, LoadError> {
        let files = collect_ftl_files(dir.as_ref())?;

        let mut warnings = Vec::new();
        for file in files {
            let Some(locale) = file
                .parent()
                .and_then(Path::file_name)
                .and_then(OsStr::to_str)
            else {
                continue;
            };
            let locale = locale.to_string();
            warnings.extend(self.add_resource_file(&locale, &file)?);
        }
        Ok(warnings)
    }

    fn mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    // =========================================================================
    // Registry Access
    // =========================================================================

    /// The bundle for a locale, if any resource was loaded for it.
    pub fn bundle(&self, locale: &str) -> Option<&FluentBundle> {
        canonical_locale(locale)
            .ok()
            .and_then(|tag| self.bundles.get(&tag))
    }

    /// Loaded locale tags, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// The locale chain used when a caller passes an empty chain.
    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    /// Whether any locale in the chain has the message (or `message.attr`).
    pub fn has_message(&self, locales: &[&str], id: &str) -> bool {
        parse_message_reference(id)
            .ok()
            .is_some_and(|reference| find_pattern(&self.chain(locales), &reference).is_some())
    }

    /// Message identifiers across the chain, deduplicated and sorted.
    pub fn message_ids(&self, locales: &[&str]) -> Vec<String> {
        let mut ids: Vec<String> = self
            .chain(locales)
            .iter()
            .flat_map(|bundle| bundle.message_ids())
            .map(ToString::to_string)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Format a message, or `message.attribute`, from the first locale in the
    /// chain that defines it.
    ///
    /// Returns `Ok(None)` when no locale in the chain has it. Broken
    /// references inside the message still produce a string.
    pub fn format_message(
        &self,
        locales: &[&str],
        id: &str,
        args: &FluentArgs,
    ) -> Result<Option<String>, FormatError> {
        Ok(self
            .format_message_with_errors(locales, id, args)?
            .map(|formatted| formatted.value))
    }

    /// Like [`format_message`](Self::format_message), also returning the
    /// soft errors hit while formatting.
    ///
    /// References inside the message are looked up along the same chain.
    /// Numbers and plural categories use the locale of the bundle that
    /// supplied the message.
    pub fn format_message_with_errors(
        &self,
        locales: &[&str],
        id: &str,
        args: &FluentArgs,
    ) -> Result<Option<Formatted>, FormatError> {
        let Ok(reference) = parse_message_reference(id) else {
            debug!("'{id}' is not a message identifier");
            return Ok(None);
        };
        let chain = self.chain(locales);
        let Some((bundle, pattern)) = find_pattern(&chain, &reference) else {
            return Ok(None);
        };

        let lookup = ChainLookup { bundles: chain };
        let mut scope = Scope::new(bundle.locale(), &lookup).with_max_depth(self.max_depth);
        let value = scope.format_entry(&reference.to_string(), pattern, args)?;
        Ok(Some(Formatted {
            value,
            errors: scope.take_errors(),
        }))
    }

    /// Bundles for a locale chain, in order, skipping locales that are not
    /// loaded or not valid.
    fn chain(&self, locales: &[&str]) -> Vec<&FluentBundle> {
        let requested: Vec<&str> = if locales.is_empty() {
            self.fallback.iter().map(String::as_str).collect()
        } else {
            locales.to_vec()
        };

        let mut chain: Vec<&FluentBundle> = Vec::new();
        for bundle in requested.into_iter().filter_map(|locale| self.bundle(locale)) {
            if !chain.iter().any(|seen| seen.locale() == bundle.locale()) {
                chain.push(bundle);
            }
        }
        chain
    }
}

/// Resolves references by asking each bundle of a chain in turn.
struct ChainLookup<'a> {
    bundles: Vec<&'a FluentBundle>,
}

impl Lookup for ChainLookup<'_> {
    fn message(&self, id: &str) -> Option<&Message> {
        self.bundles.iter().find_map(|bundle| bundle.get_message(id))
    }

    fn term(&self, id: &str) -> Option<&Term> {
        self.bundles.iter().find_map(|bundle| bundle.get_term(id))
    }
}

/// The first bundle in the chain with the referenced pattern.
fn find_pattern<'a>(
    chain: &[&'a FluentBundle],
    reference: &MessageReference,
) -> Option<(&'a FluentBundle, &'a Pattern)> {
    chain.iter().find_map(|&bundle| {
        let message = bundle.get_message(&reference.id)?;
        let pattern = match &reference.attribute {
            Some(name) => &message.attribute(name)?.value,
            None => message.value.as_ref()?,
        };
        Some((bundle, pattern))
    })
}

/// Canonicalize a locale tag, accepting `_` as a separator.
///
/// `en_us` becomes `en-US`.
pub fn canonical_locale(tag: &str) -> Result<String, LoadError> {
    Locale::try_from_str(&tag.replace('_', "-"))
        .map(|locale| locale.to_string())
        .map_err(|_| LoadError::InvalidLocale {
            tag: tag.to_string(),
        })
}

/// Attach the file to a fatal parse error.
fn parse_failure(path: &Path, err: ParseError) -> LoadError {
    let (line, column, message) = match err {
        ParseError::Syntax {
            line,
            column,
            message,
        } => (line, column, message),
        ParseError::UnexpectedEof { line, column } => (line, column, err.to_string()),
        ParseError::InvalidUtf8 => (1, 1, err.to_string()),
    };
    LoadError::Parse {
        path: path.to_path_buf(),
        line,
        column,
        message,
    }
}

/// Every `.ftl` file below `dir`, in file name order.
fn collect_ftl_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| LoadError::Io {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: err.into(),
        })?;
        if !entry.file_type().is_dir() && entry.path().extension().is_some_and(|ext| ext == "ftl")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
