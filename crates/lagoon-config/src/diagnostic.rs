// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns config loading failures into miette reports.
//!
//! Unknown keys get a "did you mean" hint (Jaro-Winkler against the keys of
//! their own section, then an exact match in any other `LagoonConfig`
//! section). Keys that came from a TOML file are underlined in that file;
//! keys that came from the environment name the `LAGOON_*` variable instead.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::ops::Range;

use figment::error::Kind;
use figment::providers::Serialized;
use figment::{Figment, Provider, Source};
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::LagoonConfig;

/// Jaro-Winkler score below which a key is not offered as a correction.
const SIMILARITY_FLOOR: f64 = 0.75;

/// A TOML document that took part in loading, kept for span lookup.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub name: String,
    pub content: String,
}

impl ConfigSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(lagoon::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        /// Closest key in the same section.
        suggestion: Option<String>,
        help: String,
        #[label("not a lagoon setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(lagoon::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(lagoon::config::missing_key))]
    MissingKey { key: String },

    /// Post-load semantic check failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(lagoon::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(lagoon::config::other))]
    Other(String),
}

/// Explode a figment error (which may hold several) into one diagnostic each.
pub fn figment_to_config_errors(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    let sections = config_sections();
    err.into_iter()
        .map(|error| diagnose(&error, sources, &sections))
        .collect()
}

fn diagnose(
    error: &figment::Error,
    sources: &[ConfigSource],
    sections: &[(String, Vec<String>)],
) -> ConfigError {
    let section = error.path.first().map(String::as_str);
    match &error.kind {
        Kind::UnknownField(key, expected) => {
            let suggestion = closest_key(key, expected);
            let (span, src) = locate(error, sources, section, key);
            ConfigError::UnknownKey {
                key: key.clone(),
                help: unknown_key_help(key, section, suggestion.as_deref(), expected, sections)
                    + &env_hint(error, section, key),
                suggestion,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => {
            let field = error.path.last().map(String::as_str).unwrap_or_default();
            let table = (error.path.len() > 1).then_some(section).flatten();
            let (span, src) = locate(error, sources, table, field);
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span,
                src,
            }
        }
        Kind::MissingField(key) => ConfigError::MissingKey {
            key: key.to_string(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Keys of every `LagoonConfig` section, read off the compiled defaults.
fn config_sections() -> Vec<(String, Vec<String>)> {
    let Ok(data) = Figment::from(Serialized::defaults(LagoonConfig::default())).data() else {
        return Vec::new();
    };
    data.into_values()
        .flatten()
        .filter_map(|(section, value)| Some((section, value.into_dict()?.into_keys().collect())))
        .collect()
}

fn unknown_key_help(
    key: &str,
    section: Option<&str>,
    suggestion: Option<&str>,
    expected: &[&str],
    sections: &[(String, Vec<String>)],
) -> String {
    if let Some(suggestion) = suggestion {
        return format!("did you mean `{suggestion}`?");
    }
    let home = sections
        .iter()
        .find(|(name, keys)| Some(name.as_str()) != section && keys.iter().any(|k| k == key));
    match (home, section) {
        (Some((home, _)), _) => format!("`{key}` belongs in the [{home}] section"),
        (None, Some(section)) => format!("[{section}] accepts: {}", expected.join(", ")),
        (None, None) => format!("sections are: {}", expected.join(", ")),
    }
}

fn from_env(error: &figment::Error) -> bool {
    error
        .metadata
        .as_ref()
        .is_some_and(|m| m.name.contains("environment"))
}

/// Name the environment variable when the key did not come from a file.
fn env_hint(error: &figment::Error, section: Option<&str>, key: &str) -> String {
    if !from_env(error) {
        return String::new();
    }
    let var = match section {
        Some(section) => format!("LAGOON_{section}_{key}"),
        None => format!("LAGOON_{key}"),
    };
    format!(" (set by environment variable {})", var.to_ascii_uppercase())
}

/// Best Jaro-Winkler match at or above [`SIMILARITY_FLOOR`].
pub fn closest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|candidate| (strsim::jaro_winkler(unknown, candidate), *candidate))
        .filter(|(score, _)| *score >= SIMILARITY_FLOOR)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

fn locate(
    error: &figment::Error,
    sources: &[ConfigSource],
    table: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    if from_env(error) {
        return (None, None);
    }
    let Some(Source::File(path)) = error.metadata.as_ref().and_then(|m| m.source.as_ref()) else {
        return inline_fallback(sources, table, key);
    };
    let name = path.display().to_string();
    sources
        .iter()
        .find(|s| s.name == name)
        .and_then(|s| labelled(s, table, key))
        .unwrap_or((None, None))
}

/// String-loaded configs carry no file metadata; a lone source is the culprit.
fn inline_fallback(
    sources: &[ConfigSource],
    table: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    match sources {
        [only] => labelled(only, table, key).unwrap_or((None, None)),
        _ => (None, None),
    }
}

fn labelled(
    source: &ConfigSource,
    table: Option<&str>,
    key: &str,
) -> Option<(Option<SourceSpan>, Option<NamedSource<String>>)> {
    let range = key_range(&source.content, table, key)?;
    Some((
        Some(SourceSpan::from(range)),
        Some(NamedSource::new(&source.name, source.content.clone())),
    ))
}

/// Byte range of `key` inside `[table]`, or of a top-level key or table header
/// when `table` is `None`. The search for a table key stops at the next header.
pub fn key_range(content: &str, table: Option<&str>, key: &str) -> Option<Range<usize>> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let indent = line.len() - line.trim_start().len();
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            let header = header.trim();
            if table.is_none() && header == key {
                let at = start + indent + 1 + line[indent + 1..].find(key)?;
                return Some(at..at + key.len());
            }
            current = Some(header);
            continue;
        }

        let in_scope = match table {
            Some(table) => current == Some(table),
            None => current.is_none(),
        };
        let assigns = trimmed
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if in_scope && assigns {
            let at = start + indent;
            return Some(at..at + key.len());
        }
    }
    None
}

/// Print every diagnostic to stderr, followed by a count.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
    eprintln!("{} configuration problem(s) found", errors.len());
}
