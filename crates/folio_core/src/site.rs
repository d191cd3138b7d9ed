//! Site data file loading.
//!
//! # Responsibility
//! - Read one JSON document holding the portfolio data and optional
//!   site options.
//!
//! # Invariants
//! - Loading either yields fully validated data or an error; partially
//!   valid documents are rejected as a whole.

use crate::config::SiteOptions;
use crate::model::portfolio::PortfolioData;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Portfolio data plus its site options, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDocument {
    #[serde(flatten)]
    pub data: PortfolioData,
    #[serde(default)]
    pub options: SiteOptions,
}

impl SiteDocument {
    pub fn new(data: PortfolioData, options: SiteOptions) -> Self {
        Self { data, options }
    }
}

/// Site data loading errors.
#[derive(Debug)]
pub enum SiteError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
}

impl Display for SiteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read site data `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid site data: {err}"),
        }
    }
}

impl Error for SiteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub type SiteResult<T> = Result<T, SiteError>;

/// Parses a site document from JSON text.
pub fn parse_site(json: &str) -> SiteResult<SiteDocument> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses the site document at `path`.
pub fn load_site(path: impl AsRef<Path>) -> SiteResult<SiteDocument> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_site(&raw)?;
    info!(
        "event=site_load module=site status=ok path={} projects={} diplomas={}",
        path.display(),
        document.data.projects.len(),
        document.data.diplomas.len()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::{parse_site, SiteError};

    const MINIMAL: &str = r#"{
        "hero": { "name": "Ada Lovelace" },
        "about": { "title": "Sobre mí" },
        "contact": { "title": "Contacto" }
    }"#;

    #[test]
    fn minimal_document_uses_defaults() {
        let document = parse_site(MINIMAL).expect("minimal document");
        assert_eq!(document.data.hero.name, "Ada Lovelace");
        assert!(document.data.projects.is_empty());
        assert!(document.data.footer.legal.is_empty());
        assert_eq!(document.options.lang, "es");
    }

    #[test]
    fn missing_required_section_is_rejected() {
        let err = parse_site(r#"{ "hero": { "name": "Ada" } }"#).unwrap_err();
        assert!(matches!(err, SiteError::Json(_)));
        assert!(err.to_string().contains("about"), "unexpected error: {err}");
    }
}
