//! Core types shared by the Sow Brand tools crates

mod error;

pub use error::*;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Document type discriminator, stored in the `type` column of the library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Quote,
    #[serde(rename = "techpack")]
    #[value(name = "techpack")]
    TechPack,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::TechPack => "techpack",
        }
    }

    /// Screen title in Portuguese
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "Orçamento",
            DocumentKind::TechPack => "Ficha Técnica",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where saved documents live
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file in the local store directory
    #[default]
    Local,
    /// PostgREST-compatible `documents` table
    Remote,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Remote => write!(f, "remote"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_wire_names() {
        assert_eq!(serde_json::to_string(&DocumentKind::Quote).unwrap(), "\"quote\"");
        assert_eq!(
            serde_json::to_string(&DocumentKind::TechPack).unwrap(),
            "\"techpack\""
        );
        let kind: DocumentKind = serde_json::from_str("\"techpack\"").unwrap();
        assert_eq!(kind, DocumentKind::TechPack);
    }

    #[test]
    fn test_validation_flag() {
        assert!(Error::Validation("x".into()).is_validation());
        assert!(!Error::Storage("x".into()).is_validation());
    }
}
