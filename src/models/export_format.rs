use std::fmt;
use std::str::FromStr;

use mime::Mime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File formats the export endpoint can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xml,
    Csv,
    Json,
}

#[derive(Debug, Error)]
#[error("unknown export format '{0}' (expected pdf, xml, csv or json)")]
pub struct UnknownFormat(pub String);

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Pdf, Self::Xml, Self::Csv, Self::Json];

    /// Value of the `format` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Suggested download name. Only the PDF name depends on the invoice number.
    pub fn file_name(&self, invoice_number: &str) -> String {
        match self {
            Self::Pdf => format!("invoice_{}.pdf", invoice_number),
            Self::Xml => "invoice.xml".to_string(),
            Self::Csv => "invoice_items.csv".to_string(),
            Self::Json => "invoice.json".to_string(),
        }
    }

    /// Used when the backend does not say what it sent.
    pub fn default_content_type(&self) -> Mime {
        match self {
            Self::Pdf => mime::APPLICATION_PDF,
            Self::Xml => "application/xml".parse().unwrap_or(mime::TEXT_XML),
            Self::Csv => mime::TEXT_CSV,
            Self::Json => mime::APPLICATION_JSON,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A rendered invoice as returned by the export endpoint.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}
