//! Client side of the generation and export endpoints.

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ExportFormat, ExportedFile, InvoiceDraft};

pub use http::HttpInvoiceApi;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("prompt is empty")]
    EmptyPrompt,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("failed to generate invoice template: {0}")]
    Generation(#[source] RequestError),
    #[error("failed to export invoice as {format}: {source}")]
    Export {
        format: ExportFormat,
        #[source]
        source: RequestError,
    },
}

/// The backend that drafts and renders invoices.
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    /// Asks the generator for a draft matching `prompt`. One attempt, no retry.
    async fn generate_template(&self, prompt: &str) -> Result<InvoiceDraft, ApiError>;

    /// Sends the whole invoice to be rendered as `format`.
    async fn export(
        &self,
        format: ExportFormat,
        invoice: &InvoiceDraft,
    ) -> Result<ExportedFile, ApiError>;
}
