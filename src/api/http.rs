use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, Url, header::CONTENT_TYPE};
use tracing::info;

use super::{ApiError, InvoiceApi, RequestError};
use crate::models::{ExportFormat, ExportedFile, InvoiceDraft};

/// [`InvoiceApi`] over HTTP.
pub struct HttpInvoiceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInvoiceApi {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self, prompt: &str) -> Result<Url, RequestError> {
        let url = format!("{}/generate-template", self.base_url);
        Url::parse_with_params(&url, &[("prompt", prompt)]).map_err(|e| RequestError::InvalidUrl {
            reason: e.to_string(),
            url,
        })
    }

    fn export_url(&self, format: ExportFormat) -> Result<Url, RequestError> {
        let url = format!("{}/export", self.base_url);
        Url::parse_with_params(&url, &[("format", format.as_str())]).map_err(|e| {
            RequestError::InvalidUrl {
                reason: e.to_string(),
                url,
            }
        })
    }

    async fn request_draft(&self, prompt: &str) -> Result<InvoiceDraft, RequestError> {
        if prompt.trim().is_empty() {
            return Err(RequestError::EmptyPrompt);
        }

        let url = self.generate_url(prompt)?;
        info!(url = %url, "requesting invoice template");
        let resp = ensure_success(self.client.post(url).send().await?).await?;

        let body = resp.text().await?;
        let draft: InvoiceDraft = serde_json::from_str(&body)?;
        info!(items = draft.items.len(), "received invoice template");
        Ok(draft)
    }

    async fn request_export(
        &self,
        format: ExportFormat,
        invoice: &InvoiceDraft,
    ) -> Result<ExportedFile, RequestError> {
        let url = self.export_url(format)?;
        info!(url = %url, %format, items = invoice.items.len(), "exporting invoice");
        let resp = ensure_success(self.client.post(url).json(invoice).send().await?).await?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| format.default_content_type());
        let bytes = resp.bytes().await?.to_vec();
        info!(%format, bytes = bytes.len(), "export complete");

        Ok(ExportedFile {
            format,
            file_name: format.file_name(&invoice.invoice_number),
            content_type,
            bytes,
        })
    }
}

async fn ensure_success(resp: Response) -> Result<Response, RequestError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RequestError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

#[async_trait]
impl InvoiceApi for HttpInvoiceApi {
    async fn generate_template(&self, prompt: &str) -> Result<InvoiceDraft, ApiError> {
        self.request_draft(prompt).await.map_err(ApiError::Generation)
    }

    async fn export(
        &self,
        format: ExportFormat,
        invoice: &InvoiceDraft,
    ) -> Result<ExportedFile, ApiError> {
        self.request_export(format, invoice)
            .await
            .map_err(|source| ApiError::Export { format, source })
    }
}
