//! Headless versions of the editor's two network actions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::api::InvoiceApi;
use crate::download;
use crate::models::{ExportFormat, InvoiceDraft};

/// Fetches a draft and writes it as pretty JSON to `out`, or to `writer` when
/// no file is given.
pub async fn generate(
    api: &dyn InvoiceApi,
    prompt: &str,
    out: Option<&Path>,
    writer: &mut dyn Write,
) -> Result<InvoiceDraft> {
    let draft = api.generate_template(prompt).await?;
    let json = serde_json::to_string_pretty(&draft)?;

    match out {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote draft");
        }
        None => writeln!(writer, "{}", json)?,
    }
    Ok(draft)
}

/// Reads a draft from disk, exports it and saves the result in `download_dir`.
pub async fn export(
    api: &dyn InvoiceApi,
    input: &Path,
    format: ExportFormat,
    download_dir: &Path,
) -> Result<PathBuf> {
    let draft = load_draft(input)?;
    let file = api.export(format, &draft).await?;
    let path = download::save(download_dir, &file)?;
    Ok(path)
}

pub fn load_draft(path: &Path) -> Result<InvoiceDraft> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let draft = serde_json::from_str(&json)
        .with_context(|| format!("{} is not an invoice draft", path.display()))?;
    Ok(draft)
}

/// One line per item plus the totals, for the terminal.
pub fn summary(draft: &InvoiceDraft) -> String {
    let mut out = String::new();
    for item in &draft.items {
        out.push_str(&format!(
            "- {}: {} x {:.2} = {:.2}\n",
            item.description,
            item.quantity,
            item.unit_price,
            item.line_total()
        ));
    }
    out.push_str(&format!("Subtotal: {:.2}\n", draft.subtotal()));
    if let Some(rate) = draft.tax_rate {
        out.push_str(&format!("Tax ({}%): {:.2}\n", rate, draft.tax_amount()));
    }
    out.push_str(&format!("Total: {:.2}\n", draft.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    #[test]
    fn summary_lists_items_and_totals() {
        let draft = InvoiceDraft {
            items: vec![LineItem {
                description: "Design".into(),
                quantity: 2.0,
                unit_price: 50.0,
                ..Default::default()
            }],
            tax_rate: Some(10.0),
            ..Default::default()
        };
        let text = summary(&draft);
        assert!(text.contains("- Design: 2 x 50.00 = 100.00"));
        assert!(text.contains("Subtotal: 100.00"));
        assert!(text.contains("Tax (10%): 10.00"));
        assert!(text.contains("Total: 110.00"));
    }

    #[test]
    fn load_draft_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        fs::write(&path, "\"not an invoice\"").unwrap();
        let err = load_draft(&path).unwrap_err();
        assert!(err.to_string().contains("is not an invoice draft"));
    }
}
