use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use super::line_item::{LineItem, coerce_number};

/// The editable invoice. Generated drafts deserialize straight into it and
/// exports serialize it back out whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDraft {
    pub title: String,
    pub company_name: String,
    pub company_address: String,
    pub bill_to_name: String,
    pub bill_to_address: String,
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    /// Percentage, e.g. `8.5` for 8.5%.
    #[serde(deserialize_with = "lenient_rate")]
    pub tax_rate: Option<f64>,
    pub logo_url: Option<String>,
    pub theme_color: String,
    /// Fields the generator returned that this client does not edit.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvoiceDraft {
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn tax_amount(&self) -> f64 {
        self.tax_rate
            .map(|rate| self.subtotal() * rate / 100.0)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }
}

fn lenient_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(coerce_number(&s))),
        other => Err(de::Error::custom(format!("expected a tax rate, got {other}"))),
    }
}
