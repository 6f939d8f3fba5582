//! The live, editable invoice and the edit rules applied to it.

use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{InvoiceDraft, LineItem, coerce_number};

#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Top-level invoice fields the editor can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CompanyName,
    Title,
    BillToName,
    InvoiceNumber,
    CompanyAddress,
    BillToAddress,
    Date,
    DueDate,
    TaxRate,
    Notes,
    ThemeColor,
    LogoUrl,
}

impl Field {
    /// Display order in the editor.
    pub const ALL: [Field; 12] = [
        Field::CompanyName,
        Field::Title,
        Field::BillToName,
        Field::InvoiceNumber,
        Field::CompanyAddress,
        Field::BillToAddress,
        Field::Date,
        Field::DueDate,
        Field::TaxRate,
        Field::Notes,
        Field::ThemeColor,
        Field::LogoUrl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::CompanyName => "company_name",
            Field::Title => "title",
            Field::BillToName => "bill_to_name",
            Field::InvoiceNumber => "invoice_number",
            Field::CompanyAddress => "company_address",
            Field::BillToAddress => "bill_to_address",
            Field::Date => "date",
            Field::DueDate => "due_date",
            Field::TaxRate => "tax_rate",
            Field::Notes => "notes",
            Field::ThemeColor => "theme_color",
            Field::LogoUrl => "logo_url",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::CompanyName => "Company Name",
            Field::Title => "Invoice Title",
            Field::BillToName => "Bill To Name",
            Field::InvoiceNumber => "Invoice Number",
            Field::CompanyAddress => "Company Address",
            Field::BillToAddress => "Bill To Address",
            Field::Date => "Date",
            Field::DueDate => "Due Date",
            Field::TaxRate => "Tax Rate (%)",
            Field::Notes => "Notes",
            Field::ThemeColor => "Theme Color",
            Field::LogoUrl => "Logo URL",
        }
    }
}

impl FromStr for Field {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| DocumentError::UnknownField(s.to_string()))
    }
}

/// Editable columns of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

impl ItemField {
    pub const ALL: [ItemField; 3] = [ItemField::Description, ItemField::Quantity, ItemField::UnitPrice];

    pub fn name(&self) -> &'static str {
        match self {
            ItemField::Description => "description",
            ItemField::Quantity => "quantity",
            ItemField::UnitPrice => "unit_price",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ItemField::Description => ItemField::Quantity,
            ItemField::Quantity => ItemField::UnitPrice,
            ItemField::UnitPrice => ItemField::Description,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            ItemField::Description => ItemField::UnitPrice,
            ItemField::Quantity => ItemField::Description,
            ItemField::UnitPrice => ItemField::Quantity,
        }
    }
}

impl FromStr for ItemField {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| DocumentError::UnknownField(s.to_string()))
    }
}

/// Holds the one invoice being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDocument {
    draft: InvoiceDraft,
}

impl InvoiceDocument {
    pub fn new(draft: InvoiceDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn into_draft(self) -> InvoiceDraft {
        self.draft
    }

    pub fn items(&self) -> &[LineItem] {
        &self.draft.items
    }

    /// Current text of a header field, as the editor shows it.
    pub fn field(&self, field: Field) -> String {
        let d = &self.draft;
        match field {
            Field::CompanyName => d.company_name.clone(),
            Field::Title => d.title.clone(),
            Field::BillToName => d.bill_to_name.clone(),
            Field::InvoiceNumber => d.invoice_number.clone(),
            Field::CompanyAddress => d.company_address.clone(),
            Field::BillToAddress => d.bill_to_address.clone(),
            Field::Date => d.date.clone(),
            Field::DueDate => d.due_date.clone(),
            Field::TaxRate => d.tax_rate.map(|rate| rate.to_string()).unwrap_or_default(),
            Field::Notes => d.notes.clone().unwrap_or_default(),
            Field::ThemeColor => d.theme_color.clone(),
            Field::LogoUrl => d.logo_url.clone().unwrap_or_default(),
        }
    }

    /// Replaces a header field verbatim. Only the tax rate is numeric; an empty
    /// value clears it.
    pub fn set_field(&mut self, field: Field, value: &str) {
        let d = &mut self.draft;
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        match field {
            Field::CompanyName => d.company_name = value.to_string(),
            Field::Title => d.title = value.to_string(),
            Field::BillToName => d.bill_to_name = value.to_string(),
            Field::InvoiceNumber => d.invoice_number = value.to_string(),
            Field::CompanyAddress => d.company_address = value.to_string(),
            Field::BillToAddress => d.bill_to_address = value.to_string(),
            Field::Date => d.date = value.to_string(),
            Field::DueDate => d.due_date = value.to_string(),
            Field::TaxRate => {
                d.tax_rate = (!value.trim().is_empty()).then(|| coerce_number(value));
            }
            Field::Notes => d.notes = optional(value),
            Field::ThemeColor => d.theme_color = value.to_string(),
            Field::LogoUrl => d.logo_url = optional(value),
        }
    }

    /// Replaces one field of the item at `index`. Quantity and unit price are
    /// coerced to numbers. Out-of-range indices are ignored.
    pub fn set_item_field(&mut self, index: usize, field: ItemField, value: &str) {
        let Some(item) = self.draft.items.get_mut(index) else {
            return;
        };
        match field {
            ItemField::Description => item.description = value.to_string(),
            ItemField::Quantity => item.quantity = coerce_number(value),
            ItemField::UnitPrice => item.unit_price = coerce_number(value),
        }
    }

    /// Current text of an item field, or `None` past the end.
    pub fn item_field(&self, index: usize, field: ItemField) -> Option<String> {
        self.draft.items.get(index).map(|item| match field {
            ItemField::Description => item.description.clone(),
            ItemField::Quantity => item.quantity.to_string(),
            ItemField::UnitPrice => item.unit_price.to_string(),
        })
    }

    /// Appends a default item and returns its index.
    pub fn add_item(&mut self) -> usize {
        self.draft.items.push(LineItem::default());
        self.draft.items.len() - 1
    }

    /// Removes the item at `index`, leaving the rest in order. Out-of-range
    /// indices are a no-op.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        (index < self.draft.items.len()).then(|| self.draft.items.remove(index))
    }

    pub fn subtotal(&self) -> f64 {
        self.draft.subtotal()
    }

    pub fn tax_amount(&self) -> f64 {
        self.draft.tax_amount()
    }

    pub fn total(&self) -> f64 {
        self.draft.total()
    }

    /// Hint for date fields that don't hold a `YYYY-MM-DD` date. Never blocks export.
    pub fn date_warning(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::Date => &self.draft.date,
            Field::DueDate => &self.draft.due_date,
            _ => return None,
        };
        if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            None
        } else {
            Some(format!("{} '{}' is not a YYYY-MM-DD date", field.label(), value))
        }
    }
}

impl From<InvoiceDraft> for InvoiceDocument {
    fn from(draft: InvoiceDraft) -> Self {
        Self::new(draft)
    }
}
