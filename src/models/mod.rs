mod export_format;
mod invoice;
mod line_item;

pub use export_format::{ExportFormat, ExportedFile, UnknownFormat};
pub use invoice::InvoiceDraft;
pub use line_item::{LineItem, coerce_number};
