use std::time::Duration;

use invoice_drafter::api::HttpInvoiceApi;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Client pointed at the mock server's `/api` root.
pub fn api_for(server: &MockServer) -> HttpInvoiceApi {
    HttpInvoiceApi::new(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("client builds")
}

/// Draft as the generator returns it for a design job.
pub fn designer_draft() -> Value {
    json!({
        "title": "Invoice",
        "company_name": "Acme",
        "company_address": "123 Main St",
        "bill_to_name": "Client Co",
        "bill_to_address": "456 Client Ave",
        "invoice_number": "INV-001",
        "date": "2024-03-01",
        "due_date": "2024-03-31",
        "items": [
            {"description": "Design", "quantity": 2, "unit_price": 50}
        ],
        "notes": "Thank you for your business.",
        "tax_rate": null,
        "logo_url": null,
        "theme_color": "#3498db"
    })
}
