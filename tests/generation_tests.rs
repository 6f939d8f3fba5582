mod common;

use std::time::Duration;

use invoice_drafter::api::{ApiError, HttpInvoiceApi, InvoiceApi, RequestError};
use invoice_drafter::document::{InvoiceDocument, ItemField};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_for, designer_draft};

#[tokio::test]
async fn designer_prompt_yields_line_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .and(query_param("prompt", "invoice for a designer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "company_name": "Acme",
            "items": [{"description": "Design", "quantity": 2, "unit_price": 50}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = api_for(&server)
        .generate_template("invoice for a designer")
        .await
        .unwrap();
    let doc = InvoiceDocument::new(draft);

    assert_eq!(doc.draft().company_name, "Acme");
    assert_eq!(doc.items()[0].line_total(), 100.0);
}

#[tokio::test]
async fn prompt_with_reserved_characters_arrives_intact() {
    let server = MockServer::start().await;
    let prompt = "plumbing & heating, 20% tax?";
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .and(query_param("prompt", prompt))
        .respond_with(ResponseTemplate::new(200).set_body_json(designer_draft()))
        .expect(1)
        .mount(&server)
        .await;

    let draft = api_for(&server).generate_template(prompt).await.unwrap();
    assert_eq!(draft.invoice_number, "INV-001");
}

#[tokio::test]
async fn server_error_is_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("The AI returned a malformed response. Please try again."),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).generate_template("anything").await.unwrap_err();
    match err {
        ApiError::Generation(RequestError::Server { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("malformed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Sure! Here is your invoice."))
        .mount(&server)
        .await;

    let err = api_for(&server).generate_template("anything").await.unwrap_err();
    assert!(matches!(err, ApiError::Generation(RequestError::Json(_))));
}

#[tokio::test]
async fn draft_without_items_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Invoice"})))
        .mount(&server)
        .await;

    let draft = api_for(&server).generate_template("anything").await.unwrap();
    let mut doc = InvoiceDocument::new(draft);
    assert!(doc.items().is_empty());

    let index = doc.add_item();
    doc.set_item_field(index, ItemField::UnitPrice, "40");
    assert_eq!(doc.total(), 40.0);
}

#[tokio::test]
async fn string_amounts_are_coerced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"description": "Audit", "quantity": "3", "unit_price": "n/a"}]
        })))
        .mount(&server)
        .await;

    let draft = api_for(&server).generate_template("anything").await.unwrap();
    assert_eq!(draft.items[0].quantity, 3.0);
    assert_eq!(draft.items[0].unit_price, 0.0);
}

#[tokio::test]
async fn unreachable_backend_is_generation_failure() {
    let api = HttpInvoiceApi::new("http://127.0.0.1:1/api", Duration::from_secs(5)).unwrap();

    let err = api.generate_template("anything").await.unwrap_err();
    assert!(matches!(err, ApiError::Generation(RequestError::Http(_))));
}
