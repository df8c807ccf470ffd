// ==========================================================================
// Router tests
//
// Drives the full router in-process with tower's `oneshot` against an
// in-memory database and temporary ledger/invoice directories.
//
// Run:
//   cargo test -p rxdesk-web --test web
// ==========================================================================

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use rxdesk_core::{Money, NewMedicine, MAX_STOCK_QUANTITY};
use rxdesk_db::{Database, DbConfig};
use rxdesk_web::{build_router, AppState, RxDeskConfig};

struct TestApp {
    router: Router,
    state: AppState,
    dir: TempDir,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RxDeskConfig::default();
    config.output.ledger_dir = dir.path().join("ledger");
    config.output.invoice_dir = dir.path().join("invoices");

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(config, db);
    let router = build_router(state.clone());

    TestApp { router, state, dir }
}

impl TestApp {
    async fn seed(&self, name: &str, price_cents: i64, quantity: i64) -> i64 {
        let medicine = NewMedicine::new(
            name,
            "500mg",
            "Acme Pharma",
            Money::from_cents(price_cents),
            quantity,
        );
        self.state.db.medicines().insert(&medicine).await.unwrap()
    }

    async fn quantity_of(&self, id: i64) -> Option<i64> {
        self.state
            .db
            .medicines()
            .get_by_id(id)
            .await
            .unwrap()
            .map(|m| m.quantity)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

fn location(headers: &HeaderMap) -> &str {
    headers.get(header::LOCATION).unwrap().to_str().unwrap()
}

/// Pulls the first `href` that starts with `prefix` out of a page.
fn href_with_prefix<'a>(page: &'a str, prefix: &str) -> &'a str {
    let start = page.find(prefix).unwrap();
    let end = start + page[start..].find('"').unwrap();
    &page[start..end]
}

// ==========================================================================
// Medicines
// ==========================================================================

#[tokio::test]
async fn test_root_redirects_to_inventory() {
    let app = setup().await;
    let (status, headers, _) = app.get("/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/medicines");
}

#[tokio::test]
async fn test_empty_inventory() {
    let app = setup().await;
    let (status, _, page) = app.get("/medicines").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("No medicines found."));
}

#[tokio::test]
async fn test_add_medicine_then_list() {
    let app = setup().await;

    let (status, headers, _) = app
        .post_form(
            "/medicines",
            "name=Amoxicillin&dosage=500mg&manufacturer=Acme+Pharma&price=10&quantity=4",
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/medicines?added=1");

    let (status, _, page) = app.get("/medicines?added=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Medicine added successfully!"));
    assert!(page.contains("Amoxicillin"));
    assert!(page.contains("$10.00"));
    // Stock value: 4 x 10.00
    assert!(page.contains("$40.00"));
}

#[tokio::test]
async fn test_add_medicine_rejects_bad_price() {
    let app = setup().await;

    let (status, _, page) = app
        .post_form(
            "/medicines",
            "name=Amoxicillin&dosage=500mg&manufacturer=Acme&price=ten&quantity=4",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("price has invalid format"));
    // Typed values survive the round trip
    assert!(page.contains(r#"value="Amoxicillin""#));
    assert_eq!(app.state.db.medicines().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_medicine_rejects_price_over_limit() {
    let app = setup().await;

    let (status, _, page) = app
        .post_form(
            "/medicines",
            "name=Gold&dosage=1g&manufacturer=Acme&price=1000000000000000&quantity=10000",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("price must be between"));
    assert_eq!(app.state.db.medicines().count().await.unwrap(), 0);

    let (status, _, _) = app.get("/medicines").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_row_still_lists() {
    let app = setup().await;
    // Written straight to the store, around the form checks
    app.seed("Gold", 100_000_000_000_000_000, 10_000).await;

    let (status, _, page) = app.get("/medicines").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Gold"));

    let (status, _, body) = app.get("/api/medicines").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json[0]["stock_value"], "92233720368547758.07");

    let (status, _, _) = app.get("/sales/new").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_names_are_escaped() {
    let app = setup().await;
    app.seed("<b>Bold</b>", 100, 1).await;

    let (_, _, page) = app.get("/medicines").await;
    assert!(page.contains("&lt;b&gt;Bold&lt;/b&gt;"));
    assert!(!page.contains("<b>Bold</b>"));
}

#[tokio::test]
async fn test_restock() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 5).await;

    let (status, headers, _) = app
        .post_form("/medicines/restock", &format!("id={}&quantity=7", id))
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), format!("/medicines?restocked={}", id));
    assert_eq!(app.quantity_of(id).await, Some(12));

    let (status, _, _) = app.post_form("/medicines/restock", "id=999&quantity=7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .post_form("/medicines/restock", &format!("id={}&quantity=-3", id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.quantity_of(id).await, Some(12));
}

#[tokio::test]
async fn test_restock_cannot_overflow_stock() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 5).await;

    let (status, _, _) = app
        .post_form(
            "/medicines/restock",
            &format!("id={}&quantity=9223372036854775807", id),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.quantity_of(id).await, Some(5));

    // Each request is in range; the sum is not
    let in_range = format!("id={}&quantity={}", id, MAX_STOCK_QUANTITY - 5);
    let (status, _, _) = app.post_form("/medicines/restock", &in_range).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (status, _, page) = app.post_form("/medicines/restock", &in_range).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("must stay within"));
    assert_eq!(app.quantity_of(id).await, Some(MAX_STOCK_QUANTITY));

    let (status, _, _) = app.get("/medicines").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_non_numeric_id_is_a_form_error() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 5).await;

    let (status, headers, page) = app.post_form("/medicines/restock", "id=abc&quantity=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(page.contains("id has invalid format"));

    let (status, _, page) = app.post_form("/medicines/delete", "id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("id is required"));

    assert_eq!(app.quantity_of(id).await, Some(5));
}

#[tokio::test]
async fn test_delete_medicine() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 5).await;

    let (status, headers, _) = app.post_form("/medicines/delete", &format!("id={}", id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), format!("/medicines/delete?deleted={}", id));
    assert_eq!(app.quantity_of(id).await, None);

    let (_, _, page) = app.get(location(&headers)).await;
    assert!(page.contains(&format!("Deleted medicine with ID {}", id)));

    // Deleting again is not an error
    let (status, headers, _) = app.post_form("/medicines/delete", &format!("id={}", id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), format!("/medicines/delete?missing={}", id));
}

// ==========================================================================
// Sales
// ==========================================================================

#[tokio::test]
async fn test_buy_form_lists_medicines() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 5).await;

    let (status, _, page) = app.get("/sales/new").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(&format!(r#"name="medicine" value="{}""#, id)));
    assert!(page.contains(&format!(r#"name="qty_{}""#, id)));
}

#[tokio::test]
async fn test_checkout_records_sale() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 20).await;

    let (status, _, page) = app
        .post_form("/sales", &format!("medicine={id}&qty_{id}=3&note=walk-in"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Purchase recorded successfully!"));
    assert!(page.contains("Total Cost: $30.00"));
    assert_eq!(app.quantity_of(id).await, Some(17));

    let (status, headers, csv) = app.get(href_with_prefix(&page, "/downloads/ledger/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("attachment; filename=\"sales_"));
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("ID,Name,Dosage,Manufacturer,Price,Quantity,Additional Info")
    );
    assert_eq!(
        lines.next(),
        Some(format!("{},Amoxicillin,500mg,Acme Pharma,10.00,3,walk-in", id).as_str())
    );

    let (status, _, invoice) = app.get(href_with_prefix(&page, "/downloads/invoice/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(invoice.contains("Amoxicillin"));
    assert!(invoice.contains("Total Cost: $30.00"));
}

#[tokio::test]
async fn test_checkout_keeps_zero_quantity_line() {
    let app = setup().await;
    let a = app.seed("Amoxicillin", 1000, 5).await;
    let b = app.seed("Cetirizine", 549, 5).await;

    let (status, _, page) = app
        .post_form(
            "/sales",
            &format!("medicine={a}&qty_{a}=2&medicine={b}&qty_{b}=0"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Total Cost: $20.00"));
    assert_eq!(app.quantity_of(a).await, Some(3));
    assert_eq!(app.quantity_of(b).await, Some(5));

    let (_, _, csv) = app.get(href_with_prefix(&page, "/downloads/ledger/")).await;
    assert!(csv.contains(&format!("{},Cetirizine,500mg,Acme Pharma,5.49,0,", b)));
}

#[tokio::test]
async fn test_checkout_insufficient_stock_changes_nothing() {
    let app = setup().await;
    let id = app.seed("Amoxicillin", 1000, 2).await;

    let (status, _, page) = app
        .post_form("/sales", &format!("medicine={id}&qty_{id}=5&note="))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(page.contains("Insufficient stock for Amoxicillin"));
    // The form is shown again with the selection kept
    assert!(page.contains(&format!(r#"value="{}" checked"#, id)));

    assert_eq!(app.quantity_of(id).await, Some(2));
    assert!(!app.dir.path().join("ledger").exists());
    assert!(!app.dir.path().join("invoices").exists());
}

#[tokio::test]
async fn test_checkout_without_selection() {
    let app = setup().await;
    app.seed("Amoxicillin", 1000, 2).await;

    let (status, _, page) = app.post_form("/sales", "note=nothing+ticked").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(page.contains("Select at least one medicine to buy"));
}

#[tokio::test]
async fn test_checkout_deleted_medicine() {
    let app = setup().await;
    let (status, _, _) = app.post_form("/sales", "medicine=42&qty_42=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==========================================================================
// Downloads
// ==========================================================================

#[tokio::test]
async fn test_downloads_reject_unknown_names() {
    let app = setup().await;

    let (status, _, _) = app.get("/downloads/invoice/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app.get("/downloads/invoice/notes.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app.get("/downloads/ledger/yesterday").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Well-formed but never written
    let (status, _, _) = app.get("/downloads/ledger/1999-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==========================================================================
// JSON
// ==========================================================================

#[tokio::test]
async fn test_api_medicines() {
    let app = setup().await;
    app.seed("Cetirizine", 549, 3).await;

    let (status, headers, body) = app.get("/api/medicines").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json[0]["name"], "Cetirizine");
    assert_eq!(json[0]["price"], "5.49");
    assert_eq!(json[0]["stock_value"], "16.47");
}

#[tokio::test]
async fn test_health() {
    let app = setup().await;
    let (status, _, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "ok");
}
