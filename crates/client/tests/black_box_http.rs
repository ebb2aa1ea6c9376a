//! Drives the reqwest transport against a stub backend on an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{Value, json};

use stockroom_client::{
    ClientConfig, ClientError, CollectionStore, HttpTransport, InMemoryNotifier, Level,
    MutationRunner, StockroomApi, Transport, endpoints,
};
use stockroom_products::{ProductForm, ProductId, ProductScreen};
use stockroom_views::Attachment;

#[derive(Clone, Default)]
struct Seen {
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

async fn list_products(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.auth.lock().unwrap().push(auth);
    Json(json!([
        {"id": 1, "name": "Packing tape", "sku": "PT-01", "currentStock": 4, "minStockLevel": 5},
        {"id": 2, "name": null, "tags": null},
        {"name": "missing id"}
    ]))
}

async fn create_product(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["sku"] == "DUP" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "SKU already exists"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": 10, "name": body["name"], "tags": body["tags"]})),
    )
}

async fn update_product(Path(id): Path<i64>, mut multipart: Multipart) -> Json<Value> {
    let mut tags = Vec::new();
    let mut tags_json = None;
    let mut name = None;
    let mut image = Value::Null;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.unwrap();
            image = json!({"fileName": file_name, "contentType": content_type, "size": bytes.len()});
            continue;
        }
        let text = field.text().await.unwrap();
        match field_name.as_str() {
            "tags" => tags.push(text),
            "tagsJson" => tags_json = Some(text),
            "name" => name = Some(text),
            _ => {}
        }
    }
    Json(json!({"id": id, "name": name, "tags": tags, "tagsJson": tags_json, "image": image}))
}

async fn by_barcode(Path(code): Path<String>) -> (StatusCode, Json<Value>) {
    if code == "4006381333931" {
        (StatusCode::OK, Json(json!({"id": 5, "name": "Gloves", "barcode": code})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
    }
}

async fn search_orders(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!([{"id": 1, "orderNumber": format!("{q}-1001"), "customerName": "Acme"}]))
}

async fn list_issues() -> Json<Value> {
    Json(json!([
        {"id": 1, "orderNumber": "SO-1", "issueType": "damaged", "status": "open", "quantityAffected": 2},
        {"id": 2, "orderNumber": "SO-2", "issueType": "mystery", "status": "resolved"}
    ]))
}

async fn stats_down() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "stats offline\n")
}

async fn spawn_backend() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:id", patch(update_product))
        .route("/api/products/barcode/:code", get(by_barcode))
        .route("/api/orders/search", get(search_orders))
        .route("/api/order-quality", get(list_issues))
        .route("/api/order-quality-stats", get(stats_down))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn api_for(base: &str, token: Option<&str>) -> (StockroomApi, HttpTransport) {
    let config = ClientConfig {
        api_url: base.to_string(),
        auth_token: token.map(str::to_string),
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    let api = StockroomApi::new(
        Arc::new(transport.clone()),
        Arc::new(CollectionStore::new(config.stale_time)),
    );
    (api, transport)
}

#[tokio::test]
async fn lenient_list_with_bearer_token() {
    let (base, seen) = spawn_backend().await;
    let (api, _) = api_for(&base, Some("s3cret"));

    let products = api.products().await;

    assert!(!products.is_error);
    let items = products.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].current_stock, 4);
    assert_eq!(items[1].name, "");
    assert!(items[1].tags.is_empty());
    assert_eq!(
        seen.auth.lock().unwrap().as_slice(),
        &[Some("Bearer s3cret".to_string())]
    );
}

#[tokio::test]
async fn json_create_and_server_error_message() {
    let (base, _) = spawn_backend().await;
    let (_, transport) = api_for(&base, None);

    let form = ProductForm {
        name: "Packing tape".into(),
        sku: "PT-01".into(),
        tags: vec!["fragile".into()],
        ..ProductForm::default()
    };
    let created = transport
        .send(endpoints::create_product(form.validate().unwrap()))
        .await
        .unwrap();
    assert_eq!(created.status, 201);
    let body: Value = created.json().unwrap();
    assert_eq!(body["tags"], json!(["fragile"]));

    let dup = ProductForm {
        sku: "DUP".into(),
        ..form
    };
    let err = transport
        .send(endpoints::create_product(dup.validate().unwrap()))
        .await
        .unwrap()
        .error_for_status()
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Api {
            status: 409,
            message: "SKU already exists".into()
        }
    );
}

#[tokio::test]
async fn multipart_update_carries_tags_and_image() {
    let (base, _) = spawn_backend().await;
    let (_, transport) = api_for(&base, None);

    let form = ProductForm {
        name: "Gloves".into(),
        sku: "GL-2".into(),
        tags: vec!["ppe".into(), "size-m".into()],
        image: Some(Attachment::new("gloves.png", "image/png", vec![7u8; 1024])),
        ..ProductForm::default()
    };
    let resp = transport
        .send(endpoints::update_product(
            ProductId::new(3),
            form.validate().unwrap(),
        ))
        .await
        .unwrap();
    let body: Value = resp.json().unwrap();

    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Gloves");
    assert_eq!(body["tags"], json!(["ppe", "size-m"]));
    assert_eq!(body["tagsJson"], r#"["ppe","size-m"]"#);
    assert_eq!(body["image"]["fileName"], "gloves.png");
    assert_eq!(body["image"]["contentType"], "image/png");
    assert_eq!(body["image"]["size"], 1024);
}

#[tokio::test]
async fn lookups_over_http() {
    let (base, _) = spawn_backend().await;
    let (api, _) = api_for(&base, None);

    let found = api.product_by_barcode("4006381333931").await.unwrap();
    assert_eq!(found.map(|p| p.name), Some("Gloves".to_string()));
    assert!(api.product_by_barcode("123").await.unwrap().is_none());

    let orders = api.search_orders("SO 7").await.unwrap();
    assert_eq!(orders[0].order_number, "SO 7-1001");
    assert_eq!(orders[0].label(), "SO 7-1001 (Acme)");
}

#[tokio::test]
async fn stats_fall_back_when_endpoint_is_down() {
    let (base, _) = spawn_backend().await;
    let (api, _) = api_for(&base, None);

    let stats = api.quality_stats().await;

    assert_eq!(stats.total, 2);
    assert_eq!(stats.open, 1);
    assert_eq!(stats.units_affected, 2);
    assert_eq!(stats.by_type.get("other"), Some(&1));
}

#[tokio::test]
async fn runner_toasts_server_detail() {
    let (base, _) = spawn_backend().await;
    let (api, _) = api_for(&base, None);
    let notifier = Arc::new(InMemoryNotifier::new());
    let runner = MutationRunner::new(api, notifier.clone());

    let mut screen = ProductScreen::new();
    screen.dialog.begin_create().unwrap();
    let form = ProductForm {
        name: "Duplicate".into(),
        sku: "DUP".into(),
        ..ProductForm::default()
    };
    let err = runner.save_product(&mut screen, &form).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert!(!screen.dialog.is_closed());
    let notes = notifier.take();
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(
        notes[0].detail.as_deref(),
        Some("The request failed: SKU already exists")
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (api, _) = api_for(&format!("http://{addr}"), None);

    let state = api.products().await;

    assert!(state.is_error);
    assert!(state.data.is_none());
    assert!(state.error.unwrap().contains("Could not reach the server"));
}
