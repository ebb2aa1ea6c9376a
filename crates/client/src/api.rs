//! Typed bindings for the warehouse REST API.
//!
//! Collection reads go through the [`CollectionStore`]; lookups and writes go
//! straight to the transport. Request construction for writes lives in
//! [`endpoints`] so the mutation runner and tests build identical requests.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use stockroom_calendar::{
    Aggregation, CalendarSources, CallLog, OrderRecord, ProductionBatch, SourceFeed,
    SupplierInvoice, SupplierPayment, aggregate,
};
use stockroom_inventory::{InventoryEvent, normalize_barcode};
use stockroom_products::{Category, Product};
use stockroom_quality::{OrderSummary, QualityIssue, QualityStats};

use crate::error::{ClientError, ClientResult};
use crate::store::{CacheKey, CollectionStore, QueryState};
use crate::transport::{Request, Response, Transport};

/// Percent-encode one path segment (RFC 3986 unreserved characters pass).
pub fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Decode a collection body element by element.
///
/// Accepts a bare array or an object wrapping it in `data` / `items`.
/// Elements that do not decode are skipped rather than failing the list.
pub fn decode_list<T: DeserializeOwned>(body: &str, what: &str) -> ClientResult<Vec<T>> {
    let value: Value = if body.trim().is_empty() {
        Value::Array(Vec::new())
    } else {
        serde_json::from_str(body)?
    };
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("items")) {
            Some(Value::Array(items)) => items,
            _ => return Err(ClientError::Decode(format!("{what}: expected a list"))),
        },
        Value::Null => Vec::new(),
        _ => return Err(ClientError::Decode(format!("{what}: expected a list"))),
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(what, error = %e, "skipping undecodable element");
                None
            }
        })
        .collect();
    if decoded.len() < total {
        warn!(what, skipped = total - decoded.len(), "some records could not be decoded");
    }
    Ok(decoded)
}

#[derive(Clone)]
pub struct StockroomApi {
    transport: Arc<dyn Transport>,
    store: Arc<CollectionStore>,
}

impl core::fmt::Debug for StockroomApi {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StockroomApi")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl StockroomApi {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<CollectionStore>) -> Self {
        Self { transport, store }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Send and map non-2xx statuses to `ClientError::Api`.
    pub async fn send(&self, request: Request) -> ClientResult<Response> {
        self.transport.send(request).await?.error_for_status()
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &'static str) -> ClientResult<Vec<T>> {
        let resp = self.send(Request::get(path)).await?;
        decode_list(&resp.body, path)
    }

    // ---- cached collections ----

    pub async fn products(&self) -> QueryState<Product> {
        self.store
            .query(CacheKey::Products, || self.fetch_list("/api/products"))
            .await
    }

    pub async fn categories(&self) -> QueryState<Category> {
        self.store
            .query(CacheKey::Categories, || self.fetch_list("/api/categories"))
            .await
    }

    pub async fn quality_issues(&self) -> QueryState<QualityIssue> {
        self.store
            .query(CacheKey::QualityIssues, || self.fetch_list("/api/order-quality"))
            .await
    }

    pub async fn orders(&self) -> QueryState<OrderRecord> {
        self.store
            .query(CacheKey::Orders, || self.fetch_list("/api/orders"))
            .await
    }

    pub async fn call_logs(&self) -> QueryState<CallLog> {
        self.store
            .query(CacheKey::CallLogs, || self.fetch_list("/api/call-logs"))
            .await
    }

    pub async fn supplier_payments(&self) -> QueryState<SupplierPayment> {
        self.store
            .query(CacheKey::SupplierPayments, || {
                self.fetch_list("/api/supplier-payments/payments")
            })
            .await
    }

    pub async fn supplier_invoices(&self) -> QueryState<SupplierInvoice> {
        self.store
            .query(CacheKey::SupplierInvoices, || {
                self.fetch_list("/api/supplier-payments/invoices")
            })
            .await
    }

    pub async fn inventory_events(&self) -> QueryState<InventoryEvent> {
        self.store
            .query(CacheKey::InventoryEvents, || {
                self.fetch_list("/api/inventory/events")
            })
            .await
    }

    pub async fn production_batches(&self) -> QueryState<ProductionBatch> {
        self.store
            .query(CacheKey::ProductionBatches, || {
                self.fetch_list("/api/production/batches")
            })
            .await
    }

    /// Invalidate a key and refetch it now.
    pub async fn refresh(&self, key: CacheKey) {
        self.store.invalidate(key);
        match key {
            CacheKey::Products => drop(self.products().await),
            CacheKey::Categories => drop(self.categories().await),
            CacheKey::QualityIssues => drop(self.quality_issues().await),
            CacheKey::Orders => drop(self.orders().await),
            CacheKey::CallLogs => drop(self.call_logs().await),
            CacheKey::SupplierPayments => drop(self.supplier_payments().await),
            CacheKey::SupplierInvoices => drop(self.supplier_invoices().await),
            CacheKey::InventoryEvents => drop(self.inventory_events().await),
            CacheKey::ProductionBatches => drop(self.production_batches().await),
        }
    }

    // ---- lookups ----

    /// `None` when no product has this barcode.
    pub async fn product_by_barcode(&self, raw: &str) -> ClientResult<Option<Product>> {
        let code = normalize_barcode(raw)?;
        let path = format!("/api/products/barcode/{}", encode_segment(&code));
        match self.send(Request::get(path)).await {
            Ok(resp) => resp.json(),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn order_by_number(&self, number: &str) -> ClientResult<Option<OrderSummary>> {
        let number = number.trim();
        if number.is_empty() {
            return Ok(None);
        }
        let path = format!("/api/orders/by-number/{}", encode_segment(number));
        match self.send(Request::get(path)).await {
            Ok(resp) => resp.json(),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Blank queries return nothing without a request.
    pub async fn search_orders(&self, query: &str) -> ClientResult<Vec<OrderSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .send(Request::get("/api/orders/search").query("q", query))
            .await?;
        decode_list(&resp.body, "/api/orders/search")
    }

    /// Stats from the backend, or computed from the issue list when the
    /// stats endpoint fails.
    pub async fn quality_stats(&self) -> QualityStats {
        match self.send(Request::get("/api/order-quality-stats")).await {
            Ok(resp) => match resp.json::<Option<QualityStats>>() {
                Ok(Some(stats)) => return stats,
                Ok(None) => warn!("empty quality stats response, computing locally"),
                Err(e) => warn!(error = %e, "bad quality stats response, computing locally"),
            },
            Err(e) => warn!(error = %e, "quality stats unavailable, computing locally"),
        }
        QualityStats::from_issues(self.quality_issues().await.items())
    }

    /// Fetch every calendar source (concurrently) and aggregate.
    pub async fn calendar(&self) -> Aggregation {
        let (orders, payments, invoices, calls, inventory, production) = tokio::join!(
            self.orders(),
            self.supplier_payments(),
            self.supplier_invoices(),
            self.call_logs(),
            self.inventory_events(),
            self.production_batches(),
        );
        aggregate(&CalendarSources {
            orders: feed(&orders),
            payments: feed(&payments),
            invoices: feed(&invoices),
            calls: feed(&calls),
            inventory: feed(&inventory),
            production: feed(&production),
        })
    }
}

fn feed<T>(state: &QueryState<T>) -> SourceFeed<'_, T> {
    SourceFeed::from_query(state.as_slice(), state.error.as_deref())
}

/// Request builders for every write endpoint.
pub mod endpoints {
    use stockroom_inventory::StockMovement;
    use stockroom_products::{ProductId, ProductPayload};
    use stockroom_quality::{InventoryAdjustment, QualityIssueId, QualityIssuePayload, ResolveIssue};

    use crate::error::ClientResult;
    use crate::transport::Request;

    pub fn create_product(payload: ProductPayload) -> Request {
        Request::post("/api/products").body(payload.into_body())
    }

    pub fn update_product(id: ProductId, payload: ProductPayload) -> Request {
        Request::patch(format!("/api/products/{id}")).body(payload.into_body())
    }

    pub fn delete_product(id: ProductId) -> Request {
        Request::delete(format!("/api/products/{id}"))
    }

    pub fn stock_movement(movement: &StockMovement) -> ClientResult<Request> {
        Request::post(format!("/api/inventory/{}", movement.kind().endpoint())).json(movement)
    }

    pub fn report_issue(payload: QualityIssuePayload) -> Request {
        Request::post("/api/order-quality").body(payload.into_body())
    }

    pub fn resolve_issue(id: QualityIssueId, body: &ResolveIssue) -> ClientResult<Request> {
        Request::post(format!("/api/order-quality/{id}/resolve")).json(body)
    }

    pub fn adjust_issue_inventory(
        id: QualityIssueId,
        body: &InventoryAdjustment,
    ) -> ClientResult<Request> {
        Request::post(format!("/api/order-quality/{id}/adjust-inventory")).json(body)
    }
}
