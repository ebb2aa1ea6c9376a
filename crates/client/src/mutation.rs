//! Write path: validate, dispatch, invalidate, notify.
//!
//! Screen-bound mutations run in three steps so a UI can release the screen
//! while the request is in flight:
//! 1. [`MutationRunner::begin`] checks the dialog state and issues a ticket
//! 2. [`MutationRunner::dispatch`] sends the request
//! 3. [`MutationRunner::complete`] hands the outcome back to the screen,
//!    refreshes the affected collections and notifies the user
//!
//! The `save_*` / `delete_*` helpers chain the three for callers that own the
//! screen for the whole round trip. Client-side validation always runs before
//! `begin`, so an invalid form never reaches the network.

use std::sync::Arc;

use tracing::{info, warn};

use stockroom_core::Entity;
use stockroom_inventory::{MovementKind, StockMovementForm};
use stockroom_products::{ProductForm, ProductId, ProductScreen};
use stockroom_quality::{
    InventoryAdjustment, QualityIssueForm, QualityIssueId, QualityScreen, ResolveIssue,
};
use stockroom_views::{
    CollectionScreen, Completion, DialogState, Filterable, MutationIntent, MutationTicket,
    Sortable,
};

use crate::api::{StockroomApi, endpoints};
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notification, NotificationSink};
use crate::store::CacheKey;
use crate::transport::Request;

#[derive(Clone)]
pub struct MutationRunner {
    api: StockroomApi,
    notifier: Arc<dyn NotificationSink>,
}

impl core::fmt::Debug for MutationRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationRunner")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl MutationRunner {
    pub fn new(api: StockroomApi, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { api, notifier }
    }

    pub fn api(&self) -> &StockroomApi {
        &self.api
    }

    /// Guard a submission against the screen's dialog state.
    pub fn begin<T>(
        screen: &mut CollectionScreen<T>,
        intent: MutationIntent<T::Id>,
    ) -> ClientResult<MutationTicket<T::Id>>
    where
        T: Filterable + Sortable + Entity,
    {
        Ok(screen.submit(intent)?)
    }

    /// Send a write request; any 2xx counts as success.
    pub async fn dispatch(&self, request: Request) -> ClientResult<()> {
        self.api.send(request).await.map(drop)
    }

    /// Apply a dispatch outcome to the screen.
    ///
    /// A stale ticket (the dialog was cancelled or replaced meanwhile) leaves
    /// the screen and the user alone, but a successful write still refreshes
    /// the collections since the backend did change.
    pub async fn complete<T>(
        &self,
        screen: &mut CollectionScreen<T>,
        ticket: &MutationTicket<T::Id>,
        outcome: ClientResult<()>,
        subject: &str,
        keys: &[CacheKey],
    ) -> ClientResult<()>
    where
        T: Filterable + Sortable + Entity,
    {
        let completion = screen.finish(
            ticket,
            outcome.as_ref().map(|_| ()).map_err(ClientError::user_message),
        );
        let verb = ticket.intent.verb();
        match (completion, outcome) {
            (Completion::Applied(_), Ok(())) => {
                self.refresh(keys).await;
                self.succeeded(subject, verb);
                Ok(())
            }
            (Completion::Applied(_), Err(e)) => {
                self.failed(subject, verb, &e);
                Err(e)
            }
            (Completion::Stale, Ok(())) => {
                info!(subject, verb, ticket = %ticket.id, "stale mutation succeeded");
                self.refresh(keys).await;
                Err(ClientError::Superseded)
            }
            (Completion::Stale, Err(e)) => {
                warn!(subject, verb, ticket = %ticket.id, error = %e, "stale mutation failed");
                Err(ClientError::Superseded)
            }
        }
    }

    async fn refresh(&self, keys: &[CacheKey]) {
        for key in keys {
            self.api.refresh(*key).await;
        }
    }

    fn succeeded(&self, subject: &str, verb: &str) {
        info!(subject, verb, "mutation succeeded");
        self.notifier
            .notify(Notification::success(format!("{subject} {verb}d")));
    }

    fn failed(&self, subject: &str, verb: &str, error: &ClientError) {
        warn!(subject, verb, error = %error, "mutation failed");
        self.notifier.notify(Notification::error(
            format!("Could not {verb} {}", subject.to_lowercase()),
            error.user_message(),
        ));
    }

    // ---- products ----

    /// Create or update, depending on which product dialog is open.
    ///
    /// An image selected in the screen's upload slot is sent when the form
    /// carries none of its own.
    pub async fn save_product(
        &self,
        screen: &mut ProductScreen,
        form: &ProductForm,
    ) -> ClientResult<()> {
        let intent = match &screen.dialog {
            DialogState::Creating => MutationIntent::Create,
            DialogState::Editing(id) => MutationIntent::Update(*id),
            other => {
                return Err(ClientError::Rejected(format!(
                    "no product form is open ({other:?})"
                )));
            }
        };
        let mut form = form.clone();
        if form.image.is_none() {
            form.image = screen.upload.pending().cloned();
        }
        let payload = form.validate()?;

        let ticket = Self::begin(screen, intent)?;
        let request = match ticket.intent {
            MutationIntent::Update(id) => endpoints::update_product(id, payload),
            MutationIntent::Create | MutationIntent::Delete(_) => {
                endpoints::create_product(payload)
            }
        };
        let outcome = self.dispatch(request).await;
        self.complete(screen, &ticket, outcome, "Product", &[CacheKey::Products])
            .await
    }

    /// Delete after the user confirmed in the delete dialog.
    pub async fn delete_product(&self, screen: &mut ProductScreen, id: ProductId) -> ClientResult<()> {
        let ticket = Self::begin(screen, MutationIntent::Delete(id))?;
        let outcome = self.dispatch(endpoints::delete_product(id)).await;
        self.complete(screen, &ticket, outcome, "Product", &[CacheKey::Products])
            .await
    }

    // ---- quality ----

    pub async fn report_issue(
        &self,
        screen: &mut QualityScreen,
        form: &QualityIssueForm,
    ) -> ClientResult<()> {
        let mut form = form.clone();
        if form.photo.is_none() {
            form.photo = screen.upload.pending().cloned();
        }
        let payload = form.validate()?;
        let ticket = Self::begin(screen, MutationIntent::Create)?;
        let outcome = self.dispatch(endpoints::report_issue(payload)).await;
        self.complete(
            screen,
            &ticket,
            outcome,
            "Quality issue",
            &[CacheKey::QualityIssues],
        )
        .await
    }

    /// Resolve from the issue's edit dialog.
    pub async fn resolve_issue(
        &self,
        screen: &mut QualityScreen,
        id: QualityIssueId,
        body: &ResolveIssue,
    ) -> ClientResult<()> {
        let body = body.validate()?;
        let ticket = Self::begin(screen, MutationIntent::Update(id))?;
        let outcome = match endpoints::resolve_issue(id, &body) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => Err(e),
        };
        self.complete(
            screen,
            &ticket,
            outcome,
            "Quality issue",
            &[CacheKey::QualityIssues],
        )
        .await
    }

    /// Write the affected units back to (or off) stock. Not tied to a dialog.
    pub async fn adjust_issue_inventory(
        &self,
        id: QualityIssueId,
        body: &InventoryAdjustment,
    ) -> ClientResult<()> {
        let body = body.validate()?;
        let request = endpoints::adjust_issue_inventory(id, &body)?;
        self.run_unbound(
            request,
            "Inventory",
            "adjust",
            &[
                CacheKey::QualityIssues,
                CacheKey::Products,
                CacheKey::InventoryEvents,
            ],
        )
        .await
    }

    // ---- inventory ----

    pub async fn move_stock(&self, form: &StockMovementForm) -> ClientResult<()> {
        let movement = form.validate()?;
        let request = endpoints::stock_movement(&movement)?;
        let verb = match movement.kind() {
            MovementKind::Update => "update",
            MovementKind::Pick => "pick",
            MovementKind::Receive => "receive",
        };
        self.run_unbound(
            request,
            "Stock",
            verb,
            &[CacheKey::Products, CacheKey::InventoryEvents],
        )
        .await
    }

    async fn run_unbound(
        &self,
        request: Request,
        subject: &str,
        verb: &str,
        keys: &[CacheKey],
    ) -> ClientResult<()> {
        match self.dispatch(request).await {
            Ok(()) => {
                self.refresh(keys).await;
                info!(subject, verb, "mutation succeeded");
                self.notifier
                    .notify(Notification::success(format!("{subject} {}", past_tense(verb))));
                Ok(())
            }
            Err(e) => {
                self.failed(subject, verb, &e);
                Err(e)
            }
        }
    }
}

fn past_tense(verb: &str) -> String {
    match verb {
        "pick" => "picked".to_string(),
        v if v.ends_with('e') => format!("{v}d"),
        v => format!("{v}ed"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::notify::{InMemoryNotifier, Level};
    use crate::store::CollectionStore;
    use crate::transport::{InMemoryTransport, Method, Response};
    use stockroom_products::Product;
    use stockroom_views::{Attachment, MutationPhase, WireBody};

    struct Harness {
        transport: InMemoryTransport,
        notifier: Arc<InMemoryNotifier>,
        runner: MutationRunner,
    }

    fn harness() -> Harness {
        let transport = InMemoryTransport::new();
        let notifier = Arc::new(InMemoryNotifier::new());
        let api = StockroomApi::new(
            Arc::new(transport.clone()),
            Arc::new(CollectionStore::new(Duration::from_secs(60))),
        );
        let runner = MutationRunner::new(api, notifier.clone());
        Harness {
            transport,
            notifier,
            runner,
        }
    }

    fn product_form() -> ProductForm {
        ProductForm {
            name: "Packing tape".into(),
            sku: "PT-01".into(),
            current_stock: 10,
            min_stock_level: 2,
            ..ProductForm::default()
        }
    }

    #[test]
    fn past_tenses() {
        assert_eq!(past_tense("pick"), "picked");
        assert_eq!(past_tense("receive"), "received");
        assert_eq!(past_tense("update"), "updated");
        assert_eq!(past_tense("adjust"), "adjusted");
    }

    #[tokio::test]
    async fn create_success_closes_dialog_and_refreshes() {
        let h = harness();
        h.transport
            .respond_json(Method::Post, "/api/products", json!({"id": 1}));
        h.transport.respond_json(
            Method::Get,
            "/api/products",
            json!([{"id": 1, "name": "Packing tape"}]),
        );
        let mut screen = ProductScreen::new();
        screen.dialog.begin_create().unwrap();

        h.runner.save_product(&mut screen, &product_form()).await.unwrap();

        assert!(screen.dialog.is_closed());
        assert_eq!(h.transport.count(Method::Get, "/api/products"), 1);
        let cached = h.runner.api().store().peek::<Product>(CacheKey::Products);
        assert_eq!(cached.items().len(), 1);
        let notes = h.notifier.take();
        assert_eq!(notes, vec![Notification::success("Product created")]);
    }

    #[tokio::test]
    async fn invalid_form_never_hits_the_network() {
        let h = harness();
        let mut screen = ProductScreen::new();
        screen.dialog.begin_create().unwrap();
        let form = ProductForm {
            current_stock: -3,
            ..product_form()
        };

        let err = h.runner.save_product(&mut screen, &form).await.unwrap_err();

        match err {
            ClientError::Validation(errors) => assert!(errors.has("currentStock")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(h.transport.requests().is_empty());
        assert_eq!(screen.dialog, DialogState::Creating);
        assert!(!screen.mutation.is_pending());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected_before_dispatch() {
        let h = harness();
        let mut screen = ProductScreen::new();
        screen.dialog.begin_create().unwrap();
        screen.upload.select(Attachment::new(
            "photo.jpg",
            "image/jpeg",
            vec![0u8; 2_500_000],
        ));

        let err = h
            .runner
            .save_product(&mut screen, &product_form())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(ref e) if e.has("image")));
        assert!(h.transport.requests().is_empty());
        assert!(screen.upload.pending().is_some());
    }

    #[tokio::test]
    async fn image_goes_out_as_multipart() {
        let h = harness();
        h.transport
            .respond_json(Method::Patch, "/api/products/4", json!({"id": 4}));
        let mut screen = ProductScreen::new();
        screen.dialog.begin_edit(ProductId::new(4)).unwrap();
        screen
            .upload
            .select(Attachment::new("p.png", "image/png", vec![1, 2, 3]));

        h.runner.save_product(&mut screen, &product_form()).await.unwrap();

        let sent = h.transport.requests();
        assert_eq!(sent[0].method, Method::Patch);
        assert!(matches!(sent[0].body, Some(WireBody::Multipart(_))));
        assert!(screen.upload.pending().is_none());
    }

    #[tokio::test]
    async fn server_failure_keeps_dialog_open_and_toasts() {
        let h = harness();
        h.transport.respond(
            Method::Post,
            "/api/products",
            Ok(Response::new(409, r#"{"message":"SKU already exists"}"#)),
        );
        let mut screen = ProductScreen::new();
        screen.dialog.begin_create().unwrap();

        let err = h
            .runner
            .save_product(&mut screen, &product_form())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert_eq!(screen.dialog, DialogState::Creating);
        assert_eq!(
            screen.mutation.error(),
            Some("The request failed: SKU already exists")
        );
        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].title, "Could not create product");
        assert_eq!(h.transport.count(Method::Get, "/api/products"), 0);
    }

    #[tokio::test]
    async fn delete_from_detail_closes_the_detail_view() {
        let h = harness();
        h.transport
            .respond(Method::Delete, "/api/products/7", Ok(Response::new(204, "")));
        let mut screen = ProductScreen::new();
        let id = ProductId::new(7);
        screen.dialog.open_detail(id).unwrap();
        screen.dialog.request_delete(id).unwrap();

        h.runner.delete_product(&mut screen, id).await.unwrap();

        assert!(screen.dialog.is_closed());
        assert_eq!(h.notifier.take()[0].title, "Product deleted");
    }

    #[tokio::test]
    async fn delete_without_confirmation_is_rejected() {
        let h = harness();
        let mut screen = ProductScreen::new();
        let err = h
            .runner
            .delete_product(&mut screen, ProductId::new(7))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected(_)));
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn response_after_cancel_is_stale() {
        let h = harness();
        h.transport
            .respond_json(Method::Post, "/api/products", json!({"id": 1}));
        let mut screen = ProductScreen::new();
        screen.dialog.begin_create().unwrap();

        let ticket = MutationRunner::begin(&mut screen, MutationIntent::Create).unwrap();
        screen.cancel_dialog();
        let payload = product_form().validate().unwrap();
        let outcome = h.runner.dispatch(endpoints::create_product(payload)).await;
        let result = h
            .runner
            .complete(&mut screen, &ticket, outcome, "Product", &[CacheKey::Products])
            .await;

        assert_eq!(result, Err(ClientError::Superseded));
        assert_eq!(*screen.mutation.phase(), MutationPhase::Idle);
        assert!(h.notifier.all().is_empty());
        // The write landed, so the list is refreshed anyway.
        assert_eq!(h.transport.count(Method::Get, "/api/products"), 1);
    }

    #[tokio::test]
    async fn resolve_requires_the_edit_dialog() {
        let h = harness();
        h.transport
            .respond_json(Method::Post, "/api/order-quality/3/resolve", json!({}));
        let id = QualityIssueId::new(3);
        let mut screen = QualityScreen::new();
        let body = ResolveIssue::new("  Refund issued  ");

        assert!(h.runner.resolve_issue(&mut screen, id, &body).await.is_err());
        screen.dialog.begin_edit(id).unwrap();
        h.runner.resolve_issue(&mut screen, id, &body).await.unwrap();

        let sent = h.transport.requests();
        let resolve = sent
            .iter()
            .find(|r| r.path == "/api/order-quality/3/resolve")
            .unwrap();
        assert_eq!(
            resolve.body,
            Some(WireBody::Json(json!({"resolution": "Refund issued"})))
        );
        assert!(screen.dialog.is_closed());
    }

    #[tokio::test]
    async fn stock_pick_refreshes_products_and_events() {
        let h = harness();
        h.transport
            .respond_json(Method::Post, "/api/inventory/pick", json!({"ok": true}));
        let form = StockMovementForm::new(MovementKind::Pick)
            .for_product(ProductId::new(2), 10)
            .with_quantity(3);

        h.runner.move_stock(&form).await.unwrap();

        assert_eq!(h.transport.count(Method::Get, "/api/products"), 1);
        assert_eq!(h.transport.count(Method::Get, "/api/inventory/events"), 1);
        assert_eq!(h.notifier.take(), vec![Notification::success("Stock picked")]);
    }

    #[tokio::test]
    async fn overpick_is_rejected_locally() {
        let h = harness();
        let form = StockMovementForm::new(MovementKind::Pick)
            .for_product(ProductId::new(2), 1)
            .with_quantity(3);
        assert!(matches!(
            h.runner.move_stock(&form).await,
            Err(ClientError::Validation(_))
        ));
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn adjustment_failure_notifies() {
        let h = harness();
        h.transport.respond(
            Method::Post,
            "/api/order-quality/5/adjust-inventory",
            Err(ClientError::Network("connection refused".into())),
        );
        let body = InventoryAdjustment {
            product_id: Some(ProductId::new(1)),
            quantity: 2,
            restock: true,
        };
        let err = h
            .runner
            .adjust_issue_inventory(QualityIssueId::new(5), &body)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        let notes = h.notifier.take();
        assert_eq!(notes[0].title, "Could not adjust inventory");
    }
}
