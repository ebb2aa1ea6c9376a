//! Explicit application context handed to every screen.
//!
//! Session, page title and locale are plain fields here rather than ambient
//! globals; screens receive `&AppContext` (or `&mut` to retitle the page).

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::api::StockroomApi;
use crate::config::ClientConfig;
use crate::mutation::MutationRunner;
use crate::notify::{NotificationSink, TracingNotifier};
use crate::store::CollectionStore;
use crate::transport::{HttpTransport, Transport};

/// Who is signed in. Authentication itself happens elsewhere; the client only
/// carries the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<String>,
    pub authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            authenticated: true,
        }
    }
}

pub struct AppContext {
    pub config: ClientConfig,
    pub session: Session,
    pub locale: String,
    page_title: String,
    api: StockroomApi,
    runner: MutationRunner,
    notifier: Arc<dyn NotificationSink>,
}

impl core::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_url", &self.config.api_url)
            .field("session", &self.session)
            .field("locale", &self.locale)
            .field("page_title", &self.page_title)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Install logging in the configured format, then wire up the reqwest
    /// transport and log notifications.
    ///
    /// Logging is installed at most once per process; later contexts reuse it.
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        stockroom_observability::init_with(config.log_format);
        let transport =
            HttpTransport::from_config(&config).context("failed to build HTTP transport")?;
        info!(api_url = %config.api_url, "client context ready");
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            Arc::new(TracingNotifier),
        ))
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let store = Arc::new(CollectionStore::new(config.stale_time));
        let api = StockroomApi::new(transport, store);
        let runner = MutationRunner::new(api.clone(), notifier.clone());
        let session = if config.auth_token.is_some() {
            Session {
                user: None,
                authenticated: true,
            }
        } else {
            Session::anonymous()
        };
        Self {
            locale: config.locale.clone(),
            config,
            session,
            page_title: String::new(),
            api,
            runner,
            notifier,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn api(&self) -> &StockroomApi {
        &self.api
    }

    pub fn runner(&self) -> &MutationRunner {
        &self.runner
    }

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    /// Screens set this on entry; the shell shows it in the header.
    pub fn set_page_title(&mut self, title: impl Into<String>) {
        self.page_title = title.into();
    }
}
