//! `stockroom-client`: the IO side of the warehouse client.
//!
//! The domain crates are pure; this crate talks to the backend. It owns the
//! transport seam, the remote collection store, typed endpoint bindings, the
//! mutation runner and the context object screens receive.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod mutation;
pub mod notify;
pub mod store;
pub mod transport;

pub use api::{StockroomApi, decode_list, encode_segment, endpoints};
pub use config::ClientConfig;
pub use context::{AppContext, Session};
pub use error::{ClientError, ClientResult, server_message};
pub use mutation::MutationRunner;
pub use notify::{InMemoryNotifier, Level, Notification, NotificationSink, TracingNotifier};
pub use store::{CacheKey, CollectionStore, QueryState};
pub use transport::{HttpTransport, InMemoryTransport, Method, Request, Response, Transport};
