//! `stockroom-views`: the client-side collection view engine.
//!
//! Every list screen follows the same shape: take the cached collection (which
//! may not have loaded yet), filter it with AND-ed predicates, optionally sort,
//! paginate, lay it out in the active view mode, and drive dialogs and
//! mutations through explicit state machines.
//!
//! Nothing here performs IO. The authoritative collection lives in the remote
//! store; this crate only derives views from it.

pub mod attachment;
pub mod dialog;
pub mod filter;
pub mod mutation;
pub mod page;
pub mod screen;
pub mod sort;
pub mod view_mode;
pub mod wire;

pub use attachment::{Attachment, UploadState};
pub use dialog::{DeleteOrigin, DialogState};
pub use filter::{Choice, FilterState, Filterable, filter, unique_tags};
pub use mutation::{Completion, MutationIntent, MutationPhase, MutationTicket, MutationTracker};
pub use page::{Page, Pagination};
pub use screen::{CollectionScreen, ScreenView};
pub use sort::{SortDirection, SortSpec, Sortable, sort_view};
pub use view_mode::{Rendering, ViewMode, render};
pub use wire::{MultipartForm, WireBody};
