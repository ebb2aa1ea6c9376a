//! A list screen: filter + sort + page + layout over the cached collection,
//! plus the dialog and mutation state machines that act on it.
//!
//! The screen never stores entities. `view` derives everything from whatever
//! collection the store currently holds, which may be `None` while loading.

use stockroom_core::{DomainError, DomainResult, Entity, find_by_id};

use crate::attachment::UploadState;
use crate::dialog::DialogState;
use crate::filter::{Choice, FilterState, Filterable, filter, unique_tags};
use crate::mutation::{Completion, MutationIntent, MutationTicket, MutationTracker};
use crate::page::Pagination;
use crate::sort::{SortSpec, Sortable, sort_view};
use crate::view_mode::{Rendering, ViewMode, render};

/// Everything a list screen needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView<'a, T> {
    pub rendering: Rendering<'a, T>,
    pub page: usize,
    pub total_pages: usize,
    /// Entities matching the filters across all pages.
    pub total_matches: usize,
    /// Entities in the source collection before filtering.
    pub total_items: usize,
    /// Tag/category menu entries.
    pub tags: Vec<String>,
}

impl<'a, T> ScreenView<'a, T> {
    /// No data at all (as opposed to "no matches for these filters").
    pub fn is_empty_collection(&self) -> bool {
        self.total_items == 0
    }
}

#[derive(Debug, Clone)]
pub struct CollectionScreen<T>
where
    T: Filterable + Sortable + Entity,
{
    pub filters: FilterState<T::Status>,
    pub sort: Option<SortSpec<T::Field>>,
    pub view_mode: ViewMode,
    pub pagination: Pagination,
    pub dialog: DialogState<T::Id>,
    pub upload: UploadState,
    pub mutation: MutationTracker<T::Id>,
}

impl<T> Default for CollectionScreen<T>
where
    T: Filterable + Sortable + Entity,
{
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: None,
            view_mode: ViewMode::default(),
            pagination: Pagination::default(),
            dialog: DialogState::default(),
            upload: UploadState::default(),
            mutation: MutationTracker::default(),
        }
    }
}

impl<T> CollectionScreen<T>
where
    T: Filterable + Sortable + Entity,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination = Pagination::new(page_size);
        self
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
        self.pagination.reset();
    }

    pub fn set_status(&mut self, status: Choice<T::Status>) {
        self.filters.status = status;
        self.pagination.reset();
    }

    pub fn set_category(&mut self, category: Choice<String>) {
        self.filters.category = category;
        self.pagination.reset();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pagination.reset();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec<T::Field>>) {
        self.sort = sort;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Derive the visible page. Absent data is treated as an empty collection.
    pub fn view<'a>(&self, data: Option<&'a [T]>) -> ScreenView<'a, T> {
        let data = data.unwrap_or(&[]);
        let mut matches = filter(data, &self.filters);
        sort_view(&mut matches, self.sort);
        let page = self.pagination.paginate(&matches);
        ScreenView {
            rendering: render(self.view_mode, page.items),
            page: page.page,
            total_pages: page.total_pages,
            total_matches: page.total_items,
            total_items: data.len(),
            tags: unique_tags(data),
        }
    }

    /// Entity the open dialog refers to, looked up in the current collection.
    pub fn selected<'a>(&self, data: Option<&'a [T]>) -> Option<&'a T> {
        let id = self.dialog.target()?;
        find_by_id(data.unwrap_or(&[]), id)
    }

    /// Like [`selected`](Self::selected), but a dialog pointing at an entity
    /// that has left the collection (deleted elsewhere) is an error.
    pub fn require_selected<'a>(&self, data: Option<&'a [T]>) -> DomainResult<&'a T> {
        self.selected(data).ok_or_else(DomainError::not_found)
    }

    /// Dispatch guard: the intent must match the open dialog.
    ///
    /// Deletes only go out from a confirmation dialog for the same entity.
    pub fn submit(&mut self, intent: MutationIntent<T::Id>) -> DomainResult<MutationTicket<T::Id>> {
        let allowed = match (&intent, &self.dialog) {
            (MutationIntent::Create, DialogState::Creating) => true,
            (MutationIntent::Update(id), DialogState::Editing(open)) => id == open,
            (MutationIntent::Delete(id), DialogState::ConfirmingDelete { id: open, .. }) => {
                id == open
            }
            _ => false,
        };
        if !allowed {
            return Err(DomainError::conflict(format!(
                "cannot {} from dialog state {:?}",
                intent.verb(),
                self.dialog
            )));
        }
        self.mutation.begin(intent)
    }

    /// Apply a backend response.
    ///
    /// Success closes the dialog (for deletes, any dialog showing the deleted
    /// entity) and clears upload state. Failure leaves the dialog open so the
    /// user can correct and resubmit.
    pub fn finish(
        &mut self,
        ticket: &MutationTicket<T::Id>,
        outcome: Result<(), String>,
    ) -> Completion<T::Id> {
        let succeeded = outcome.is_ok();
        let completion = self.mutation.complete(ticket, outcome);
        if let Completion::Applied(intent) = &completion {
            if succeeded {
                match intent {
                    MutationIntent::Delete(id) => self.dialog.on_deleted(id),
                    MutationIntent::Create | MutationIntent::Update(_) => self.dialog.close(),
                }
                self.upload.clear();
            }
        }
        completion
    }

    /// Close or step back from the current dialog.
    ///
    /// Any in-flight submission is abandoned; its response will be stale.
    /// Upload state is left alone.
    pub fn cancel_dialog(&mut self) {
        self.dialog.cancel();
        self.mutation.cancel();
    }
}
