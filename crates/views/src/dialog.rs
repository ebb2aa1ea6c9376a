//! Per-screen dialog state machine.
//!
//! A screen is in exactly one of these states, so combinations like "editing
//! product 3 while confirming deletion of product 5" cannot be represented.

use stockroom_core::{DomainError, DomainResult};

/// Where a delete confirmation was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<Id> {
    Closed,
    Creating,
    Viewing(Id),
    Editing(Id),
    ConfirmingDelete { id: Id, origin: DeleteOrigin },
}

impl<Id> Default for DialogState<Id> {
    fn default() -> Self {
        DialogState::Closed
    }
}

impl<Id: Clone + PartialEq + core::fmt::Debug> DialogState<Id> {
    pub fn is_closed(&self) -> bool {
        matches!(self, DialogState::Closed)
    }

    /// Entity the open dialog refers to, if any.
    pub fn target(&self) -> Option<&Id> {
        match self {
            DialogState::Viewing(id)
            | DialogState::Editing(id)
            | DialogState::ConfirmingDelete { id, .. } => Some(id),
            DialogState::Closed | DialogState::Creating => None,
        }
    }

    pub fn open_detail(&mut self, id: Id) -> DomainResult<()> {
        match self {
            DialogState::Closed | DialogState::Viewing(_) => {}
            other => return Err(busy(other)),
        }
        *self = DialogState::Viewing(id);
        Ok(())
    }

    pub fn begin_create(&mut self) -> DomainResult<()> {
        if !self.is_closed() {
            return Err(busy(self));
        }
        *self = DialogState::Creating;
        Ok(())
    }

    /// Edit from the list, or from the detail view of the same entity.
    pub fn begin_edit(&mut self, id: Id) -> DomainResult<()> {
        match self {
            DialogState::Closed => {}
            DialogState::Viewing(current) if *current == id => {}
            other => return Err(busy(other)),
        }
        *self = DialogState::Editing(id);
        Ok(())
    }

    /// Open the destructive-action guard.
    pub fn request_delete(&mut self, id: Id) -> DomainResult<()> {
        let origin = match self {
            DialogState::Closed => DeleteOrigin::List,
            DialogState::Viewing(current) if *current == id => DeleteOrigin::Detail,
            other => return Err(busy(other)),
        };
        *self = DialogState::ConfirmingDelete { id, origin };
        Ok(())
    }

    /// Back out of the current dialog.
    ///
    /// Cancelling a delete opened from the detail view returns to that view.
    pub fn cancel(&mut self) {
        *self = match core::mem::take(self) {
            DialogState::ConfirmingDelete {
                id,
                origin: DeleteOrigin::Detail,
            } => DialogState::Viewing(id),
            _ => DialogState::Closed,
        };
    }

    pub fn close(&mut self) {
        *self = DialogState::Closed;
    }

    /// An entity was deleted: drop any dialog still pointing at it.
    pub fn on_deleted(&mut self, id: &Id) {
        if self.target() == Some(id) {
            *self = DialogState::Closed;
        }
    }
}

fn busy<Id: core::fmt::Debug>(state: &DialogState<Id>) -> DomainError {
    DomainError::conflict(format!("another dialog is open: {state:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_from_detail_of_same_entity() {
        let mut d = DialogState::Closed;
        d.open_detail(3).unwrap();
        d.begin_edit(3).unwrap();
        assert_eq!(d, DialogState::Editing(3));
    }

    #[test]
    fn cannot_edit_a_different_entity_while_viewing() {
        let mut d = DialogState::Viewing(3);
        assert!(matches!(d.begin_edit(5), Err(DomainError::Conflict(_))));
        assert_eq!(d, DialogState::Viewing(3));
    }

    #[test]
    fn cancel_delete_from_detail_returns_to_detail() {
        let mut d = DialogState::Viewing(7);
        d.request_delete(7).unwrap();
        assert_eq!(
            d,
            DialogState::ConfirmingDelete {
                id: 7,
                origin: DeleteOrigin::Detail
            }
        );
        d.cancel();
        assert_eq!(d, DialogState::Viewing(7));
    }

    #[test]
    fn cancel_delete_from_list_closes() {
        let mut d = DialogState::Closed;
        d.request_delete(7).unwrap();
        d.cancel();
        assert!(d.is_closed());
    }

    #[test]
    fn deleting_the_viewed_entity_closes_the_dialog() {
        let mut d = DialogState::Viewing(4);
        d.on_deleted(&4);
        assert!(d.is_closed());
    }

    #[test]
    fn deleting_another_entity_keeps_the_dialog() {
        let mut d = DialogState::Viewing(4);
        d.on_deleted(&9);
        assert_eq!(d, DialogState::Viewing(4));
    }

    #[test]
    fn create_requires_closed() {
        let mut d: DialogState<i64> = DialogState::Editing(1);
        assert!(d.begin_create().is_err());
        d.close();
        d.begin_create().unwrap();
        assert_eq!(d.target(), None);
    }
}
