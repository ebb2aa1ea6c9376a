//! Backend records addressed by a typed key.
//!
//! Screens never hold entities between frames; they keep an id (in a dialog,
//! in a pending mutation) and resolve it against whatever collection the
//! store currently has. That lookup lives here.

/// A record the backend assigns a stable key to (products, quality issues,
/// calendar source items).
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Resolve a key against a cached collection.
///
/// `None` when the record has left the collection, e.g. deleted by another
/// session and dropped by the last refetch.
pub fn find_by_id<'a, T: Entity>(items: &'a [T], id: &T::Id) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
