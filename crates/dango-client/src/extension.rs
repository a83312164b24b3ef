//! Typed client extensions
//!
//! An extension is a value derived once from a client, e.g. a handle for a
//! particular contract that keeps a clone of the client and its address. The
//! client stores extensions by type; a later extension of the same type
//! replaces the earlier one in place. Extensions never touch the client's
//! transport, signer or name.

use std::{
    any::{Any, TypeId, type_name},
    fmt,
    sync::Arc,
};

use crate::client::Client;

#[derive(Clone)]
struct Entry {
    type_id: TypeId,
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Extensions attached to a client, in attachment order.
#[derive(Clone, Default)]
pub struct Extensions {
    entries: Vec<Entry>,
}

impl Extensions {
    pub(crate) fn insert<E: Any + Send + Sync>(&mut self, value: E) {
        let entry =
            Entry { type_id: TypeId::of::<E>(), name: type_name::<E>(), value: Arc::new(value) };
        match self.entries.iter_mut().find(|existing| existing.type_id == entry.type_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get<E: Any>(&self) -> Option<&E> {
        self.entries
            .iter()
            .find(|entry| entry.type_id == TypeId::of::<E>())
            .and_then(|entry| entry.value.downcast_ref())
    }

    pub fn contains<E: Any>(&self) -> bool {
        self.get::<E>().is_some()
    }

    /// Type names of the attached extensions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Something that can be attached to a client.
///
/// A pair applies its first element, then its second, so
/// `client.with((a, (b, c)))` and `client.with(((a, b), c))` build the same
/// client as `client.with(a).with(b).with(c)`.
pub trait Extension<T> {
    fn apply(self, client: Client<T>) -> Client<T>;
}

/// Extension computed by a closure over the client being extended.
#[derive(Clone, Copy, Debug)]
pub struct FnExtension<F>(F);

/// Wrap a closure into an [`Extension`].
pub const fn extension<T, F, E>(f: F) -> FnExtension<F>
where
    F: FnOnce(&Client<T>) -> E,
    E: Any + Send + Sync,
{
    FnExtension(f)
}

impl<T, F, E> Extension<T> for FnExtension<F>
where
    F: FnOnce(&Client<T>) -> E,
    E: Any + Send + Sync,
{
    fn apply(self, mut client: Client<T>) -> Client<T> {
        let value = (self.0)(&client);
        client.extensions_mut().insert(value);
        client
    }
}

impl<T, A, B> Extension<T> for (A, B)
where
    A: Extension<T>,
    B: Extension<T>,
{
    fn apply(self, client: Client<T>) -> Client<T> {
        self.1.apply(self.0.apply(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[test]
    fn test_insert_replaces_in_place() {
        let mut extensions = Extensions::default();
        extensions.insert(Counter(1));
        extensions.insert(Label("dex"));
        extensions.insert(Counter(2));

        assert_eq!(extensions.len(), 2);
        assert_eq!(extensions.get::<Counter>(), Some(&Counter(2)));
        assert_eq!(extensions.get::<Label>(), Some(&Label("dex")));
        assert!(!extensions.contains::<String>());

        let names: Vec<_> = extensions.names().collect();
        assert!(names[0].ends_with("Counter"));
        assert!(names[1].ends_with("Label"));
    }
}
