use crate::graph::error::IndexAccessError;
use std::fmt::{Debug, Display};
use std::hash::Hash;

pub mod vec_index_store;

pub use vec_index_store::VecIndexStore;

pub trait Index:
    From<usize> + Into<usize> + Copy + Clone + Eq + Ord + Hash + Display + Debug
{
}

/// Thing that can hold an id.
pub trait Ideable<I> {
    fn get_id(&self) -> I;
    fn set_id(&mut self, id: I);
}

/// Container for items of arbitrary kind which issues a stable index for every item that is added.
/// The index does not change as long as the item remains in the container.
/// After an item has been removed, its index can be reused.
/// Items and indices are always iterated in ascending index order.
pub trait IndexStore<N: Index, V: Ideable<N>> {
    /// Pushes a new item into the store and returns the assigned index.
    fn push(&mut self, item: V) -> N;
    /// Inserts an item under the given index.
    /// # Errors
    /// If the index is already taken, an IndexAccessError is returned.
    fn insert(&mut self, item: V, index: N) -> Result<(), IndexAccessError<N>>;
    /// Removes the item with the given index and returns it. Returns None if the index is invalid.
    fn remove(&mut self, index: N) -> Option<V>;

    fn get(&self, index: N) -> Option<&V>;
    fn get_mut(&mut self, index: N) -> Option<&mut V>;
    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a V> + 'a>;
    fn indices<'a>(&'a self) -> Box<dyn Iterator<Item = N> + 'a>;

    /// Index the next pushed item would get.
    fn next_index(&self) -> N;
    fn is_valid_index(&self, index: N) -> bool;
    fn is_empty(&self) -> bool;
    fn len(&self) -> usize;
}
