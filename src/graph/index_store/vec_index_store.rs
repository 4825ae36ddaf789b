use crate::graph::error::IndexAccessError;
use crate::graph::index_store::{Ideable, Index, IndexStore};
use std::marker::PhantomData;

pub struct VecIndexStore<N: Index, V: Ideable<N>> {
    data: Vec<Option<V>>,
    count: usize,
    least_free_index: usize,
    p: PhantomData<N>,
}

impl<N: Index, V: Ideable<N>> VecIndexStore<N, V> {
    pub fn new() -> VecIndexStore<N, V> {
        VecIndexStore {
            data: Vec::new(),
            count: 0,
            least_free_index: 0,
            p: PhantomData::default(),
        }
    }

    fn advance_least_free(&mut self) {
        while self.least_free_index < self.data.len() && self.data[self.least_free_index].is_some()
        {
            self.least_free_index += 1;
        }
    }
}

impl<N: Index, V: Ideable<N>> Default for VecIndexStore<N, V> {
    fn default() -> Self {
        VecIndexStore::new()
    }
}

impl<N: Index, V: Ideable<N>> IndexStore<N, V> for VecIndexStore<N, V> {
    fn push(&mut self, mut item: V) -> N {
        let result = N::from(self.least_free_index);
        item.set_id(result);
        if self.least_free_index < self.data.len() {
            self.data[self.least_free_index] = Some(item);
        } else {
            self.data.push(Some(item));
        }
        self.count += 1;
        self.advance_least_free();
        result
    }

    fn insert(&mut self, mut item: V, index: N) -> Result<(), IndexAccessError<N>> {
        let i: usize = index.into();
        if self.is_valid_index(index) {
            return Err(IndexAccessError::new(index));
        }
        while self.data.len() <= i {
            self.data.push(None);
        }
        item.set_id(index);
        self.data[i] = Some(item);
        self.count += 1;
        self.advance_least_free();
        Ok(())
    }

    fn remove(&mut self, index: N) -> Option<V> {
        let i: usize = index.into();
        let removed = self.data.get_mut(i).and_then(|slot| slot.take());
        if removed.is_some() {
            self.count -= 1;
            if i < self.least_free_index {
                self.least_free_index = i;
            }
            while matches!(self.data.last(), Some(None)) {
                self.data.pop();
            }
        }
        removed
    }

    fn get(&self, index: N) -> Option<&V> {
        match self.data.get(index.into()) {
            Some(Some(x)) => Some(x),
            _ => None,
        }
    }

    fn get_mut(&mut self, index: N) -> Option<&mut V> {
        match self.data.get_mut(index.into()) {
            Some(Some(x)) => Some(x),
            _ => None,
        }
    }

    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a V> + 'a> {
        Box::new(self.data.iter().filter_map(|o| o.as_ref()))
    }

    fn indices<'a>(&'a self) -> Box<dyn Iterator<Item = N> + 'a> {
        Box::new(
            self.data
                .iter()
                .enumerate()
                .filter(|(_, o)| o.is_some())
                .map(|(i, _)| N::from(i)),
        )
    }

    fn next_index(&self) -> N {
        N::from(self.least_free_index)
    }

    fn is_valid_index(&self, index: N) -> bool {
        matches!(self.data.get(index.into()), Some(Some(_)))
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn len(&self) -> usize {
        self.count
    }
}

impl<N: Index, V: Ideable<N> + Clone> Clone for VecIndexStore<N, V> {
    fn clone(&self) -> Self {
        VecIndexStore {
            data: self.data.clone(),
            count: self.count,
            least_free_index: self.least_free_index,
            p: PhantomData::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::indices::VertexI;
    use itertools::Itertools;

    #[derive(Clone, Debug)]
    struct Item {
        id: VertexI,
        label: &'static str,
    }

    impl Ideable<VertexI> for Item {
        fn get_id(&self) -> VertexI {
            self.id
        }
        fn set_id(&mut self, id: VertexI) {
            self.id = id
        }
    }

    fn item(label: &'static str) -> Item {
        Item {
            id: VertexI(usize::MAX),
            label,
        }
    }

    #[test]
    fn test_push_reuses_freed_index() {
        let mut store: VecIndexStore<VertexI, Item> = VecIndexStore::new();
        let a = store.push(item("a"));
        let b = store.push(item("b"));
        let c = store.push(item("c"));
        assert_eq!((a, b, c), (VertexI(0), VertexI(1), VertexI(2)));

        assert_eq!(store.remove(b).map(|i| i.label), Some("b"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_index(), VertexI(1));

        let d = store.push(item("d"));
        assert_eq!(d, VertexI(1));
        assert_eq!(store.get(d).map(|i| i.id), Some(VertexI(1)));
        assert_eq!(store.next_index(), VertexI(3));
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut store: VecIndexStore<VertexI, Item> = VecIndexStore::new();
        store.insert(item("x"), VertexI(7)).unwrap();
        store.insert(item("y"), VertexI(2)).unwrap();
        assert!(store.insert(item("z"), VertexI(7)).is_err());

        assert_eq!(store.indices().collect_vec(), vec![VertexI(2), VertexI(7)]);
        assert_eq!(store.values().map(|i| i.label).collect_vec(), vec!["y", "x"]);
        assert_eq!(store.next_index(), VertexI(0));
        assert!(store.is_valid_index(VertexI(7)));
        assert!(!store.is_valid_index(VertexI(3)));
        assert!(!store.is_valid_index(VertexI(100)));
    }

    #[test]
    fn test_remove_invalid() {
        let mut store: VecIndexStore<VertexI, Item> = VecIndexStore::new();
        assert!(store.remove(VertexI(4)).is_none());
        store.push(item("a"));
        assert!(store.remove(VertexI(0)).is_some());
        assert!(store.remove(VertexI(0)).is_none());
        assert!(store.is_empty());
    }
}
