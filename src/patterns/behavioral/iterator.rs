//! Pattern: Iterator
//! Example: Walking a collection without exposing its storage
//!
//! `CollectionIterator` is the explicit `has_next` / `next` protocol; the same
//! iterator also implements `std::iter::Iterator`, so it works in `for` loops.

pub trait CollectionIterator {
    type Item;

    fn has_next(&self) -> bool;
    fn next_item(&mut self) -> Option<Self::Item>;
}

pub trait Aggregate {
    type Iter: CollectionIterator;

    fn create_iterator(&self) -> Self::Iter;
}

#[derive(Debug, Clone)]
pub struct ConcreteIterator<T> {
    collection: Vec<T>,
    position: usize,
}

impl<T: Clone> ConcreteIterator<T> {
    pub fn new(collection: Vec<T>) -> Self {
        Self {
            collection,
            position: 0,
        }
    }
}

impl<T: Clone> CollectionIterator for ConcreteIterator<T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.position < self.collection.len()
    }

    fn next_item(&mut self) -> Option<T> {
        let item = self.collection.get(self.position).cloned()?;
        self.position += 1;
        Some(item)
    }
}

impl<T: Clone> Iterator for ConcreteIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.next_item()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.collection.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ConcreteIterator<T> {}

#[derive(Debug, Clone, Default)]
pub struct ConcreteAggregate<T> {
    items: Vec<T>,
}

impl<T: Clone> ConcreteAggregate<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add_item(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Aggregate for ConcreteAggregate<T> {
    type Iter = ConcreteIterator<T>;

    fn create_iterator(&self) -> ConcreteIterator<T> {
        ConcreteIterator::new(self.items.clone())
    }
}

impl<T: Clone> IntoIterator for &ConcreteAggregate<T> {
    type Item = T;
    type IntoIter = ConcreteIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.create_iterator()
    }
}

#[derive(Debug, Default)]
pub struct Client<T> {
    aggregate: ConcreteAggregate<T>,
}

impl<T: Clone> Client<T> {
    pub fn new() -> Self {
        Self {
            aggregate: ConcreteAggregate::new(),
        }
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.aggregate.add_item(item);
        }
    }

    pub fn iterate(&self) -> Vec<T> {
        let mut iterator = self.aggregate.create_iterator();
        let mut result = Vec::new();
        while iterator.has_next() {
            if let Some(item) = iterator.next_item() {
                result.push(item);
            }
        }
        result
    }
}

#[cfg(test)]
mod iterator_tests {
    use super::*;

    #[test]
    fn test_has_next_and_next() {
        let mut iter = ConcreteIterator::new(vec![1, 2, 3]);
        assert!(iter.has_next());
        assert_eq!(iter.next_item(), Some(1));
        assert_eq!(iter.next_item(), Some(2));
        assert_eq!(iter.next_item(), Some(3));
        assert!(!iter.has_next());
        assert_eq!(iter.next_item(), None);
    }

    #[test]
    fn test_empty_aggregate() {
        let aggregate: ConcreteAggregate<i32> = ConcreteAggregate::new();
        assert!(aggregate.is_empty());
        assert!(!aggregate.create_iterator().has_next());
    }

    #[test]
    fn test_aggregate_works_in_for_loop() {
        let mut aggregate = ConcreteAggregate::new();
        aggregate.add_item("a");
        aggregate.add_item("b");

        let mut seen = Vec::new();
        for item in &aggregate {
            seen.push(item);
        }
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(aggregate.create_iterator().len(), 2);
    }

    #[test]
    fn test_client_iterate() {
        let mut client = Client::new();
        client.add_items(vec!["item1".to_string(), "item2".to_string(), "item3".to_string()]);
        assert_eq!(client.iterate(), vec!["item1", "item2", "item3"]);
    }
}
