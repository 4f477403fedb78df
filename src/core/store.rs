// Ordered entry store: an index-linked list laid out in a single arena.
// Entries are linked head to tail by arena index; append only ever touches the tail.
use std::iter::FusedIterator;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StoreOptions {
    /// Upper bound on live entries. Appends past it fail as allocation failures.
    pub max_entries: Option<usize>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Entry {
    value: i32,
    next: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Store {
    entries: Vec<Entry>,
    head: Option<usize>,
    tail: Option<usize>,
    options: StoreOptions,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Links a new entry at the tail.
    ///
    /// On failure nothing is linked and the existing entries are untouched.
    pub fn append(&mut self, value: i32) -> Result<(), Error> {
        if let Some(max) = self.options.max_entries {
            if self.entries.len() >= max {
                return Err(Error::new(ErrorKind::Allocation)
                    .with_message(format!("entry limit of {max} reached")));
            }
        }
        self.entries.try_reserve(1).map_err(|err| {
            Error::new(ErrorKind::Allocation)
                .with_message("failed to allocate entry")
                .with_source(err)
        })?;

        let index = self.entries.len();
        self.entries.push(Entry { value, next: None });
        match self.tail {
            Some(tail) => self.entries[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        Ok(())
    }

    /// Walks the links from head to tail. Restartable and read-only.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            entries: &self.entries,
            next: self.head,
            remaining: self.entries.len(),
        }
    }

    /// Releases every entry. Calling it on an empty store is a no-op.
    pub fn clear(&mut self) {
        let released = self.entries.len();
        self.entries.clear();
        self.entries.shrink_to_fit();
        self.head = None;
        self.tail = None;
        if released > 0 {
            tracing::debug!(released, "store cleared");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn first(&self) -> Option<i32> {
        self.head.map(|index| self.entries[index].value)
    }

    pub fn last(&self) -> Option<i32> {
        self.tail.map(|index| self.entries[index].value)
    }

    pub fn values(&self) -> Vec<i32> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Iter<'a> {
    entries: &'a [Entry],
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries[self.next?];
        self.next = entry.next;
        self.remaining -= 1;
        Some(entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
