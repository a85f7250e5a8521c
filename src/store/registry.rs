//! Copy-on-write callback lists.
//!
//! A dispatch takes a snapshot (a clone of the `Rc`) before it walks the
//! list. Inserting or removing while a snapshot is alive clones the vector
//! first, so the walk keeps seeing the callbacks it started with.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone)]
pub(crate) struct Entry<T> {
    pub(crate) id: u64,
    pub(crate) item: T,
}

pub(crate) struct Registry<T> {
    entries: RefCell<Rc<Vec<Entry<T>>>>,
    next_id: Cell<u64>,
}

impl<T: Clone> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Rc::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    pub(crate) fn insert(&self, item: T) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut entries = self.entries.borrow_mut();
        Rc::make_mut(&mut *entries).push(Entry { id, item });
        id
    }

    /// Remove the entry with `id`. Returns false when it was already gone.
    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        if !entries.iter().any(|entry| entry.id == id) {
            return false;
        }
        Rc::make_mut(&mut *entries).retain(|entry| entry.id != id);
        true
    }

    pub(crate) fn snapshot(&self) -> Rc<Vec<Entry<T>>> {
        Rc::clone(&self.entries.borrow())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
