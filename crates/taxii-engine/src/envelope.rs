//! The paged response wrapper shared by every multi-object query.

use serde::Serialize;

/// One page of query results plus whether more pages exist.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_next_page: bool) -> Self {
        Self {
            items,
            has_next_page,
        }
    }

    /// Project every item, keeping the paging flag.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next_page: self.has_next_page,
        }
    }

    /// Wrap the page in an [`Envelope`], offering `next` as the continuation
    /// token when more pages exist.
    pub fn into_envelope(self, next: Option<String>) -> Envelope<T> {
        Envelope::build(self.has_next_page, next, self.items)
    }
}

/// `{"more": .., "next": .., "objects": [page]}`.
///
/// `objects` always holds exactly one element: the (possibly empty) page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub more: bool,
    pub next: Option<String>,
    pub objects: Vec<Vec<T>>,
}

impl<T> Envelope<T> {
    /// `next` is forced to null when `more` is false.
    pub fn build(more: bool, next: Option<String>, page: Vec<T>) -> Self {
        Self {
            more,
            next: if more { next } else { None },
            objects: vec![page],
        }
    }

    /// The wrapped page.
    pub fn page(&self) -> &[T] {
        self.objects.first().map(Vec::as_slice).unwrap_or_default()
    }
}
