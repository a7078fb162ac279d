//! Append-only singly linked list.
//!
//! Links are kept in an index arena; `head`/`tail` and each link's `next`
//! are positions in that arena, so appends are O(1) without shared pointers.

#[derive(Debug, Clone)]
struct Link<T> {
    value: T,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SinglyLinkedChain<T> {
    links: Vec<Link<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> Default for SinglyLinkedChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SinglyLinkedChain<T> {
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub fn append(&mut self, value: T) {
        let index = self.links.len();
        self.links.push(Link { value, next: None });

        match self.tail {
            Some(tail) => self.links[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            chain: self,
            cursor: self.head,
        }
    }
}

pub struct ChainIter<'a, T> {
    chain: &'a SinglyLinkedChain<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = &self.chain.links[self.cursor?];
        self.cursor = link.next;
        Some(&link.value)
    }
}

impl<'a, T> IntoIterator for &'a SinglyLinkedChain<T> {
    type Item = &'a T;
    type IntoIter = ChainIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
