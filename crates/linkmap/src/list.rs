//! Slot-arena doubly linked list
//!
//! A circular doubly linked list stored in a slab of slots, with the
//! sentinel occupying slot 0. Links are slot indices, so the structure has
//! no raw pointer cycles; positions are handed out as generational
//! [`Cursor`]s that detect use after erase.
//!
//! Node payloads live in `Rc<RefCell<T>>` cells. Two nodes in *different*
//! lists can be bound to each other, after which both alias one shared cell
//! and each records the partner's cursor (its "dual"). The shared cell is
//! released once, when the last of the two nodes is dropped.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::{Error, Result};

/// Slot index of the sentinel node
const SENTINEL: usize = 0;

/// Position in a [`DoubleList`]
///
/// Cursors stay cheap to copy and compare. A cursor taken before its node
/// was erased is detected as stale by the generation check and fails with
/// [`Error::InvalidIterator`] instead of observing a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    gen: u32,
}

/// Linked node stored in one slot
struct Node<T> {
    /// Shared payload cell; `None` only on the sentinel
    value: Option<Rc<RefCell<T>>>,
    prev: usize,
    next: usize,
    /// Cursor of the bound partner node in another list, if any
    dual: Option<Cursor>,
}

/// One arena slot: generation counter plus the node, if occupied
struct Slot<T> {
    gen: u32,
    node: Option<Node<T>>,
}

/// Circular doubly linked list over a slot arena
pub struct DoubleList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> DoubleList<T> {
    /// Create an empty list (sentinel only)
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                gen: 0,
                node: Some(Node {
                    value: None,
                    prev: SENTINEL,
                    next: SENTINEL,
                    dual: None,
                }),
            }],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the list holds no nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor to the first node, or `end()` if the list is empty
    pub fn begin(&self) -> Cursor {
        self.cursor(self.links(SENTINEL).1)
    }

    /// Cursor one past the last node (the sentinel position)
    pub fn end(&self) -> Cursor {
        self.cursor(SENTINEL)
    }

    /// Insert a new node at the front, returning its cursor
    pub fn insert_head(&mut self, value: T) -> Cursor {
        let index = self.alloc(Rc::new(RefCell::new(value)), None);
        self.link_after(SENTINEL, index);
        self.len += 1;
        self.cursor(index)
    }

    /// Insert a new node at the back, returning its cursor
    pub fn insert_tail(&mut self, value: T) -> Cursor {
        let tail = self.links(SENTINEL).0;
        let index = self.alloc(Rc::new(RefCell::new(value)), None);
        self.link_after(tail, index);
        self.len += 1;
        self.cursor(index)
    }

    /// Remove the first node; does nothing on an empty list
    pub fn delete_head(&mut self) {
        if self.is_empty() {
            return;
        }
        let head = self.links(SENTINEL).1;
        self.unlink(head);
        self.release(head);
        self.len -= 1;
    }

    /// Remove the last node; does nothing on an empty list
    pub fn delete_tail(&mut self) {
        if self.is_empty() {
            return;
        }
        let tail = self.links(SENTINEL).0;
        self.unlink(tail);
        self.release(tail);
        self.len -= 1;
    }

    /// Remove every node
    pub fn clear(&mut self) {
        while !self.is_empty() {
            self.delete_head();
        }
    }

    /// Erase the node at `cur` and return the cursor of its successor
    /// (or `end()` if it was last). Erasing `end()` is a no-op that hands
    /// the cursor back unchanged.
    ///
    /// A bound partner in another list is not touched here; its
    /// back-reference simply goes stale, which the generation check
    /// reports as [`Error::InvalidIterator`] if it is ever followed.
    pub fn erase(&mut self, cur: Cursor) -> Result<Cursor> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        if node.value.is_none() {
            return Ok(cur);
        }
        let next = node.next;
        self.unlink(cur.index);
        self.release(cur.index);
        self.len -= 1;
        Ok(self.cursor(next))
    }

    /// Splice the node at `cur` to the front without reallocating it
    ///
    /// The node keeps its slot, cursor identity and dual binding.
    pub fn move_to_head(&mut self, cur: Cursor) -> Result<()> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        if node.value.is_none() {
            return Err(Error::InvalidIterator);
        }
        if self.links(SENTINEL).1 == cur.index {
            return Ok(());
        }
        self.unlink(cur.index);
        self.link_after(SENTINEL, cur.index);
        Ok(())
    }

    /// Advance a cursor to the next position
    ///
    /// Fails with [`Error::IndexOutOfBound`] when `cur` is already `end()`,
    /// and with [`Error::InvalidIterator`] when `cur` is stale.
    pub fn next(&self, cur: Cursor) -> Result<Cursor> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        if cur.index == SENTINEL {
            return Err(Error::IndexOutOfBound);
        }
        Ok(self.cursor(node.next))
    }

    /// Retreat a cursor to the previous position
    ///
    /// Fails with [`Error::IndexOutOfBound`] when `cur` is already the
    /// first position. Retreating from `end()` yields the last node.
    pub fn prev(&self, cur: Cursor) -> Result<Cursor> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        if node.prev == SENTINEL {
            return Err(Error::IndexOutOfBound);
        }
        Ok(self.cursor(node.prev))
    }

    /// Borrow the value at `cur`
    ///
    /// Fails with [`Error::InvalidIterator`] on `end()` or a stale cursor.
    pub fn get(&self, cur: Cursor) -> Result<Ref<'_, T>> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        let cell = node.value.as_ref().ok_or(Error::InvalidIterator)?;
        Ok(cell.borrow())
    }

    /// Mutably borrow the value at `cur`
    pub fn get_mut(&mut self, cur: Cursor) -> Result<RefMut<'_, T>> {
        let node = self.live(cur).ok_or(Error::InvalidIterator)?;
        let cell = node.value.as_ref().ok_or(Error::InvalidIterator)?;
        Ok(cell.borrow_mut())
    }

    /// Bind the node at `at` to the node at `target` in another list
    ///
    /// The node at `at` drops its own payload cell and adopts `target`'s,
    /// so both nodes alias one logical value from here on; the two dual
    /// cursors are set symmetrically. Binding happens at most once per
    /// node: if either side already has a dual this fails with
    /// [`Error::AlreadyBound`].
    pub fn bind(&mut self, at: Cursor, other: &mut DoubleList<T>, target: Cursor) -> Result<()> {
        {
            let node = self.live(at).ok_or(Error::InvalidIterator)?;
            if node.value.is_none() {
                return Err(Error::InvalidIterator);
            }
            if node.dual.is_some() {
                return Err(Error::AlreadyBound);
            }
        }
        let cell = {
            let node = other.live(target).ok_or(Error::InvalidIterator)?;
            if node.dual.is_some() {
                return Err(Error::AlreadyBound);
            }
            Rc::clone(node.value.as_ref().ok_or(Error::InvalidIterator)?)
        };
        if let Some(node) = self.live_mut(at) {
            node.value = Some(cell);
            node.dual = Some(target);
        }
        if let Some(node) = other.live_mut(target) {
            node.dual = Some(at);
        }
        Ok(())
    }

    /// Cursor of the bound partner node, if the node at `cur` is bound
    pub fn dual(&self, cur: Cursor) -> Option<Cursor> {
        self.live(cur).and_then(|node| node.dual)
    }

    /// Iterate values front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            at: self.links(SENTINEL).1,
        }
    }

    /// Overwrite a node's dual cursor; used after rehashing migrates the
    /// partner node to a new slot
    pub(crate) fn set_dual(&mut self, cur: Cursor, partner: Cursor) {
        if let Some(node) = self.live_mut(cur) {
            node.dual = Some(partner);
        }
    }

    /// Detach the head node and hand back its shared cell and dual
    pub(crate) fn pop_head_parts(&mut self) -> Option<(Rc<RefCell<T>>, Option<Cursor>)> {
        if self.is_empty() {
            return None;
        }
        let head = self.links(SENTINEL).1;
        self.unlink(head);
        let parts = match self.slots[head].node.take() {
            Some(node) => node.value.map(|cell| (cell, node.dual)),
            None => None,
        };
        self.slots[head].gen = self.slots[head].gen.wrapping_add(1);
        self.free.push(head);
        self.len -= 1;
        parts
    }

    /// Append a node rebuilt from a migrated cell and dual
    pub(crate) fn push_tail_parts(&mut self, cell: Rc<RefCell<T>>, dual: Option<Cursor>) -> Cursor {
        let tail = self.links(SENTINEL).0;
        let index = self.alloc(cell, dual);
        self.link_after(tail, index);
        self.len += 1;
        self.cursor(index)
    }

    /// Iterate cursors front to back
    pub(crate) fn cursors(&self) -> Cursors<'_, T> {
        Cursors {
            list: self,
            at: self.links(SENTINEL).1,
        }
    }

    fn cursor(&self, index: usize) -> Cursor {
        Cursor {
            index,
            gen: self.slots[index].gen,
        }
    }

    fn live(&self, cur: Cursor) -> Option<&Node<T>> {
        let slot = self.slots.get(cur.index)?;
        if slot.gen != cur.gen {
            return None;
        }
        slot.node.as_ref()
    }

    fn live_mut(&mut self, cur: Cursor) -> Option<&mut Node<T>> {
        let slot = self.slots.get_mut(cur.index)?;
        if slot.gen != cur.gen {
            return None;
        }
        slot.node.as_mut()
    }

    /// `(prev, next)` links of the node at `index`
    fn links(&self, index: usize) -> (usize, usize) {
        match &self.slots[index].node {
            Some(node) => (node.prev, node.next),
            None => (SENTINEL, SENTINEL),
        }
    }

    fn alloc(&mut self, cell: Rc<RefCell<T>>, dual: Option<Cursor>) -> usize {
        let node = Node {
            value: Some(cell),
            prev: SENTINEL,
            next: SENTINEL,
            dual,
        };
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            self.slots.push(Slot { gen: 0, node: Some(node) });
            self.slots.len() - 1
        }
    }

    /// Drop the node at `index` and bump the slot generation so stale
    /// cursors are caught
    fn release(&mut self, index: usize) {
        self.slots[index].node = None;
        self.slots[index].gen = self.slots[index].gen.wrapping_add(1);
        self.free.push(index);
    }

    /// Link the node at `index` directly after `anchor`
    fn link_after(&mut self, anchor: usize, index: usize) {
        let next = self.links(anchor).1;
        if let Some(node) = &mut self.slots[index].node {
            node.prev = anchor;
            node.next = next;
        }
        if let Some(node) = &mut self.slots[anchor].node {
            node.next = index;
        }
        if let Some(node) = &mut self.slots[next].node {
            node.prev = index;
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = self.links(index);
        if let Some(node) = &mut self.slots[prev].node {
            node.next = next;
        }
        if let Some(node) = &mut self.slots[next].node {
            node.prev = prev;
        }
    }
}

impl<T> Default for DoubleList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward iterator over list values
pub struct Iter<'a, T> {
    list: &'a DoubleList<T>,
    at: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Ref<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at == SENTINEL {
            return None;
        }
        let node = self.list.slots[self.at].node.as_ref()?;
        let cell = node.value.as_ref()?;
        self.at = node.next;
        Some(cell.borrow())
    }
}

/// Forward iterator over list cursors
pub(crate) struct Cursors<'a, T> {
    list: &'a DoubleList<T>,
    at: usize,
}

impl<T> Iterator for Cursors<'_, T> {
    type Item = Cursor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at == SENTINEL {
            return None;
        }
        let cur = self.list.cursor(self.at);
        self.at = match &self.list.slots[self.at].node {
            Some(node) => node.next,
            None => SENTINEL,
        };
        Some(cur)
    }
}
