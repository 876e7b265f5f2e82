//! Node storage for the red-black tree.
//!
//! Nodes live in a slot arena and refer to each other by slot index, so the
//! tree needs no raw pointers. Each slot carries a generation counter that is
//! bumped whenever the slot is vacated or its pair is swapped out; a
//! [`NodeId`] pairs the index with the generation it was issued under, which
//! lets a cursor detect that its node has been removed (even after the slot
//! was reused) or now holds a different pair.

use std::ops::{Index, IndexMut};

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Black => "BLACK",
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node.
///
/// The key-value pair is boxed separately from the node so that relocating a
/// pair between two nodes swaps two owning pointers and never moves the
/// payload itself.
pub struct Node<K, V> {
    pub(crate) entry: Box<(K, V)>,
    pub(crate) color: Color,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.entry.0
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.entry.1
    }
}

/// Generational handle to an arena slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

// =============================================================================
// Arena Definition
// =============================================================================

struct Slot<K, V> {
    generation: u32,
    node: Option<Node<K, V>>,
}

/// Slot arena owning every node of one tree.
///
/// Vacated slots are recycled through a free list, one node at a time.
pub struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Largest number of nodes the address space can hold.
    pub(crate) const fn max_len() -> usize {
        let per_node = size_of::<Slot<K, V>>() + size_of::<(K, V)>();
        let per_node = if per_node == 0 { 1 } else { per_node };
        isize::MAX.unsigned_abs() / per_node
    }

    /// Stores `entry` in a new red node with no children.
    pub(crate) fn allocate(&mut self, entry: Box<(K, V)>, parent: Option<usize>) -> usize {
        let node = Node {
            entry,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        };
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            return index;
        }
        let index = self.slots.len();
        if index == self.slots.capacity() {
            tracing::trace!(slots = index, "growing node arena");
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        index
    }

    /// Vacates the slot and hands back the pair it held.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant.
    #[allow(clippy::unnecessary_box_returns)]
    pub(crate) fn release(&mut self, index: usize) -> Box<(K, V)> {
        let slot = &mut self.slots[index];
        let Some(node) = slot.node.take() else {
            panic!("released vacant arena slot {index}");
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        node.entry
    }

    pub(crate) fn id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Resolves a handle, rejecting vacated or reissued slots.
    pub(crate) fn resolve(&self, id: NodeId) -> Option<usize> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation && slot.node.is_some())
            .map(|_| id.index)
    }

    /// Exchanges the pairs held by two distinct nodes.
    ///
    /// Both slots get a new generation: handles issued before the swap
    /// named a pair that is no longer where they point.
    pub(crate) fn swap_entries(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let (head, tail) = self.slots.split_at_mut(high);
        let (low_slot, high_slot) = (&mut head[low], &mut tail[0]);
        if let (Some(low_node), Some(high_node)) = (low_slot.node.as_mut(), high_slot.node.as_mut())
        {
            std::mem::swap(&mut low_node.entry, &mut high_node.entry);
            low_slot.generation = low_slot.generation.wrapping_add(1);
            high_slot.generation = high_slot.generation.wrapping_add(1);
        }
    }

    /// Occupied slots in arena order, mutably.
    pub(crate) fn occupied_mut(&mut self) -> impl Iterator<Item = (usize, &mut Node<K, V>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.node.as_mut().map(|node| (index, node)))
    }

    /// Number of slots ever issued, vacant ones included.
    pub(crate) const fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Index<usize> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, index: usize) -> &Self::Output {
        self.slots[index]
            .node
            .as_ref()
            .unwrap_or_else(|| panic!("vacant arena slot {index}"))
    }
}

impl<K, V> IndexMut<usize> for Arena<K, V> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.slots[index]
            .node
            .as_mut()
            .unwrap_or_else(|| panic!("vacant arena slot {index}"))
    }
}

// =============================================================================
// Tests
// =============================================================================
