//! Selection sets and the parent container that hands out their context menu.

use std::fmt;

use crate::error::{Error, Result};
use crate::handler::ContextMenuHandler;

/// An item that can be part of a [`Selection`].
pub trait SelectionItem {
    /// Identity of the item's parent container. Two items share a parent when their keys are equal.
    type ParentKey: PartialEq + fmt::Debug;

    fn parent_key(&self) -> Self::ParentKey;
}

/// A non-empty, ordered set of items that all live in the same parent container.
#[derive(Debug, Clone)]
pub struct Selection<I> {
    items: Vec<I>,
}

impl<I: SelectionItem> Selection<I> {
    /// Validate `items` into a selection.
    ///
    /// Fails with [`Error::EmptySelection`] when no items are given and with
    /// [`Error::MixedParents`] when any item's parent differs from the first item's.
    pub fn new(items: impl IntoIterator<Item = I>) -> Result<Self> {
        let items: Vec<I> = items.into_iter().collect();
        let Some((first, rest)) = items.split_first() else {
            return Err(Error::EmptySelection);
        };

        let parent = first.parent_key();
        if let Some(offset) = rest.iter().position(|item| item.parent_key() != parent) {
            return Err(Error::MixedParents {
                position: offset + 1,
            });
        }

        Ok(Self { items })
    }
}

impl<I> Selection<I> {
    /// A selection of exactly one item.
    pub fn single(item: I) -> Self {
        Self { items: vec![item] }
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn first(&self) -> &I {
        &self.items[0]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for symmetry with [`Selection::len`].
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<I> {
        self.items
    }
}

impl<'a, I> IntoIterator for &'a Selection<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The container the selected items live in.
///
/// Supplied by the surrounding navigation code; it turns a selection into a context-menu object
/// scoped to exactly those items.
pub trait ParentContainer<I> {
    type Handler: ContextMenuHandler;

    fn context_menu_for(&self, selection: &Selection<I>) -> Result<Self::Handler>;
}
