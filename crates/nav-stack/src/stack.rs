//! Screen stack
//!
//! This module provides the ordered collection of screens behind a navigation
//! root:
//! - Stack entries owning their screen and its title bar mode
//! - A current-index cursor that follows its screen across mutations
//! - A lock flag that turns every mutation into a logged no-op
//! - Atomic rebase below a retained top entry, accepted only inside a settle
//!   window opened by whoever finishes a transition

use nav_screen::{Chrome, ModeState, Screen, ScreenId};
use std::fmt;

// =============================================================================
// Stack Entry
// =============================================================================

/// A screen owned by a stack, together with its title bar mode
pub struct StackEntry {
    screen: Box<dyn Screen>,
    mode: ModeState,
    destroyed: bool,
}

impl StackEntry {
    /// Wrap a screen in its normal mode
    pub fn new(screen: Box<dyn Screen>) -> Self {
        Self {
            screen,
            mode: ModeState::Normal,
            destroyed: false,
        }
    }

    /// Screen id
    pub fn id(&self) -> &ScreenId {
        self.screen.id()
    }

    /// The screen
    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }

    /// The screen, mutably
    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        self.screen.as_mut()
    }

    /// The screen, mutably, unless it was destroyed.
    ///
    /// Lifecycle hooks go through here so a destroyed screen never hears
    /// from the stack again.
    pub fn live_mut(&mut self) -> Option<&mut dyn Screen> {
        if self.destroyed {
            None
        } else {
            Some(self.screen.as_mut())
        }
    }

    /// Current title bar mode
    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    /// Replace the title bar mode
    pub fn set_mode(&mut self, mode: ModeState) {
        self.mode = mode;
    }

    /// Whether the screen has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Destroy the screen. Returns `false` when it already was.
    pub fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.screen.on_destroy();
        true
    }

    /// Chrome for the current mode
    pub fn chrome(&self) -> Chrome {
        self.screen.mode_chrome(&self.mode)
    }

    /// Give the screen back
    pub fn into_screen(self) -> Box<dyn Screen> {
        self.screen
    }
}

impl From<Box<dyn Screen>> for StackEntry {
    fn from(screen: Box<dyn Screen>) -> Self {
        Self::new(screen)
    }
}

impl fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEntry")
            .field("id", self.id())
            .field("mode", &self.mode)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

// =============================================================================
// Stack
// =============================================================================

/// Ordered screens, bottom to top, with a current-index cursor
#[derive(Debug, Default)]
pub struct Stack {
    entries: Vec<StackEntry>,
    current: usize,
    locked: bool,
    settling: bool,
}

impl Stack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Lock
    // -------------------------------------------------------------------------

    /// Lock or unlock the stack
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether mutations are currently rejected
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Open or close the settle window in which `rebase` is accepted
    pub fn set_settling(&mut self, settling: bool) {
        self.settling = settling;
    }

    /// Whether a transition is settling and `rebase` is accepted
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    fn refuse(&self, op: &'static str) -> bool {
        if self.locked {
            tracing::debug!(op, reason = "stack locked", "Stack mutation ignored");
        }
        self.locked
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Push an entry and make it current.
    ///
    /// The entry is handed back when the stack is locked.
    pub fn push(&mut self, entry: StackEntry) -> Result<(), StackEntry> {
        if self.refuse("push") {
            return Err(entry);
        }
        self.entries.push(entry);
        self.current = self.entries.len() - 1;
        Ok(())
    }

    /// Pop the top entry
    pub fn pop(&mut self) -> Option<StackEntry> {
        if self.refuse("pop") {
            return None;
        }
        let entry = self.entries.pop()?;
        self.clamp_cursor();
        Some(entry)
    }

    /// Insert an entry at `index` without changing which screen is current
    pub fn insert(&mut self, entry: StackEntry, index: usize) -> Result<(), StackEntry> {
        if self.refuse("insert") {
            return Err(entry);
        }
        if index > self.entries.len() {
            tracing::debug!(index, len = self.entries.len(), "Stack insert out of bounds");
            return Err(entry);
        }
        let was_empty = self.entries.is_empty();
        self.entries.insert(index, entry);
        if !was_empty && index <= self.current {
            self.current += 1;
        }
        Ok(())
    }

    /// Remove the entry at `index`.
    ///
    /// Removing the current entry makes the one below it current.
    pub fn remove(&mut self, index: usize) -> Option<StackEntry> {
        if self.refuse("remove") {
            return None;
        }
        if index >= self.entries.len() {
            tracing::debug!(index, len = self.entries.len(), "Stack remove out of bounds");
            return None;
        }
        let entry = self.entries.remove(index);
        if index <= self.current && self.current > 0 {
            self.current -= 1;
        }
        self.clamp_cursor();
        Some(entry)
    }

    /// Remove the entry holding screen `id`
    pub fn remove_by_id(&mut self, id: &ScreenId) -> Option<StackEntry> {
        let index = self.find(id)?;
        self.remove(index)
    }

    /// Move the entry at `from` to `to`; the current screen stays current
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if self.refuse("move") {
            return false;
        }
        let len = self.entries.len();
        if from >= len || to >= len {
            tracing::debug!(from, to, len, "Stack move out of bounds");
            return false;
        }
        if from == to {
            return true;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        true
    }

    /// Replace the stack contents with `entries`, keeping the top entry on top
    /// when `keep_top` is set.
    ///
    /// New entries duplicating the kept top or each other are dropped. Returns
    /// every entry that left the stack (replaced and dropped ones), or hands
    /// `entries` back when the stack is locked or not settling.
    pub fn rebase(
        &mut self,
        entries: Vec<StackEntry>,
        keep_top: bool,
    ) -> Result<Vec<StackEntry>, Vec<StackEntry>> {
        if self.refuse("rebase") {
            return Err(entries);
        }
        if !self.settling {
            tracing::debug!(reason = "not settling", "Stack rebase ignored");
            return Err(entries);
        }
        let top = if keep_top { self.entries.pop() } else { None };
        let mut displaced: Vec<StackEntry> = self.entries.drain(..).collect();

        let mut rebuilt: Vec<StackEntry> = Vec::with_capacity(entries.len() + 1);
        for entry in entries {
            let duplicate = top.as_ref().is_some_and(|top| top.id() == entry.id())
                || rebuilt.iter().any(|kept| kept.id() == entry.id());
            if duplicate {
                tracing::debug!(id = %entry.id(), "Duplicate entry dropped from rebase");
                displaced.push(entry);
            } else {
                rebuilt.push(entry);
            }
        }
        rebuilt.extend(top);

        self.entries = rebuilt;
        self.current = self.entries.len().saturating_sub(1);
        Ok(displaced)
    }

    /// Remove every entry
    pub fn clear(&mut self) -> Vec<StackEntry> {
        if self.refuse("clear") {
            return Vec::new();
        }
        self.current = 0;
        self.entries.drain(..).collect()
    }

    /// Remove destroyed entries that are not current
    pub fn purge_destroyed(&mut self) -> Vec<StackEntry> {
        let mut purged = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].is_destroyed() && index != self.current {
                if let Some(entry) = self.remove(index) {
                    purged.push(entry);
                    continue;
                }
                break;
            }
            index += 1;
        }
        purged
    }

    fn clamp_cursor(&mut self) {
        if self.current >= self.entries.len() {
            self.current = self.entries.len().saturating_sub(1);
        }
        debug_assert!(self.entries.is_empty() || self.current < self.entries.len());
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Current entry
    pub fn current(&self) -> Option<&StackEntry> {
        self.entries.get(self.current)
    }

    /// Current entry, mutably
    pub fn current_mut(&mut self) -> Option<&mut StackEntry> {
        self.entries.get_mut(self.current)
    }

    /// Index of the current entry
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Entry right below the current one
    pub fn previous(&self) -> Option<&StackEntry> {
        self.current.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Entry right below the current one, mutably
    pub fn previous_mut(&mut self) -> Option<&mut StackEntry> {
        let index = self.current.checked_sub(1)?;
        self.entries.get_mut(index)
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&StackEntry> {
        self.entries.get(index)
    }

    /// Entry at `index`, mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut StackEntry> {
        self.entries.get_mut(index)
    }

    /// Index of screen `id`
    pub fn find(&self, id: &ScreenId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Whether screen `id` is on the stack
    pub fn contains(&self, id: &ScreenId) -> bool {
        self.find(id).is_some()
    }

    /// Entries, bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter()
    }

    /// Entries, bottom to top, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StackEntry> {
        self.entries.iter_mut()
    }

    /// Screen ids, bottom to top
    pub fn ids(&self) -> Vec<ScreenId> {
        self.entries.iter().map(|entry| entry.id().clone()).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether there is an entry below the current one
    pub fn can_go_back(&self) -> bool {
        self.current > 0 && self.current < self.entries.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
