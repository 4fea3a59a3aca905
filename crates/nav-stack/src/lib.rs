//! Screen stack for the navigation shell
//!
//! A [`Stack`] owns its screens through [`StackEntry`] values. The navigation
//! context locks it for the duration of every transition, so it never changes
//! shape mid-animation.
//!
//! # Example
//!
//! ```rust
//! use nav_screen::{Chrome, Screen, ScreenId};
//! use nav_stack::{Stack, StackEntry};
//!
//! struct Page(ScreenId);
//!
//! impl Screen for Page {
//!     fn id(&self) -> &ScreenId {
//!         &self.0
//!     }
//!
//!     fn chrome(&self) -> Chrome {
//!         Chrome::default()
//!     }
//! }
//!
//! let mut stack = Stack::new();
//! stack.push(StackEntry::new(Box::new(Page(ScreenId::new("home"))))).unwrap();
//! stack.set_locked(true);
//! assert!(stack.push(StackEntry::new(Box::new(Page(ScreenId::new("chat"))))).is_err());
//! assert_eq!(stack.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod stack;

pub use stack::{Stack, StackEntry};
