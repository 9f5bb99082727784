//! Helper functions used while rendering posts
//!
//! Slug generation and validation, post URL resolution and date display.

mod date;
mod slug;

pub use date::*;
pub use slug::*;
