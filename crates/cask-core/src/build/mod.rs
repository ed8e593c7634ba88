//! CST to typed-tree conversion
//!
//! The builders walk the rowan tree in document order with a single
//! [`Cursor`]. Every byte between two consumed elements is captured as the
//! [`Space`](crate::tree::Space) of the later element, which is what makes
//! printing lossless.

mod classify;
mod cursor;
mod instructions;
mod split;

pub use classify::{TokenClass, classify};
pub use cursor::{Cursor, Position};
pub use instructions::build_document;
pub use split::{ImageReference, split_argument, split_image_reference, split_user};
