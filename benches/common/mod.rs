#![allow(clippy::new_without_default)]

pub mod add_remove;
pub mod dispatch;
pub mod filter_iter;
pub mod simple_insert;
pub mod simple_iter;
