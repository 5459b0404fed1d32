#![doc = include_str!("../README.md")]

mod aabb;
pub mod aabbtree;
mod error;
mod r#type;

pub use aabb::Aabb;
pub use error::{AabbTreeError, Result};
pub use r#type::TreeFloat;

#[cfg(test)]
pub(crate) mod test;
