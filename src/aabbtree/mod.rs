//! An axis-aligned bounding box tree with pluggable split strategies.

mod builder;
pub mod constants;
mod index;
mod linear;
mod node;
mod proxy;
pub mod split;
mod traversal;

pub use index::{AabbTree, AabbTree2, AabbTree3};
pub use linear::{LinearAabbTree, LinearNode};
pub use node::{Node, NodeId, NodeKind};
pub use proxy::Proxy;
pub use split::{
    EqualCountSplit, EqualDimensionSplit, Split, SplitOutcome, SplitParams, SurfaceAreaSplit,
};
pub use traversal::{NodeRef, Preorder};
