mod head;
mod interned;
mod node;
mod utils;

pub use interned::Interned;

pub(crate) use head::{Head, HeadRef};
pub(crate) use node::{NodeHeader, NodeRef};
