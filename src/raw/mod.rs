mod link;
mod node;
mod raw_treap;

pub(crate) use link::Link;
pub(crate) use node::Node;
pub(crate) use raw_treap::*;
