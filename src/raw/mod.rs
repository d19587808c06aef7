mod arena;
mod handle;
mod node;
mod raw_rb_tree;

pub(crate) use raw_rb_tree::{InOrder, RawRBTree, SearchResult};
