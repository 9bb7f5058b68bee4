mod arena;
mod handle;
mod node;
mod order;
mod raw_btree;

pub(crate) use raw_btree::{Position, RawBTree};
