//! Directory tree model: path keys, node records and the node cache.

pub mod cache;
pub mod node;
pub mod path;

pub use cache::{LoadTicket, NodeCache};
pub use node::TreeNode;
