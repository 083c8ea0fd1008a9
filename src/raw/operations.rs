//! The operations used to build, query, and tear down the trie.

mod clone;
mod deallocate;
mod delete;
mod insert;
mod lookup;
mod validate;

pub use clone::*;
pub use deallocate::*;
pub use delete::*;
pub use insert::*;
pub use lookup::*;
pub use validate::*;
