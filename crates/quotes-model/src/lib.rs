pub mod index;
pub mod page;

pub use index::*;
pub use page::*;
