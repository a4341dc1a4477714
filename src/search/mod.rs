pub mod cache;
pub mod index;
pub mod score;

pub use cache::*;
pub use index::*;
pub use score::*;
