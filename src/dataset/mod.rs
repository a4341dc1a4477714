pub mod encoding;
pub mod loader;
pub mod record;
pub mod schema;
pub mod slug;
pub mod store;

pub use encoding::*;
pub use loader::*;
pub use record::*;
pub use schema::*;
pub use slug::*;
pub use store::*;
