pub mod controller;
pub mod protocol;
pub mod wasm;

pub use controller::*;
pub use protocol::*;
pub use wasm::*;

#[cfg(test)]
mod tests;
