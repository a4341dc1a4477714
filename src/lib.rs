//! GlyphCore: Unicode Glyph Dataset + Fuzzy Search Engine
//!
//! A Rust/WASM implementation of the glyph reference search core. Runs inside
//! a dedicated worker so that loading and indexing ~150k Unicode characters
//! never blocks the UI thread.
//!
//! # Architecture
//!
//! ## Dataset Components
//! - `schema.rs` - Compact on-disk rows (`c`/`n`/`k`/`e`/`d`/`s`/`v`/`l`)
//! - `record.rs` - Normalized GlyphRecord / BlockRecord / ScriptRecord
//! - `encoding.rs` - UTF-32/16/8 hex unit derivation from scalar values
//! - `slug.rs` - Display-name to slug normalization
//! - `loader.rs` - DatasetLoader: parse, merge, block/script assignment,
//!   two-pass ligature backfill
//! - `store.rs` - GlyphStore: the frozen in-memory model
//!
//! ## Search Components
//! - `score.rs` - Weighted per-field fuzzy scorer (nucleo-matcher)
//! - `cache.rs` - Fixed-capacity LRU over query results
//! - `index.rs` - SearchIndex: O(1) lookups + capped fuzzy queries
//!
//! ## Worker Components
//! - `protocol.rs` - Tagged request/response messages (`type` + `payload`)
//! - `controller.rs` - RequestController: Uninitialized -> Loading -> Ready
//! - `wasm.rs` - GlyphWorker: fetch, message pump, console logging
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { GlyphWorker } from 'glyphcore';
//!
//! await init();
//!
//! // The worker shim hands its postMessage over so responses flow back out
//! const worker = new GlyphWorker((msg) => self.postMessage(msg), '/data');
//!
//! // Kick off the one-time dataset load; WORKER_READY arrives when done
//! worker.loadDataset('16.0');
//!
//! // Forward every inbound message to the engine
//! self.onmessage = (e) => worker.handleMessage(e.data);
//!
//! // e.g. { type: 'QUERY_REQUEST', payload: { query: 'heart' } }
//! //   -> { type: 'QUERY_RESPONSE', payload: { results: [...] } }
//! ```

pub mod config;
pub mod dataset;
pub mod debounce;
pub mod search;
pub mod worker;

// Public exports
pub use config::*;
pub use dataset::*;
pub use debounce::*;
pub use search::*;
pub use worker::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("glyphcore v{}", env!("CARGO_PKG_VERSION"))
}
