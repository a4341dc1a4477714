//! Compact on-disk dataset schema
//!
//! One JSON file per Unicode version (e.g. `16.0.json`), produced offline by
//! the dataset scraper. Keys are single letters to keep the ~150k-row payload
//! small; `scripts` and `versions` are name tables addressed by the row
//! indexes `s` and `v`.

use serde::{Deserialize, Serialize};

/// One raw glyph row: `{ c, n, k?, e?, d, s?, v?, l? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphData {
    /// Rendered character(s); may be a multi-codepoint sequence
    pub c: String,
    /// Human-readable title-cased name
    pub n: String,
    /// Search aliases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<Vec<String>>,
    /// HTML named-entity aliases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<Vec<String>>,
    /// One Unicode scalar value per constituent codepoint
    pub d: Vec<u32>,
    /// Index into the `scripts` name table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<usize>,
    /// Index into the `versions` name table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<usize>,
    /// Chars of known ligature users; incomplete on disk, completed at load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<Vec<String>>,
}

/// One block row: `{ n, r: [start, end] }`, range inclusive on both ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub n: String,
    pub r: [u32; 2],
}

/// A full versioned dataset bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetFile {
    pub glyphs: Vec<GlyphData>,
    pub blocks: Vec<BlockData>,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl DatasetFile {
    /// Decode a raw dataset body
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
