//! Normalized in-memory records
//!
//! `GlyphRecord` is the canonical form the UI renders. Blocks and scripts
//! share their member records through `Rc`, so each record exists once no
//! matter how many views reference it; serde's `rc` support serializes the
//! shared records by value, which is what crosses the worker boundary.
//! Everything here is frozen once the load passes finish.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A single glyph: one character or a multi-codepoint sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    /// Rendered character(s)
    #[serde(rename = "char")]
    pub character: String,
    /// Human-readable title-cased name
    pub name: String,
    /// Deduplicated search aliases; never contains `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// HTML named-entity aliases, lexically sorted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<String>>,
    /// One scalar value per constituent codepoint, in `char` order
    pub decimals: Vec<u32>,
    /// 8-digit hex units, one per codepoint
    pub utf32: Vec<String>,
    /// 4-digit hex units, one per UTF-16 code unit
    pub utf16: Vec<String>,
    /// 2-digit hex units, one per UTF-8 byte
    pub utf8: Vec<String>,
    /// Slug of the containing block; single-codepoint records only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// Slug of the assigned script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// First Unicode version the character appeared in; assigned once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Chars of multi-codepoint glyphs built from this record's codepoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ligatures: Option<Vec<String>>,
}

impl GlyphRecord {
    /// The codepoint of a single-codepoint record
    pub(crate) fn sole_decimal(&self) -> Option<u32> {
        match self.decimals.as_slice() {
            [cp] => Some(*cp),
            _ => None,
        }
    }

    /// True when the record is a multi-codepoint sequence
    pub fn is_ligature(&self) -> bool {
        self.decimals.len() > 1
    }
}

/// A contiguous codepoint range and the glyphs inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub name: String,
    pub slug: String,
    /// Inclusive on both ends; `range[0] <= range[1]`
    pub range: [u32; 2],
    /// Member records in dataset order
    pub glyphs: Vec<Rc<GlyphRecord>>,
}

impl BlockRecord {
    /// True when `cp` lies inside the block's range
    pub fn contains(&self, cp: u32) -> bool {
        cp >= self.range[0] && cp <= self.range[1]
    }
}

/// A script and the glyphs assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub name: String,
    pub slug: String,
    /// Member records in dataset order
    pub glyphs: Vec<Rc<GlyphRecord>>,
}
