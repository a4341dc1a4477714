//! The loaded in-memory model
//!
//! Built by the loader in one shot, read-only afterward: a char-keyed glyph
//! map plus slug-keyed block and script tables, all sharing records through
//! `Rc`. A reload builds a whole new store; stores are never patched.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dataset::record::{BlockRecord, GlyphRecord, ScriptRecord};

/// Frozen dataset model
#[derive(Debug, Default)]
pub struct GlyphStore {
    glyphs: HashMap<String, Rc<GlyphRecord>>,
    /// Dataset insertion order of glyph keys
    order: Vec<String>,
    blocks: Vec<Rc<BlockRecord>>,
    blocks_by_slug: HashMap<String, usize>,
    scripts: Vec<Rc<ScriptRecord>>,
    scripts_by_slug: HashMap<String, usize>,
}

impl GlyphStore {
    pub(crate) fn new(
        glyphs: HashMap<String, Rc<GlyphRecord>>,
        order: Vec<String>,
        blocks: Vec<Rc<BlockRecord>>,
        scripts: Vec<Rc<ScriptRecord>>,
    ) -> Self {
        let blocks_by_slug = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (block.slug.clone(), i))
            .collect();
        let scripts_by_slug = scripts
            .iter()
            .enumerate()
            .map(|(i, script)| (script.slug.clone(), i))
            .collect();
        Self {
            glyphs,
            order,
            blocks,
            blocks_by_slug,
            scripts,
            scripts_by_slug,
        }
    }

    /// Number of distinct glyph records
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// O(1) lookup by exact character key
    pub fn glyph(&self, character: &str) -> Option<Rc<GlyphRecord>> {
        self.glyphs.get(character).cloned()
    }

    /// O(1) lookup by block slug
    pub fn block(&self, slug: &str) -> Option<Rc<BlockRecord>> {
        self.blocks_by_slug
            .get(slug)
            .map(|&i| Rc::clone(&self.blocks[i]))
    }

    /// O(1) lookup by script slug
    pub fn script(&self, slug: &str) -> Option<Rc<ScriptRecord>> {
        self.scripts_by_slug
            .get(slug)
            .map(|&i| Rc::clone(&self.scripts[i]))
    }

    /// Glyph records in dataset order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<GlyphRecord>> {
        self.order.iter().filter_map(|key| self.glyphs.get(key))
    }

    /// Ordered (slug, display name) pairs for the readiness payload
    pub fn block_listing(&self) -> Vec<(String, String)> {
        self.blocks
            .iter()
            .map(|block| (block.slug.clone(), block.name.clone()))
            .collect()
    }

    /// Ordered (slug, display name) pairs for the readiness payload
    pub fn script_listing(&self) -> Vec<(String, String)> {
        self.scripts
            .iter()
            .map(|script| (script.slug.clone(), script.name.clone()))
            .collect()
    }
}
