//! Query engine over a loaded glyph store.
//!
//! Built once per successful load. Lookups delegate to the store's maps;
//! `search` runs the weighted scorer over a flat entry table, then augments
//! the ranked list with literal matches so typing or pasting an actual
//! character always surfaces its record, even when the fuzzy pass misses it.

use std::cmp::Ordering;
use std::rc::Rc;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::WorkerConfig;
use crate::dataset::{BlockRecord, GlyphRecord, GlyphStore, ScriptRecord};
use crate::search::cache::QueryCache;
use crate::search::score::{QueryContext, SearchEntry, MIN_SCORE};

pub struct SearchIndex {
    store: GlyphStore,
    entries: Vec<SearchEntry>,
    /// Recognizes `U+0041` style codepoint literals inside a query.
    codepoint_re: Regex,
    cache: QueryCache,
    max_results: usize,
    max_query_len: usize,
}

impl SearchIndex {
    /// Flattens every record into a scoring entry and takes ownership of the
    /// store. Entry order is dataset order, which is also the tie-break order.
    pub fn build(store: GlyphStore, config: &WorkerConfig) -> Self {
        let entries: Vec<SearchEntry> = store
            .iter()
            .map(|record| {
                let block = record
                    .block
                    .as_deref()
                    .and_then(|slug| store.block(slug))
                    .map(|block| block.name.clone())
                    .unwrap_or_default();
                SearchEntry {
                    character: record.character.clone(),
                    name: record.name.clone(),
                    keywords: joined(record.keywords.as_deref()),
                    entities: joined(record.entities.as_deref()),
                    numeric: numeric_text(record),
                    block,
                }
            })
            .collect();

        SearchIndex {
            store,
            entries,
            codepoint_re: Regex::new(r"(?i)\bu\+([0-9a-f]{4,6})\b")
                .expect("codepoint pattern should compile"),
            cache: QueryCache::new(config.cache_capacity),
            max_results: config.max_results,
            max_query_len: config.max_query_len,
        }
    }

    pub fn len(&self) -> usize {
        self.store.glyph_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.glyph_count() == 0
    }

    pub fn store(&self) -> &GlyphStore {
        &self.store
    }

    pub fn lookup_glyph(&self, character: &str) -> Option<Rc<GlyphRecord>> {
        self.store.glyph(character)
    }

    pub fn lookup_block(&self, slug: &str) -> Option<Rc<BlockRecord>> {
        self.store.block(slug)
    }

    pub fn lookup_script(&self, slug: &str) -> Option<Rc<ScriptRecord>> {
        self.store.script(slug)
    }

    /// Records for each codepoint of a multi-codepoint glyph, in sequence
    /// order. Single-codepoint records decompose into nothing.
    pub fn constituents(&self, glyph: &GlyphRecord) -> Vec<Rc<GlyphRecord>> {
        if !glyph.is_ligature() {
            return Vec::new();
        }
        glyph
            .decimals
            .iter()
            .filter_map(|&cp| char::from_u32(cp))
            .filter_map(|ch| self.store.glyph(ch.to_string().as_str()))
            .collect()
    }

    /// Ranked results for a free-text query, capped at the configured
    /// maximum. Queries longer than the limit are truncated, not rejected.
    pub fn search(&mut self, query: &str) -> Vec<Rc<GlyphRecord>> {
        let truncated = truncate_graphemes(query.trim(), self.max_query_len);
        if truncated.is_empty() {
            return Vec::new();
        }
        if let Some(hit) = self.cache.get(truncated) {
            return hit;
        }

        let mut results = self.ranked_matches(truncated);
        self.augment_literals(truncated, &mut results);
        if results.len() > self.max_results {
            results.truncate(self.max_results);
        }
        self.cache.put(truncated, results.clone());
        results
    }

    fn ranked_matches(&self, query: &str) -> Vec<Rc<GlyphRecord>> {
        let mut ctx = QueryContext::new(query);
        let mut scored: Vec<(i32, usize)> = Vec::new();
        for (position, entry) in self.entries.iter().enumerate() {
            let score = ctx.score_entry(entry);
            if score >= MIN_SCORE {
                scored.push((score, position));
            }
        }
        // Highest score first; dataset position breaks ties deterministically.
        scored.sort_by(|a, b| match b.0.cmp(&a.0) {
            Ordering::Equal => a.1.cmp(&b.1),
            other => other,
        });
        scored.truncate(self.max_results);
        scored
            .into_iter()
            .filter_map(|(_, position)| self.store.glyph(&self.entries[position].character))
            .collect()
    }

    /// Appends records the query names literally: `U+XXXX` codepoint forms
    /// first, then every character typed or pasted into the query itself.
    /// The ranked slice shrinks before a literal match is ever dropped.
    fn augment_literals(&self, query: &str, results: &mut Vec<Rc<GlyphRecord>>) {
        let mut extra: Vec<Rc<GlyphRecord>> = Vec::new();

        for caps in self.codepoint_re.captures_iter(query) {
            let record = caps
                .get(1)
                .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
                .and_then(char::from_u32)
                .and_then(|ch| self.store.glyph(ch.to_string().as_str()));
            if let Some(record) = record {
                push_unique(results, &mut extra, record);
            }
        }

        for ch in query.chars() {
            if let Some(record) = self.store.glyph(ch.to_string().as_str()) {
                push_unique(results, &mut extra, record);
            }
        }

        if extra.is_empty() {
            return;
        }
        let keep = self.max_results.saturating_sub(extra.len());
        if results.len() > keep {
            results.truncate(keep);
        }
        results.extend(extra);
    }
}

fn joined(values: Option<&[String]>) -> String {
    values.map(|list| list.join(" ")).unwrap_or_default()
}

fn numeric_text(record: &GlyphRecord) -> String {
    let mut parts: Vec<String> = record.decimals.iter().map(|cp| cp.to_string()).collect();
    parts.extend(record.utf32.iter().cloned());
    parts.extend(record.utf16.iter().cloned());
    parts.join(" ")
}

fn push_unique(
    results: &[Rc<GlyphRecord>],
    extra: &mut Vec<Rc<GlyphRecord>>,
    record: Rc<GlyphRecord>,
) {
    let present = results
        .iter()
        .chain(extra.iter())
        .any(|existing| existing.character == record.character);
    if !present {
        extra.push(record);
    }
}

/// Cuts at a grapheme boundary so a truncated query never splits a cluster.
fn truncate_graphemes(query: &str, max: usize) -> &str {
    match query.grapheme_indices(true).nth(max) {
        Some((byte, _)) => &query[..byte],
        None => query,
    }
}
