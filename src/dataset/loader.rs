//! DatasetLoader: versioned dataset bundle -> frozen GlyphStore
//!
//! Loading runs in three passes:
//! 1. normalize raw rows into records, merging duplicate `char` keys
//! 2. backfill `ligatures` over the fully populated map
//! 3. freeze records into `Rc` and assemble the block/script tables
//!
//! Transport lives at the WASM boundary; this module only ever sees bytes,
//! so the whole pipeline runs under native tests.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use instant::Instant;

use crate::dataset::encoding::{is_scalar_value, utf16_units, utf32_unit, utf8_units};
use crate::dataset::record::{BlockRecord, GlyphRecord, ScriptRecord};
use crate::dataset::schema::{BlockData, DatasetFile, GlyphData};
use crate::dataset::slug::slugify;
use crate::dataset::store::GlyphStore;

// =============================================================================
// Errors
// =============================================================================

/// Loader failures; terminal for the attempt, never retried automatically
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// Transport failed or returned a non-success status
    Fetch(String),
    /// The body could not be decoded as a dataset bundle
    Parse(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Fetch(msg) => write!(f, "dataset fetch failed: {}", msg),
            DatasetError::Parse(msg) => write!(f, "dataset parse failed: {}", msg),
        }
    }
}

impl std::error::Error for DatasetError {}

// =============================================================================
// Load summary
// =============================================================================

/// Counters reported after a successful load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    pub glyph_count: usize,
    pub block_count: usize,
    pub script_count: usize,
    /// Rows folded into an existing record with the same `char`
    pub merged_rows: usize,
    /// Rows dropped for empty, invalid, or surrogate codepoints
    pub dropped_rows: usize,
    pub elapsed_ms: u64,
}

// =============================================================================
// DatasetLoader
// =============================================================================

/// Load-state surface plus the normalization pipeline
#[derive(Debug, Default)]
pub struct DatasetLoader {
    loading: bool,
    ready: bool,
    glyph_count: usize,
    last_error: Option<String>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Mark the start of a load attempt
    pub fn begin(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    /// Record a failure; clears loading, zeroes the count, keeps the message
    pub fn fail(&mut self, error: &DatasetError) {
        self.loading = false;
        self.ready = false;
        self.glyph_count = 0;
        self.last_error = Some(error.to_string());
    }

    /// Parse and normalize a dataset body into a fresh store. A prior store
    /// is untouched on failure; the caller swaps the new one in on success.
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<(GlyphStore, LoadSummary), DatasetError> {
        let started = Instant::now();
        let file = match DatasetFile::from_slice(bytes) {
            Ok(file) => file,
            Err(err) => {
                let error = DatasetError::Parse(err.to_string());
                self.fail(&error);
                return Err(error);
            }
        };

        let (store, mut summary) = build_store(file);
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        self.loading = false;
        self.ready = true;
        self.glyph_count = store.glyph_count();
        self.last_error = None;
        Ok((store, summary))
    }
}

// =============================================================================
// Normalization pipeline
// =============================================================================

/// Surrogate ranges are excluded from indexing entirely
fn is_surrogate_block(block: &BlockData) -> bool {
    block.n.contains("Surrogate")
}

fn build_store(file: DatasetFile) -> (GlyphStore, LoadSummary) {
    let DatasetFile {
        glyphs: rows,
        blocks,
        scripts,
        versions,
    } = file;
    let mut summary = LoadSummary::default();

    let excluded: Vec<[u32; 2]> = blocks
        .iter()
        .filter(|block| is_surrogate_block(block))
        .map(|block| block.r)
        .collect();
    let blocks: Vec<BlockData> = blocks
        .into_iter()
        .filter(|block| !is_surrogate_block(block))
        .collect();

    // Pass 1: normalize rows, merging duplicate char keys
    let mut records: HashMap<String, GlyphRecord> = HashMap::with_capacity(rows.len());
    let mut order: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        if !valid_row(&row, &excluded) {
            summary.dropped_rows += 1;
            continue;
        }
        match records.entry(row.c.clone()) {
            Entry::Occupied(mut slot) => {
                merge_row(slot.get_mut(), row, &scripts, &versions);
                summary.merged_rows += 1;
            }
            Entry::Vacant(slot) => {
                order.push(row.c.clone());
                slot.insert(normalize_row(row, &blocks, &scripts, &versions));
            }
        }
    }

    // Pass 2: ligature backfill. A constituent may be loaded after the
    // ligature that references it, so this cannot interleave with pass 1.
    backfill_ligatures(&mut records, &order);

    // Pass 3: freeze into shared records and assemble block/script tables
    let store = freeze(records, order, blocks, scripts);
    summary.glyph_count = store.glyph_count();
    summary.block_count = store.block_count();
    summary.script_count = store.script_count();
    (store, summary)
}

fn valid_row(row: &GlyphData, excluded: &[[u32; 2]]) -> bool {
    if row.d.is_empty() {
        return false;
    }
    if row.d.iter().any(|&cp| !is_scalar_value(cp)) {
        return false;
    }
    match row.d.as_slice() {
        [cp] => !excluded.iter().any(|range| *cp >= range[0] && *cp <= range[1]),
        _ => true,
    }
}

fn normalize_row(
    row: GlyphData,
    blocks: &[BlockData],
    scripts: &[String],
    versions: &[String],
) -> GlyphRecord {
    let mut utf32 = Vec::with_capacity(row.d.len());
    let mut utf16 = Vec::new();
    let mut utf8 = Vec::new();
    for &cp in &row.d {
        utf32.push(utf32_unit(cp));
        utf16.extend(utf16_units(cp));
        utf8.extend(utf8_units(cp));
    }

    // First block whose inclusive range contains the sole codepoint wins;
    // multi-codepoint sequences never get a block
    let block = match row.d.as_slice() {
        [cp] => blocks
            .iter()
            .find(|block| *cp >= block.r[0] && *cp <= block.r[1])
            .map(|block| slugify(&block.n)),
        _ => None,
    };

    let keywords = row
        .k
        .map(|keywords| dedup_keywords(keywords, &row.n))
        .filter(|keywords| !keywords.is_empty());
    let entities = row
        .e
        .map(sorted_dedup)
        .filter(|entities| !entities.is_empty());
    let ligatures = row
        .l
        .map(dedup_in_order)
        .filter(|ligatures| !ligatures.is_empty());

    GlyphRecord {
        character: row.c,
        name: row.n,
        keywords,
        entities,
        decimals: row.d,
        utf32,
        utf16,
        utf8,
        block,
        script: row.s.and_then(|i| scripts.get(i)).map(|name| slugify(name)),
        version: row.v.and_then(|i| versions.get(i)).cloned(),
        ligatures,
    }
}

/// A later row with the same `char` folds into the first record. Keywords and
/// entities union; script and version fill only when still unset; the later
/// row's name becomes a searchable alias.
fn merge_row(existing: &mut GlyphRecord, row: GlyphData, scripts: &[String], versions: &[String]) {
    let mut incoming = Vec::new();
    if !row.n.is_empty() {
        incoming.push(row.n);
    }
    if let Some(keywords) = row.k {
        incoming.extend(keywords);
    }
    if !incoming.is_empty() {
        let mut keywords = existing.keywords.take().unwrap_or_default();
        for keyword in incoming {
            if keyword.eq_ignore_ascii_case(&existing.name) {
                continue;
            }
            if !keywords.iter().any(|k| k.eq_ignore_ascii_case(&keyword)) {
                keywords.push(keyword);
            }
        }
        if !keywords.is_empty() {
            existing.keywords = Some(keywords);
        }
    }

    if let Some(entities) = row.e {
        let mut merged = existing.entities.take().unwrap_or_default();
        merged.extend(entities);
        existing.entities = Some(sorted_dedup(merged)).filter(|e| !e.is_empty());
    }

    if existing.script.is_none() {
        existing.script = row.s.and_then(|i| scripts.get(i)).map(|name| slugify(name));
    }
    if existing.version.is_none() {
        existing.version = row.v.and_then(|i| versions.get(i)).cloned();
    }

    if let Some(seeds) = row.l {
        let ligatures = existing.ligatures.get_or_insert_with(Vec::new);
        for seed in seeds {
            if !ligatures.contains(&seed) {
                ligatures.push(seed);
            }
        }
    }
}

fn backfill_ligatures(records: &mut HashMap<String, GlyphRecord>, order: &[String]) {
    for key in order {
        let (user, constituents) = match records.get(key) {
            Some(record) if record.is_ligature() => {
                let constituents: Vec<String> = record
                    .decimals
                    .iter()
                    .filter_map(|&cp| char::from_u32(cp))
                    .map(String::from)
                    .collect();
                (record.character.clone(), constituents)
            }
            _ => continue,
        };
        for constituent in constituents {
            if let Some(target) = records.get_mut(&constituent) {
                let ligatures = target.ligatures.get_or_insert_with(Vec::new);
                if !ligatures.contains(&user) {
                    ligatures.push(user.clone());
                }
            }
        }
    }
}

fn freeze(
    records: HashMap<String, GlyphRecord>,
    order: Vec<String>,
    blocks: Vec<BlockData>,
    scripts: Vec<String>,
) -> GlyphStore {
    let mut frozen: HashMap<String, Rc<GlyphRecord>> = HashMap::with_capacity(records.len());
    for (key, record) in records {
        frozen.insert(key, Rc::new(record));
    }

    let mut block_records: Vec<BlockRecord> = blocks
        .into_iter()
        .map(|block| {
            let slug = slugify(&block.n);
            BlockRecord {
                slug,
                name: block.n,
                range: block.r,
                glyphs: Vec::new(),
            }
        })
        .collect();
    let mut script_records: Vec<ScriptRecord> = scripts
        .into_iter()
        .map(|name| {
            let slug = slugify(&name);
            ScriptRecord {
                slug,
                name,
                glyphs: Vec::new(),
            }
        })
        .collect();

    let block_index: HashMap<String, usize> = block_records
        .iter()
        .enumerate()
        .map(|(i, block)| (block.slug.clone(), i))
        .collect();
    let script_index: HashMap<String, usize> = script_records
        .iter()
        .enumerate()
        .map(|(i, script)| (script.slug.clone(), i))
        .collect();

    for key in &order {
        let record = match frozen.get(key) {
            Some(record) => Rc::clone(record),
            None => continue,
        };
        if let Some(&i) = record.block.as_deref().and_then(|slug| block_index.get(slug)) {
            block_records[i].glyphs.push(Rc::clone(&record));
        }
        if let Some(&i) = record.script.as_deref().and_then(|slug| script_index.get(slug)) {
            script_records[i].glyphs.push(Rc::clone(&record));
        }
    }

    GlyphStore::new(
        frozen,
        order,
        block_records.into_iter().map(Rc::new).collect(),
        script_records.into_iter().map(Rc::new).collect(),
    )
}

fn dedup_keywords(raw: Vec<String>, name: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        if keyword.eq_ignore_ascii_case(name) {
            continue;
        }
        if !keywords.iter().any(|k| k.eq_ignore_ascii_case(&keyword)) {
            keywords.push(keyword);
        }
    }
    keywords
}

fn sorted_dedup(mut raw: Vec<String>) -> Vec<String> {
    raw.sort();
    raw.dedup();
    raw
}

fn dedup_in_order(raw: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());
    for item in raw {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
