//! Weighted per-field query scoring.
//!
//! One `QueryContext` is built per query and reused across every candidate:
//! the nucleo pattern is parsed once and the UTF-32 haystack buffer is shared,
//! so the per-glyph cost is the match itself. Scores are additive across
//! fields; the per-field maxima keep the field priority stable.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32Str};

// Field priority: character > name > keywords > entities > numeric > block.
const CHAR_EXACT: i32 = 1000;
const NAME_PREFIX: i32 = 100;
const NAME_SUBSTRING: i32 = 75;
const NAME_FUZZY: i32 = 50;
const KEYWORD_PREFIX: i32 = 60;
const KEYWORD_SUBSTRING: i32 = 45;
const KEYWORD_FUZZY: i32 = 35;
const ENTITY_SUBSTRING: i32 = 30;
const NUMERIC_SUBSTRING: i32 = 20;
const BLOCK_SUBSTRING: i32 = 10;

/// Anything scoring below this never enters the result set.
pub(crate) const MIN_SCORE: i32 = 1;

/// Flattened projection of one glyph, built once at index time.
#[derive(Debug, Clone)]
pub struct SearchEntry {
    /// Exact character key, also the handle back into the store.
    pub character: String,
    pub name: String,
    /// Keyword aliases joined with spaces; empty when the glyph has none.
    pub keywords: String,
    /// HTML entity names joined with spaces.
    pub entities: String,
    /// Decimal codepoints plus UTF-32/UTF-16 units joined with spaces.
    pub numeric: String,
    /// Display name of the containing block.
    pub block: String,
}

/// Reusable scoring state for a single query string.
pub struct QueryContext {
    raw: String,
    lower: String,
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl QueryContext {
    pub fn new(query: &str) -> Self {
        let lower = query.to_lowercase();
        let pattern = Pattern::parse(&lower, CaseMatching::Ignore, Normalization::Smart);
        QueryContext {
            raw: query.to_string(),
            lower,
            pattern,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Additive score of one entry against this query. Zero means no match.
    pub fn score_entry(&mut self, entry: &SearchEntry) -> i32 {
        let mut score = 0i32;

        // The literal character always dominates every text field.
        if entry.character == self.raw {
            score += CHAR_EXACT;
        }

        if let Some(pos) = find_ignore_ascii_case(&entry.name, &self.lower) {
            score += if pos == 0 { NAME_PREFIX } else { NAME_SUBSTRING };
        }
        if let Some(fuzzy) = self.fuzzy_score(&entry.name) {
            score += NAME_FUZZY + (fuzzy / 20) as i32;
        }

        if !entry.keywords.is_empty() {
            if let Some(pos) = find_ignore_ascii_case(&entry.keywords, &self.lower) {
                score += if pos == 0 {
                    KEYWORD_PREFIX
                } else {
                    KEYWORD_SUBSTRING
                };
            }
            if let Some(fuzzy) = self.fuzzy_score(&entry.keywords) {
                score += KEYWORD_FUZZY + (fuzzy / 30) as i32;
            }
        }

        if !entry.entities.is_empty() && contains_ignore_ascii_case(&entry.entities, &self.lower) {
            score += ENTITY_SUBSTRING;
        }

        if !entry.numeric.is_empty() && contains_ignore_ascii_case(&entry.numeric, &self.lower) {
            score += NUMERIC_SUBSTRING;
        }

        if !entry.block.is_empty() && contains_ignore_ascii_case(&entry.block, &self.lower) {
            score += BLOCK_SUBSTRING;
        }

        score
    }

    fn fuzzy_score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}

/// Byte-wise case-insensitive containment. `needle_lower` must already be
/// lowercase; avoids allocating a lowered copy of every haystack.
pub(crate) fn contains_ignore_ascii_case(haystack: &str, needle_lower: &str) -> bool {
    find_ignore_ascii_case(haystack, needle_lower).is_some()
}

/// Byte offset of the first case-insensitive occurrence, if any.
pub(crate) fn find_ignore_ascii_case(haystack: &str, needle_lower: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle_lower.as_bytes();
    if needle_bytes.is_empty() || needle_bytes.len() > haystack_bytes.len() {
        return None;
    }
    (0..=haystack_bytes.len() - needle_bytes.len()).find(|&start| {
        haystack_bytes[start..start + needle_bytes.len()]
            .iter()
            .zip(needle_bytes)
            .all(|(h, n)| h.eq_ignore_ascii_case(n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(character: &str, name: &str, keywords: &str, block: &str) -> SearchEntry {
        SearchEntry {
            character: character.to_string(),
            name: name.to_string(),
            keywords: keywords.to_string(),
            entities: String::new(),
            numeric: String::new(),
            block: block.to_string(),
        }
    }

    #[test]
    fn test_find_ignore_ascii_case() {
        assert_eq!(find_ignore_ascii_case("Black Heart Suit", "heart"), Some(6));
        assert_eq!(find_ignore_ascii_case("Black Heart Suit", "black"), Some(0));
        assert_eq!(find_ignore_ascii_case("Black Heart Suit", "spade"), None);
        assert_eq!(find_ignore_ascii_case("abc", ""), None);
        assert_eq!(find_ignore_ascii_case("ab", "abc"), None);
    }

    #[test]
    fn test_exact_character_outranks_name_match() {
        let mut ctx = QueryContext::new("A");
        let literal = ctx.score_entry(&entry("A", "Latin Capital Letter A", "", "Basic Latin"));
        let named = ctx.score_entry(&entry("Å", "Latin Capital Letter A with Ring", "", "Latin-1 Supplement"));
        assert!(literal > named);
        assert!(literal >= 1000);
    }

    #[test]
    fn test_name_match_outranks_keyword_match() {
        let mut ctx = QueryContext::new("heart");
        let by_name = ctx.score_entry(&entry("♥", "Black Heart Suit", "", "Miscellaneous Symbols"));
        let by_keyword = ctx.score_entry(&entry("❤", "Heavy Ballot Cross", "heart", "Dingbats"));
        assert!(by_name > by_keyword);
        assert!(by_keyword > 0);
    }

    #[test]
    fn test_keyword_match_outranks_block_match() {
        let mut ctx = QueryContext::new("love");
        let by_keyword = ctx.score_entry(&entry("♥", "Black Heart Suit", "love", "Miscellaneous Symbols"));
        let by_block = ctx.score_entry(&entry("✂", "Black Scissors", "", "Love Symbols"));
        assert!(by_keyword > by_block);
        assert!(by_block > 0);
    }

    #[test]
    fn test_prefix_beats_inner_substring() {
        let mut ctx = QueryContext::new("black");
        let prefix = ctx.score_entry(&entry("♠", "Black Spade Suit", "", "Miscellaneous Symbols"));
        let inner = ctx.score_entry(&entry("▚", "Quadrant Upper Left and Lower Right Black", "", "Block Elements"));
        assert!(prefix > inner);
    }

    #[test]
    fn test_unrelated_entry_scores_zero() {
        let mut ctx = QueryContext::new("xylophone");
        let score = ctx.score_entry(&entry("A", "Latin Capital Letter A", "", "Basic Latin"));
        assert_eq!(score, 0);
    }

    #[test]
    fn test_numeric_units_match() {
        let mut ctx = QueryContext::new("0041");
        let mut hit = entry("A", "Latin Capital Letter A", "", "Basic Latin");
        hit.numeric = "65 00000041 0041".to_string();
        assert!(ctx.score_entry(&hit) > 0);
    }
}
