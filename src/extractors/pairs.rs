// src/extractors/pairs.rs

// --- Imports ---
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// One entry per surface form of the markup. Order matters for MatchOrder::Pattern
// and for breaking ties between matches that start at the same offset.
const PAIR_PATTERNS: [&str; 5] = [
    // Pattern 1: doubled quotes on both sides, Item Name=""X"" Alias=""Y""
    r#"Item Name=""([^"]+)""\s+Alias=""([^"]+)"""#,
    // Pattern 2: single quotes on both sides, Item Name="X" Alias="Y"
    r#"Item Name="([^"]+)"\s+Alias="([^"]+)""#,
    // Pattern 3: bare values, no quotes or whitespace allowed inside
    r#"Item Name=([^"\s]+)\s+Alias=([^"\s]+)"#,
    // Pattern 4: bare name, doubled-quote alias
    r#"Item Name=([^"\s]+)\s+Alias=""([^"]+)"""#,
    // Pattern 5: doubled-quote name, bare alias
    r#"Item Name=""([^"]+)""\s+Alias=([^"\s]+)"#,
];

static PAIR_RE: Lazy<Vec<(usize, Regex)>> = Lazy::new(|| compile_patterns(&PAIR_PATTERNS));

/// Compiles every pattern, skipping (and reporting) any that fail so the
/// others still run.
fn compile_patterns(patterns: &[&str]) -> Vec<(usize, Regex)> {
    patterns
        .iter()
        .enumerate()
        .filter_map(|(idx, pat)| match Regex::new(pat) {
            Ok(re) => Some((idx, re)),
            Err(e) => {
                tracing::warn!("Skipping pattern #{} {}: {}", idx + 1, pat, e);
                None
            }
        })
        .collect()
}

// --- Data Structures ---
/// One Item Name / Alias occurrence in the decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub item_name: String,
    pub alias: String,
    /// Byte offset of the match start in the decoded text.
    pub position: usize,
    /// Zero-based index of the pattern that produced the match.
    pub pattern: usize,
}

/// Row order of the pooled matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchOrder {
    /// By offset in the text; matches at the same offset keep pattern order.
    #[default]
    Position,
    /// All matches of pattern 1, then all of pattern 2, and so on.
    Pattern,
}

pub struct PairMatcher {
    patterns: &'static [(usize, Regex)],
}

impl PairMatcher {
    pub fn new() -> Self {
        Self { patterns: PAIR_RE.as_slice() }
    }

    /// Runs every pattern over the whole text and pools the results.
    /// Patterns are not exclusive: the same span may be reported twice.
    pub fn find_pairs(&self, text: &str, order: MatchOrder) -> Vec<Pair> {
        let mut pairs = Vec::new();

        for (idx, re) in self.patterns {
            let before = pairs.len();
            for caps in re.captures_iter(text) {
                let (Some(whole), Some(name), Some(alias)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                    continue;
                };
                pairs.push(Pair {
                    item_name: name.as_str().to_string(),
                    alias: alias.as_str().to_string(),
                    position: whole.start(),
                    pattern: *idx,
                });
            }
            tracing::debug!("Pattern #{} matched {} pairs", idx + 1, pairs.len() - before);
        }

        if order == MatchOrder::Position {
            // sort_by_key is stable, ties stay in pattern order
            pairs.sort_by_key(|pair| pair.position);
        }

        pairs
    }
}

impl Default for PairMatcher {
    fn default() -> Self {
        Self::new()
    }
}
