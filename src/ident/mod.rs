//! Player identity resolution.
//!
//! Sportsbook pages and stats providers rarely agree on how a player is
//! spelled ("J. Smith" vs "James Smith", suffixes, accents dropped). Two
//! layers bridge the gap: a lossy normalization heuristic used to build
//! match keys, and an explicit mapping table that is always authoritative
//! over the heuristic.


use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::NameMapping;

static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(jr\.?|sr\.?|iii|ii|iv)$").expect("valid regex"));

static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Build the normalized match key for a player on a team.
///
/// Lowercases, strips generational suffixes, drops punctuation, collapses
/// whitespace and appends the uppercased team code. Best-effort only; the
/// mapping table overrides whatever this produces.
pub fn normalize_key(name: &str, team: &str) -> String {
    let lowered = name.to_lowercase();
    let trimmed = lowered.trim();
    let no_suffix = SUFFIX_RE.replace(trimmed, "");
    let no_punct = PUNCT_RE.replace_all(&no_suffix, "");
    let collapsed = WHITESPACE_RE.replace_all(no_punct.trim(), " ");

    format!("{}_{}", collapsed, team.to_uppercase())
}

/// In-memory snapshot of the name-mapping table.
///
/// Loaded once per resolution pass so lookups stay synchronous; the table
/// is many-to-one (several betting spellings per canonical identity) and
/// only ever grows.
#[derive(Debug, Default)]
pub struct NameBook {
    /// Lowercased betting name → mappings carrying it.
    by_betting_name: HashMap<String, Vec<NameMapping>>,
    /// Canonical name → betting aliases known for it.
    aliases: HashMap<String, Vec<String>>,
}

impl NameBook {
    pub fn new(mappings: Vec<NameMapping>) -> Self {
        let mut book = NameBook::default();
        for mapping in mappings {
            book.aliases
                .entry(mapping.canonical_name.clone())
                .or_default()
                .push(mapping.betting_name.clone());
            book.by_betting_name
                .entry(mapping.betting_name.to_lowercase())
                .or_default()
                .push(mapping);
        }
        book
    }

    pub fn is_empty(&self) -> bool {
        self.by_betting_name.is_empty()
    }

    /// Resolve a betting name to the canonical name used by stats sources.
    ///
    /// Team-specific entries beat team-agnostic ones; with no mapping at
    /// all the input is returned unchanged (the common case; an empty
    /// table must behave as the identity function).
    pub fn resolve(&self, betting_name: &str, team: &str) -> String {
        let Some(candidates) = self.by_betting_name.get(&betting_name.to_lowercase()) else {
            return betting_name.to_string();
        };

        let team_specific = candidates
            .iter()
            .find(|m| m.team.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(team)));
        let team_agnostic = candidates.iter().find(|m| m.team.is_none());

        team_specific
            .or(team_agnostic)
            .map(|m| m.canonical_name.clone())
            .unwrap_or_else(|| betting_name.to_string())
    }

    /// Betting-name aliases recorded for a canonical name.
    pub fn aliases_for(&self, canonical_name: &str) -> &[String] {
        self.aliases
            .get(canonical_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
