//! Language profiles: contraction tables, synonym groups and stop words.
//!
//! Query preprocessing and the semantic-overlap signal read their vocabulary from a
//! [`LanguageProfile`] instead of inline literals, so a deployment can swap the
//! vocabulary without touching retrieval code.

mod tables;


use std::collections::{HashMap, HashSet};

/// Minimum token length (in characters) for lexical similarity signals.
pub const MIN_CONTENT_TOKEN_CHARS: usize = 3;

/// Lowercased alphanumeric tokens of `text`. Accented letters are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct tokens longer than two characters.
pub fn content_token_set(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_CONTENT_TOKEN_CHARS)
        .collect()
}

/// Vocabulary used by preprocessing and semantic overlap scoring.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    name: String,
    contractions: HashMap<String, String>,
    synonym_groups: Vec<Vec<String>>,
    group_index: HashMap<String, Vec<usize>>,
    stop_words: HashSet<String>,
    short_chunk_prefix: String,
    stem_prefix_len: usize,
    max_synonyms_per_keyword: usize,
    max_query_synonyms: usize,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::english()
    }
}

impl LanguageProfile {
    /// Builds a profile from raw tables. Entries are lowercased.
    pub fn new(
        name: impl Into<String>,
        contractions: &[(&str, &str)],
        synonym_groups: &[&[&str]],
        stop_words: &[&str],
        short_chunk_prefix: impl Into<String>,
    ) -> Self {
        let contractions = contractions
            .iter()
            .map(|(from, to)| (from.to_lowercase(), to.to_lowercase()))
            .collect();

        let synonym_groups: Vec<Vec<String>> = synonym_groups
            .iter()
            .map(|group| group.iter().map(|w| w.to_lowercase()).collect())
            .collect();

        let mut group_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (id, group) in synonym_groups.iter().enumerate() {
            for word in group {
                group_index.entry(word.clone()).or_default().push(id);
            }
        }

        Self {
            name: name.into(),
            contractions,
            synonym_groups,
            group_index,
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
            short_chunk_prefix: short_chunk_prefix.into(),
            stem_prefix_len: 5,
            max_synonyms_per_keyword: 2,
            max_query_synonyms: 8,
        }
    }

    pub fn english() -> Self {
        Self::new(
            "en",
            tables::EN_CONTRACTIONS,
            tables::EN_SYNONYMS,
            tables::EN_STOP_WORDS,
            "Document excerpt:",
        )
    }

    pub fn spanish() -> Self {
        Self::new(
            "es",
            tables::ES_CONTRACTIONS,
            tables::ES_SYNONYMS,
            tables::ES_STOP_WORDS,
            "Fragmento del documento:",
        )
    }

    /// Looks up a built-in profile by language code or name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Self::english()),
            "es" | "spa" | "spanish" | "español" | "espanol" => Some(Self::spanish()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_chunk_prefix(&self) -> &str {
        &self.short_chunk_prefix
    }

    pub fn stem_prefix_len(&self) -> usize {
        self.stem_prefix_len
    }

    pub fn max_query_synonyms(&self) -> usize {
        self.max_query_synonyms
    }

    pub fn max_synonyms_per_keyword(&self) -> usize {
        self.max_synonyms_per_keyword
    }

    pub fn with_stem_prefix_len(mut self, len: usize) -> Self {
        self.stem_prefix_len = len.max(1);
        self
    }

    pub fn with_query_synonym_limits(mut self, per_keyword: usize, total: usize) -> Self {
        self.max_synonyms_per_keyword = per_keyword;
        self.max_query_synonyms = total;
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Replaces whole-word contractions in already lowercased text.
    pub fn expand_contractions(&self, lowered: &str) -> String {
        let mut out = String::with_capacity(lowered.len());
        for (i, word) in lowered.split_whitespace().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let core = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
            match self.contractions.get(core) {
                Some(expanded) => out.push_str(&word.replacen(core, expanded, 1)),
                None => out.push_str(word),
            }
        }
        out
    }

    /// Synonyms of `word` across every group it belongs to, excluding itself.
    pub fn synonyms_of(&self, word: &str) -> Vec<&str> {
        let Some(groups) = self.group_index.get(word) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        groups
            .iter()
            .flat_map(|&id| self.synonym_groups[id].iter())
            .filter(|candidate| candidate.as_str() != word && seen.insert(candidate.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        match (self.group_index.get(a), self.group_index.get(b)) {
            (Some(left), Some(right)) => left.iter().any(|id| right.contains(id)),
            _ => false,
        }
    }

    /// Naive stemming: both tokens share their first `stem_prefix_len` characters.
    pub fn shares_stem(&self, a: &str, b: &str) -> bool {
        let n = self.stem_prefix_len;
        if a.chars().count() < n || b.chars().count() < n {
            return false;
        }
        a.chars().take(n).eq(b.chars().take(n))
    }
}
