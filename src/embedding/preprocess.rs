//! Text preparation before embedding.

use std::collections::HashSet;

use crate::chunking::{char_count, normalize_text};
use crate::language::LanguageProfile;

/// Flattens a chunk to a single line, collapses repeated punctuation and prefixes
/// short chunks with the profile's explanatory phrase.
pub fn preprocess_chunk(text: &str, profile: &LanguageProfile, min_chars: usize) -> String {
    let flattened = collapse_repeated_punctuation(
        &normalize_text(text)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    );

    if char_count(&flattened) < min_chars {
        format!("{} {}", profile.short_chunk_prefix(), flattened)
    } else {
        flattened
    }
}

/// Lowercases, expands contractions, strips punctuation and appends a bounded
/// number of synonyms for recognized keywords.
pub fn preprocess_query(query: &str, profile: &LanguageProfile) -> String {
    let lowered = normalize_text(query).to_lowercase();
    let expanded = profile.expand_contractions(&lowered);
    let stripped: String = expanded
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let words: Vec<&str> = stripped.split_whitespace().collect();
    let mut seen: HashSet<&str> = words.iter().copied().collect();
    let mut additions: Vec<&str> = Vec::new();

    'words: for word in &words {
        if profile.is_stop_word(word) {
            continue;
        }
        let mut added_for_word = 0;
        for synonym in profile.synonyms_of(word) {
            if additions.len() >= profile.max_query_synonyms() {
                break 'words;
            }
            if added_for_word >= profile.max_synonyms_per_keyword() {
                break;
            }
            if seen.insert(synonym) {
                additions.push(synonym);
                added_for_word += 1;
            }
        }
    }

    let mut out = words.join(" ");
    for synonym in additions {
        out.push(' ');
        out.push_str(synonym);
    }
    out
}

fn collapse_repeated_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if c.is_ascii_punctuation() && previous == Some(c) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}
