//! Boundary detection and greedy packing over byte spans of normalized text.
//!
//! Every function returns contiguous spans that cover the input range exactly;
//! separator whitespace stays on the end of the preceding unit.

use std::ops::Range;

use super::config::ChunkStrategy;

const TERMINATORS: [char; 4] = ['.', '!', '?', '…'];
const CLOSERS: [char; 5] = ['"', '\'', ')', ']', '»'];

/// Splits `text` into packed body spans no longer than `limit` characters, except
/// for single units that cannot be divided further.
pub(crate) fn split_spans(text: &str, strategy: ChunkStrategy, limit: usize) -> Vec<Range<usize>> {
    if text.is_empty() {
        return Vec::new();
    }
    split_range(text, 0..text.len(), strategy, limit)
}

fn split_range(
    text: &str,
    range: Range<usize>,
    strategy: ChunkStrategy,
    limit: usize,
) -> Vec<Range<usize>> {
    let units = match strategy {
        ChunkStrategy::ByParagraph => paragraph_units(text, range),
        ChunkStrategy::BySentence => sentence_units(text, range),
        ChunkStrategy::ByWordCount => word_units(text, range),
    };
    pack(text, units, strategy, limit)
}

fn pack(
    text: &str,
    units: Vec<Range<usize>>,
    strategy: ChunkStrategy,
    limit: usize,
) -> Vec<Range<usize>> {
    let mut packed = Vec::new();
    let mut current: Option<Range<usize>> = None;
    let mut current_len = 0usize;

    for unit in units {
        let unit_len = text[unit.clone()].chars().count();

        if unit_len > limit {
            if let Some(done) = current.take() {
                packed.push(done);
            }
            current_len = 0;
            match strategy.finer() {
                Some(finer) => packed.extend(split_range(text, unit, finer, limit)),
                None => packed.push(unit),
            }
            continue;
        }

        match current.as_mut() {
            Some(open) if current_len + unit_len <= limit => {
                open.end = unit.end;
                current_len += unit_len;
            }
            _ => {
                if let Some(done) = current.take() {
                    packed.push(done);
                }
                current_len = unit_len;
                current = Some(unit);
            }
        }
    }

    if let Some(done) = current {
        packed.push(done);
    }
    packed
}

pub(crate) fn paragraph_units(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let mut units = Vec::new();
    let mut start = range.start;

    for (offset, _) in slice.match_indices("\n\n") {
        let end = range.start + offset + 2;
        units.push(start..end);
        start = end;
    }
    if start < range.end {
        units.push(start..range.end);
    }
    units
}

pub(crate) fn sentence_units(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let chars: Vec<(usize, char)> = slice.char_indices().collect();
    let mut units = Vec::new();
    let mut start = range.start;
    let mut i = 0;

    while i < chars.len() {
        if !TERMINATORS.contains(&chars[i].1) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1))
        {
            j += 1;
        }
        let whitespace_start = j;
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        if j == chars.len() {
            break;
        }

        let next = chars[j].1;
        if j > whitespace_start && opens_sentence(next) {
            let boundary = range.start + chars[j].0;
            units.push(start..boundary);
            start = boundary;
        }
        i = j;
    }

    if start < range.end {
        units.push(start..range.end);
    }
    units
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || matches!(c, '¿' | '¡')
}

pub(crate) fn word_units(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let mut units = Vec::new();
    let mut start = range.start;
    let mut previous_was_space = false;

    for (offset, c) in slice.char_indices() {
        let pos = range.start + offset;
        if previous_was_space && !c.is_whitespace() && pos > start {
            units.push(start..pos);
            start = pos;
        }
        previous_was_space = c.is_whitespace();
    }
    if start < range.end {
        units.push(start..range.end);
    }
    units
}
