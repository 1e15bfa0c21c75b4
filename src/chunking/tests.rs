use super::*;

const ZORG: &str = "The sky on planet Zorg is green. Zorg has two moons.";

fn long_document() -> String {
    let mut text = String::from("# Orbital Mechanics\n");
    for i in 0..12 {
        text.push_str(&format!(
            "Paragraph {i} explains how the moons of Zorg trace their orbits. \
             Each moon completes a cycle in roughly {} days! Observers record \
             the transits from the northern ridge.\n\n",
            20 + i
        ));
    }
    text.push_str("Closing remarks summarize the findings.");
    text
}

fn all_strategies() -> [ChunkStrategy; 3] {
    [
        ChunkStrategy::ByParagraph,
        ChunkStrategy::BySentence,
        ChunkStrategy::ByWordCount,
    ]
}

#[test]
fn test_empty_document_yields_no_chunks() {
    let chunker = Chunker::default();
    assert!(chunker.chunk("").is_empty());
    assert!(chunker.chunk("   \n\n\t  ").is_empty());
}

#[test]
fn test_short_document_is_single_chunk() {
    let chunks = chunk_text(ZORG, 500, 50, ChunkStrategy::ByParagraph).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, ZORG);
    assert_eq!(chunks[0].overlap_len, 0);
    assert_eq!(chunks[0].metadata.word_count, 11);
}

#[test]
fn test_reconstruction_for_every_strategy() {
    let text = long_document();
    let normalized = normalize_text(&text);

    for strategy in all_strategies() {
        for (size, overlap) in [(80, 20), (150, 0), (400, 120)] {
            let chunks = chunk_text(&text, size, overlap, strategy).unwrap();
            assert!(chunks.len() > 1, "{strategy} {size}");
            assert_eq!(
                reconstruct(&chunks),
                normalized,
                "strategy {strategy}, size {size}, overlap {overlap}"
            );
        }
    }
}

#[test]
fn test_reconstruction_with_multibyte_text() {
    let text = "Él habló del año pasado. ¿Qué ocurrió después? Nadie lo sabe.\n\n\
                La niña corrió hacia el acantilado. Todo cambió.";
    for strategy in all_strategies() {
        let chunks = chunk_text(text, 30, 7, strategy).unwrap();
        assert_eq!(reconstruct(&chunks), normalize_text(text), "{strategy}");
    }
}

#[test]
fn test_word_count_strategy_size_bound() {
    let text = long_document();
    let (size, overlap) = (60, 15);
    let chunks = chunk_text(&text, size, overlap, ChunkStrategy::ByWordCount).unwrap();

    for chunk in &chunks {
        assert!(chunk.metadata.char_count <= size, "body too long: {:?}", chunk.body());
        assert!(char_count(&chunk.text) <= size + overlap);
    }
}

#[test]
fn test_oversized_word_becomes_own_chunk() {
    let word = "x".repeat(40);
    let text = format!("short words {word} then more");
    let chunks = chunk_text(&text, 20, 5, ChunkStrategy::ByWordCount).unwrap();

    let oversized: Vec<_> = chunks
        .iter()
        .filter(|c| c.metadata.char_count > 20)
        .collect();
    assert_eq!(oversized.len(), 1);
    assert_eq!(oversized[0].body().trim(), word);
    assert_eq!(reconstruct(&chunks), normalize_text(&text));
}

#[test]
fn test_overlap_prefix_is_tail_of_previous_chunk() {
    let text = long_document();
    let chunks = chunk_text(&text, 120, 30, ChunkStrategy::BySentence).unwrap();

    for pair in chunks.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        assert!(previous.text.ends_with(next.overlap_prefix()));
        assert!(char_count(next.overlap_prefix()) <= 30);
        assert_eq!(previous.end, next.start);
    }
    assert_eq!(chunks[0].overlap_len, 0);
}

#[test]
fn test_zero_overlap_has_no_prefix() {
    let chunks = chunk_text(&long_document(), 100, 0, ChunkStrategy::ByParagraph).unwrap();
    assert!(chunks.iter().all(|c| c.overlap_len == 0));
}

#[test]
fn test_paragraphs_are_packed_together() {
    let text = "Alpha one.\n\nBeta two.\n\nGamma three.";
    let chunks = chunk_text(text, 200, 0, ChunkStrategy::ByParagraph).unwrap();
    assert_eq!(chunks.len(), 1);

    let chunks = chunk_text(text, 14, 0, ChunkStrategy::ByParagraph).unwrap();
    let bodies: Vec<&str> = chunks.iter().map(Chunk::body).collect();
    assert_eq!(bodies, vec!["Alpha one.\n\n", "Beta two.\n\n", "Gamma three."]);
}

#[test]
fn test_long_paragraph_falls_back_to_sentences() {
    let text = "First sentence is here. Second sentence is here. Third sentence is here.";
    let chunks = chunk_text(text, 30, 0, ChunkStrategy::ByParagraph).unwrap();
    let bodies: Vec<&str> = chunks.iter().map(Chunk::body).collect();
    assert_eq!(
        bodies,
        vec![
            "First sentence is here. ",
            "Second sentence is here. ",
            "Third sentence is here."
        ]
    );
}

#[test]
fn test_chunk_indices_are_sequential() {
    let chunks = chunk_text(&long_document(), 90, 10, ChunkStrategy::ByParagraph).unwrap();
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
    }
}

#[test]
fn test_detects_markdown_heading() {
    let chunks = chunk_text(&long_document(), 2000, 0, ChunkStrategy::ByParagraph).unwrap();
    assert_eq!(
        chunks[0].metadata.section.as_deref(),
        Some("Orbital Mechanics")
    );
}

#[test]
fn test_detects_plain_heading() {
    let text = "Atmosphere of Zorg\nThe air is thin and cold.";
    let chunks = chunk_text(text, 500, 0, ChunkStrategy::ByParagraph).unwrap();
    assert_eq!(
        chunks[0].metadata.section.as_deref(),
        Some("Atmosphere of Zorg")
    );
}

#[test]
fn test_sentence_is_not_a_heading() {
    let text = "The air is thin and cold.\nIt rarely rains.";
    let chunks = chunk_text(text, 500, 0, ChunkStrategy::ByParagraph).unwrap();
    assert!(chunks[0].metadata.section.is_none());
}

#[test]
fn test_invalid_config_rejected() {
    assert!(matches!(
        chunk_text(ZORG, 0, 0, ChunkStrategy::ByWordCount),
        Err(ChunkingError::InvalidConfig { .. })
    ));
    assert!(matches!(
        chunk_text(ZORG, 10, 10, ChunkStrategy::ByWordCount),
        Err(ChunkingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_strategy_from_str() {
    assert_eq!(
        "paragraph".parse::<ChunkStrategy>().unwrap(),
        ChunkStrategy::ByParagraph
    );
    assert_eq!(
        "by-sentence".parse::<ChunkStrategy>().unwrap(),
        ChunkStrategy::BySentence
    );
    assert_eq!(
        "WORD".parse::<ChunkStrategy>().unwrap(),
        ChunkStrategy::ByWordCount
    );
    assert!("tokens".parse::<ChunkStrategy>().is_err());
}

#[test]
fn test_chunker_texts_match_chunks() {
    let chunker = Chunker::new(ChunkerConfig::default().chunk_size(60).overlap(10)).unwrap();
    let texts = chunker.chunk_texts(&long_document());
    let chunks = chunker.chunk(&long_document());
    assert_eq!(texts.len(), chunks.len());
    assert_eq!(texts[1], chunks[1].text);
}
