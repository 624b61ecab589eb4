//! Unit and property tests for line-based chunking.

use proptest::prelude::*;
use scanqa_rag::chunking::{Chunker, LineChunker};

fn chunk_texts(text: &str, max_chars: usize) -> Vec<String> {
    LineChunker::new(max_chars).chunk(text).into_iter().map(|c| c.text).collect()
}

/// Non-blank trimmed lines of the input, in order: what chunking must
/// cover exactly once.
fn expected_lines(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}

#[test]
fn packs_lines_until_cumulative_length_would_exceed_budget() {
    // Line lengths 15, 15, 8 against a budget of 20: every pairing
    // overflows, so each line closes into its own chunk.
    let text = "para one line a\npara one line b\n\npara two";
    assert_eq!(
        chunk_texts(text, 20),
        vec!["para one line a", "para one line b", "para two"]
    );
}

#[test]
fn budget_counts_line_lengths_not_join_separators() {
    // 10 + 10 == 20 exactly: fits in one chunk even though the joined
    // string is 21 characters with its newline.
    let text = "aaaaaaaaaa\nbbbbbbbbbb";
    assert_eq!(chunk_texts(text, 20), vec!["aaaaaaaaaa\nbbbbbbbbbb"]);
    // One character less of budget and the second line starts a new chunk.
    assert_eq!(chunk_texts(text, 19), vec!["aaaaaaaaaa", "bbbbbbbbbb"]);
}

#[test]
fn short_lines_accumulate_into_one_chunk() {
    assert_eq!(chunk_texts("ab\ncd\nef", 10), vec!["ab\ncd\nef"]);
}

#[test]
fn empty_and_blank_input_yield_no_chunks() {
    assert!(chunk_texts("", 100).is_empty());
    assert!(chunk_texts("\n\n   \n\t\n", 100).is_empty());
}

#[test]
fn oversized_line_becomes_its_own_chunk_unsplit() {
    let long_line = "x".repeat(50);
    let text = format!("short\n{long_line}\ntail");
    let chunks = chunk_texts(&text, 10);
    assert_eq!(chunks, vec!["short".to_string(), long_line, "tail".to_string()]);
}

#[test]
fn lines_are_trimmed_before_packing() {
    let chunks = chunk_texts("  hello  \n\tworld\t", 20);
    assert_eq!(chunks, vec!["hello\nworld"]);
}

#[test]
fn chunk_ids_are_contiguous_from_zero() {
    let chunks = LineChunker::new(5).chunk("one\ntwo\nthree\nfour");
    let ids: Vec<usize> = chunks.iter().map(|c| c.id).collect();
    assert_eq!(ids, (0..chunks.len()).collect::<Vec<_>>());
}

#[test]
fn chunks_carry_no_embeddings() {
    for chunk in LineChunker::new(10).chunk("alpha\nbeta") {
        assert!(chunk.embedding.is_empty());
    }
}

proptest! {
    /// Identical input always yields identical chunk boundaries.
    #[test]
    fn chunking_is_deterministic(
        lines in proptest::collection::vec("[ a-z]{0,30}", 0..40),
        max_chars in 1usize..60,
    ) {
        let text = lines.join("\n");
        prop_assert_eq!(chunk_texts(&text, max_chars), chunk_texts(&text, max_chars));
    }

    /// Joined chunks reproduce every non-blank trimmed line exactly once,
    /// in original order.
    #[test]
    fn chunking_loses_and_duplicates_nothing(
        lines in proptest::collection::vec("[ a-z]{0,30}", 0..40),
        max_chars in 1usize..60,
    ) {
        let text = lines.join("\n");
        let recovered: Vec<String> = chunk_texts(&text, max_chars)
            .iter()
            .flat_map(|chunk| chunk.split('\n'))
            .map(str::to_string)
            .collect();
        prop_assert_eq!(recovered, expected_lines(&text));
    }

    /// No chunk exceeds the budget except a chunk holding a single
    /// oversized line.
    #[test]
    fn chunks_respect_budget_except_single_oversized_lines(
        lines in proptest::collection::vec("[ a-z]{0,30}", 0..40),
        max_chars in 1usize..60,
    ) {
        let text = lines.join("\n");
        for chunk in chunk_texts(&text, max_chars) {
            let line_count = chunk.split('\n').count();
            let content_len: usize =
                chunk.split('\n').map(|l| l.chars().count()).sum();
            prop_assert!(
                content_len <= max_chars || line_count == 1,
                "multi-line chunk of {} chars exceeds budget {}",
                content_len,
                max_chars,
            );
        }
    }
}
