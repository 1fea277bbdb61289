use super::*;

#[test]
fn short_text_is_one_chunk_with_collapsed_whitespace() {
    let chunks = split_text("  Hello\n\n   world.  ", MAX_CHUNK_CHARS);
    assert_eq!(chunks, vec!["Hello world.".to_string()]);
}

#[test]
fn prefers_sentence_boundaries() {
    let text = "The forest wakes at dawn. Light spills through the canopy and the birds begin to sing their morning songs together.";
    let chunks = split_text(text, 60);
    assert_eq!(chunks[0], "The forest wakes at dawn.");
    assert!(chunks.iter().all(|c| c.chars().count() <= 60));
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn falls_back_to_clause_then_word_boundaries() {
    let chunks = split_text("alpha beta, gamma delta epsilon", 16);
    assert_eq!(chunks[0], "alpha beta,");
    let chunks = split_text("alpha beta gamma delta", 12);
    assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
}

#[test]
fn long_words_are_cut_hard() {
    let chunks = split_text("abcdefghij", 4);
    assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn punctuation_only_chunks_are_dropped() {
    assert!(split_text(" ... !!! ", MAX_CHUNK_CHARS).is_empty());
    assert!(split_text("", MAX_CHUNK_CHARS).is_empty());
}

#[test]
fn multibyte_text_is_split_on_char_boundaries() {
    let text = "नमस्ते दुनिया। यह एक परीक्षण है।";
    let chunks = split_text(text, 10);
    assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    assert!(!chunks.is_empty());
}
