/// Longest text the Google speech endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

const SENTENCE_END: &[char] = &['.', '!', '?', '…', '。', '！', '？', '।'];
const CLAUSE_END: &[char] = &[',', ';', ':', '、', '，', '；', '：', '—'];

/// Collapse whitespace and split `text` into chunks of at most `max_chars` characters.
///
/// Cuts prefer the end of a sentence, then a clause, then a word boundary; a word longer than
/// `max_chars` is cut hard. Chunks without any alphanumeric character are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = Vec::new();
    let mut rest = cleaned.as_str();
    while !rest.is_empty() {
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if window_end == rest.len() {
            push_chunk(&mut out, rest);
            break;
        }

        let window = &rest[..window_end];
        let cut = last_cut_after(window, SENTENCE_END)
            .or_else(|| last_cut_after(window, CLAUSE_END))
            .or_else(|| window.rfind(char::is_whitespace))
            .filter(|&i| i > 0)
            .unwrap_or(window_end);

        push_chunk(&mut out, &rest[..cut]);
        rest = rest[cut..].trim_start();
    }
    out
}

fn last_cut_after(window: &str, set: &[char]) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| set.contains(c))
        .map(|(i, c)| i + c.len_utf8())
}

fn push_chunk(out: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if chunk.chars().any(char::is_alphanumeric) {
        out.push(chunk.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/chunk.rs"]
mod tests;
