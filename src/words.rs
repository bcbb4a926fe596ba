/// Counts whitespace-delimited tokens in `text`.
///
/// Punctuation is kept and nothing is locale-aware: a lone `-` is a word,
/// `don't` is one word. Any run of whitespace separates two words.
pub fn count_words(text: &str) -> u64 {
    // split_whitespace already skips leading/trailing whitespace and
    // collapses runs, so an all-blank string yields zero items
    text.split_whitespace().count() as u64
}
