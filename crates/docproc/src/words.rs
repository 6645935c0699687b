//! Word counting shared by every extractor.

/// Count whitespace-separated words.
///
/// `None` and empty text count as zero. Runs of whitespace act as a single
/// separator and leading/trailing whitespace is ignored.
pub fn count_words<'a>(text: impl Into<Option<&'a str>>) -> usize {
    match text.into() {
        Some(text) => text.split_whitespace().count(),
        None => 0,
    }
}
