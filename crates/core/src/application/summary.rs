// Output Summarizer
// Bounds a captured stream to a fixed size, keeping its head and tail byte-exact.

use crate::application::worker::constants::{SUMMARY_BOUND, SUMMARY_ELLIPSIS};
use std::borrow::Cow;
use std::path::Path;

/// Summarize with the default bound (200,000 bytes)
pub fn summarize(buf: &[u8]) -> Cow<'_, [u8]> {
    summarize_with_bound(buf, SUMMARY_BOUND)
}

/// Return `buf` unchanged if it fits in `bound`, otherwise
/// `head(bound / 2) + "..." + tail(bound / 2)`.
///
/// Only length and position are inspected, never content.
pub fn summarize_with_bound(buf: &[u8], bound: usize) -> Cow<'_, [u8]> {
    if buf.len() <= bound {
        return Cow::Borrowed(buf);
    }

    let half = bound / 2;
    let mut out = Vec::with_capacity(half * 2 + SUMMARY_ELLIPSIS.len());
    out.extend_from_slice(&buf[..half]);
    out.extend_from_slice(SUMMARY_ELLIPSIS);
    out.extend_from_slice(&buf[buf.len() - half..]);
    Cow::Owned(out)
}

/// Read a workspace stream once and summarize it.
///
/// Truncation happens on bytes; the lossy UTF-8 conversion for reporting
/// comes after.
pub async fn summarize_file(path: &Path, bound: usize) -> std::io::Result<String> {
    let buf = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&summarize_with_bound(&buf, bound)).into_owned())
}
