//! Text patching primitives.
//!
//! Two strategies cover every text artifact:
//!
//! - Marker blocks: a unique begin/end comment pair brackets a machine-owned
//!   region. The region is replaced wholesale on every run; missing markers
//!   mean the host file drifted and the run must abort.
//! - Anchor insertion: a block is inserted after the last occurrence of an
//!   anchor substring, but only while a sentinel substring is absent. Used to
//!   splice a brand-new language into files that carry no markers. A missing
//!   anchor is not an error - those files are expected to need occasional
//!   manual reconciliation.

/// Replace the region between `begin` and `end`, keeping both markers.
///
/// `begin` should include its trailing newline and `end` its leading newline
/// so the region swaps cleanly. Returns `None` if either marker is missing
/// (callers map this to [`GenError::MarkersNotFound`](crate::error::GenError)).
pub fn replace_marker_block(
    text: &str,
    begin: &str,
    end: &str,
    region: &str,
) -> Option<String> {
    let begin_at = text.find(begin)?;
    let region_start = begin_at + begin.len();
    let region_len = text[region_start..].find(end)?;

    let mut out = String::with_capacity(text.len() - region_len + region.len());
    out.push_str(&text[..region_start]);
    out.push_str(region);
    out.push_str(&text[region_start + region_len..]);
    Some(out)
}

/// Insert `block` on a new line after the last occurrence of `anchor`, unless
/// `sentinel` already appears anywhere in `text`.
pub fn insert_after_anchor(text: &str, anchor: &str, block: &str, sentinel: &str) -> String {
    if text.contains(sentinel) {
        return text.to_string();
    }
    let Some(found) = text.rfind(anchor) else {
        return text.to_string();
    };
    let at = found + anchor.len();
    let mut out = String::with_capacity(text.len() + block.len() + 1);
    out.push_str(&text[..at]);
    out.push('\n');
    out.push_str(block);
    out.push_str(&text[at..]);
    out
}
