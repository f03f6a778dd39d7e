//! Interval algebra for externally supplied script ranges.
//!
//! Text extraction reports subscript and superscript spans as byte ranges into
//! the whole paragraph. A wrapped line covers a window `[from, to)` of that
//! text; this module turns the ranges into a sequence of styled intervals that
//! covers the window exactly, without gaps or overlaps.

use std::ops::Range;

use folio_core::ClipPolicy;

use crate::error::{RenderError, RenderResult};

use super::markup::StyleTag;

/// A `[start, end)` byte range in paragraph coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRange {
    pub start: usize,
    pub end: usize,
}

impl ScriptRange {
    /// Create a new range.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Range<usize>> for ScriptRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A styled `[start, end)` range in paragraph coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    /// `Normal`, `Subscript` or `Superscript`.
    pub style: StyleTag,
}

impl Interval {
    /// Create a new interval.
    pub const fn new(start: usize, end: usize, style: StyleTag) -> Self {
        Self { start, end, style }
    }

    /// Check if the interval covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The part of the paragraph covered by one wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow<'a> {
    pub from: usize,
    pub to: usize,
    pub text: &'a str,
}

impl<'a> LineWindow<'a> {
    /// Create the window of `text` starting at paragraph offset `from`.
    pub fn new(from: usize, text: &'a str) -> Self {
        Self {
            from,
            to: from + text.len(),
            text,
        }
    }

    /// The text of an interval lying inside this window.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MalformedRanges`] if the interval leaves the
    /// window or splits a character.
    pub fn slice(&self, interval: &Interval) -> RenderResult<&'a str> {
        let malformed = |reason| RenderError::MalformedRanges {
            start: interval.start,
            end: interval.end,
            reason,
        };
        if interval.start < self.from || interval.end > self.to || interval.start > interval.end {
            return Err(malformed("interval lies outside the line"));
        }
        self.text
            .get(interval.start - self.from..interval.end - self.from)
            .ok_or_else(|| malformed("range splits a character"))
    }
}

/// Clip a range that ends after the window.
///
/// With [`ClipPolicy::Legacy`] such ranges are dropped for this window, which
/// means a script span continuing onto the next line loses its styling on the
/// first one.
pub fn clip_to_window(range: ScriptRange, from: usize, to: usize, policy: ClipPolicy) -> Option<Range<usize>> {
    match policy {
        ClipPolicy::Legacy => None,
        ClipPolicy::ClipToWindow => Some(range.start.max(from)..to),
    }
}

/// Clip one list of ranges to `[from, to)`, keeping only non-empty overlaps.
fn clip_ranges(
    ranges: &[ScriptRange],
    from: usize,
    to: usize,
    style: StyleTag,
    policy: ClipPolicy,
) -> RenderResult<Vec<Interval>> {
    let mut clipped = Vec::new();
    for &range in ranges {
        if range.start > range.end {
            return Err(RenderError::MalformedRanges {
                start: range.start,
                end: range.end,
                reason: "range is inverted",
            });
        }
        if range.start >= to || range.end <= from {
            continue;
        }

        let kept = if range.start <= from && range.end <= to {
            Some(from..range.end)
        } else if from <= range.start && range.end <= to {
            Some(range.start..range.end)
        } else {
            clip_to_window(range, from, to, policy)
        };

        if let Some(kept) = kept.filter(|kept| !kept.is_empty()) {
            clipped.push(Interval::new(kept.start, kept.end, style));
        }
    }
    Ok(clipped)
}

/// Gaps between sorted, disjoint `special` intervals within `[from, to)`.
fn complement(from: usize, to: usize, special: &[Interval]) -> Vec<Interval> {
    if special.is_empty() {
        return vec![Interval::new(from, to, StyleTag::Normal)];
    }

    let mut gaps = Vec::with_capacity(special.len() + 1);
    let mut cursor = from;
    for interval in special {
        if cursor < interval.start {
            gaps.push(Interval::new(cursor, interval.start, StyleTag::Normal));
        }
        cursor = interval.end;
    }
    if cursor < to {
        gaps.push(Interval::new(cursor, to, StyleTag::Normal));
    }
    gaps
}

/// Compute the styled intervals covering `window`.
///
/// The result is sorted by start, mutually disjoint, and its union is exactly
/// `[window.from, window.to)`. Parts of the window outside every script range
/// are `Normal`. An empty window yields a single empty `Normal` interval.
///
/// # Errors
///
/// Returns [`RenderError::MalformedRanges`] if a range is inverted or if the
/// clipped ranges overlap each other.
pub fn intervals(
    window: &LineWindow<'_>,
    superscript: &[ScriptRange],
    subscript: &[ScriptRange],
    policy: ClipPolicy,
) -> RenderResult<Vec<Interval>> {
    let (from, to) = (window.from, window.to);

    let mut special = clip_ranges(superscript, from, to, StyleTag::Superscript, policy)?;
    special.extend(clip_ranges(subscript, from, to, StyleTag::Subscript, policy)?);
    special.sort_by_key(|interval| interval.start);

    if let Some(pair) = special.windows(2).find(|pair| pair[1].start < pair[0].end) {
        return Err(RenderError::MalformedRanges {
            start: pair[1].start,
            end: pair[1].end,
            reason: "range overlaps another script range",
        });
    }

    let mut all = complement(from, to, &special);
    all.extend(special);
    all.sort_by_key(|interval| interval.start);
    Ok(all)
}
