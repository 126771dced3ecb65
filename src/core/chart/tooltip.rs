//! Tooltip text and placement
//!
//! Tooltip boxes are positioned at render time so the page script only has
//! to show a box at the stored coordinates. The box sits up and to the right
//! of its anchor and flips to the other side of the anchor when it would
//! leave the viewport.

use super::svg::{attr, Attr};

const CHAR_WIDTH: f64 = 7.0;
const LINE_HEIGHT: f64 = 16.0;
const PADDING: f64 = 8.0;
const OFFSET: f64 = 12.0;

/// Top-left corner of a placed tooltip box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
}

/// Multi-line tooltip content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    lines: Vec<String>,
}

impl Tooltip {
    /// Create a tooltip from its lines
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines joined by newlines
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Estimated box size (width, height)
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        let longest = self
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let size = (
            longest as f64 * CHAR_WIDTH + 2.0 * PADDING,
            self.lines.len() as f64 * LINE_HEIGHT + 2.0 * PADDING,
        );
        size
    }

    /// Place the box for an anchor point inside a viewport of `viewport` size
    #[must_use]
    pub fn place(&self, anchor: (f64, f64), viewport: (f64, f64)) -> Placement {
        place_box(anchor, self.size(), viewport)
    }

    /// `data-tip*` attributes consumed by the page script
    #[must_use]
    pub fn attrs(&self, anchor: (f64, f64), viewport: (f64, f64)) -> [Attr<'static>; 3] {
        let at = self.place(anchor, viewport);
        [
            attr("data-tip", self.text()),
            attr("data-tip-x", super::svg::num(at.x)),
            attr("data-tip-y", super::svg::num(at.y)),
        ]
    }
}

/// Position a `size` box near `anchor` without leaving `viewport`.
///
/// Preferred spot is right of and above the anchor. Overflow on the right
/// flips the box to the left, overflow at the top flips it below; the
/// result is finally clamped so a box larger than the viewport starts at 0.
#[must_use]
pub fn place_box(anchor: (f64, f64), size: (f64, f64), viewport: (f64, f64)) -> Placement {
    let (ax, ay) = anchor;
    let (w, h) = size;
    let (vw, vh) = viewport;

    let mut x = ax + OFFSET;
    if x + w > vw {
        x = ax - OFFSET - w;
    }
    let mut y = ay - OFFSET - h;
    if y < 0.0 {
        y = ay + OFFSET;
    }

    Placement {
        x: x.min(vw - w).max(0.0),
        y: y.min(vh - h).max(0.0),
    }
}
