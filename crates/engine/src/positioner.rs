//! Dropdown placement relative to the input anchor.

use typeahead_types::{Bounds, Placement};

/// Geometry queries answered by the host view.
///
/// Every method returns `None` until the host has laid out the widget at
/// least once; the controller then leaves placement untouched.
pub trait LayoutProbe {
    /// Bounding box of the input the dropdown is attached to.
    fn anchor_bounds(&self) -> Option<Bounds>;
    /// Height the panel needs to show `rows` options.
    fn panel_height(&self, rows: usize) -> Option<f32>;
    /// Height of the visible viewport.
    fn viewport_height(&self) -> Option<f32>;
}

/// Choose the side of the anchor for a panel of `panel_height`.
///
/// The panel goes below unless it does not fit there while it does fit
/// above.
pub fn compute_placement(anchor: Bounds, panel_height: f32, viewport_height: f32) -> Placement {
    let space_below = viewport_height - anchor.bottom();
    let space_above = anchor.top();
    if space_below < panel_height && space_above >= panel_height {
        Placement::Above
    } else {
        Placement::Below
    }
}

/// Bounds of the panel drawn flush against `anchor` on the given side.
pub fn panel_bounds(anchor: Bounds, panel_height: f32, placement: Placement) -> Bounds {
    let y = match placement {
        Placement::Below => anchor.bottom(),
        Placement::Above => anchor.top() - panel_height,
    };
    Bounds::new(anchor.x, y, anchor.width, panel_height)
}

/// Layout with a fixed anchor and uniform row height.
///
/// Useful for headless hosts and tests where nothing is actually rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedLayout {
    pub anchor: Bounds,
    pub row_height: f32,
    /// Extra height around the rows (borders, padding)
    pub chrome: f32,
    pub viewport_height: f32,
}

impl LayoutProbe for FixedLayout {
    fn anchor_bounds(&self) -> Option<Bounds> {
        Some(self.anchor)
    }

    fn panel_height(&self, rows: usize) -> Option<f32> {
        Some(rows as f32 * self.row_height + self.chrome)
    }

    fn viewport_height(&self) -> Option<f32> {
        Some(self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_at(top: f32) -> Bounds {
        Bounds::new(0.0, top, 40.0, 3.0)
    }

    #[test]
    fn below_when_it_fits() {
        assert_eq!(compute_placement(anchor_at(2.0), 10.0, 50.0), Placement::Below);
    }

    #[test]
    fn above_when_only_above_fits() {
        // 40 rows tall viewport, anchor bottom at 38: 2 rows below, 35 above.
        assert_eq!(compute_placement(anchor_at(35.0), 10.0, 40.0), Placement::Above);
    }

    #[test]
    fn below_when_neither_side_fits() {
        assert_eq!(compute_placement(anchor_at(5.0), 20.0, 12.0), Placement::Below);
    }

    #[test]
    fn exact_fit_below_stays_below() {
        // space below == panel height
        assert_eq!(compute_placement(anchor_at(27.0), 10.0, 40.0), Placement::Below);
    }

    #[test]
    fn exact_fit_above_flips() {
        assert_eq!(compute_placement(anchor_at(10.0), 10.0, 20.0), Placement::Above);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let anchor = anchor_at(30.0);
        let first = compute_placement(anchor, 8.0, 36.0);
        assert_eq!(compute_placement(anchor, 8.0, 36.0), first);
    }

    #[test]
    fn panel_sits_flush_against_the_anchor() {
        let anchor = anchor_at(10.0);
        assert_eq!(panel_bounds(anchor, 4.0, Placement::Below), Bounds::new(0.0, 13.0, 40.0, 4.0));
        assert_eq!(panel_bounds(anchor, 4.0, Placement::Above), Bounds::new(0.0, 6.0, 40.0, 4.0));
    }

    #[test]
    fn fixed_layout_sizes_rows_plus_chrome() {
        let layout = FixedLayout {
            anchor: anchor_at(0.0),
            row_height: 1.0,
            chrome: 2.0,
            viewport_height: 24.0,
        };
        assert_eq!(layout.panel_height(5), Some(7.0));
        assert_eq!(layout.viewport_height(), Some(24.0));
    }
}
