//! Page-button window for paginated movie lists.
//!
//! The window is a run of at most `max_visible` consecutive page numbers
//! centered on the current page and clamped to `[1, total_pages]`. Pages 1 and
//! `total_pages` are offered as separate jump targets when they fall outside
//! the run, with an ellipsis when there is a gap.

/// Number of page buttons shown around the current page.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// The metadata API refuses to serve pages beyond this.
pub const API_PAGE_CAP: u32 = 500;

/// Clamp an API-reported page count to `1..=API_PAGE_CAP`.
pub fn clamp_total_pages(reported: u32) -> u32 {
    reported.clamp(1, API_PAGE_CAP)
}

/// The computed page-button window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub current: u32,
    pub total: u32,
    pub start: u32,
    pub end: u32,
}

/// One control in the rendered pager, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    Prev { enabled: bool },
    Page { number: u32, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

impl PagerItem {
    /// Page a click on this control navigates to, if any.
    pub fn target(&self, current: u32) -> Option<u32> {
        match *self {
            Self::Prev { enabled: true } => Some(current - 1),
            Self::Next { enabled: true } => Some(current + 1),
            Self::Page { number, .. } => Some(number),
            _ => None,
        }
    }
}

/// Compute the window for `current` out of `total` pages.
///
/// `current` is clamped into `[1, total]` and `total`/`max_visible` are
/// treated as at least 1, so the result always satisfies
/// `1 <= start <= current <= end <= total` and
/// `end - start + 1 == min(max_visible, total)`.
pub fn compute_window(current: u32, total: u32, max_visible: u32) -> PaginationWindow {
    let total = total.max(1);
    let max_visible = max_visible.clamp(1, total);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = total.min(start.saturating_add(max_visible - 1));
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    PaginationWindow {
        current,
        total,
        start,
        end,
    }
}

impl PaginationWindow {
    /// Number of page buttons inside the window.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Page 1 is outside the window and needs its own button.
    pub fn first_jump(&self) -> bool {
        self.start > 1
    }

    /// There is a gap between the page-1 button and the window.
    pub fn leading_ellipsis(&self) -> bool {
        self.start > 2
    }

    /// The last page is outside the window and needs its own button.
    pub fn last_jump(&self) -> bool {
        self.end < self.total
    }

    /// There is a gap between the window and the last-page button.
    pub fn trailing_ellipsis(&self) -> bool {
        self.end + 1 < self.total
    }

    pub fn prev_enabled(&self) -> bool {
        self.current > 1
    }

    pub fn next_enabled(&self) -> bool {
        self.current < self.total
    }

    /// Whether a pager is shown at all. A single page gets no controls.
    pub fn is_visible(&self) -> bool {
        self.total > 1
    }

    /// The full ordered control list, empty when only one page exists.
    pub fn items(&self) -> Vec<PagerItem> {
        if !self.is_visible() {
            return Vec::new();
        }

        let mut items = Vec::with_capacity(self.len() as usize + 6);
        items.push(PagerItem::Prev {
            enabled: self.prev_enabled(),
        });

        if self.first_jump() {
            items.push(PagerItem::Page {
                number: 1,
                active: false,
            });
            if self.leading_ellipsis() {
                items.push(PagerItem::Ellipsis);
            }
        }

        for number in self.pages() {
            items.push(PagerItem::Page {
                number,
                active: number == self.current,
            });
        }

        if self.last_jump() {
            if self.trailing_ellipsis() {
                items.push(PagerItem::Ellipsis);
            }
            items.push(PagerItem::Page {
                number: self.total,
                active: false,
            });
        }

        items.push(PagerItem::Next {
            enabled: self.next_enabled(),
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(items: &[PagerItem]) -> Vec<u32> {
        items
            .iter()
            .filter_map(|i| match i {
                PagerItem::Page { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_window_invariants_hold_everywhere() {
        for total in 1..=40 {
            for current in 1..=total {
                let w = compute_window(current, total, MAX_VISIBLE_PAGES);
                assert_eq!(w.len(), MAX_VISIBLE_PAGES.min(total), "{current}/{total}");
                assert!(w.start >= 1);
                assert!(w.end <= total);
                assert!(w.pages().contains(&current));
            }
        }
    }

    #[test]
    fn test_first_page_of_ten() {
        let w = compute_window(1, 10, 5);
        assert_eq!((w.start, w.end), (1, 5));
        assert!(!w.first_jump());
        assert!(!w.leading_ellipsis());
        assert!(w.trailing_ellipsis());
        assert!(w.last_jump());
        assert!(!w.prev_enabled());

        let items = w.items();
        assert_eq!(items.first(), Some(&PagerItem::Prev { enabled: false }));
        assert_eq!(pages(&items), vec![1, 2, 3, 4, 5, 10]);
        assert_eq!(items[items.len() - 3], PagerItem::Ellipsis);
    }

    #[test]
    fn test_last_page_of_ten() {
        let w = compute_window(10, 10, 5);
        assert_eq!((w.start, w.end), (6, 10));
        assert!(w.leading_ellipsis());
        assert!(!w.trailing_ellipsis());
        assert!(!w.last_jump());
        assert!(!w.next_enabled());

        let items = w.items();
        assert_eq!(items.last(), Some(&PagerItem::Next { enabled: false }));
        assert_eq!(pages(&items), vec![1, 6, 7, 8, 9, 10]);
        assert_eq!(items[2], PagerItem::Ellipsis);
    }

    #[test]
    fn test_middle_page_is_centered() {
        let w = compute_window(50, 500, 5);
        assert_eq!((w.start, w.end), (48, 52));
        assert!(w.leading_ellipsis());
        assert!(w.trailing_ellipsis());
    }

    #[test]
    fn test_no_ellipsis_when_adjacent_to_jump() {
        // Window [2..6] of 7: page 1 and page 7 touch the window.
        let w = compute_window(4, 7, 5);
        assert_eq!((w.start, w.end), (2, 6));
        assert!(w.first_jump() && !w.leading_ellipsis());
        assert!(w.last_jump() && !w.trailing_ellipsis());
        assert_eq!(pages(&w.items()), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_fewer_pages_than_window() {
        let w = compute_window(2, 3, 5);
        assert_eq!((w.start, w.end), (1, 3));
        assert_eq!(pages(&w.items()), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_page_has_no_controls() {
        let w = compute_window(1, 1, 5);
        assert_eq!((w.start, w.end), (1, 1));
        assert!(w.items().is_empty());
    }

    #[test]
    fn test_active_marker() {
        let w = compute_window(3, 10, 5);
        let active: Vec<u32> = w
            .items()
            .iter()
            .filter_map(|i| match i {
                PagerItem::Page { number, active: true } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec![3]);
    }

    #[test]
    fn test_item_targets() {
        assert_eq!(PagerItem::Prev { enabled: true }.target(4), Some(3));
        assert_eq!(PagerItem::Prev { enabled: false }.target(1), None);
        assert_eq!(PagerItem::Next { enabled: true }.target(4), Some(5));
        assert_eq!(PagerItem::Ellipsis.target(4), None);
    }

    #[test]
    fn test_huge_max_visible_shows_every_page() {
        let w = compute_window(3, 10, u32::MAX);
        assert_eq!((w.start, w.end), (1, 10));
        assert_eq!(w.len(), 10);

        let w = compute_window(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!((w.start, w.end), (1, u32::MAX));
    }

    #[test]
    fn test_clamp_total_pages() {
        assert_eq!(clamp_total_pages(1000), 500);
        assert_eq!(clamp_total_pages(500), 500);
        assert_eq!(clamp_total_pages(42), 42);
        assert_eq!(clamp_total_pages(0), 1);
    }
}
