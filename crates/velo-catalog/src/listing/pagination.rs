//! The hybrid cursor/offset pagination controller.
//!
//! The backing store's cursor primitive only supports "resume after a known
//! record going forward". Sequential next-page moves with a known last
//! record therefore use a cursor; backward moves and arbitrary jumps fall
//! back to an explicit row offset, which is correct but may cost more reads
//! on the backend. The decision lives in one pure function so the branching
//! is a single testable unit.

use crate::ids::ProductId;
use crate::listing::filters::ProductFilters;

/// How the next page should be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMode {
    /// Resume after the last record of the previous page.
    Cursor { last_id: ProductId },
    /// Skip an explicit number of rows from the start.
    Offset { page_offset: usize },
}

impl PageMode {
    pub fn is_cursor(&self) -> bool {
        matches!(self, PageMode::Cursor { .. })
    }
}

/// Choose the pagination mode for a navigation.
///
/// | Navigation | Cursor available? | Mode |
/// |---|---|---|
/// | requested == current + 1 | yes | cursor |
/// | requested == current + 1 | no | offset |
/// | requested == current − 1 | — | offset (backward cursors are never constructed) |
/// | any other jump | — | offset |
pub fn decide(
    current_page: u32,
    requested_page: u32,
    cursor: Option<&ProductId>,
    page_size: usize,
) -> PageMode {
    let requested = requested_page.max(1);
    if requested == current_page + 1 {
        if let Some(last_id) = cursor {
            return PageMode::Cursor {
                last_id: last_id.clone(),
            };
        }
    }
    PageMode::Offset {
        page_offset: (requested as usize - 1) * page_size,
    }
}

/// URL/query encoding of a pagination decision: the target page number,
/// plus the last-record id exactly when cursor mode was chosen. Servers
/// read the presence or absence of `lastId` as the mode signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub last_id: Option<ProductId>,
}

impl PageParams {
    /// Encode a decision for a target page.
    pub fn encode(page: u32, mode: &PageMode) -> Self {
        Self {
            page,
            last_id: match mode {
                PageMode::Cursor { last_id } => Some(last_id.clone()),
                PageMode::Offset { .. } => None,
            },
        }
    }

    /// Decode back into a mode on the serving side.
    pub fn mode(&self, page_size: usize) -> PageMode {
        match &self.last_id {
            Some(last_id) => PageMode::Cursor {
                last_id: last_id.clone(),
            },
            None => PageMode::Offset {
                page_offset: (self.page.max(1) as usize - 1) * page_size,
            },
        }
    }

    /// Render as query pairs, ready for a URL.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if let Some(last_id) = &self.last_id {
            pairs.push(("lastId", last_id.to_string()));
        }
        pairs
    }
}

/// The visible page-number window around the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Up to five consecutive page numbers, clamped to `[1, total]`.
    pub numbers: Vec<u32>,
    /// Show the jump-to-first control (with ellipsis): the window does not
    /// touch the left edge.
    pub first_jump: bool,
    /// Show the jump-to-last control (with ellipsis): the window does not
    /// touch the right edge.
    pub last_jump: bool,
}

/// Compute the page-number window: up to five consecutive numbers centered
/// on the current page.
pub fn page_window(current_page: u32, total_pages: u32) -> PageWindow {
    const WIDTH: u32 = 5;
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);

    let start = current.saturating_sub(WIDTH / 2).max(1);
    let end = (start + WIDTH - 1).min(total);
    let start = end.saturating_sub(WIDTH - 1).max(1);

    PageWindow {
        numbers: (start..=end).collect(),
        first_jump: start > 1,
        last_jump: end < total,
    }
}

/// One listing surface's navigation state.
///
/// Guards the single-request-in-flight rule with a busy flag (a competing
/// navigation is ignored, not queued), and guarantees that any filter or
/// sort change resets to page 1 and discards the stored cursor — a stale
/// cursor must never cross a filter change.
#[derive(Debug, Clone)]
pub struct ListingState {
    filters: ProductFilters,
    current_page: u32,
    last_seen: Option<ProductId>,
    in_flight: Option<u32>,
}

impl ListingState {
    pub fn new(filters: ProductFilters) -> Self {
        Self {
            filters,
            current_page: 1,
            last_seen: None,
            in_flight: None,
        }
    }

    pub fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// The cursor that would be used for a sequential next-page move.
    pub fn cursor(&self) -> Option<&ProductId> {
        self.last_seen.as_ref()
    }

    /// Whether the control targeting this page should be disabled.
    pub fn is_target_in_flight(&self, page: u32) -> bool {
        self.in_flight == Some(page)
    }

    /// Start a navigation to the requested page.
    ///
    /// Returns the decision and its parameter encoding, or `None` while a
    /// previous navigation is still outstanding.
    pub fn navigate(&mut self, requested_page: u32) -> Option<(PageMode, PageParams)> {
        if self.in_flight.is_some() {
            return None;
        }
        let requested = requested_page.max(1);
        let mode = decide(
            self.current_page,
            requested,
            self.last_seen.as_ref(),
            self.filters.page_size,
        );
        self.in_flight = Some(requested);
        let params = PageParams::encode(requested, &mode);
        Some((mode, params))
    }

    /// Record a completed navigation and the new last-seen record.
    pub fn complete(&mut self, page: u32, last_record: Option<ProductId>) {
        self.current_page = page.max(1);
        self.last_seen = last_record;
        self.in_flight = None;
    }

    /// Record a failed navigation; the previous page stays current.
    pub fn fail(&mut self) {
        self.in_flight = None;
    }

    /// Replace the filter set. Pagination resets to page 1 and the cursor
    /// is discarded unconditionally.
    pub fn apply_filters(&mut self, filters: ProductFilters) {
        self.filters = filters;
        self.current_page = 1;
        self.last_seen = None;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::filters::SortOption;

    fn cursor() -> ProductId {
        ProductId::new("last-product")
    }

    #[test]
    fn test_sequential_next_with_cursor_is_cursor_mode() {
        let mode = decide(2, 3, Some(&cursor()), 12);
        assert_eq!(
            mode,
            PageMode::Cursor {
                last_id: cursor()
            }
        );
    }

    #[test]
    fn test_sequential_next_without_cursor_is_offset_mode() {
        let mode = decide(2, 3, None, 12);
        assert_eq!(mode, PageMode::Offset { page_offset: 24 });
    }

    #[test]
    fn test_backward_move_is_always_offset_mode() {
        // Regardless of cursor availability.
        let mode = decide(3, 2, Some(&cursor()), 12);
        assert_eq!(mode, PageMode::Offset { page_offset: 12 });
        let mode = decide(3, 2, None, 12);
        assert_eq!(mode, PageMode::Offset { page_offset: 12 });
    }

    #[test]
    fn test_jump_is_offset_mode() {
        // Page 3 -> page 1 (direct click or deep link).
        let mode = decide(3, 1, Some(&cursor()), 12);
        assert_eq!(mode, PageMode::Offset { page_offset: 0 });

        let mode = decide(1, 7, Some(&cursor()), 10);
        assert_eq!(mode, PageMode::Offset { page_offset: 60 });
    }

    #[test]
    fn test_params_encode_cursor_presence() {
        // Next arrow from page 2 with a known last record: cursor mode,
        // lastId present, page=3.
        let mode = decide(2, 3, Some(&cursor()), 12);
        let params = PageParams::encode(3, &mode);
        assert_eq!(params.page, 3);
        assert_eq!(params.last_id, Some(cursor()));
        assert_eq!(
            params.query_pairs(),
            vec![("page", "3".to_string()), ("lastId", "last-product".to_string())]
        );

        // Jump to page 1 under a sort: offset mode, no lastId.
        let mode = decide(3, 1, Some(&cursor()), 12);
        let params = PageParams::encode(1, &mode);
        assert_eq!(params.last_id, None);
        assert_eq!(params.query_pairs(), vec![("page", "1".to_string())]);
    }

    #[test]
    fn test_params_decode_round_trip() {
        let params = PageParams {
            page: 4,
            last_id: Some(cursor()),
        };
        assert!(params.mode(12).is_cursor());

        let params = PageParams {
            page: 4,
            last_id: None,
        };
        assert_eq!(params.mode(12), PageMode::Offset { page_offset: 36 });
    }

    #[test]
    fn test_page_window_centered() {
        let window = page_window(5, 10);
        assert_eq!(window.numbers, vec![3, 4, 5, 6, 7]);
        assert!(window.first_jump);
        assert!(window.last_jump);
    }

    #[test]
    fn test_page_window_clamped_to_edges() {
        let window = page_window(1, 10);
        assert_eq!(window.numbers, vec![1, 2, 3, 4, 5]);
        assert!(!window.first_jump);
        assert!(window.last_jump);

        let window = page_window(10, 10);
        assert_eq!(window.numbers, vec![6, 7, 8, 9, 10]);
        assert!(window.first_jump);
        assert!(!window.last_jump);
    }

    #[test]
    fn test_page_window_few_pages() {
        let window = page_window(2, 3);
        assert_eq!(window.numbers, vec![1, 2, 3]);
        assert!(!window.first_jump);
        assert!(!window.last_jump);
    }

    #[test]
    fn test_navigation_busy_flag() {
        let mut state = ListingState::new(ProductFilters::new());
        assert!(state.navigate(2).is_some());
        assert!(state.is_target_in_flight(2));
        // A competing navigation is ignored while one is outstanding.
        assert!(state.navigate(3).is_none());

        state.complete(2, Some(cursor()));
        assert!(!state.is_target_in_flight(2));
        assert!(state.navigate(3).is_some());
    }

    #[test]
    fn test_failed_navigation_keeps_page() {
        let mut state = ListingState::new(ProductFilters::new());
        state.navigate(2);
        state.fail();
        assert_eq!(state.current_page(), 1);
        assert!(state.navigate(2).is_some());
    }

    #[test]
    fn test_filter_change_resets_page_and_drops_cursor() {
        let mut state = ListingState::new(ProductFilters::new());
        state.navigate(2);
        state.complete(2, Some(cursor()));
        assert_eq!(state.current_page(), 2);
        assert!(state.cursor().is_some());

        let filters = ProductFilters::new().with_sort(SortOption::PriceLow);
        state.apply_filters(filters);
        assert_eq!(state.current_page(), 1);
        assert!(state.cursor().is_none());

        // The next sequential move cannot use a stale cursor.
        let (mode, _) = state.navigate(2).unwrap();
        assert!(!mode.is_cursor());
    }

    #[test]
    fn test_completed_page_feeds_next_cursor() {
        let mut state = ListingState::new(ProductFilters::new());
        state.navigate(2);
        state.complete(2, Some(cursor()));

        let (mode, params) = state.navigate(3).unwrap();
        assert!(mode.is_cursor());
        assert_eq!(params.page, 3);
        assert_eq!(params.last_id, Some(cursor()));
    }
}
