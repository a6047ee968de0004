//! services/client/src/listing.rs
//!
//! The listing controller: owns the page number, free-text search, and sort
//! state for one recipe listing view, and derives the query the data layer
//! sends. Changing search or sort always snaps back to page 1. The
//! controller performs no bounds clamping on `set_page`; the surrounding
//! view disables out-of-range navigation using `total_pages`.

use recipe_browser_core::domain::{RecipeQuery, SortOrder};

/// Page size of the public browse view.
pub const BROWSE_PAGE_SIZE: u64 = 9;
/// Page size of the dashboard management view.
pub const DASHBOARD_PAGE_SIZE: u64 = 50;

/// At most this many page buttons are shown at once.
const PAGE_WINDOW: u64 = 5;

/// State machine over `{page, search, sort_by, sort_order}`.
#[derive(Debug, Clone)]
pub struct ListingController {
    limit: u64,
    page: u64,
    search: String,
    sort_by: String,
    sort_order: SortOrder,
}

impl ListingController {
    /// Creates a controller at page 1 with no search and no active sort.
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            page: 1,
            search: String::new(),
            sort_by: String::new(),
            sort_order: SortOrder::Asc,
        }
    }

    /// Sets the search text and resets to page 1.
    pub fn submit_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.page = 1;
    }

    /// Activates `field` ascending, or flips the direction when `field` is
    /// already active. Resets to page 1 either way.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = field.to_string();
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    /// Resets search, sort, and page to their initial values.
    pub fn clear(&mut self) {
        self.search.clear();
        self.sort_by.clear();
        self.sort_order = SortOrder::Asc;
        self.page = 1;
    }

    /// Jumps to page `n`. No clamping: callers gate navigation on
    /// [`Self::total_pages`].
    pub fn set_page(&mut self, n: u64) {
        self.page = n;
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Derives the data-layer query for the current state:
    /// `skip = (page - 1) * limit`.
    pub fn query(&self) -> RecipeQuery {
        RecipeQuery {
            limit: self.limit,
            skip: self.page.saturating_sub(1) * self.limit,
            search: self.search.clone(),
            sort_by: self.sort_by.clone(),
            order: self.sort_order,
        }
    }

    /// `ceil(total / limit)` pages for a server-side total.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    /// The page buttons to show: at most five, centred on the current page
    /// and clamped to `[1, total_pages]`. The first three pages pin the
    /// window to `[1..5]`, the last three pin it to the final five pages.
    pub fn page_window(&self, total_pages: u64) -> Vec<u64> {
        if total_pages <= PAGE_WINDOW {
            return (1..=total_pages).collect();
        }
        let first = if self.page <= 3 {
            1
        } else if self.page >= total_pages - 2 {
            total_pages - (PAGE_WINDOW - 1)
        } else {
            self.page - 2
        };
        (first..first + PAGE_WINDOW).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn query_skip_tracks_the_page_number() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        assert_eq!(listing.query().skip, 0);

        listing.set_page(4);
        let query = listing.query();
        assert_eq!(query.skip, 27);
        assert_eq!(query.limit, 9);
    }

    #[test]
    fn search_resets_the_page() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        listing.set_page(7);
        listing.submit_search("pasta");

        assert_eq!(listing.page(), 1);
        assert_eq!(listing.query().search, "pasta");
    }

    #[test]
    fn toggling_the_same_field_flips_direction_and_resets_page() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);

        listing.set_page(3);
        listing.toggle_sort("rating");
        assert_eq!(listing.sort_by(), "rating");
        assert_eq!(listing.sort_order(), SortOrder::Asc);
        assert_eq!(listing.page(), 1);

        listing.set_page(3);
        listing.toggle_sort("rating");
        assert_eq!(listing.sort_order(), SortOrder::Desc);
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn toggling_a_new_field_starts_ascending() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        listing.toggle_sort("rating");
        listing.toggle_sort("rating");
        listing.toggle_sort("name");

        assert_eq!(listing.sort_by(), "name");
        assert_eq!(listing.sort_order(), SortOrder::Asc);
    }

    #[test]
    fn clear_restores_the_initial_state() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        listing.submit_search("pasta");
        listing.toggle_sort("rating");
        listing.set_page(5);
        listing.clear();

        assert_eq!(listing.page(), 1);
        assert_eq!(listing.search(), "");
        assert_eq!(listing.sort_by(), "");
        assert_eq!(listing.sort_order(), SortOrder::Asc);
    }

    #[test]
    fn total_pages_rounds_up() {
        let listing = ListingController::new(BROWSE_PAGE_SIZE);
        assert_eq!(listing.total_pages(0), 0);
        assert_eq!(listing.total_pages(9), 1);
        assert_eq!(listing.total_pages(10), 2);
        assert_eq!(listing.total_pages(50), 6);
    }

    #[rstest]
    #[case(1, vec![1, 2, 3, 4, 5])]
    #[case(2, vec![1, 2, 3, 4, 5])]
    #[case(3, vec![1, 2, 3, 4, 5])]
    #[case(4, vec![2, 3, 4, 5, 6])]
    #[case(5, vec![3, 4, 5, 6, 7])]
    #[case(7, vec![5, 6, 7, 8, 9])]
    #[case(8, vec![6, 7, 8, 9, 10])]
    #[case(9, vec![6, 7, 8, 9, 10])]
    #[case(10, vec![6, 7, 8, 9, 10])]
    fn window_of_ten_pages_centres_and_clamps(#[case] page: u64, #[case] expected: Vec<u64>) {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        listing.set_page(page);
        assert_eq!(listing.page_window(10), expected);
    }

    #[test]
    fn small_totals_show_every_page() {
        let mut listing = ListingController::new(BROWSE_PAGE_SIZE);
        listing.set_page(2);
        assert_eq!(listing.page_window(3), vec![1, 2, 3]);
        assert_eq!(listing.page_window(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(listing.page_window(0), Vec::<u64>::new());
    }
}
