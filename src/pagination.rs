//! Pagination window for rendered page controls.

/// Page numbers to render around `current_page`, with `None` marking an
/// ellipsis gap. The first and last page are always present.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Window for `current_page`: two pages either side of the current one,
/// first and last pinned.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<Option<usize>> {
    get_pages(total_pages, current_page.max(1), 1, 2, 2, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_gets_both_gaps() {
        assert_eq!(
            page_window(5, 10),
            vec![
                Some(1),
                None,
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10),
            ]
        );
    }

    #[test]
    fn small_page_count_has_no_gaps() {
        assert_eq!(page_window(1, 3), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn zero_pages_renders_nothing() {
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn zero_current_page_is_clamped() {
        assert_eq!(page_window(0, 2), page_window(1, 2));
    }
}
