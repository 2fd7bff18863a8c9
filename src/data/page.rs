// ---------------------------------------------------------------------------
// Pagination of the filtered sequence
// ---------------------------------------------------------------------------

/// One page of a paginated sequence.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub visible: &'a [T],
    pub total_pages: usize,
}

/// Slice out the 1-based `page` of `items`. `total_pages` is
/// `ceil(len / page_size)` with a floor of one page, so an empty input is a
/// valid single empty page. A page beyond the end yields an empty slice
/// rather than an error; callers are expected to clamp, but out-of-range
/// input never panics. A zero page size is treated as one item per page.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);

    let start = page.saturating_sub(1).saturating_mul(page_size);
    let visible = if start >= items.len() {
        &items[..0]
    } else {
        let end = (start + page_size).min(items.len());
        &items[start..end]
    };

    Page {
        visible,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_items_at_24_per_page() {
        let items: Vec<u32> = (0..50).collect();

        let page1 = paginate(&items, 24, 1);
        assert_eq!(page1.total_pages, 3);
        assert_eq!(page1.visible.len(), 24);
        assert_eq!(page1.visible[0], 0);

        let page3 = paginate(&items, 24, 3);
        assert_eq!(page3.visible, &[48, 49][..]);

        let page4 = paginate(&items, 24, 4);
        assert!(page4.visible.is_empty());
        assert_eq!(page4.total_pages, 3);
    }

    #[test]
    fn empty_input_is_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 24, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.visible.is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let items: Vec<u32> = (0..48).collect();
        assert_eq!(paginate(&items, 24, 1).total_pages, 2);
        assert_eq!(paginate(&items, 24, 2).visible.len(), 24);
    }

    #[test]
    fn degenerate_inputs_never_panic() {
        let items: Vec<u32> = (0..3).collect();
        // Page 0 is treated like page 1, zero page size like 1 per page.
        assert_eq!(paginate(&items, 24, 0).visible.len(), 3);
        assert_eq!(paginate(&items, 0, 2).visible, &[1][..]);
        assert_eq!(paginate(&items, 0, 2).total_pages, 3);
        paginate(&items, usize::MAX, usize::MAX);
    }
}
