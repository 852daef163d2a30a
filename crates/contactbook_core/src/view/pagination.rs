//! Page-number window for the pagination bar.

/// Maximum number of pages listed without ellipses.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// One slot in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Builds the visible page slots around `current`.
///
/// Small page counts are listed in full. Larger ones keep the first and last
/// page, the neighbors of `current`, and ellipses for the gaps.
pub fn page_numbers(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total_pages - 1);
    for page in start..=end {
        items.push(PageItem::Page(page));
    }

    if current < total_pages - 2 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total_pages));
    items
}
