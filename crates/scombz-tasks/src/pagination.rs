use tracing::warn;

/// Fixed-size pages over an ordered sequence.
///
/// The page index is zero-based. It starts at 0 and only moves when asked
/// to, except that it is pulled back when the sequence shrinks below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    rows_per_page: usize,
    page: usize,
}

impl Paginator {
    pub fn new(rows_per_page: usize) -> Self {
        let rows_per_page = if rows_per_page == 0 {
            warn!("rows per page of 0 is not usable, showing 1");
            1
        } else {
            rows_per_page
        };
        Self {
            rows_per_page,
            page: 0,
        }
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page)
    }

    /// More rows exist than fit on one page.
    pub fn needs_pagination(&self, total: usize) -> bool {
        total > self.rows_per_page
    }

    /// Move to page `page`, clamped to the last page of `total` rows.
    pub fn set_page(&mut self, page: usize, total: usize) -> usize {
        let last = self.page_count(total).saturating_sub(1);
        self.page = page.min(last);
        self.page
    }

    /// Re-clamp after the sequence changed size.
    pub fn clamp(&mut self, total: usize) {
        let page = self.page;
        self.set_page(page, total);
    }

    /// Rows on page `page` (empty past the end).
    pub fn slice_page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let start = page.saturating_mul(self.rows_per_page).min(items.len());
        let end = start.saturating_add(self.rows_per_page).min(items.len());
        &items[start..end]
    }

    /// Rows on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.slice_page(items, self.page)
    }

    /// `"{first} - {last} / {total}"` for the current page, 1-based.
    pub fn range_label(&self, total: usize) -> String {
        if total == 0 {
            return "0 - 0 / 0".to_string();
        }
        let first = self.page * self.rows_per_page + 1;
        let last = (self.page * self.rows_per_page + self.rows_per_page).min(total);
        format!("{first} - {last} / {total}")
    }
}
