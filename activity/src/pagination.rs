/// 1-based page window over an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.current_page < self.total_pages(len)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Advance one page if there is one. Returns whether the page changed.
    pub fn next_page(&mut self, len: usize) -> bool {
        if !self.has_next(len) {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Pull the current page back inside `1..=total_pages(len)`.
    pub fn clamp(&mut self, len: usize) {
        let last = self.total_pages(len).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        slice_page(items, self.current_page, self.page_size)
    }
}

/// `items[(page-1)*size .. page*size]`, cut to bounds. Page 0 reads as page 1.
pub fn slice_page<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_items_in_pages_of_twenty() {
        let items: Vec<u32> = (1..=45).collect();
        let mut pager = Paginator::new(20);
        assert_eq!(pager.total_pages(items.len()), 3);
        assert_eq!(pager.page(&items), &items[0..20]);
        pager.set_page(3);
        assert_eq!(pager.page(&items), &[41, 42, 43, 44, 45]);
        assert!(!pager.next_page(items.len()));
        pager.set_page(4);
        assert!(pager.page(&items).is_empty());
    }

    #[test]
    fn navigation_stays_in_range() {
        let mut pager = Paginator::new(3);
        assert!(!pager.prev_page());
        assert!(pager.next_page(7));
        assert!(pager.next_page(7));
        assert!(!pager.next_page(7));
        assert_eq!(pager.current_page(), 3);
        pager.clamp(4);
        assert_eq!(pager.current_page(), 2);
        pager.clamp(0);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn zero_page_and_zero_size_are_tolerated() {
        let items = [1, 2, 3];
        assert_eq!(slice_page(&items, 0, 2), &[1, 2]);
        assert_eq!(Paginator::new(0).page_size(), 1);
        assert_eq!(Paginator::new(5).total_pages(0), 0);
    }
}
