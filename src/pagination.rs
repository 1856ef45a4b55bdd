#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub current: bool,
}

impl<T> Page<T> {
    /// Slices out page `requested` (1-based). Out-of-range requests are
    /// clamped to the first or last page.
    pub fn paginate(items: Vec<T>, requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let number = requested.clamp(1, total_pages);
        let start = (number - 1) * page_size;

        let items = items.into_iter().skip(start).take(page_size).collect();
        Self {
            items,
            number,
            total_pages,
            total_items,
        }
    }

    pub fn links(&self) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                current: number == self.number,
            })
            .collect()
    }

    pub fn has_many_pages(&self) -> bool {
        self.total_pages > 1
    }
}
