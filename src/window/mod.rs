use std::ops::RangeInclusive;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Inclusive range of record IDs backing one page of the table.
///
/// A window whose `start` lies past the total count is empty: `end` is then
/// below `start` and [`PageWindow::ids`] yields nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub end: u64,
}

impl PageWindow {
    /// Computes the window for `page` (1-based). Page 0 is treated as page 1
    /// and a page size of 0 as 1.
    pub fn for_page(page: u64, page_size: u64, total_count: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let start = (page - 1).saturating_mul(page_size).saturating_add(1);
        let end = total_count.min(start.saturating_add(page_size - 1));
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn ids(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

// number of pages needed to show `total_count` records, 0 when there are none
pub fn page_count(page_size: u64, total_count: u64) -> u64 {
    let page_size = page_size.max(1);
    total_count / page_size + u64::from(total_count % page_size != 0)
}
