//! Page emulation for the search endpoint
//!
//! Search only accepts a result limit, so page `p` of size `n` asks for the
//! first `p * n` results and keeps the last `n` of them. Later pages refetch
//! everything before them.

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    num: u32,
    page: u32,
}

impl Page {
    /// `page` is 1-indexed. Both values must be at least 1.
    pub fn new(num: u32, page: u32) -> Result<Self> {
        if num == 0 {
            return Err(Error::invalid("num must be at least 1"));
        }
        if page == 0 {
            return Err(Error::invalid("page must be at least 1"));
        }
        if num.checked_mul(page).is_none() {
            return Err(Error::invalid(format!(
                "page {} of size {} is out of range",
                page, num
            )));
        }
        Ok(Self { num, page })
    }

    /// Result count to request upstream.
    pub fn limit(&self) -> u32 {
        self.num * self.page
    }

    /// Index of the first item of this page.
    pub fn start(&self) -> usize {
        (self.page as usize - 1) * self.num as usize
    }

    /// Keep `[(page - 1) * num, page * num)` of `items`.
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.start())
            .take(self.num as usize)
            .collect()
    }
}
