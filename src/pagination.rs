//! Paginated collection fetching.
//!
//! List endpoints are fetched page by page with a fixed page size, starting at
//! page 1, until a page comes back shorter than the page size or an optional
//! item cap is reached. Pages are awaited one after another.

use std::future::Future;

use tracing::debug;

use crate::link::Url;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Query parameters for a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index.
    pub page: usize,
    /// Requested page size.
    pub per_page: usize,
}

impl PageRequest {
    /// Merges `per_page` and `page` into `url`'s query, in that order.
    #[must_use]
    pub fn apply_to(&self, url: &Url) -> Url {
        url.merge_query([
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ])
    }
}

/// Drives a page-fetching function until the collection is exhausted.
///
/// ```no_run
/// use weblinks::pagination::Paginator;
///
/// # async fn example() -> Result<(), std::convert::Infallible> {
/// let pages = vec![vec![1, 2], vec![3]];
/// let all = Paginator::new(2)
///     .collect(|page| {
///         let items = pages.get(page.page - 1).cloned().unwrap_or_default();
///         async move { Ok::<_, std::convert::Infallible>(items) }
///     })
///     .await?;
/// assert_eq!(all, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    max_items: Option<usize>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Creates a paginator; a `page_size` of 0 is raised to 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            max_items: None,
        }
    }

    /// Stops fetching once at least `max_items` items have been collected.
    ///
    /// The result is not truncated: the final page is kept whole.
    #[must_use]
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    /// Page size requested from the server.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Item cap, if any.
    #[must_use]
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Calls `fetch` for pages 1, 2, ... and concatenates the results.
    ///
    /// # Errors
    ///
    /// The first error returned by `fetch` is propagated and the items
    /// collected so far are dropped.
    pub async fn collect<T, E, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>, E>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let request = PageRequest {
                page,
                per_page: self.page_size,
            };
            let batch = fetch(request).await?;
            let received = batch.len();
            items.extend(batch);
            debug!(page, received, total = items.len(), "fetched page");

            if received < self.page_size {
                break;
            }
            if self.max_items.is_some_and(|cap| items.len() >= cap) {
                debug!(cap = self.max_items, "item cap reached");
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}
