//! Zero-based pagination.
//!
//! The envelope reports the requested page number, the number of elements on
//! that page, the total element count, and the page count for the requested
//! page size:
//!
//! ```json
//! {"page": {"page": 1, "size": 1, "totalElements": 3, "totalPages": 2}, "data": [...]}
//! ```

use serde::Serialize;

use crate::error::{RegistryError, RegistryResult};

/// A request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Request page `page` (zero-based) of `size` elements, clamping `size`
    /// to `max_size`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use l0store_registry::PageRequest;
    ///
    /// let request = PageRequest::new(2, 500, 100).unwrap();
    /// assert_eq!(request.size(), 100);
    /// assert_eq!(request.offset(), 200);
    /// assert!(PageRequest::new(0, 0, 100).is_err());
    /// ```
    pub fn new(page: usize, size: usize, max_size: usize) -> RegistryResult<Self> {
        if size == 0 {
            return Err(RegistryError::InvalidArgument(
                "page size must be at least 1".to_owned(),
            ));
        }
        Ok(Self {
            page,
            size: size.min(max_size.max(1)),
        })
    }

    /// Zero-based page number.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Requested page size after clamping.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the first element on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Zero-based page number.
    pub page: usize,
    /// Number of elements on this page.
    pub size: usize,
    /// Number of elements across all pages.
    pub total_elements: usize,
    /// Number of pages of the requested size.
    pub total_pages: usize,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Page metadata.
    pub page: PageInfo,
    /// The elements on this page.
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page from its elements and the total element count.
    #[must_use]
    pub fn new(request: PageRequest, data: Vec<T>, total_elements: usize) -> Self {
        Self {
            page: PageInfo {
                page: request.page(),
                size: data.len(),
                total_elements,
                total_pages: total_elements.div_ceil(request.size()),
            },
            data,
        }
    }

    /// Transform the elements, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
