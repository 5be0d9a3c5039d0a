//! Offset pagination primitives shared by atomfit listings.
//!
//! Listings in the backend are windowed with `limit`/`offset` pairs and
//! ordered by a caller-chosen [`SortDirection`]. This crate keeps those
//! concerns transport neutral so the domain can validate raw parameters
//! once and hand a trusted [`PageRequest`] to persistence adapters.
//!
//! - [`PageLimits`] captures the default and maximum page size policy.
//! - [`PageRequest`] is a validated `limit`/`offset` window.
//! - [`SortDirection`] is a closed set safe to render into SQL.
//! - [`Page`] pairs a window of items with the total size of the filtered set.
//!
//! # Example
//!
//! ```
//! use pagination::{Page, PageLimits, PageRequest};
//!
//! let request = PageRequest::from_raw(Some(2), Some(0), PageLimits::default())
//!     .expect("valid window");
//! let page = Page::new(vec!["a", "b"], 5, request);
//! assert!(page.has_more());
//! ```

mod error;
mod page;
mod request;
mod sort;

pub use error::PaginationError;
pub use page::Page;
pub use request::{DEFAULT_LIMIT, MAX_LIMIT, PageLimits, PageRequest};
pub use sort::SortDirection;
