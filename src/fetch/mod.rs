//! HTTP access to the portal.
//!
//! Every page is fetched through the [`Transport`] seam, so the scanners and
//! fetchers can run against canned pages in tests and against
//! [`HttpTransport`] in production.

pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod http;
pub mod retry;

use crate::fetch::error::FetchError;

/// A blocking `GET` returning the decoded page body.
///
/// Implementations must report a non-success HTTP status as
/// [`FetchError::HttpStatus`]; that is the only error class the dam frame
/// fetch treats as retryable.
pub trait Transport {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).get_text(url)
    }
}
