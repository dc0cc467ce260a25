//! In-memory [`Transport`] serving canned pages, cfg(test) gated.

use crate::fetch::error::FetchError;
use crate::fetch::Transport;
use reqwest::StatusCode;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
enum Canned {
    Body(String),
    Status(StatusCode),
    Fatal,
}

/// Serves queued responses per URL. The last queued response for a URL is
/// repeated once the queue is drained; unknown URLs answer 404.
#[derive(Debug, Default)]
pub(crate) struct FixtureTransport {
    responses: RefCell<HashMap<String, VecDeque<Canned>>>,
    requests: RefCell<Vec<String>>,
}

impl FixtureTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(self, url: &str, canned: Canned) -> Self {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(canned);
        self
    }

    pub(crate) fn page(self, url: &str, body: &str) -> Self {
        self.push(url, Canned::Body(body.to_string()))
    }

    pub(crate) fn status(self, url: &str, status: StatusCode) -> Self {
        self.push(url, Canned::Status(status))
    }

    /// A non-recoverable failure, standing in for a dropped connection.
    pub(crate) fn fatal(self, url: &str) -> Self {
        self.push(url, Canned::Fatal)
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub(crate) fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl Transport for FixtureTransport {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());

        let canned = {
            let mut responses = self.responses.borrow_mut();
            match responses.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            Some(Canned::Fatal) => Err(FetchError::InvalidUrl(
                url.to_string(),
                url::ParseError::EmptyHost,
            )),
            None => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}
