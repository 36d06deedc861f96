//! Ordered fallback chains.
//!
//! A chain is a list of named async attempts tried in order; the first one
//! that yields a value wins and the remaining attempts are never polled.

use futures::future::BoxFuture;
use tracing::debug;

/// A named async attempt that may produce a value.
pub struct Attempt<'a, T> {
    pub name: &'static str,
    pub run: BoxFuture<'a, Option<T>>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(name: &'static str, run: BoxFuture<'a, Option<T>>) -> Self {
        Self { name, run }
    }
}

/// Run attempts in order, returning the first success with its attempt name.
pub async fn first_success<'a, T>(attempts: Vec<Attempt<'a, T>>) -> Option<(&'static str, T)> {
    for attempt in attempts {
        match attempt.run.await {
            Some(value) => {
                debug!("Attempt '{}' succeeded", attempt.name);
                return Some((attempt.name, value));
            }
            None => debug!("Attempt '{}' produced nothing", attempt.name),
        }
    }
    None
}
