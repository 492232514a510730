//! External search hook.
//!
//! A search handler is fire-and-forget from the controller's point of view:
//! it receives the query and does whatever the host needs (typically fetch
//! more candidates and hand them back through
//! [`Controller::set_candidates`](crate::Controller::set_candidates)). The
//! controller only learns whether it finished or failed.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use typeahead_types::SearchEvent;

#[async_trait]
pub trait SearchHandler: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<()>;
}

/// Failure reported by a search handler for one query.
#[derive(Debug, Error)]
#[error("search for '{query}' failed: {source}")]
pub struct SearchError {
    pub query: String,
    #[source]
    pub source: anyhow::Error,
}

impl SearchError {
    pub fn into_event(self) -> SearchEvent {
        SearchEvent::Failed {
            message: format!("{:#}", self.source),
            query: self.query,
        }
    }
}

/// Adapts an async closure into a [`SearchHandler`].
pub struct FnSearch<F> {
    search: F,
}

#[async_trait]
impl<F, Fut> SearchHandler for FnSearch<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn search(&self, query: &str) -> anyhow::Result<()> {
        (self.search)(query.to_string()).await
    }
}

/// Wrap `search` as a shareable handler.
pub fn search_fn<F, Fut>(search: F) -> Arc<dyn SearchHandler>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnSearch { search })
}

/// Run `handler` for `query` and report the outcome on `events`.
pub(crate) async fn run_search(handler: Arc<dyn SearchHandler>, query: String, events: UnboundedSender<SearchEvent>) {
    let event = match handler.search(&query).await {
        Ok(()) => SearchEvent::Completed { query },
        Err(source) => SearchError { query, source }.into_event(),
    };
    // The receiver is gone once the controller unmounts.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn completed_searches_report_their_query() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = search_fn(|_query| async { anyhow::Ok(()) });
        run_search(handler, "app".into(), tx).await;
        assert_eq!(rx.recv().await, Some(SearchEvent::Completed { query: "app".into() }));
    }

    #[tokio::test]
    async fn failures_carry_the_error_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = search_fn(|query| async move { Err::<(), _>(anyhow!("backend unavailable for {query}")) });
        run_search(handler, "app".into(), tx).await;
        let Some(SearchEvent::Failed { query, message }) = rx.recv().await else {
            panic!("expected a failure event");
        };
        assert_eq!(query, "app");
        assert!(message.contains("backend unavailable for app"));
    }

    #[test]
    fn error_display_names_the_query() {
        let error = SearchError {
            query: "kiwi".into(),
            source: anyhow!("timeout"),
        };
        assert_eq!(error.to_string(), "search for 'kiwi' failed: timeout");
    }
}
