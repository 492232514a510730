//! Simulated remote search over a larger catalog.
//!
//! The handler waits a fixed latency, picks the catalog entries matching the
//! query and sends them to the picker, which merges them into its candidate
//! list.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::debug;
use typeahead_engine::{SearchHandler, search_fn};
use typeahead_tui::RemoteResults;

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

#[derive(Clone, Debug)]
pub struct RemoteCatalog {
    entries: Arc<Vec<String>>,
    latency: Duration,
}

impl RemoteCatalog {
    pub fn new(entries: Vec<String>, latency: Duration) -> Self {
        Self {
            entries: Arc::new(entries),
            latency,
        }
    }

    /// Case-insensitive substring matches, in catalog order.
    pub fn matching(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Search handler delivering matches on the returned channel.
    pub fn into_search(self) -> (Arc<dyn SearchHandler>, RemoteResults<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handler = search_fn(move |query: String| deliver(self.clone(), query, sender.clone()));
        (handler, receiver)
    }
}

async fn deliver(catalog: RemoteCatalog, query: String, sender: mpsc::UnboundedSender<Vec<String>>) -> anyhow::Result<()> {
    tokio::time::sleep(catalog.latency).await;
    let found = catalog.matching(&query);
    debug!(%query, count = found.len(), "remote catalog answered");
    sender.send(found).map_err(|_| anyhow!("picker is no longer listening"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RemoteCatalog {
        RemoteCatalog::new(
            vec!["Kiwi".into(), "Kiwano".into(), "Lime".into()],
            Duration::from_millis(50),
        )
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(catalog().matching("KIW"), vec!["Kiwi", "Kiwano"]);
        assert!(catalog().matching("zzz").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn search_sends_matches_after_the_latency() {
        let (handler, mut results) = catalog().into_search();
        handler.search("li").await.expect("search");
        assert_eq!(results.recv().await, Some(vec!["Lime".to_string()]));
    }

    #[tokio::test(start_paused = true)]
    async fn search_fails_once_the_picker_is_gone() {
        let (handler, results) = catalog().into_search();
        drop(results);
        let error = handler.search("kiwi").await.expect_err("receiver dropped");
        assert!(error.to_string().contains("no longer listening"));
    }
}
