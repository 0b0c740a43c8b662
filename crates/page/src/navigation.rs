use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_SCOPE: &str = "seek.onlinedegree.iitm.ac.in/courses/ns_25t3_cs1002";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// Single-page-app route changes and full reloads arrive as different signals;
/// both lead to the same scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    HistoryStateUpdated { tab_id: u32, url: String },
    TabUpdated {
        tab_id: u32,
        url: String,
        status: LoadStatus,
    },
}

impl NavigationEvent {
    pub fn url(&self) -> &str {
        match self {
            NavigationEvent::HistoryStateUpdated { url, .. } => url,
            NavigationEvent::TabUpdated { url, .. } => url,
        }
    }

    pub fn tab_id(&self) -> u32 {
        match self {
            NavigationEvent::HistoryStateUpdated { tab_id, .. } => *tab_id,
            NavigationEvent::TabUpdated { tab_id, .. } => *tab_id,
        }
    }

    pub fn reload(tab_id: u32, url: impl Into<String>) -> Self {
        NavigationEvent::TabUpdated {
            tab_id,
            url: url.into(),
            status: LoadStatus::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationScope {
    url_fragment: String,
}

impl Default for NavigationScope {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE)
    }
}

impl NavigationScope {
    pub fn new(url_fragment: impl Into<String>) -> Self {
        Self {
            url_fragment: url_fragment.into(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        !url.is_empty() && url.contains(&self.url_fragment)
    }

    pub fn triggers(&self, event: &NavigationEvent) -> bool {
        match event {
            NavigationEvent::HistoryStateUpdated { url, .. } => self.matches(url),
            NavigationEvent::TabUpdated { url, status, .. } => {
                *status == LoadStatus::Complete && self.matches(url)
            }
        }
    }
}

/// Polls a `file://` page and reports each change on disk as a completed load.
pub struct PageWatcher {
    tab_id: u32,
    url: String,
    path: PathBuf,
    interval: Duration,
}

impl PageWatcher {
    /// Returns `None` for pages that are not local files.
    pub fn for_url(tab_id: u32, url: &str, interval: Duration) -> Option<Self> {
        let path = Url::parse(url).ok()?.to_file_path().ok()?;
        Some(Self {
            tab_id,
            url: url.to_string(),
            path,
            interval,
        })
    }

    pub async fn run(self, tx: mpsc::UnboundedSender<NavigationEvent>, cancel: CancellationToken) {
        info!("Watching {} for changes", self.path.display());
        let mut last_seen = self.modified().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let current = self.modified().await;
            if current.is_some() && current != last_seen {
                debug!("Page changed on disk: {}", self.path.display());
                last_seen = current;
                if tx.send(NavigationEvent::reload(self.tab_id, &self.url)).is_err() {
                    break;
                }
            }
        }

        info!("Stopped watching {}", self.path.display());
    }

    async fn modified(&self) -> Option<SystemTime> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata.modified().ok(),
            Err(e) => {
                warn!("Cannot stat {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
