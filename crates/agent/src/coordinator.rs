use crate::client::GeminiClient;
use crate::credentials::CredentialStore;
use crate::error::{HelpError, HelpResult};
use crate::messages::{AiResponse, RelayMessage};
use crate::prompt::build_prompt;
use crate::slot::SnapshotSlot;
use codehelper_page::{CompiledSelectors, NavigationEvent, NavigationScope, PageLoader, ScrapePayload};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Owns the latest scrape, injects the scraper on navigation and answers help
/// requests. Clones share the same slot.
#[derive(Clone)]
pub struct Coordinator {
    slot: SnapshotSlot,
    gemini: GeminiClient,
    credentials: Arc<CredentialStore>,
    loader: PageLoader,
    scope: NavigationScope,
    selectors: Arc<CompiledSelectors>,
}

/// Senders into a running coordinator, plus the task driving it.
pub struct CoordinatorHandle {
    pub messages: mpsc::UnboundedSender<RelayMessage>,
    pub navigation: mpsc::UnboundedSender<NavigationEvent>,
    pub task: JoinHandle<()>,
}

impl Coordinator {
    pub fn new(
        gemini: GeminiClient,
        credentials: CredentialStore,
        scope: NavigationScope,
        selectors: CompiledSelectors,
    ) -> Self {
        Self {
            slot: SnapshotSlot::new(),
            gemini,
            credentials: Arc::new(credentials),
            loader: PageLoader::new(),
            scope,
            selectors: Arc::new(selectors),
        }
    }

    pub fn slot(&self) -> &SnapshotSlot {
        &self.slot
    }

    pub async fn receive_scraped_data(&self, payload: ScrapePayload) {
        match &payload {
            ScrapePayload::Failed { error } => info!("Stored scrape failure: {}", error),
            ScrapePayload::Captured(_) => info!("Stored scraped data"),
        }
        self.slot.set(payload).await;
    }

    /// Never fails: every outcome becomes an `AiResponse` for the popup.
    pub async fn handle_help_request(&self) -> AiResponse {
        match self.suggest().await {
            Ok(text) => AiResponse::data(text),
            Err(e) => {
                match &e {
                    HelpError::NotReady => {
                        warn!("No scraped data yet; the user may need to wait or reload")
                    }
                    HelpError::Scrape(msg) => warn!("Scraper failed: {}", msg),
                    other => error!("Error in AI call: {}", other),
                }
                AiResponse::error(e.user_message())
            }
        }
    }

    async fn suggest(&self) -> HelpResult<String> {
        let snapshot = match self.slot.get_or_none().await {
            None => return Err(HelpError::NotReady),
            Some(ScrapePayload::Failed { error }) => return Err(HelpError::Scrape(error)),
            Some(ScrapePayload::Captured(snapshot)) => snapshot,
        };

        let api_key = self.credentials.load()?.ok_or(HelpError::MissingCredential)?;
        let prompt = build_prompt(&snapshot);
        debug!(kind = ?prompt.kind, "Built prompt");
        self.gemini.generate(&api_key, &prompt.text).await
    }

    /// Loads the page and posts the scrape back through `inbox`. The scraper
    /// does not wait for the coordinator to acknowledge it.
    pub fn inject(&self, url: String, inbox: mpsc::UnboundedSender<RelayMessage>) -> JoinHandle<()> {
        let loader = self.loader.clone();
        let selectors = Arc::clone(&self.selectors);
        tokio::spawn(async move {
            let data = loader.inject(&url, &selectors).await;
            let _ = inbox.send(RelayMessage::ScrapedData { data });
        })
    }

    /// Starts the relay loop. Responses to help requests go to `ui`.
    pub fn spawn(
        self,
        ui: mpsc::UnboundedSender<RelayMessage>,
        cancel: CancellationToken,
    ) -> CoordinatorHandle {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (navigation_tx, navigation_rx) = mpsc::unbounded_channel();
        let inbox = messages_tx.clone();
        let task = tokio::spawn(self.run(messages_rx, inbox, navigation_rx, ui, cancel));
        CoordinatorHandle {
            messages: messages_tx,
            navigation: navigation_tx,
            task,
        }
    }

    async fn run(
        self,
        mut messages: mpsc::UnboundedReceiver<RelayMessage>,
        inbox: mpsc::UnboundedSender<RelayMessage>,
        mut navigation: mpsc::UnboundedReceiver<NavigationEvent>,
        ui: mpsc::UnboundedSender<RelayMessage>,
        cancel: CancellationToken,
    ) {
        info!("Coordinator started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                Some(message) = messages.recv() => self.on_message(message, &ui).await,
                Some(event) = navigation.recv() => self.on_navigation(event, &inbox),
                else => break,
            }
        }
        info!("Coordinator stopped");
    }

    async fn on_message(&self, message: RelayMessage, ui: &mpsc::UnboundedSender<RelayMessage>) {
        match message {
            RelayMessage::ScrapedData { data } => self.receive_scraped_data(data).await,
            RelayMessage::GetAiSuggestion => {
                info!("Received help request");
                let this = self.clone();
                let ui = ui.clone();
                tokio::spawn(async move {
                    let response = this.handle_help_request().await;
                    if ui.send(RelayMessage::AiResponse(response)).is_err() {
                        debug!("Popup closed before the response arrived");
                    }
                });
            }
            RelayMessage::AiResponse(_) => debug!("Ignoring AI_RESPONSE sent to coordinator"),
        }
    }

    fn on_navigation(&self, event: NavigationEvent, inbox: &mpsc::UnboundedSender<RelayMessage>) {
        if !self.scope.triggers(&event) {
            debug!("Ignoring navigation to {}", event.url());
            return;
        }
        info!(tab_id = event.tab_id(), "Detected navigation. Injecting scraper...");
        self.inject(event.url().to_string(), inbox.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GeminiSettings;
    use crate::error::AI_FAILURE_PREFIX;
    use codehelper_page::{PageSelectors, Snapshot, MISSING_CODE};
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        coordinator: Coordinator,
        store: CredentialStore,
        _dir: TempDir,
    }

    fn fixture(server: &MockServer, scope: &str) -> Fixture {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CredentialStore::at(dir.path());
        let gemini = GeminiClient::new(GeminiSettings {
            base_url: server.uri(),
            request_timeout_secs: 5,
            ..GeminiSettings::default()
        });
        let selectors = PageSelectors::default().compile().expect("compile");
        Fixture {
            coordinator: Coordinator::new(
                gemini,
                store.clone(),
                NavigationScope::new(scope),
                selectors,
            ),
            store,
            _dir: dir,
        }
    }

    fn suggestion(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    async fn never_called(server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(suggestion("should not happen"))
            .expect(0)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn help_before_scrape_is_not_ready() {
        let server = MockServer::start().await;
        never_called(&server).await;
        let fx = fixture(&server, "course");
        fx.store.save("test-key").expect("save");

        let response = fx.coordinator.handle_help_request().await;
        assert_eq!(
            response,
            AiResponse::error("Waiting for scraper... Please wait a few seconds and try again.")
        );
    }

    #[tokio::test]
    async fn stored_scrape_error_is_forwarded_verbatim() {
        let server = MockServer::start().await;
        never_called(&server).await;
        let fx = fixture(&server, "course");
        fx.store.save("test-key").expect("save");
        fx.coordinator
            .receive_scraped_data(ScrapePayload::failed(MISSING_CODE))
            .await;

        let response = fx.coordinator.handle_help_request().await;
        assert_eq!(response, AiResponse::error(MISSING_CODE));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let server = MockServer::start().await;
        never_called(&server).await;
        let fx = fixture(&server, "course");
        fx.coordinator
            .receive_scraped_data(Snapshot::new("Sum two numbers", "", "").into())
            .await;

        let response = fx.coordinator.handle_help_request().await;
        assert_eq!(
            response.error.as_deref(),
            Some(HelpError::MissingCredential.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn snapshot_is_sent_as_prompt_and_answer_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("key", "test-key"))
            .respond_with(suggestion("```python\nprint(a + b)\n```\nAdd them."))
            .expect(1)
            .mount(&server)
            .await;
        let fx = fixture(&server, "course");
        fx.store.save("test-key").expect("save");
        fx.coordinator
            .receive_scraped_data(
                Snapshot::new("Sum two numbers", "def f(): pass", "NameError: x undefined").into(),
            )
            .await;

        let response = fx.coordinator.handle_help_request().await;
        assert_eq!(
            response,
            AiResponse::data("```python\nprint(a + b)\n```\nAdd them.")
        );

        let requests = server.received_requests().await.expect("recorded");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().expect("prompt");
        assert!(prompt.contains("NameError: x undefined"));
        assert!(prompt.contains("corrected"));
    }

    #[tokio::test]
    async fn endpoint_errors_become_prefixed_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let fx = fixture(&server, "course");
        fx.store.save("test-key").expect("save");
        fx.coordinator
            .receive_scraped_data(Snapshot::new("p", "c", "").into())
            .await;

        let first = fx.coordinator.handle_help_request().await;
        let first = first.error.expect("error");
        assert!(first.starts_with(AI_FAILURE_PREFIX));
        assert!(first.contains("Is your API key correct and enabled?"));

        let second = fx.coordinator.handle_help_request().await;
        let second = second.error.expect("error");
        assert!(second.contains("AI API Error: 500"));
        assert!(!second.contains("API key"));
    }

    #[tokio::test]
    async fn relay_loop_answers_help_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(suggestion("total = 0"))
            .expect(1)
            .mount(&server)
            .await;
        let fx = fixture(&server, "course");
        fx.store.save("test-key").expect("save");

        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = fx.coordinator.clone().spawn(ui_tx, cancel.clone());

        handle
            .messages
            .send(RelayMessage::GetAiSuggestion)
            .expect("send");
        let not_ready = tokio::time::timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .expect("response")
            .expect("message");
        assert!(matches!(
            not_ready,
            RelayMessage::AiResponse(AiResponse { error: Some(_), .. })
        ));

        handle
            .messages
            .send(RelayMessage::ScrapedData {
                data: Snapshot::new("Sum a list", "", "").into(),
            })
            .expect("send");
        handle
            .messages
            .send(RelayMessage::GetAiSuggestion)
            .expect("send");
        let answer = tokio::time::timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .expect("response")
            .expect("message");
        assert_eq!(answer, RelayMessage::AiResponse(AiResponse::data("total = 0")));

        cancel.cancel();
        handle.task.await.expect("coordinator task");
    }

    #[tokio::test]
    async fn navigation_in_scope_scrapes_the_page() {
        let server = MockServer::start().await;
        never_called(&server).await;
        let dir = tempfile::tempdir().expect("temp dir");
        let page = dir.path().join("ns_25t3_cs1002.html");
        std::fs::write(
            &page,
            r#"<div class="question-content-container">Sum two numbers</div>"#,
        )
        .expect("write page");
        let url = url::Url::from_file_path(&page).expect("url").to_string();

        let fx = fixture(&server, "ns_25t3_cs1002");
        fx.store.save("test-key").expect("save");
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = fx.coordinator.clone().spawn(ui_tx, cancel.clone());

        handle
            .navigation
            .send(NavigationEvent::reload(1, "https://example.com/other"))
            .expect("send");
        handle
            .navigation
            .send(NavigationEvent::HistoryStateUpdated { tab_id: 1, url })
            .expect("send");

        let stored = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(payload) = fx.coordinator.slot().get_or_none().await {
                    return payload;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("scrape stored");
        assert_eq!(stored, ScrapePayload::failed(MISSING_CODE));

        handle
            .messages
            .send(RelayMessage::GetAiSuggestion)
            .expect("send");
        let response = tokio::time::timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .expect("response")
            .expect("message");
        assert_eq!(response, RelayMessage::AiResponse(AiResponse::error(MISSING_CODE)));

        cancel.cancel();
        handle.task.await.expect("coordinator task");
    }
}
