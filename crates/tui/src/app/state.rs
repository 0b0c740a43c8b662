use super::*;

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub credentials: CredentialStore,
    pub credential_input: InputState,
    pub focus: Focus,
    pub keybinds: Keybinds,
    pub layout: LayoutState,
    pub suggestion: String,
    /// Whether the "get help" trigger accepts presses.
    pub help_enabled: bool,
    pub last_answer: Option<LastAnswer>,
    pub status_note: Option<StatusNote>,
    pub scroll_offset: u16,
    pub show_help: bool,
    pub coordinator_tx: Option<mpsc::UnboundedSender<RelayMessage>>,
    pub navigation_tx: Option<mpsc::UnboundedSender<NavigationEvent>>,
    pub relay_rx: Option<mpsc::UnboundedReceiver<RelayMessage>>,
    pub last_error: Option<String>,
}

impl App {
    pub fn new(config: Config, credentials: CredentialStore) -> Self {
        Self {
            should_quit: false,
            config,
            credentials,
            credential_input: InputState::new(),
            focus: Focus::HelpButton,
            keybinds: Keybinds,
            layout: LayoutState::default(),
            suggestion: IDLE_PLACEHOLDER.to_string(),
            help_enabled: true,
            last_answer: None,
            status_note: None,
            scroll_offset: 0,
            show_help: false,
            coordinator_tx: None,
            navigation_tx: None,
            relay_rx: None,
            last_error: None,
        }
    }

    /// Wires the popup to a running coordinator.
    pub fn connect(
        &mut self,
        coordinator_tx: mpsc::UnboundedSender<RelayMessage>,
        navigation_tx: mpsc::UnboundedSender<NavigationEvent>,
        relay_rx: mpsc::UnboundedReceiver<RelayMessage>,
    ) {
        self.coordinator_tx = Some(coordinator_tx);
        self.navigation_tx = Some(navigation_tx);
        self.relay_rx = Some(relay_rx);
    }
}
