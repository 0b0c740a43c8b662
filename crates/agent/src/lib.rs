pub mod client;
pub mod coordinator;
pub mod credentials;
pub mod error;
pub mod messages;
pub mod prompt;
pub mod slot;

pub use client::{GeminiClient, GeminiSettings};
pub use coordinator::{Coordinator, CoordinatorHandle};
pub use credentials::{CredentialStore, CREDENTIAL_KEY};
pub use error::{HelpError, HelpResult};
pub use messages::{AiResponse, RelayMessage};
pub use prompt::{build_prompt, Prompt, PromptKind};
pub use slot::SnapshotSlot;
