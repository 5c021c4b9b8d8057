//! cb-core: shared building blocks for callbridge
//!
//! Configuration, the provider dispatch taxonomy, the text-completion
//! client, the in-memory chat session store and the prompt assets used by
//! the chat responders.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod session;

pub use config::{
    ChatConfig, ChatStrategy, Config, IvrConfig, LlmConfig, SendGridConfig, ServerConfig,
    TwilioConfig, VapiConfig,
};
pub use dispatch::{
    BulkItem, BulkReport, BulkSummary, Channel, DispatchResult, ProviderError, ProviderErrorKind,
};
pub use error::{Error, Result};
pub use llm::{ChatMessage, CompletionClient, CompletionRequest, Role};
pub use prompts::PromptAssets;
pub use session::{ChatSession, ChatTurn, Clock, ManualClock, SessionStore, SystemClock, TurnRole};
