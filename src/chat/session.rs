use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::future::IntoFuture;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::i18n::{Locale, keys};
use crate::interpreter::{CommandResult, FilterChange, Interpreter};
use crate::stats::StatsProvider;

/// Reply used when interpretation fails unexpectedly.
pub const GENERIC_APOLOGY: &str =
    "Sorry, something went wrong while processing your message. Please try again.";

/// Who wrote a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: u32,
    pub display_name: &'static str,
}

pub const USER: Author = Author {
    id: 0,
    display_name: "You",
};

pub const ASSISTANT: Author = Author {
    id: 1,
    display_name: "MineSafe Assistant",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Whether the chat panel is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Idle,
    Open,
}

/// Receives filter changes produced by the assistant.
pub trait FilterConsumer: Send + Sync {
    fn on_filter_change(&self, change: FilterChange<'_>);
}

/// Notified with the raw text of every user message before it is interpreted.
pub trait SearchHook: Send + Sync {
    fn on_search(&self, raw_text: &str);
}

#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
    /// Id of the welcome message, the only one ever rewritten.
    seed_id: Option<u64>,
}

impl Transcript {
    fn push(&mut self, author: Author, text: String) -> ChatMessage {
        self.next_id += 1;
        let message = ChatMessage {
            id: self.next_id,
            author,
            text,
            timestamp: Utc::now(),
        };
        self.messages.push(message.clone());
        message
    }
}

fn lock(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An assistant reply still being computed.
///
/// The user's message is already in the transcript; awaiting this appends
/// the reply and yields it.
pub struct PendingReply {
    future: BoxFuture<'static, ChatMessage>,
}

impl IntoFuture for PendingReply {
    type Output = ChatMessage;
    type IntoFuture = BoxFuture<'static, ChatMessage>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// One chat lifetime: the ordered transcript plus the collaborators each
/// message is routed through.
pub struct ConversationSession {
    interpreter: Arc<Interpreter>,
    stats: Option<Arc<dyn StatsProvider>>,
    filter_consumer: Option<Arc<dyn FilterConsumer>>,
    search_hook: Option<Arc<dyn SearchHook>>,
    transcript: Arc<Mutex<Transcript>>,
    locale: Locale,
    state: PanelState,
}

impl ConversationSession {
    /// Starts a session whose transcript holds only the welcome message.
    pub fn new(interpreter: Arc<Interpreter>, locale: Locale) -> Self {
        let mut transcript = Transcript::default();
        let seed = transcript.push(ASSISTANT, locale.t(keys::CHATBOT_INITIAL).to_string());
        transcript.seed_id = Some(seed.id);

        Self {
            interpreter,
            stats: None,
            filter_consumer: None,
            search_hook: None,
            transcript: Arc::new(Mutex::new(transcript)),
            locale,
            state: PanelState::Idle,
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Arc<dyn StatsProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    #[must_use]
    pub fn with_filter_consumer(mut self, consumer: Arc<dyn FilterConsumer>) -> Self {
        self.filter_consumer = Some(consumer);
        self
    }

    #[must_use]
    pub fn with_search_hook(mut self, hook: Arc<dyn SearchHook>) -> Self {
        self.search_hook = Some(hook);
        self
    }

    pub const fn state(&self) -> PanelState {
        self.state
    }

    /// Opens a closed panel or closes an open one.
    pub const fn toggle(&mut self) -> PanelState {
        self.state = match self.state {
            PanelState::Idle => PanelState::Open,
            PanelState::Open => PanelState::Idle,
        };
        self.state
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Switches locale and rewrites the welcome message. Other messages keep
    /// the language they were written in.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;

        let mut transcript = lock(&self.transcript);
        let Some(seed_id) = transcript.seed_id else {
            return;
        };
        if let Some(seed) = transcript.messages.iter_mut().find(|m| m.id == seed_id) {
            seed.text = locale.t(keys::CHATBOT_INITIAL).to_string();
        }
    }

    /// Snapshot of the transcript in insertion order.
    pub fn history(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).messages.clone()
    }

    /// Appends the user's message now and returns the pending reply, or
    /// `None` when `text` is blank.
    ///
    /// User messages land in send order. Replies land in completion order, so
    /// a slow statistics lookup can let a later reply overtake an earlier one.
    pub fn send_user_message(&self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            return None;
        }

        lock(&self.transcript).push(USER, text.to_string());

        if let Some(hook) = &self.search_hook {
            hook.on_search(text);
        }

        let interpreter = Arc::clone(&self.interpreter);
        let stats = self.stats.clone();
        let consumer = self.filter_consumer.clone();
        let transcript = Arc::clone(&self.transcript);
        let locale = self.locale;
        let text = text.to_string();

        let future = async move {
            let interpreted =
                AssertUnwindSafe(interpreter.interpret(&text, stats.as_deref(), locale))
                    .catch_unwind()
                    .await;

            let result = interpreted.unwrap_or_else(|_| {
                tracing::error!("interpreter panicked; replying with apology");
                CommandResult::reply(GENERIC_APOLOGY)
            });

            if let Some(consumer) = &consumer
                && let Some(change) = result.filter.as_change()
            {
                consumer.on_filter_change(change);
            }

            lock(&transcript).push(ASSISTANT, result.response_text)
        };

        Some(PendingReply {
            future: future.boxed(),
        })
    }

    /// Sends `text` and waits for the reply.
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        match self.send_user_message(text) {
            Some(pending) => Some(pending.await),
            None => None,
        }
    }
}
