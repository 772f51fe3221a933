//! Chat session bound to one generated profile.
//!
//! Lifecycle: `NoSession` until the first message, `Active` afterwards, and
//! back to `NoSession` when the session is invalidated (a new baseline
//! profile, or an explicit reset). A session is only ever reused for the
//! exact `(parameters, profile)` pair that created it.
//!
//! Chat failures never leave this module: a failed turn is recorded in the
//! transcript as a fallback model message, so the conversation stays usable.

use neuro_core::{BrainParameters, ChatMessage, Locale, Profile, ProfileId, SessionId};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::GenerationClient;
use crate::prompts::compile_chat_system_instruction;

/// A conversation and the grounding it was created with
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    parameters: BrainParameters,
    profile_id: ProfileId,
    /// Fixed at creation
    instruction: String,
    history: Vec<ChatMessage>,
    pending: bool,
}

impl ChatSession {
    fn new(parameters: &BrainParameters, profile: &Profile, locale: Locale) -> Self {
        Self {
            id: SessionId::new(),
            parameters: *parameters,
            profile_id: profile.id,
            instruction: compile_chat_system_instruction(parameters, &profile.result, locale),
            history: Vec::new(),
            pending: false,
        }
    }

    fn is_bound_to(&self, parameters: &BrainParameters, profile: &Profile) -> bool {
        self.parameters == *parameters && self.profile_id == profile.id
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

/// Owns the single chat session
pub struct SessionManager {
    client: GenerationClient,
    locale: Locale,
    temperature: f32,
    session: Mutex<Option<ChatSession>>,
}

impl SessionManager {
    pub fn new(client: GenerationClient, locale: Locale, temperature: f32) -> Self {
        Self {
            client,
            locale,
            temperature,
            session: Mutex::new(None),
        }
    }

    /// Current session for this pair, or a fresh one with empty history
    pub fn get_or_create(&self, parameters: &BrainParameters, profile: &Profile) -> SessionId {
        let mut slot = self.session.lock();
        self.ensure(&mut slot, parameters, profile).id
    }

    fn ensure<'a>(
        &self,
        slot: &'a mut Option<ChatSession>,
        parameters: &BrainParameters,
        profile: &Profile,
    ) -> &'a mut ChatSession {
        let reusable = slot
            .as_ref()
            .map_or(false, |s| s.is_bound_to(parameters, profile));

        if !reusable {
            *slot = None;
        }

        slot.get_or_insert_with(|| {
            let session = ChatSession::new(parameters, profile, self.locale);
            info!(
                "Created chat session {} for profile {}",
                session.id, profile.id
            );
            session
        })
    }

    /// Send one user turn and return the model turn appended after it.
    ///
    /// Never fails: on any generation error the localized fallback message
    /// is appended instead. The lock is released while the request is in
    /// flight; a reply for a session invalidated meanwhile is dropped.
    pub async fn send_message(
        &self,
        parameters: &BrainParameters,
        profile: &Profile,
        text: &str,
    ) -> ChatMessage {
        let (session_id, instruction, history) = {
            let mut slot = self.session.lock();
            let session = self.ensure(&mut slot, parameters, profile);
            session.history.push(ChatMessage::user(text));
            session.pending = true;
            (
                session.id,
                session.instruction.clone(),
                session.history.clone(),
            )
        };

        debug!("Chat turn {} on session {}", history.len(), session_id);

        let reply = match self
            .client
            .continue_chat(&instruction, &history, self.temperature)
            .await
        {
            Ok(text) => ChatMessage::model(text),
            Err(e) => {
                warn!("Chat turn failed on session {}: {}", session_id, e);
                ChatMessage::model(self.locale.chat_fallback())
            }
        };

        let mut slot = self.session.lock();
        match slot.as_mut() {
            Some(session) if session.id == session_id => {
                session.history.push(reply.clone());
                session.pending = false;
            }
            _ => info!(
                "Discarding reply for invalidated chat session {}",
                session_id
            ),
        }

        reply
    }

    /// Discard the session and its history
    pub fn invalidate(&self) -> Option<SessionId> {
        let discarded = self.session.lock().take().map(|s| s.id);
        if let Some(id) = discarded {
            info!("Invalidated chat session {}", id);
        }
        discarded
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.lock().as_ref().map(|s| s.id)
    }

    pub fn is_active(&self) -> bool {
        self.session.lock().is_some()
    }

    /// True while a turn is awaiting the service
    pub fn is_pending(&self) -> bool {
        self.session.lock().as_ref().map_or(false, |s| s.pending)
    }

    /// Snapshot of the transcript; empty when no session exists
    pub fn history(&self) -> Vec<ChatMessage> {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the whole session
    pub fn snapshot(&self) -> Option<ChatSession> {
        self.session.lock().clone()
    }
}
