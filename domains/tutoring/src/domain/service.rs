//! Tutor turn handling
//!
//! `TutorService` owns the single chat operation: resolve or create the
//! conversation, record the user's turn, call the generation provider
//! with a bounded prompt, record and return the reply.
//!
//! The store and the provider are injected at startup. The store seam is
//! deliberately narrow: the turn only needs ownership-checked resolution,
//! creation, appends, the recent-history window, and the `updated_at`
//! refresh.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use lingua_auth::AuthIdentity;
use lingua_common::{Error, Result};
use lingua_llm::{GenerationRequest, GenerationService};

use crate::domain::entities::{Conversation, Message, MessageSender};
use crate::domain::prompt::{build_prompt, HISTORY_WINDOW};

/// A level reference as the turn needs it: the id to snapshot and the
/// CEFR code for the prompt.
#[derive(Debug, Clone)]
pub struct LevelRef {
    pub id: Uuid,
    pub code: String,
}

/// Persistence operations required by one tutor turn.
///
/// The production implementation wraps the conversation and message
/// repositories; tests substitute an in-memory store.
#[async_trait::async_trait]
pub trait TurnStore: Send + Sync {
    /// Resolve a conversation by id, scoped to its owner. Absent and
    /// not-owned both come back as `None`.
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Conversation>>;

    /// The learner's current profile level, if any
    async fn profile_level(&self, user_id: Uuid) -> Result<Option<LevelRef>>;

    /// CEFR code for a level id (the conversation's snapshot)
    async fn level_code(&self, level_id: Uuid) -> Result<Option<String>>;

    /// Persist a new conversation
    async fn create_conversation(&self, conversation: &Conversation) -> Result<Conversation>;

    /// Append a message to a conversation
    async fn append_message(&self, message: &Message) -> Result<Message>;

    /// The most recent `limit` messages of a conversation, oldest first
    async fn recent_messages(&self, conversation_id: Uuid, limit: i64) -> Result<Vec<Message>>;

    /// Refresh the conversation's `updated_at`
    async fn touch_conversation(&self, conversation_id: Uuid) -> Result<()>;
}

/// Result of one tutor turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub conversation_id: Uuid,
    pub response: String,
}

/// The tutoring session manager
pub struct TutorService<S: TurnStore> {
    store: S,
    llm: Arc<dyn GenerationService>,
}

impl<S: TurnStore> TutorService<S> {
    pub fn new(store: S, llm: Arc<dyn GenerationService>) -> Self {
        Self { store, llm }
    }

    /// Handle one tutor turn.
    ///
    /// The user message is recorded before the provider call and is kept
    /// even when the call fails; the assistant message exists only on
    /// success. There is no retry and no transaction spanning the
    /// provider call.
    pub async fn submit_turn(
        &self,
        user: &AuthIdentity,
        conversation_id: Option<Uuid>,
        text: &str,
    ) -> Result<TurnOutcome> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Field 'message' is required".to_string()));
        }

        let (conversation, level_code) = match conversation_id {
            Some(id) => {
                let conversation = self
                    .store
                    .find_owned(id, user.id)
                    .await?
                    .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

                let level_code = match conversation.level_id {
                    Some(level_id) => self.store.level_code(level_id).await?,
                    None => None,
                };

                (conversation, level_code)
            }
            None => {
                let level = self.store.profile_level(user.id).await?;
                let title =
                    Conversation::generated_title(&user.username, Utc::now().date_naive());

                let conversation = Conversation::new(
                    user.id,
                    level.as_ref().map(|l| l.id),
                    title,
                )?;
                let conversation = self.store.create_conversation(&conversation).await?;

                tracing::debug!(
                    conversation_id = %conversation.id,
                    user_id = %user.id,
                    "Created conversation for chat turn"
                );

                (conversation, level.map(|l| l.code))
            }
        };

        // The user's turn is durable from here on, whatever the provider does
        let user_message = Message::new(conversation.id, MessageSender::User, text.to_string())?;
        self.store.append_message(&user_message).await?;

        let history = self
            .store
            .recent_messages(conversation.id, HISTORY_WINDOW as i64)
            .await?;
        let prompt = build_prompt(level_code.as_deref(), &history, text);

        let reply = self
            .llm
            .generate(GenerationRequest {
                model: String::new(),
                prompt,
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    conversation_id = %conversation.id,
                    "Generation provider call failed"
                );
                Error::Generation(e.to_string())
            })?;

        let assistant_message = Message::new(
            conversation.id,
            MessageSender::Assistant,
            reply.text.clone(),
        )?;
        self.store.append_message(&assistant_message).await?;
        self.store.touch_conversation(conversation.id).await?;

        Ok(TurnOutcome {
            conversation_id: conversation.id,
            response: reply.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_llm::{GenerationReply, LlmError, MockLlmService};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory `TurnStore` for exercising the turn sequence without a
    /// database.
    #[derive(Default)]
    struct InMemoryStore {
        conversations: Mutex<Vec<Conversation>>,
        messages: Mutex<Vec<Message>>,
        profile_levels: Mutex<HashMap<Uuid, LevelRef>>,
        level_codes: Mutex<HashMap<Uuid, String>>,
    }

    impl InMemoryStore {
        fn with_profile_level(self, user_id: Uuid, level: LevelRef) -> Self {
            self.level_codes
                .lock()
                .unwrap()
                .insert(level.id, level.code.clone());
            self.profile_levels.lock().unwrap().insert(user_id, level);
            self
        }

        fn insert_conversation(&self, conversation: Conversation) {
            self.conversations.lock().unwrap().push(conversation);
        }

        fn insert_message(&self, message: Message) {
            self.messages.lock().unwrap().push(message);
        }

        fn conversation_count(&self) -> usize {
            self.conversations.lock().unwrap().len()
        }

        fn messages_in(&self, conversation_id: Uuid) -> Vec<Message> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id == conversation_id)
                .cloned()
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl TurnStore for InMemoryStore {
        async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Conversation>> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id && c.user_id == owner_id)
                .cloned())
        }

        async fn profile_level(&self, user_id: Uuid) -> Result<Option<LevelRef>> {
            Ok(self.profile_levels.lock().unwrap().get(&user_id).cloned())
        }

        async fn level_code(&self, level_id: Uuid) -> Result<Option<String>> {
            Ok(self.level_codes.lock().unwrap().get(&level_id).cloned())
        }

        async fn create_conversation(&self, conversation: &Conversation) -> Result<Conversation> {
            self.insert_conversation(conversation.clone());
            Ok(conversation.clone())
        }

        async fn append_message(&self, message: &Message) -> Result<Message> {
            self.insert_message(message.clone());
            Ok(message.clone())
        }

        async fn recent_messages(
            &self,
            conversation_id: Uuid,
            limit: i64,
        ) -> Result<Vec<Message>> {
            let mut messages = self.messages_in(conversation_id);
            let len = messages.len();
            if len > limit as usize {
                messages = messages.split_off(len - limit as usize);
            }
            Ok(messages)
        }

        async fn touch_conversation(&self, conversation_id: Uuid) -> Result<()> {
            let mut conversations = self.conversations.lock().unwrap();
            if let Some(c) = conversations.iter_mut().find(|c| c.id == conversation_id) {
                c.updated_at = Utc::now();
            }
            Ok(())
        }
    }

    /// Provider double that records every prompt it was sent
    #[derive(Default)]
    struct RecordingLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl GenerationService for RecordingLlm {
        async fn generate(&self, request: GenerationRequest) -> std::result::Result<GenerationReply, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt);
            Ok(GenerationReply {
                text: "Here is an example.".to_string(),
                model: "recording".to_string(),
            })
        }

        fn default_model(&self) -> &str {
            "recording"
        }
    }

    /// Provider double that always fails
    struct FailingLlm;

    #[async_trait::async_trait]
    impl GenerationService for FailingLlm {
        async fn generate(&self, _request: GenerationRequest) -> std::result::Result<GenerationReply, LlmError> {
            Err(LlmError::Request("connection refused".to_string()))
        }

        fn default_model(&self) -> &str {
            "failing"
        }
    }

    fn identity(username: &str) -> AuthIdentity {
        AuthIdentity {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn b1_level() -> LevelRef {
        LevelRef {
            id: Uuid::new_v4(),
            code: "B1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_conversation_snapshots_profile_level() {
        let user = identity("maria");
        let store = InMemoryStore::default().with_profile_level(user.id, b1_level());
        let service = TutorService::new(store, Arc::new(MockLlmService::new()));

        let outcome = service
            .submit_turn(&user, None, "How do I use present perfect?")
            .await
            .unwrap();

        let conversations = service.store.conversations.lock().unwrap().clone();
        assert_eq!(conversations.len(), 1);
        let conversation = &conversations[0];
        assert_eq!(conversation.id, outcome.conversation_id);
        assert_eq!(conversation.user_id, user.id);
        assert!(conversation.level_id.is_some());
        assert!(conversation.title.contains("maria"));
        assert!(conversation
            .title
            .contains(&Utc::now().date_naive().to_string()));
    }

    #[tokio::test]
    async fn test_successful_turn_records_user_then_assistant() {
        let user = identity("maria");
        let store = InMemoryStore::default();
        let service = TutorService::new(store, Arc::new(MockLlmService::new()));

        let outcome = service
            .submit_turn(&user, None, "Hello tutor")
            .await
            .unwrap();

        let messages = service.store.messages_in(outcome.conversation_id);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, MessageSender::User);
        assert_eq!(messages[0].text, "Hello tutor");
        assert_eq!(messages[1].sender, MessageSender::Assistant);
        assert_eq!(messages[1].text, outcome.response);
        assert!(messages[0].created_at <= messages[1].created_at);
    }

    #[tokio::test]
    async fn test_reuses_existing_conversation() {
        let user = identity("maria");
        let store = InMemoryStore::default();
        let service = TutorService::new(store, Arc::new(MockLlmService::new()));

        let first = service.submit_turn(&user, None, "First question").await.unwrap();
        let second = service
            .submit_turn(&user, Some(first.conversation_id), "Give me an example")
            .await
            .unwrap();

        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(service.store.conversation_count(), 1);
        assert_eq!(service.store.messages_in(first.conversation_id).len(), 4);
    }

    #[tokio::test]
    async fn test_foreign_conversation_is_not_found() {
        let owner = identity("maria");
        let intruder = identity("eve");
        let store = InMemoryStore::default();
        let conversation = Conversation::new(owner.id, None, "Owned".to_string()).unwrap();
        let conversation_id = conversation.id;
        store.insert_conversation(conversation);

        let service = TutorService::new(store, Arc::new(MockLlmService::new()));

        let result = service
            .submit_turn(&intruder, Some(conversation_id), "Let me in")
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(service.store.messages_in(conversation_id).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let user = identity("maria");
        let service = TutorService::new(InMemoryStore::default(), Arc::new(MockLlmService::new()));

        let result = service
            .submit_turn(&user, Some(Uuid::new_v4()), "Hello?")
            .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_any_mutation() {
        let user = identity("maria");
        let service = TutorService::new(InMemoryStore::default(), Arc::new(MockLlmService::new()));

        for text in ["", "   ", "\n\t"] {
            let result = service.submit_turn(&user, None, text).await;
            assert!(matches!(result, Err(Error::Validation(_))));
        }

        assert_eq!(service.store.conversation_count(), 0);
        assert!(service.store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_user_message() {
        let user = identity("maria");
        let service = TutorService::new(InMemoryStore::default(), Arc::new(FailingLlm));

        let result = service.submit_turn(&user, None, "Hello tutor").await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().contains("connection refused"));

        // The conversation and the user's turn survive the failure
        assert_eq!(service.store.conversation_count(), 1);
        let messages = service.store.messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, MessageSender::User);
    }

    #[tokio::test]
    async fn test_prompt_carries_level_code() {
        let user = identity("maria");
        let store = InMemoryStore::default().with_profile_level(user.id, b1_level());
        let llm = Arc::new(RecordingLlm::default());
        let service = TutorService::new(store, llm.clone());

        service.submit_turn(&user, None, "Hello").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("CEFR level: B1"));
    }

    #[tokio::test]
    async fn test_prompt_marks_missing_level_unknown() {
        let user = identity("maria");
        let llm = Arc::new(RecordingLlm::default());
        let service = TutorService::new(InMemoryStore::default(), llm.clone());

        service.submit_turn(&user, None, "Hello").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("CEFR level: unknown"));
    }

    #[tokio::test]
    async fn test_prompt_includes_prior_turns_on_reuse() {
        let user = identity("maria");
        let llm = Arc::new(RecordingLlm::default());
        let service = TutorService::new(InMemoryStore::default(), llm.clone());

        let first = service
            .submit_turn(&user, None, "How do I use present perfect?")
            .await
            .unwrap();
        service
            .submit_turn(&user, Some(first.conversation_id), "Give me an example")
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        let second_prompt = &prompts[1];
        assert!(second_prompt.contains("USER: How do I use present perfect?"));
        assert!(second_prompt.contains("ASSISTANT: Here is an example."));
        assert!(second_prompt.contains("USER: Give me an example"));
    }

    #[tokio::test]
    async fn test_prompt_history_truncated_to_window() {
        let user = identity("maria");
        let store = InMemoryStore::default();
        let conversation = Conversation::new(user.id, None, "Long chat".to_string()).unwrap();
        let conversation_id = conversation.id;
        store.insert_conversation(conversation);

        // 12 prior turns; only the tail fits the window
        for i in 1..=12 {
            store.insert_message(
                Message::new(conversation_id, MessageSender::User, format!("turn {}", i))
                    .unwrap(),
            );
        }

        let llm = Arc::new(RecordingLlm::default());
        let service = TutorService::new(store, llm.clone());

        service
            .submit_turn(&user, Some(conversation_id), "latest question")
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        let prompt = &prompts[0];

        // 13 messages exist after the append; the window keeps the last 10:
        // turns 4..=12 plus the new one
        assert!(!prompt.contains("USER: turn 1\n"));
        assert!(!prompt.contains("USER: turn 2\n"));
        assert!(!prompt.contains("USER: turn 3\n"));
        assert!(prompt.contains("USER: turn 4"));
        assert!(prompt.contains("USER: turn 12"));
        assert!(prompt.contains("USER: latest question"));

        // Oldest-first within the window
        let fourth = prompt.find("USER: turn 4").unwrap();
        let twelfth = prompt.find("USER: turn 12").unwrap();
        assert!(fourth < twelfth);
    }
}
