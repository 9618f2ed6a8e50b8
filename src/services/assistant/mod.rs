pub mod actions;
pub mod classifier;
pub mod handlers;
pub mod preprocess;
pub mod replies;
pub mod resolver;
pub mod text;

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::{BotResponse, Intent, Vocabulary};
use crate::services::catalog::SongCatalog;
use crate::services::clock::Clock;
use crate::services::directory::DirectoryCache;
use crate::services::messaging::MessageStore;
use crate::services::schedule::ServiceSchedule;
use crate::services::scripture::ScriptureProvider;

use self::classifier::IntentClassifier;
use self::handlers::scripture::ScriptureParser;
use self::handlers::songs::SongQueryParser;
use self::preprocess::{Preprocessed, Preprocessor};
use self::resolver::EntityResolver;

/// External systems the engine reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<DirectoryCache>,
    pub schedule: Arc<dyn ServiceSchedule>,
    pub catalog: Arc<dyn SongCatalog>,
    pub scripture: Arc<dyn ScriptureProvider>,
    pub store: Arc<dyn MessageStore>,
}

/// Turns one chat message into at most one structured response.
pub struct ChatEngine {
    assistant_name: String,
    preprocessor: Preprocessor,
    classifier: IntentClassifier,
    resolver: EntityResolver,
    songs: SongQueryParser,
    scripture_parser: ScriptureParser,
    directory: Arc<DirectoryCache>,
    schedule: Arc<dyn ServiceSchedule>,
    catalog: Arc<dyn SongCatalog>,
    scripture: Arc<dyn ScriptureProvider>,
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl ChatEngine {
    pub fn new(
        vocabulary: &Vocabulary,
        collaborators: Collaborators,
        clock: Arc<dyn Clock>,
        timezone: Tz,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            assistant_name: vocabulary.assistant_name.clone(),
            preprocessor: Preprocessor::from_vocabulary(vocabulary)?,
            classifier: IntentClassifier::from_vocabulary(vocabulary)?,
            resolver: EntityResolver::from_vocabulary(vocabulary)?,
            songs: SongQueryParser::from_vocabulary(vocabulary)?,
            scripture_parser: ScriptureParser::from_vocabulary(vocabulary)?,
            directory: collaborators.directory,
            schedule: collaborators.schedule,
            catalog: collaborators.catalog,
            scripture: collaborators.scripture,
            store: collaborators.store,
            clock,
            timezone,
        })
    }

    pub fn directory(&self) -> &DirectoryCache {
        &self.directory
    }

    /// Returns `None` when the message does not address the assistant.
    /// Collaborator failures come back as a worried response, never as an
    /// error.
    pub async fn process_message(&self, text: &str, room_id: &str, user_id: &str) -> Option<BotResponse> {
        let cleaned = match self.preprocessor.preprocess(text) {
            Preprocessed::NotAddressed => return None,
            Preprocessed::Greeting => {
                tracing::info!(room_id, user_id, "assistant greeted");
                return Some(self.help(Intent::Help));
            }
            Preprocessed::Command(cleaned) => cleaned,
        };

        let message = self.classifier.classify(&cleaned);
        let today = self.today();

        tracing::info!(
            room_id,
            user_id,
            intent = message.intent.as_str(),
            "processing assistant message"
        );

        let response = match message.intent {
            Intent::SelfDutyLookup => self.handle_self_duty(user_id, today).await,
            Intent::OtherDutyLookup => self.handle_other_duty(&message.cleaned_text, today).await,
            Intent::RehearsalSchedule => self.handle_rehearsal(today),
            Intent::SongSearch => self.handle_song_search(&message.cleaned_text, user_id).await,
            Intent::SongSelect => self.handle_song_select(&message.cleaned_text, user_id).await,
            Intent::BirthdayByMonth => self.handle_birthdays(&message.cleaned_text, today).await,
            Intent::ScriptureDaily => self.handle_daily_verse().await,
            Intent::ScriptureSpecific => self.handle_specific_verse(&message.cleaned_text).await,
            Intent::ScriptureTopic => self.handle_topic_verse(&message.cleaned_text).await,
            Intent::Help | Intent::Unclassified => self.help(message.intent),
        };

        tracing::debug!(
            room_id,
            intent = response.intent.as_str(),
            mood = response.mood.as_str(),
            actions = response.actions.len(),
            "assistant response built"
        );
        Some(response)
    }

    /// Persists `response` in the room as an assistant-authored message.
    pub async fn send_bot_response(&self, room_id: &str, response: &BotResponse) -> anyhow::Result<()> {
        match self.store.insert_assistant_message(room_id, response).await {
            Ok(()) => {
                tracing::info!(room_id, intent = response.intent.as_str(), "assistant response sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, room_id, "failed to store assistant response");
                Err(e)
            }
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.timezone).date_naive()
    }
}
