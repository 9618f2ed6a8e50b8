pub mod catalog;
pub mod directory;
pub mod intent;
pub mod response;
pub mod vocabulary;

pub use catalog::{ServiceEntry, ServiceSlot, SongEntry, Verse};
pub use directory::{CacheSnapshot, DirectoryEntry, NameMatch};
pub use intent::{ClassifiedMessage, Intent};
pub use response::{BotAction, BotResponse, Mood};
pub use vocabulary::{IntentPatterns, Vocabulary};
