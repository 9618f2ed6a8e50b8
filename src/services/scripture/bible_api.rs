use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Datelike;
use chrono_tz::Tz;
use serde::Deserialize;

use super::ScriptureProvider;
use crate::models::Verse;
use crate::services::assistant::text::fold;
use crate::services::clock::Clock;

/// Client for a bible-api.com compatible endpoint. Topic search goes through
/// a curated topic -> references index and fetches one of those references.
pub struct BibleApiProvider {
    base_url: String,
    translation: String,
    topics: BTreeMap<String, Vec<String>>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiVerse {
    reference: String,
    text: String,
    #[serde(default)]
    translation_name: String,
}

impl BibleApiProvider {
    pub fn new(
        base_url: String,
        translation: String,
        topics: BTreeMap<String, Vec<String>>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
    ) -> Self {
        Self {
            base_url,
            translation,
            topics,
            clock,
            timezone,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, url: reqwest::Url, query: &[(&str, &str)]) -> anyhow::Result<Verse> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("failed to call scripture API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse scripture API response")?;

        if !status.is_success() {
            let reason = data["error"].as_str().unwrap_or("unknown error");
            anyhow::bail!("scripture API error ({status}): {reason}");
        }

        let verse: ApiVerse =
            serde_json::from_value(data).context("unexpected scripture API payload")?;
        Ok(Verse {
            reference: verse.reference,
            text: verse.text.trim().to_string(),
            translation_name: verse.translation_name,
        })
    }

    fn base(&self) -> anyhow::Result<reqwest::Url> {
        reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid scripture API url: {}", self.base_url))
    }

    /// Today's pick from a topic's references; rotates by day of year.
    fn reference_of_the_day<'a>(&self, references: &'a [String]) -> Option<&'a str> {
        if references.is_empty() {
            return None;
        }
        let day = self.clock.now().with_timezone(&self.timezone).ordinal() as usize;
        Some(references[day % references.len()].as_str())
    }

    fn references_for(&self, topic: &str) -> Option<&Vec<String>> {
        let topic = fold(topic);
        self.topics.get(topic.trim()).or_else(|| {
            topic
                .split_whitespace()
                .find_map(|word| self.topics.get(word))
        })
    }
}

#[async_trait]
impl ScriptureProvider for BibleApiProvider {
    async fn get_random_verse(&self) -> anyhow::Result<Verse> {
        let url = self.base()?;
        self.fetch(url, &[("random", "verse"), ("translation", self.translation.as_str())])
            .await
    }

    async fn get_specific_verse(&self, reference: &str) -> anyhow::Result<Verse> {
        let mut url = self.base()?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("scripture API url cannot be a base"))?
            .pop_if_empty()
            .push(reference);
        self.fetch(url, &[("translation", self.translation.as_str())]).await
    }

    async fn search_verses_by_topic(&self, topic: &str) -> anyhow::Result<Verse> {
        let reference = self
            .references_for(topic)
            .and_then(|refs| self.reference_of_the_day(refs))
            .ok_or_else(|| anyhow::anyhow!("no verses indexed for topic '{topic}'"))?;
        self.get_specific_verse(reference).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn provider_at(clock: Arc<ManualClock>) -> BibleApiProvider {
        let mut topics = BTreeMap::new();
        topics.insert("paz".to_string(), vec!["Juan 14:27".to_string()]);
        topics.insert("perdon".to_string(), vec!["1 Juan 1:9".to_string()]);
        BibleApiProvider::new(
            "https://bible-api.com".to_string(),
            "rvr1960".to_string(),
            topics,
            clock,
            Tz::America__Mexico_City,
        )
    }

    fn provider() -> BibleApiProvider {
        provider_at(Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap(),
        )))
    }

    #[test]
    fn test_topic_reference_rotates_daily() {
        // 2 January 2026 in Mexico City: ordinal 2.
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 2, 18, 0, 0).unwrap()));
        let p = provider_at(clock.clone());
        let refs = vec!["Salmos 4:8".to_string(), "Juan 14:27".to_string(), "Isaías 26:3".to_string()];

        assert_eq!(p.reference_of_the_day(&refs), Some("Isaías 26:3"));
        clock.advance(Duration::days(1));
        assert_eq!(p.reference_of_the_day(&refs), Some("Salmos 4:8"));
        assert_eq!(p.reference_of_the_day(&[]), None);
    }

    #[test]
    fn test_topic_day_follows_ministry_timezone() {
        // 03:00 UTC on 3 January is still 2 January in Mexico City.
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 3, 3, 0, 0).unwrap()));
        let p = provider_at(clock);
        let refs = vec!["A 1:1".to_string(), "B 1:1".to_string(), "C 1:1".to_string()];
        assert_eq!(p.reference_of_the_day(&refs), Some("C 1:1"));
    }

    #[test]
    fn test_topic_lookup_is_accent_insensitive() {
        let p = provider();
        assert_eq!(p.references_for("Perdón").unwrap()[0], "1 Juan 1:9");
    }

    #[test]
    fn test_topic_lookup_by_word() {
        let p = provider();
        assert_eq!(p.references_for("la paz interior").unwrap()[0], "Juan 14:27");
    }

    #[test]
    fn test_unknown_topic() {
        assert!(provider().references_for("astronomia").is_none());
    }

    #[tokio::test]
    async fn test_unknown_topic_errors_without_network() {
        let err = provider().search_verses_by_topic("astronomia").await.unwrap_err();
        assert!(err.to_string().contains("astronomia"));
    }
}
