use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::ServiceEntry;

#[async_trait]
pub trait ServiceSchedule: Send + Sync {
    /// Services on or after `from` whose leader, notes or special-activity
    /// text mentions `name_or_role`.
    async fn find_upcoming_services_matching(
        &self,
        name_or_role: &str,
        from: NaiveDate,
    ) -> anyhow::Result<Vec<ServiceEntry>>;
}
