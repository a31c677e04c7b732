use super::types::{GroupStats, SummaryMatrix, TopDisconnected};
use super::{ApiClient, ApiError};
use chrono::NaiveDate;

/// Date range and group for the summary matrix. Absent bounds are left to
/// the backend, which defaults to the last seven days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub group_id: Option<i64>,
}

impl MatrixQuery {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(start) = self.start_date {
            query.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(group) = self.group_id {
            query.push(("group_id", group.to_string()));
        }
        query
    }
}

#[allow(async_fn_in_trait)]
pub trait AnalyticsApi {
    async fn get_summary_matrix(&self, query: &MatrixQuery) -> Result<SummaryMatrix, ApiError>;
    async fn get_group_stats(&self, group_id: i64, days: u32) -> Result<GroupStats, ApiError>;
    async fn get_top_disconnected(&self, limit: u32, days: u32) -> Result<TopDisconnected, ApiError>;
}

impl AnalyticsApi for ApiClient {
    async fn get_summary_matrix(&self, query: &MatrixQuery) -> Result<SummaryMatrix, ApiError> {
        self.get_json("analytics/summary-matrix/", &query.to_query()).await
    }

    async fn get_group_stats(&self, group_id: i64, days: u32) -> Result<GroupStats, ApiError> {
        self.get_json(&format!("analytics/group/{group_id}/stats/"), &[("days", days)])
            .await
    }

    async fn get_top_disconnected(&self, limit: u32, days: u32) -> Result<TopDisconnected, ApiError> {
        self.get_json("analytics/top-disconnected/", &[("limit", limit), ("days", days)])
            .await
    }
}
