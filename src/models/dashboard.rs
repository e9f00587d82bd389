//! Admin dashboard aggregates

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_seminars: i64,
    pub total_users: i64,
    pub total_applications: i64,
    pub total_categories: i64,
    pub active_seminars: i64,
    pub todays_seminars: i64,
    pub weekly_applications: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MonthlySeminarCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeminarCount {
    pub id: Uuid,
    pub name: String,
    pub color_code: Option<String>,
    pub icon_name: Option<String>,
    pub seminar_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecentSeminar {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecentApplication {
    pub id: Uuid,
    pub user_name: String,
    pub user_department: Option<String>,
    pub seminar_id: Uuid,
    pub seminar_title: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentActivities {
    pub recent_seminars: Vec<RecentSeminar>,
    pub recent_applications: Vec<RecentApplication>,
}
