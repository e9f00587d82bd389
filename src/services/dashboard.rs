//! Admin dashboard aggregates
//!
//! Read-only roll-ups over seminars, applications, users and categories.
//! Every query here is admin-only.

use std::sync::Arc;
use chrono::Duration;
use futures::future::try_join_all;
use crate::database::Store;
use crate::models::dashboard::{CategorySeminarCount, DashboardStats, MonthlySeminarCount, RecentActivities};
use crate::models::user::Actor;
use crate::services::clock::Clock;
use crate::services::policy;
use crate::utils::errors::Result;
use crate::utils::helpers::utc_day_bounds;

/// How many rows the recent-activity panels show
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct DashboardService<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> DashboardService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn stats(&self, actor: &Actor) -> Result<DashboardStats> {
        policy::require_view_dashboard(actor)?;

        let now = self.clock.now();
        let (day_start, day_end) = utc_day_bounds(now);

        let (
            total_seminars,
            total_users,
            total_applications,
            total_categories,
            active_seminars,
            todays_seminars,
            weekly_applications,
        ) = futures::try_join!(
            self.store.count_seminars(),
            self.store.count_users(),
            self.store.count_applications(),
            self.store.count_categories(),
            self.store.count_active_seminars(now),
            self.store.count_seminars_between(day_start, day_end),
            self.store.count_applications_since(now - Duration::days(7)),
        )?;

        Ok(DashboardStats {
            total_seminars,
            total_users,
            total_applications,
            total_categories,
            active_seminars,
            todays_seminars,
            weekly_applications,
        })
    }

    /// Seminar counts per month, most recent month first
    pub async fn monthly_seminar_counts(&self, actor: &Actor) -> Result<Vec<MonthlySeminarCount>> {
        policy::require_view_dashboard(actor)?;
        self.store.monthly_seminar_counts().await
    }

    /// Seminar counts for each active category, in display order
    pub async fn category_seminar_counts(&self, actor: &Actor) -> Result<Vec<CategorySeminarCount>> {
        policy::require_view_dashboard(actor)?;

        let categories = self.store.list_categories(true).await?;
        let counts = try_join_all(
            categories
                .iter()
                .map(|category| self.store.count_seminars_in_category(category.id)),
        )
        .await?;

        Ok(categories
            .into_iter()
            .zip(counts)
            .map(|(category, seminar_count)| CategorySeminarCount {
                id: category.id,
                name: category.name,
                color_code: category.color_code,
                icon_name: category.icon_name,
                seminar_count,
            })
            .collect())
    }

    pub async fn recent_activities(&self, actor: &Actor) -> Result<RecentActivities> {
        policy::require_view_dashboard(actor)?;

        let (recent_seminars, recent_applications) = futures::try_join!(
            self.store.recent_seminars(RECENT_ACTIVITY_LIMIT),
            self.store.recent_applications(RECENT_ACTIVITY_LIMIT),
        )?;

        Ok(RecentActivities {
            recent_seminars,
            recent_applications,
        })
    }
}
