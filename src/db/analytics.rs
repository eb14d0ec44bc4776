use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::contact_requests::{self, ContactStatus};
use crate::models::profile_views::{self, NewProfileView, ProfileViewResponse};
use crate::models::{search_queries, users};

/// Most rows returned by the view history.
pub const VIEW_HISTORY_LIMIT: u64 = 100;

pub async fn insert_profile_view(
    db: &DatabaseConnection,
    input: NewProfileView,
) -> Result<profile_views::Model, DbErr> {
    let view = profile_views::ActiveModel {
        id: Set(Uuid::new_v4()),
        freelancer_id: Set(input.freelancer_id),
        viewer_id: Set(input.viewer_id),
        ip_address: Set(input.ip_address),
        user_agent: Set(input.user_agent),
        referrer: Set(input.referrer),
        viewed_at: Set(Utc::now()),
    };

    view.insert(db).await
}

/// View timestamps for a freelancer since `since`.
pub async fn view_times_since(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>, DbErr> {
    Ok(profile_views::Entity::find()
        .filter(profile_views::Column::FreelancerId.eq(freelancer_id))
        .filter(profile_views::Column::ViewedAt.gte(since))
        .all(db)
        .await?
        .into_iter()
        .map(|v| v.viewed_at)
        .collect())
}

/// Latest views since `since` with the viewer's email, newest first.
pub async fn view_history(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<ProfileViewResponse>, DbErr> {
    let views = profile_views::Entity::find()
        .filter(profile_views::Column::FreelancerId.eq(freelancer_id))
        .filter(profile_views::Column::ViewedAt.gte(since))
        .order_by_desc(profile_views::Column::ViewedAt)
        .limit(VIEW_HISTORY_LIMIT)
        .all(db)
        .await?;

    let viewer_ids: Vec<Uuid> = views.iter().filter_map(|v| v.viewer_id).collect();
    let emails: std::collections::HashMap<Uuid, String> = if viewer_ids.is_empty() {
        Default::default()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(viewer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.email))
            .collect()
    };

    Ok(views
        .into_iter()
        .map(|v| ProfileViewResponse {
            id: v.id,
            viewer_email: v.viewer_id.and_then(|id| emails.get(&id).cloned()),
            ip_address: v.ip_address,
            referrer: v.referrer,
            viewed_at: v.viewed_at,
        })
        .collect())
}

/// Inquiry totals by status: (total, pending, accepted, declined).
pub async fn inquiry_counts(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<(u64, u64, u64, u64), DbErr> {
    let statuses: Vec<ContactStatus> = contact_requests::Entity::find()
        .filter(contact_requests::Column::FreelancerId.eq(freelancer_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.status)
        .collect();

    let count = |s: ContactStatus| statuses.iter().filter(|&&x| x == s).count() as u64;
    Ok((
        statuses.len() as u64,
        count(ContactStatus::Pending),
        count(ContactStatus::Accepted),
        count(ContactStatus::Declined),
    ))
}

pub async fn log_search_query(
    db: &DatabaseConnection,
    query: &str,
    results_count: usize,
    user_id: Option<Uuid>,
) -> Result<(), DbErr> {
    search_queries::ActiveModel {
        id: Set(Uuid::new_v4()),
        query: Set(query.chars().take(255).collect()),
        results_count: Set(i32::try_from(results_count).unwrap_or(i32::MAX)),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Bucket view timestamps into the last `days` calendar days (UTC), today included.
///
/// Every day in the window is present, zero when there were no views.
pub fn views_by_day(
    viewed_at: &[DateTime<Utc>],
    now: DateTime<Utc>,
    days: i64,
) -> BTreeMap<String, u64> {
    let mut buckets: BTreeMap<String, u64> = (0..days)
        .map(|i| ((now - Duration::days(i)).date_naive().to_string(), 0))
        .collect();

    for ts in viewed_at {
        if let Some(count) = buckets.get_mut(&ts.date_naive().to_string()) {
            *count += 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn buckets_cover_the_whole_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let views = vec![
            Utc.with_ymd_and_hms(2025, 6, 1, 1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 30, 8, 0, 0).unwrap(),
            // outside the window
            Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap(),
        ];

        let buckets = views_by_day(&views, now, 30);

        assert_eq!(buckets.len(), 30);
        assert_eq!(buckets["2025-06-01"], 2);
        assert_eq!(buckets["2025-05-30"], 1);
        assert_eq!(buckets["2025-05-31"], 0);
        assert!(buckets.contains_key("2025-05-03"));
        assert!(!buckets.contains_key("2025-05-02"));
        assert_eq!(buckets.values().sum::<u64>(), 3);
    }
}
