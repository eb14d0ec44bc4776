use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, CreateReview, ReviewResponse};
use crate::models::users;

pub async fn find_pair(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    reviewer_id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::FreelancerId.eq(freelancer_id))
        .filter(reviews::Column::ReviewerId.eq(reviewer_id))
        .one(db)
        .await
}

pub async fn insert_review(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    reviewer_id: Uuid,
    input: CreateReview,
) -> Result<reviews::Model, DbErr> {
    let now = Utc::now();
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        freelancer_id: Set(freelancer_id),
        reviewer_id: Set(reviewer_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        is_verified: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_review.insert(db).await
}

pub async fn get_review_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find_by_id(id).one(db).await
}

/// Reviews of a freelancer with the reviewer's username, newest first.
pub async fn list_for_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<ReviewResponse>, DbErr> {
    let rows = reviews::Entity::find()
        .find_also_related(users::Entity)
        .filter(reviews::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(review, reviewer)| ReviewResponse {
            review,
            reviewer_username: reviewer.map(|u| u.username).unwrap_or_default(),
        })
        .collect())
}

/// Reviews written by a user, newest first.
pub async fn list_by_reviewer(
    db: &DatabaseConnection,
    reviewer_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::ReviewerId.eq(reviewer_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn delete_review(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    reviews::Entity::delete_by_id(id).exec(db).await
}

/// Average rating and review count for many freelancers in one query.
///
/// Freelancers without reviews are absent from the map.
pub async fn stats_for(
    db: &DatabaseConnection,
    freelancer_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, (f64, u64)>, DbErr> {
    if freelancer_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = reviews::Entity::find()
        .filter(reviews::Column::FreelancerId.is_in(freelancer_ids))
        .all(db)
        .await?;

    Ok(aggregate_ratings(
        rows.iter().map(|r| (r.freelancer_id, r.rating)),
    ))
}

fn aggregate_ratings(ratings: impl Iterator<Item = (Uuid, i32)>) -> HashMap<Uuid, (f64, u64)> {
    let mut totals: HashMap<Uuid, (i64, u64)> = HashMap::new();
    for (freelancer_id, rating) in ratings {
        let entry = totals.entry(freelancer_id).or_insert((0, 0));
        entry.0 += i64::from(rating);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(id, (sum, count))| (id, (sum as f64 / count as f64, count)))
        .collect()
}

/// Average of a slice of ratings, 0.0 when empty.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_per_freelancer() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let stats = aggregate_ratings(vec![(a, 5), (b, 3), (a, 4)].into_iter());

        assert_eq!(stats[&a], (4.5, 2));
        assert_eq!(stats[&b], (3.0, 1));
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[4, 5, 5]), 14.0 / 3.0);
    }
}
