// src/services/analytics_service.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{
    analytics::ReviewAnalytics,
    review::{Review, ReviewStatus, ReviewType},
};

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

/// Agrega um conjunto de avaliações. `now` é capturado uma vez pelo chamador
/// e vale para as três janelas de tempo.
pub fn summarize(reviews: &[Review], now: DateTime<Utc>) -> ReviewAnalytics {
    // Todas as chaves presentes, mesmo zeradas
    let mut rating_distribution: BTreeMap<String, usize> =
        (1..=5).map(|r: u8| (r.to_string(), 0)).collect();
    let mut reviews_by_type: BTreeMap<String, usize> = ReviewType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();
    let mut reviews_by_status: BTreeMap<String, usize> = ReviewStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();

    let mut rating_sum: u64 = 0;
    let (mut today, mut this_week, mut this_month) = (0, 0, 0);
    let today_date = now.date_naive();

    for review in reviews {
        rating_sum += u64::from(review.rating);

        if let Some(count) = rating_distribution.get_mut(&review.rating.to_string()) {
            *count += 1;
        }
        *reviews_by_type
            .entry(review.review_type.as_str().to_string())
            .or_default() += 1;
        *reviews_by_status
            .entry(review.status.as_str().to_string())
            .or_default() += 1;

        let age_days = (now - review.created_at).num_days();
        if review.created_at.date_naive() == today_date {
            today += 1;
        }
        if age_days <= WEEK_DAYS {
            this_week += 1;
        }
        if age_days <= MONTH_DAYS {
            this_month += 1;
        }
    }

    let total_reviews = reviews.len();
    let average_rating = if total_reviews == 0 {
        0.0
    } else {
        rating_sum as f64 / total_reviews as f64
    };

    ReviewAnalytics {
        total_reviews,
        average_rating,
        rating_distribution,
        reviews_by_type,
        reviews_by_status,
        generated_today: today,
        generated_this_week: this_week,
        generated_this_month: this_month,
    }
}
