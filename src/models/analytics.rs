// src/models/analytics.rs

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

// Resumo das avaliações (os cards do painel)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAnalytics {
    pub total_reviews: usize,
    pub average_rating: f64,
    // Chaves "1".."5", sempre presentes
    pub rating_distribution: BTreeMap<String, usize>,
    pub reviews_by_type: BTreeMap<String, usize>,
    pub reviews_by_status: BTreeMap<String, usize>,
    pub generated_today: usize,
    pub generated_this_week: usize,
    pub generated_this_month: usize,
}
