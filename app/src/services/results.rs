//! Per-category vote aggregation for the admin results screen.

use serde::Serialize;
use voting_backend::{Category, ChoiceTally, VotingBackend};

use crate::error::AppError;
use crate::services::catalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceResult {
    pub choice_id: String,
    pub choice_name: String,
    pub image_ref: String,
    pub hidden: bool,
    pub votes: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub category_id: String,
    pub category_name: String,
    pub order_index: i64,
    pub total_votes: i64,
    /// Sorted by votes descending; ties keep backend order.
    pub choices: Vec<ChoiceResult>,
    pub winner: Option<ChoiceResult>,
}

/// Build the result of one category from its tally rows.
///
/// Rigged categories report each choice's `rigged_vote_count` instead of
/// the counted votes.
pub fn category_result(category: &Category, tallies: &[ChoiceTally]) -> CategoryResult {
    let counted: Vec<(&ChoiceTally, i64)> = tallies
        .iter()
        .filter(|t| t.category_id == category.id)
        .map(|t| {
            let votes = if category.rigged {
                t.rigged_vote_count
            } else {
                t.vote_count
            };
            (t, votes.max(0))
        })
        .collect();

    let total_votes: i64 = counted.iter().map(|(_, v)| v).sum();

    let mut choices: Vec<ChoiceResult> = counted
        .into_iter()
        .map(|(t, votes)| ChoiceResult {
            choice_id: t.choice_id.clone(),
            choice_name: t.choice_name.clone(),
            image_ref: t.image_ref.clone(),
            hidden: t.hidden,
            votes,
            percentage: percentage(votes, total_votes),
        })
        .collect();
    // Stable: equal counts keep input order.
    choices.sort_by(|a, b| b.votes.cmp(&a.votes));

    CategoryResult {
        category_id: category.id.clone(),
        category_name: category.name.clone(),
        order_index: category.order_index,
        total_votes,
        winner: choices.first().cloned(),
        choices,
    }
}

/// One result per category, in category order, including empty ones.
pub fn aggregate(categories: &[Category], tallies: &[ChoiceTally]) -> Vec<CategoryResult> {
    let mut ordered = categories.to_vec();
    catalog::sort_categories(&mut ordered);
    ordered
        .iter()
        .map(|category| category_result(category, tallies))
        .collect()
}

fn percentage(votes: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    votes as f64 / total as f64 * 100.0
}

pub async fn get_results(backend: &dyn VotingBackend) -> Result<Vec<CategoryResult>, AppError> {
    let categories = backend.list_categories().await?;
    let tallies = backend.fetch_results().await?;
    Ok(aggregate(&categories, &tallies))
}

pub async fn get_category_results(
    backend: &dyn VotingBackend,
    category_id: &str,
) -> Result<CategoryResult, AppError> {
    let category = backend
        .get_category(category_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("category {category_id}")))?;
    let tallies = backend.fetch_category_results(category_id).await?;
    Ok(category_result(&category, &tallies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeBackend, category, tally};
    use voting_backend::CategoryStatus::Enabled;

    #[test]
    fn scenario_three_to_one() {
        let cat = category("c1", 0, Enabled);
        let result = category_result(
            &cat,
            &[tally("c1", "o1", "One", 3), tally("c1", "o2", "Two", 1)],
        );
        assert_eq!(result.total_votes, 4);
        assert_eq!(result.choices[0].choice_id, "o1");
        assert_eq!(result.choices[0].percentage, 75.0);
        assert_eq!(result.choices[1].percentage, 25.0);
        assert_eq!(result.winner.as_ref().map(|w| w.choice_id.as_str()), Some("o1"));
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let cat = category("c1", 0, Enabled);
        let result = category_result(
            &cat,
            &[
                tally("c1", "a", "A", 1),
                tally("c1", "b", "B", 1),
                tally("c1", "c", "C", 1),
            ],
        );
        let sum: f64 = result.choices.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let cat = category("c1", 0, Enabled);
        let result = category_result(
            &cat,
            &[tally("c1", "a", "A", 0), tally("c1", "b", "B", 0)],
        );
        assert!(result.choices.iter().all(|c| c.percentage == 0.0));
        assert_eq!(result.total_votes, 0);
    }

    #[test]
    fn ties_keep_input_order() {
        let cat = category("c1", 0, Enabled);
        let result = category_result(
            &cat,
            &[
                tally("c1", "first", "F", 2),
                tally("c1", "low", "L", 1),
                tally("c1", "second", "S", 2),
            ],
        );
        let ids: Vec<&str> = result.choices.iter().map(|c| c.choice_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "low"]);
        assert_eq!(result.winner.unwrap().choice_id, "first");
    }

    #[test]
    fn empty_category_has_no_winner() {
        let cats = vec![category("c2", 1, Enabled), category("c1", 0, Enabled)];
        let results = aggregate(&cats, &[tally("c2", "o", "O", 5)]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].category_id, "c1");
        assert!(results[0].choices.is_empty());
        assert!(results[0].winner.is_none());
        assert_eq!(results[1].choices[0].percentage, 100.0);
    }

    #[test]
    fn rigged_category_uses_rigged_counts() {
        let mut cat = category("c1", 0, Enabled);
        cat.rigged = true;
        let mut a = tally("c1", "a", "A", 10);
        a.rigged_vote_count = 1;
        let mut b = tally("c1", "b", "B", 0);
        b.rigged_vote_count = 3;

        let result = category_result(&cat, &[a, b]);
        assert_eq!(result.winner.unwrap().choice_id, "b");
        assert_eq!(result.total_votes, 4);
    }

    #[tokio::test]
    async fn get_results_reads_backend() {
        let backend = FakeBackend::new()
            .with_categories(vec![category("c1", 0, Enabled)])
            .with_tallies(vec![tally("c1", "o1", "One", 3), tally("c1", "o2", "Two", 1)]);

        let all = get_results(&backend).await.unwrap();
        assert_eq!(all[0].choices[0].percentage, 75.0);

        let one = get_category_results(&backend, "c1").await.unwrap();
        assert_eq!(one.total_votes, 4);

        let missing = get_category_results(&backend, "nope").await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }
}
