//! Category and choice fetchers plus ordered navigation between categories.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use voting_backend::{Category, Choice, VotingBackend};

use crate::error::AppError;

/// Which audience a choice list is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceView {
    /// Hidden choices excluded.
    Voter,
    /// Everything, for management screens.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            other => Err(AppError::validation(format!(
                "direction must be 'next' or 'previous', got '{other}'"
            ))),
        }
    }
}

/// Stable sort by `order_index`; equal indices keep their input order.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by_key(|c| c.order_index);
}

pub async fn list_categories(backend: &dyn VotingBackend) -> Result<Vec<Category>, AppError> {
    let mut categories = backend.list_categories().await?;
    sort_categories(&mut categories);
    Ok(categories)
}

pub async fn list_choices(
    backend: &dyn VotingBackend,
    category_id: &str,
    view: ChoiceView,
) -> Result<Vec<Choice>, AppError> {
    let include_hidden = view == ChoiceView::Admin;
    let mut choices = backend.list_choices(category_id, include_hidden).await?;
    if !include_hidden {
        choices.retain(|c| !c.hidden);
    }
    choices.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(choices)
}

/// The choice as a voter may pick it: belonging to `category_id` and not hidden.
pub async fn voter_choice(
    backend: &dyn VotingBackend,
    category_id: &str,
    choice_id: &str,
) -> Result<Choice, AppError> {
    list_choices(backend, category_id, ChoiceView::Voter)
        .await?
        .into_iter()
        .find(|c| c.id == choice_id)
        .ok_or_else(|| AppError::not_found(format!("choice {choice_id} in category {category_id}")))
}

/// Nearest category with a strictly greater (`Next`) or strictly lesser
/// (`Previous`) `order_index`.
///
/// Among equal candidate indices `Next` takes the first in stable order and
/// `Previous` the last, so walking back and forth is consistent.
pub fn adjacent<'a>(
    categories: &'a [Category],
    category_id: &str,
    direction: Direction,
) -> Result<Option<&'a Category>, AppError> {
    let current = categories
        .iter()
        .find(|c| c.id == category_id)
        .ok_or_else(|| AppError::not_found(format!("category {category_id}")))?;

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|c| c.order_index);

    let found = match direction {
        Direction::Next => ordered
            .into_iter()
            .find(|c| c.order_index > current.order_index),
        Direction::Previous => ordered
            .into_iter()
            .rev()
            .find(|c| c.order_index < current.order_index),
    };
    Ok(found)
}

/// Like [`adjacent`], but skips disabled categories.
pub fn adjacent_open<'a>(
    categories: &'a [Category],
    category_id: &str,
    direction: Direction,
) -> Result<Option<&'a Category>, AppError> {
    let mut cursor = adjacent(categories, category_id, direction)?;
    while let Some(candidate) = cursor {
        if candidate.is_enabled() {
            return Ok(Some(candidate));
        }
        cursor = adjacent(categories, &candidate.id, direction)?;
    }
    Ok(None)
}

pub async fn get_adjacent_category(
    backend: &dyn VotingBackend,
    category_id: &str,
    direction: Direction,
) -> Result<Option<Category>, AppError> {
    let categories = list_categories(backend).await?;
    Ok(adjacent(&categories, category_id, direction)?.cloned())
}

/// The next enabled category after `category_id`, skipping closed ones.
pub async fn next_open_category(
    backend: &dyn VotingBackend,
    category_id: &str,
) -> Result<Option<Category>, AppError> {
    let categories = list_categories(backend).await?;
    Ok(adjacent_open(&categories, category_id, Direction::Next)?.cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeBackend, category, choice};
    use voting_backend::CategoryStatus::{Disabled, Enabled};

    fn three() -> Vec<Category> {
        vec![
            category("c1", 0, Enabled),
            category("c2", 1, Enabled),
            category("c3", 2, Enabled),
        ]
    }

    fn ids(found: Option<&Category>) -> Option<&str> {
        found.map(|c| c.id.as_str())
    }

    #[test]
    fn scenario_next_and_previous_boundaries() {
        let cats = three();
        assert_eq!(ids(adjacent(&cats, "c2", Direction::Next).unwrap()), Some("c3"));
        assert_eq!(ids(adjacent(&cats, "c2", Direction::Previous).unwrap()), Some("c1"));
        assert_eq!(ids(adjacent(&cats, "c1", Direction::Previous).unwrap()), None);
        assert_eq!(ids(adjacent(&cats, "c3", Direction::Next).unwrap()), None);
    }

    #[test]
    fn adjacency_is_antisymmetric_with_gaps_and_shuffled_input() {
        let cats = vec![
            category("d", 40, Enabled),
            category("a", -5, Enabled),
            category("c", 17, Disabled),
            category("b", 3, Enabled),
        ];
        for cat in &cats {
            if let Some(next) = adjacent(&cats, &cat.id, Direction::Next).unwrap() {
                let back = adjacent(&cats, &next.id, Direction::Previous).unwrap();
                assert_eq!(ids(back), Some(cat.id.as_str()));
                assert!(
                    !cats
                        .iter()
                        .any(|o| o.order_index > cat.order_index && o.order_index < next.order_index)
                );
            }
        }
    }

    #[test]
    fn unknown_category_is_not_found() {
        let err = adjacent(&three(), "zzz", Direction::Next).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn equal_indices_break_ties_by_input_order() {
        let cats = vec![
            category("a", 0, Enabled),
            category("b1", 1, Enabled),
            category("b2", 1, Enabled),
            category("c", 2, Enabled),
        ];
        assert_eq!(ids(adjacent(&cats, "a", Direction::Next).unwrap()), Some("b1"));
        assert_eq!(ids(adjacent(&cats, "c", Direction::Previous).unwrap()), Some("b2"));
    }

    #[test]
    fn open_navigation_skips_disabled() {
        let cats = vec![
            category("c1", 0, Enabled),
            category("c2", 1, Disabled),
            category("c3", 2, Enabled),
            category("c4", 3, Disabled),
        ];
        assert_eq!(ids(adjacent_open(&cats, "c1", Direction::Next).unwrap()), Some("c3"));
        assert_eq!(ids(adjacent_open(&cats, "c3", Direction::Previous).unwrap()), Some("c1"));
        assert_eq!(ids(adjacent_open(&cats, "c3", Direction::Next).unwrap()), None);
    }

    #[test]
    fn direction_parses_from_path() {
        assert_eq!("next".parse::<Direction>().unwrap(), Direction::Next);
        assert_eq!("previous".parse::<Direction>().unwrap(), Direction::Previous);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[tokio::test]
    async fn list_categories_sorts_stably() {
        let backend = FakeBackend::new().with_categories(vec![
            category("late", 5, Enabled),
            category("tie1", 1, Enabled),
            category("early", 0, Enabled),
            category("tie2", 1, Enabled),
        ]);
        let ids: Vec<String> = list_categories(&backend)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["early", "tie1", "tie2", "late"]);
    }

    #[tokio::test]
    async fn voter_view_excludes_hidden_choices() {
        let backend = FakeBackend::new().with_choices(vec![
            choice("o2", "c1", "Zed", false),
            choice("o1", "c1", "Amy", false),
            choice("o3", "c1", "Hidden", true),
            choice("o4", "c2", "Other", false),
        ]);

        let voter = list_choices(&backend, "c1", ChoiceView::Voter).await.unwrap();
        let names: Vec<&str> = voter.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Amy", "Zed"]);

        let admin = list_choices(&backend, "c1", ChoiceView::Admin).await.unwrap();
        assert_eq!(admin.len(), 3);
    }

    #[tokio::test]
    async fn voter_choice_rejects_hidden_foreign_and_unknown() {
        let backend = FakeBackend::new().with_choices(vec![
            choice("o1", "c1", "Amy", false),
            choice("o3", "c1", "Hidden", true),
            choice("o4", "c2", "Other", false),
        ]);

        assert_eq!(voter_choice(&backend, "c1", "o1").await.unwrap().name, "Amy");
        for id in ["o3", "o4", "nope"] {
            let err = voter_choice(&backend, "c1", id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "{id}");
        }
    }

    #[tokio::test]
    async fn next_open_category_queries_backend() {
        let backend = FakeBackend::new().with_categories(vec![
            category("c1", 0, Enabled),
            category("c2", 1, Disabled),
            category("c3", 2, Enabled),
        ]);
        let next = next_open_category(&backend, "c1").await.unwrap();
        assert_eq!(next.map(|c| c.id), Some("c3".to_string()));

        let prev = get_adjacent_category(&backend, "c3", Direction::Previous)
            .await
            .unwrap();
        assert_eq!(prev.map(|c| c.id), Some("c2".to_string()));
    }

    #[tokio::test]
    async fn backend_failure_is_network_error() {
        let backend = FakeBackend::new();
        backend.fail_reads(true);
        let err = list_categories(&backend).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
