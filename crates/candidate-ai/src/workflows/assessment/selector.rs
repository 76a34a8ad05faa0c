//! Keyword-driven, randomized question selection.
//!
//! The selection is non-deterministic by design: repeated calls on the
//! same opportunity may pick different items. Tests inject a seeded RNG
//! through `select_with_rng`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::bank::{QuestionBank, BASELINE_CATEGORY, DEFAULT_CATEGORY};
use super::domain::{AssessmentItem, ItemKind};
use crate::workflows::screening::domain::Opportunity;

pub const MULTIPLE_CHOICE_COUNT: usize = 5;
pub const FREE_TEXT_COUNT: usize = 2;
pub const CODE_CHALLENGE_COUNT: usize = 1;

/// Keyword-to-category table applied to the lower-cased title and
/// description. Order is irrelevant; every hit contributes its category.
const KEYWORD_CATEGORIES: &[(&str, &str)] = &[
    ("react", "frontend"),
    ("frontend", "frontend"),
    ("front-end", "frontend"),
    ("javascript", "frontend"),
    ("typescript", "frontend"),
    ("css", "frontend"),
    ("backend", "backend"),
    ("back-end", "backend"),
    ("api", "backend"),
    ("microservice", "backend"),
    ("distributed", "backend"),
    ("rust", "backend"),
    ("golang", "backend"),
    ("java", "backend"),
    ("sql", "data"),
    ("database", "data"),
    ("analytics", "data"),
    ("data", "data"),
    ("machine learning", "data"),
    ("python", "data"),
];

/// Categories matched for an opportunity: the default category always,
/// keyword hits on top, and the baseline category when nothing matched.
pub fn matched_categories(opportunity: &Opportunity) -> Vec<&'static str> {
    let haystack = format!("{} {}", opportunity.title, opportunity.description).to_lowercase();

    let mut categories = vec![DEFAULT_CATEGORY];
    for (keyword, category) in KEYWORD_CATEGORIES {
        if haystack.contains(keyword) && !categories.contains(category) {
            categories.push(category);
        }
    }

    if categories.len() == 1 {
        categories.push(BASELINE_CATEGORY);
    }

    categories
}

/// Select the fixed per-kind counts from the pooled categories using a
/// thread-local RNG.
pub fn select(bank: &QuestionBank, opportunity: &Opportunity) -> Vec<AssessmentItem> {
    select_with_rng(bank, opportunity, &mut rand::thread_rng())
}

/// Deterministic variant: the caller owns the randomness source.
pub fn select_with_rng<R: Rng + ?Sized>(
    bank: &QuestionBank,
    opportunity: &Opportunity,
    rng: &mut R,
) -> Vec<AssessmentItem> {
    let categories = matched_categories(opportunity);
    let mut pool = bank.pooled(&categories);
    pool.shuffle(rng);

    let mut selected = Vec::with_capacity(MULTIPLE_CHOICE_COUNT + FREE_TEXT_COUNT + CODE_CHALLENGE_COUNT);
    for (kind, count) in [
        (ItemKind::MultipleChoice, MULTIPLE_CHOICE_COUNT),
        (ItemKind::FreeText, FREE_TEXT_COUNT),
        (ItemKind::CodeChallenge, CODE_CHALLENGE_COUNT),
    ] {
        selected.extend(
            pool.iter()
                .filter(|item| item.kind == kind)
                .take(count)
                .cloned(),
        );
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::domain::OpportunityId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn opportunity(title: &str, description: &str) -> Opportunity {
        Opportunity {
            id: OpportunityId("opp-1".to_string()),
            title: title.to_string(),
            description: description.to_string(),
            required_skills: Vec::new(),
            duration_minutes: None,
            posted_on: None,
        }
    }

    #[test]
    fn keyword_hits_add_categories_next_to_the_default() {
        let categories = matched_categories(&opportunity(
            "Senior Backend Engineer",
            "Own our REST API and SQL schema.",
        ));
        assert_eq!(categories[0], DEFAULT_CATEGORY);
        assert!(categories.contains(&"backend"));
        assert!(categories.contains(&"data"));
        assert!(!categories.contains(&BASELINE_CATEGORY));
    }

    #[test]
    fn baseline_category_backfills_unmatched_roles() {
        let categories = matched_categories(&opportunity(
            "Office Coordinator",
            "Keep the studio running smoothly.",
        ));
        assert_eq!(categories, vec![DEFAULT_CATEGORY, BASELINE_CATEGORY]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let categories = matched_categories(&opportunity("REACT Developer", ""));
        assert!(categories.contains(&"frontend"));
    }

    #[test]
    fn selection_returns_the_fixed_kind_counts() {
        let bank = QuestionBank::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let items = select_with_rng(&bank, &opportunity("Backend Engineer", "APIs"), &mut rng);

        let count_of = |kind: ItemKind| items.iter().filter(|item| item.kind == kind).count();
        assert_eq!(count_of(ItemKind::MultipleChoice), MULTIPLE_CHOICE_COUNT);
        assert_eq!(count_of(ItemKind::FreeText), FREE_TEXT_COUNT);
        assert_eq!(count_of(ItemKind::CodeChallenge), CODE_CHALLENGE_COUNT);
    }

    #[test]
    fn same_seed_selects_the_same_items() {
        let bank = QuestionBank::standard();
        let opportunity = opportunity("Data Analyst", "SQL and dashboards");

        let first = select_with_rng(&bank, &opportunity, &mut StdRng::seed_from_u64(42));
        let second = select_with_rng(&bank, &opportunity, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_can_differ() {
        let bank = QuestionBank::standard();
        let opportunity = opportunity("Backend Engineer", "distributed systems");

        let first = select_with_rng(&bank, &opportunity, &mut StdRng::seed_from_u64(1));
        let any_difference = (2..30).any(|seed| {
            select_with_rng(&bank, &opportunity, &mut StdRng::seed_from_u64(seed)) != first
        });
        assert!(any_difference, "shuffle never varied across 28 seeds");
    }

    #[test]
    fn selected_items_stay_unique() {
        let bank = QuestionBank::standard();
        let items = select_with_rng(
            &bank,
            &opportunity("Full stack engineer", "react, api, sql"),
            &mut StdRng::seed_from_u64(3),
        );
        let mut ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }
}
