use crate::catalog::Skill;
use std::fmt;

/// Category filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Slug(String),
}

impl Category {
    pub fn from_slug(slug: &str) -> Self {
        if slug.eq_ignore_ascii_case("all") {
            Category::All
        } else {
            Category::Slug(slug.to_string())
        }
    }

    pub fn matches(&self, skill: &Skill) -> bool {
        match self {
            Category::All => true,
            Category::Slug(slug) => skill.category_slug == *slug,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str("all"),
            Category::Slug(slug) => f.write_str(slug),
        }
    }
}

/// One category filter control: the slug it selects and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTag {
    pub category: Category,
    pub label: String,
}

/// Current search term and category. Lives for the session, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub search_term: String,
    pub active_category: Category,
}

impl ViewState {
    pub fn apply<'a>(&self, items: &'a [Skill]) -> Vec<&'a Skill> {
        filter_skills(items, &self.search_term, &self.active_category)
    }
}

/// Case-insensitive substring match against name, description or any tag.
/// `term` must already be lowercase.
fn matches_search(skill: &Skill, term: &str) -> bool {
    skill.name.to_lowercase().contains(term)
        || skill.description.to_lowercase().contains(term)
        || skill.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

/// Return the skills matching both the search term and the category, in
/// catalog order.
pub fn filter_skills<'a>(items: &'a [Skill], search_term: &str, category: &Category) -> Vec<&'a Skill> {
    let term = search_term.to_lowercase();
    items
        .iter()
        .filter(|skill| matches_search(skill, &term) && category.matches(skill))
        .collect()
}

/// Category controls for a catalog: "all" first, then each distinct slug in
/// order of first appearance.
pub fn categories_of(items: &[Skill]) -> Vec<CategoryTag> {
    let mut tags = vec![CategoryTag {
        category: Category::All,
        label: "All".to_string(),
    }];
    for skill in items {
        let category = Category::from_slug(&skill.category_slug);
        if !tags.iter().any(|t| t.category == category) {
            tags.push(CategoryTag {
                category,
                label: skill.category.clone(),
            });
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skill(name: &str, slug: &str, description: &str, tags: &[&str]) -> Skill {
        Skill {
            name: name.to_string(),
            category: slug.to_uppercase(),
            category_slug: slug.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_git_helper_matches_name_and_tag() {
        let catalog = vec![Skill {
            name: "Git Helper".to_string(),
            category: "Dev".to_string(),
            category_slug: "dev".to_string(),
            description: "Helps with git".to_string(),
            tags: vec!["git".to_string(), "vcs".to_string()],
        }];
        let result = filter_skills(&catalog, "git", &Category::All);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Git Helper");

        assert!(filter_skills(&catalog, "zzz", &Category::All).is_empty());
    }

    #[test]
    fn test_category_filter() {
        let catalog = vec![
            skill("Linter", "dev", "Lints code", &[]),
            skill("Essay Coach", "writing", "Improves prose", &[]),
        ];
        let result = filter_skills(&catalog, "", &Category::from_slug("dev"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Linter");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = vec![skill("PDF Tools", "docs", "Merge documents", &["Acrobat"])];
        assert_eq!(filter_skills(&catalog, "pdf", &Category::All).len(), 1);
        assert_eq!(filter_skills(&catalog, "MERGE", &Category::All).len(), 1);
        assert_eq!(filter_skills(&catalog, "acro", &Category::All).len(), 1);
    }

    #[test]
    fn test_search_and_category_are_conjunctive() {
        let catalog = vec![
            skill("Git Helper", "dev", "Helps with git", &["git"]),
            skill("Git Poetry", "writing", "Commit haiku", &["git"]),
        ];
        let result = filter_skills(&catalog, "git", &Category::from_slug("writing"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Git Poetry");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(filter_skills(&[], "", &Category::All).is_empty());
        assert!(filter_skills(&[], "x", &Category::from_slug("dev")).is_empty());
    }

    #[test]
    fn test_category_from_slug_all() {
        assert_eq!(Category::from_slug("all"), Category::All);
        assert_eq!(Category::from_slug("dev"), Category::Slug("dev".to_string()));
        assert_eq!(Category::All.to_string(), "all");
    }

    #[test]
    fn test_categories_of_first_appearance_order() {
        let catalog = vec![
            skill("a", "writing", "", &[]),
            skill("b", "dev", "", &[]),
            skill("c", "writing", "", &[]),
        ];
        let tags = categories_of(&catalog);
        let slugs: Vec<String> = tags.iter().map(|t| t.category.to_string()).collect();
        assert_eq!(slugs, vec!["all", "writing", "dev"]);
        assert_eq!(tags[1].label, "WRITING");
    }

    #[test]
    fn test_view_state_default() {
        let state = ViewState::default();
        assert!(state.search_term.is_empty());
        assert_eq!(state.active_category, Category::All);
    }

    fn arb_skill() -> impl Strategy<Value = Skill> {
        (
            "[a-zA-Z ]{1,12}",
            prop::sample::select(vec!["dev", "writing", "data"]),
            "[a-zA-Z ]{0,20}",
            prop::collection::vec("[a-zA-Z]{1,6}", 0..4),
        )
            .prop_map(|(name, slug, description, tags)| Skill {
                name,
                category: slug.to_uppercase(),
                category_slug: slug.to_string(),
                description,
                tags,
            })
    }

    fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(vec!["all", "dev", "writing", "data", "none"]).prop_map(Category::from_slug)
    }

    proptest! {
        #[test]
        fn prop_result_is_ordered_subsequence(
            catalog in prop::collection::vec(arb_skill(), 0..20),
            term in "[a-zA-Z]{0,3}",
            category in arb_category(),
        ) {
            let result = filter_skills(&catalog, &term, &category);
            let mut cursor = 0;
            for picked in &result {
                let pos = catalog[cursor..]
                    .iter()
                    .position(|s| std::ptr::eq(s, *picked));
                prop_assert!(pos.is_some());
                cursor += pos.unwrap() + 1;
            }
        }

        #[test]
        fn prop_empty_term_all_is_identity(catalog in prop::collection::vec(arb_skill(), 0..20)) {
            let result = filter_skills(&catalog, "", &Category::All);
            let cloned: Vec<Skill> = result.into_iter().cloned().collect();
            prop_assert_eq!(cloned, catalog);
        }

        #[test]
        fn prop_inclusion_matches_predicate(
            catalog in prop::collection::vec(arb_skill(), 0..20),
            term in "[a-zA-Z]{0,3}",
            category in arb_category(),
        ) {
            let result = filter_skills(&catalog, &term, &category);
            let lower = term.to_lowercase();
            for skill in &catalog {
                let expected = matches_search(skill, &lower) && category.matches(skill);
                let included = result.iter().any(|s| std::ptr::eq(*s, skill));
                prop_assert_eq!(expected, included);
            }
        }

        #[test]
        fn prop_filter_is_idempotent(
            catalog in prop::collection::vec(arb_skill(), 0..20),
            term in "[a-zA-Z]{0,3}",
            category in arb_category(),
        ) {
            let once: Vec<Skill> = filter_skills(&catalog, &term, &category).into_iter().cloned().collect();
            let twice: Vec<Skill> = filter_skills(&once, &term, &category).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }
    }
}
