//! Filter expressions over course record attributes.
//!
//! A [`Filter`] is the condition handed to a [`RecordStore`](crate::store::RecordStore)
//! scan. Stores evaluate it per item with [`Filter::matches`] (or translate it into
//! their native condition language); [`PredicateBuilder`] assembles the search filter
//! from query terms and an optional difficulty facet.

use crate::search::tokenize::Terms;
use crate::types::{ACTIVE_FLAG, CourseRecord, RETIRED_FLAG};
use serde::Deserialize;
use std::fmt;

/// Record attributes a filter can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Name,
    Description,
    Difficulty,
    ClassFlag,
}

impl Attribute {
    /// Attribute name as stored.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Difficulty => "difficulty",
            Self::ClassFlag => "class_flag",
        }
    }
}

/// A comparison operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Number(i64),
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Boolean condition evaluated by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Equals(Attribute, Operand),
    /// True when the attribute differs from the operand, including when it is absent.
    NotEquals(Attribute, Operand),
    NotExists(Attribute),
    /// Exact substring containment.
    Contains(Attribute, String),
    /// Substring containment after lower-casing both sides. The needle is stored lower-cased.
    ContainsFolded(Attribute, String),
}

impl Filter {
    /// Evaluates the filter against a record.
    pub fn matches(&self, record: &CourseRecord) -> bool {
        match self {
            Self::And(filters) => filters.iter().all(|f| f.matches(record)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(record)),
            Self::Equals(attribute, operand) => {
                attribute_value(record, *attribute).is_some_and(|value| value == *operand)
            }
            Self::NotEquals(attribute, operand) => {
                attribute_value(record, *attribute).is_none_or(|value| value != *operand)
            }
            Self::NotExists(attribute) => attribute_value(record, *attribute).is_none(),
            Self::Contains(attribute, needle) => match attribute_value(record, *attribute) {
                Some(Operand::Text(text)) => text.contains(needle.as_str()),
                _ => false,
            },
            Self::ContainsFolded(attribute, needle) => match attribute_value(record, *attribute) {
                Some(Operand::Text(text)) => text.to_lowercase().contains(needle.as_str()),
                _ => false,
            },
        }
    }

    /// Number of leaf conditions in the expression.
    pub fn condition_count(&self) -> usize {
        match self {
            Self::And(filters) | Self::Or(filters) => {
                filters.iter().map(Self::condition_count).sum()
            }
            _ => 1,
        }
    }
}

fn attribute_value(record: &CourseRecord, attribute: Attribute) -> Option<Operand> {
    match attribute {
        Attribute::Name => Some(Operand::Text(record.name.clone())),
        Attribute::Description => Some(Operand::Text(record.description.clone())),
        Attribute::Difficulty => record.difficulty.clone().map(Operand::Text),
        Attribute::ClassFlag => record.class_flag.map(Operand::Number),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(filters) => write_joined(f, filters, " AND "),
            Self::Or(filters) => {
                f.write_str("(")?;
                write_joined(f, filters, " OR ")?;
                f.write_str(")")
            }
            Self::Equals(attribute, operand) => write!(f, "{} = {}", attribute.as_str(), operand),
            Self::NotEquals(attribute, operand) => {
                write!(f, "{} <> {}", attribute.as_str(), operand)
            }
            Self::NotExists(attribute) => write!(f, "attribute_not_exists({})", attribute.as_str()),
            Self::Contains(attribute, needle) => {
                write!(f, "contains({}, {:?})", attribute.as_str(), needle)
            }
            Self::ContainsFolded(attribute, needle) => {
                write!(f, "contains(lower({}), {:?})", attribute.as_str(), needle)
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, filters: &[Filter], separator: &str) -> fmt::Result {
    for (idx, filter) in filters.iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", filter)?;
    }
    Ok(())
}

/// How term containment is expressed to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMatching {
    /// Fold both sides to lower case. Exact case-insensitive containment.
    #[default]
    Folded,
    /// OR together exact containment of the term as given and its lower, upper and
    /// title-case variants. For stores that cannot fold case.
    ///
    /// Known limitation: mixed-case text matching none of the variants is missed,
    /// e.g. "docker" does not find "DocKer" and "mcafee" does not find "McAfee".
    Variants,
}

/// Builds the search filter from query terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateBuilder {
    case_matching: CaseMatching,
}

impl PredicateBuilder {
    pub const fn new(case_matching: CaseMatching) -> Self {
        Self { case_matching }
    }

    /// `class_flag <> RETIRED AND (class_flag = ACTIVE OR attribute_not_exists(class_flag))`
    pub fn active() -> Filter {
        Filter::And(active_clauses())
    }

    /// Conditions matching `term` in the name or the description, in any case.
    pub fn term_match(&self, term: &str) -> Vec<Filter> {
        let mut conditions = Vec::new();
        for attribute in [Attribute::Name, Attribute::Description] {
            match self.case_matching {
                CaseMatching::Folded => {
                    conditions.push(Filter::ContainsFolded(attribute, term.to_lowercase()));
                }
                CaseMatching::Variants => {
                    for variant in case_variants(term) {
                        conditions.push(Filter::Contains(attribute, variant));
                    }
                }
            }
        }
        conditions
    }

    /// `active AND (termMatch(t1) OR termMatch(t2) ...) [AND difficulty = facet]`
    ///
    /// With no terms the term clause is omitted and the filter degenerates to
    /// [`PredicateBuilder::active`]; callers are expected to skip the scan instead.
    pub fn build(&self, terms: &Terms, difficulty: Option<&str>) -> Filter {
        let mut clauses = active_clauses();

        let term_conditions: Vec<Filter> =
            terms.iter().flat_map(|term| self.term_match(term)).collect();
        if !term_conditions.is_empty() {
            clauses.push(Filter::Or(term_conditions));
        }

        if let Some(facet) = difficulty {
            clauses.push(Filter::Equals(
                Attribute::Difficulty,
                Operand::Text(facet.to_string()),
            ));
        }

        Filter::And(clauses)
    }
}

fn active_clauses() -> Vec<Filter> {
    vec![
        Filter::NotEquals(Attribute::ClassFlag, Operand::Number(RETIRED_FLAG)),
        Filter::Or(vec![
            Filter::Equals(Attribute::ClassFlag, Operand::Number(ACTIVE_FLAG)),
            Filter::NotExists(Attribute::ClassFlag),
        ]),
    ]
}

/// The term as given plus its lower, upper and title-case forms, deduplicated in that order.
fn case_variants(term: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::with_capacity(4);
    for variant in [
        term.to_string(),
        term.to_lowercase(),
        term.to_uppercase(),
        title_case(term),
    ] {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

/// Upper-cases the first letter of each alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tokenize::tokenize_query;
    use assert2::check;
    use rstest::rstest;

    fn course(name: &str, description: &str, flag: Option<i64>) -> CourseRecord {
        CourseRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: description.to_string(),
            class_flag: flag,
            ..CourseRecord::default()
        }
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(ACTIVE_FLAG), true)]
    #[case(Some(RETIRED_FLAG), false)]
    #[case(Some(7), false)]
    fn active_filter_follows_flag(#[case] flag: Option<i64>, #[case] expected: bool) {
        check!(PredicateBuilder::active().matches(&course("Any", "", flag)) == expected);
    }

    #[rstest]
    #[case("Intro to Docker")]
    #[case("DOCKER deep dive")]
    #[case("docker for beginners")]
    fn variants_match_canonical_casings(#[case] title: &str) {
        let builder = PredicateBuilder::new(CaseMatching::Variants);
        let filter = builder.build(&tokenize_query(Some("docker")), None);
        check!(filter.matches(&course(title, "", None)));
    }

    #[test]
    fn variants_miss_mixed_case() {
        let builder = PredicateBuilder::new(CaseMatching::Variants);
        let filter = builder.build(&tokenize_query(Some("docker")), None);
        check!(!filter.matches(&course("DocKer internals", "", None)));
    }

    #[rstest]
    #[case("DocKer internals")]
    #[case("McAfee and docker")]
    #[case("DOCKER")]
    fn folded_matches_any_casing(#[case] title: &str) {
        let builder = PredicateBuilder::new(CaseMatching::Folded);
        let filter = builder.build(&tokenize_query(Some("Docker")), None);
        check!(filter.matches(&course(title, "", None)));
    }

    #[test]
    fn term_may_match_description_only() {
        let filter = PredicateBuilder::default().build(&tokenize_query(Some("kubernetes")), None);
        check!(filter.matches(&course("Containers", "Running Kubernetes clusters", None)));
        check!(!filter.matches(&course("Containers", "Running ECS clusters", None)));
    }

    #[test]
    fn retired_record_never_matches() {
        let filter = PredicateBuilder::default().build(&tokenize_query(Some("docker")), None);
        check!(!filter.matches(&course("Docker Basics", "docker", Some(RETIRED_FLAG))));
    }

    #[test]
    fn difficulty_facet_is_conjunctive() {
        let terms = tokenize_query(Some("docker"));
        let filter = PredicateBuilder::default().build(&terms, Some("beginner"));

        let mut record = course("Docker", "", None);
        check!(!filter.matches(&record));

        record.difficulty = Some("beginner".to_string());
        check!(filter.matches(&record));

        record.difficulty = Some("advanced".to_string());
        check!(!filter.matches(&record));
    }

    #[test]
    fn empty_terms_degenerate_to_active() {
        let filter = PredicateBuilder::default().build(&Terms::default(), None);
        check!(filter == PredicateBuilder::active());
    }

    #[test]
    fn variants_grow_condition_count() {
        let terms = tokenize_query(Some("docker"));
        let folded = PredicateBuilder::new(CaseMatching::Folded).build(&terms, None);
        let variants = PredicateBuilder::new(CaseMatching::Variants).build(&terms, None);

        // 3 activity conditions + 2 fields
        check!(folded.condition_count() == 5);
        // "docker" == lower, so 3 distinct variants per field
        check!(variants.condition_count() == 3 + 2 * 3);
    }

    #[rstest]
    #[case("docker", &["docker", "DOCKER", "Docker"])]
    #[case("aws-lambda", &["aws-lambda", "AWS-LAMBDA", "Aws-Lambda"])]
    #[case("eKs", &["eKs", "eks", "EKS", "Eks"])]
    fn case_variants_are_deduplicated(#[case] term: &str, #[case] expected: &[&str]) {
        check!(case_variants(term) == expected.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn renders_readable_expression() {
        let filter = PredicateBuilder::default().build(&tokenize_query(Some("Docker")), Some("beginner"));
        check!(
            filter.to_string()
                == "class_flag <> 10 AND (class_flag = 0 OR attribute_not_exists(class_flag)) \
                    AND (contains(lower(name), \"docker\") OR contains(lower(description), \"docker\")) \
                    AND difficulty = \"beginner\""
        );
    }
}
