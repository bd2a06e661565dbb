//! RediSearch query strings, one builder per finder.
//!
//! Field names come from [`todo_service_core::schema::field`]. Timestamps
//! are compared as epoch milliseconds.

use chrono::NaiveDateTime;
use todo_service_core::schema::{field, tokenize};
use todo_service_core::timestamp::to_millis;
use todo_service_core::{Priority, Tags};

/// Matches every document in the index.
pub const ALL: &str = "*";

/// Backslash-escapes everything but letters, digits, and `_`.
///
/// Tag values and phrase contents must not carry query syntax.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if !(c.is_alphanumeric() || c == '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn tag_clause(name: &str, values: &str) -> String {
    format!("@{name}:{{{values}}}")
}

/// `@completed:{true}` / `@completed:{false}`.
#[must_use]
pub fn completed(completed: bool) -> String {
    tag_clause(field::COMPLETED, if completed { "true" } else { "false" })
}

/// `@priority:{HIGH}`.
#[must_use]
pub fn priority(priority: Priority) -> String {
    tag_clause(field::PRIORITY, priority.as_str())
}

/// Single tag membership. `None` for a blank tag, which matches nothing.
#[must_use]
pub fn tag(tag: &str) -> Option<String> {
    if tag.is_empty() {
        return None;
    }
    Some(tag_clause(field::TAGS, &escape(tag)))
}

/// Membership of any of `tags`. `None` for an empty set.
#[must_use]
pub fn any_tag(tags: &Tags) -> Option<String> {
    let alternatives: Vec<String> = tags
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| escape(t))
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    Some(tag_clause(field::TAGS, &alternatives.join(" | ")))
}

/// Title OR description contains every token of `term`.
///
/// `None` when the term has no searchable token.
#[must_use]
pub fn full_text(term: &str) -> Option<String> {
    let words = tokenize(term);
    if words.is_empty() {
        return None;
    }
    let words = words.join(" ");
    Some(format!(
        "(@{}:({words})) | (@{}:({words}))",
        field::TITLE,
        field::DESCRIPTION
    ))
}

/// Phrase query narrowing candidates for an exact title lookup.
///
/// The caller still compares titles exactly; a title without any token falls
/// back to [`ALL`].
#[must_use]
pub fn title_phrase(title: &str) -> String {
    let words = tokenize(title);
    if words.is_empty() {
        return ALL.to_string();
    }
    format!("@{}:\"{}\"", field::TITLE, words.join(" "))
}

/// `dueDate < before`.
#[must_use]
pub fn due_before(before: NaiveDateTime) -> String {
    format!("@{}:[-inf ({}]", field::DUE_DATE, to_millis(before))
}

/// `from <= createdAt <= to`.
#[must_use]
pub fn created_between(from: NaiveDateTime, to: NaiveDateTime) -> String {
    format!(
        "@{}:[{} {}]",
        field::CREATED_AT,
        to_millis(from),
        to_millis(to)
    )
}

/// Not completed and `from < dueDate < to`.
#[must_use]
pub fn incomplete_due_between(from: NaiveDateTime, to: NaiveDateTime) -> String {
    format!(
        "{} @{}:[({} ({}]",
        completed(false),
        field::DUE_DATE,
        to_millis(from),
        to_millis(to)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo_service_core::timestamp::from_millis;

    #[test]
    fn exact_match_queries() {
        assert_eq!(completed(true), "@completed:{true}");
        assert_eq!(completed(false), "@completed:{false}");
        assert_eq!(priority(Priority::High), "@priority:{HIGH}");
    }

    #[test]
    fn tag_punctuation_is_escaped() {
        assert_eq!(tag("redis").unwrap(), "@tags:{redis}");
        assert_eq!(tag("ci/cd").unwrap(), "@tags:{ci\\/cd}");
        assert_eq!(tag("two words").unwrap(), "@tags:{two\\ words}");
        assert_eq!(tag("a-b.c").unwrap(), "@tags:{a\\-b\\.c}");
        assert_eq!(tag(""), None);
    }

    #[test]
    fn any_tag_joins_alternatives() {
        let tags = Tags::from(["work".to_string(), "home-office".to_string()]);
        assert_eq!(
            any_tag(&tags).unwrap(),
            "@tags:{home\\-office | work}"
        );
        assert_eq!(any_tag(&Tags::new()), None);
    }

    #[test]
    fn full_text_covers_title_or_description() {
        assert_eq!(
            full_text("Redis  docs!").unwrap(),
            "(@title:(redis docs)) | (@description:(redis docs))"
        );
        assert_eq!(full_text("?!"), None);
    }

    #[test]
    fn full_text_keeps_underscored_words_whole() {
        assert_eq!(
            full_text("snake_case").unwrap(),
            "(@title:(snake_case)) | (@description:(snake_case))"
        );
        assert_eq!(
            title_phrase("Fix snake_case bug"),
            "@title:\"fix snake_case bug\""
        );
        assert_eq!(escape("snake_case"), "snake_case");
    }

    #[test]
    fn title_phrase_uses_tokens() {
        assert_eq!(title_phrase("Setup CI/CD Pipeline"), "@title:\"setup ci cd pipeline\"");
        assert_eq!(title_phrase("---"), ALL);
    }

    #[test]
    fn ranges_use_epoch_millis_with_bound_inclusivity() {
        let from = from_millis(1_000).unwrap();
        let to = from_millis(2_000).unwrap();

        assert_eq!(due_before(to), "@dueDate:[-inf (2000]");
        assert_eq!(created_between(from, to), "@createdAt:[1000 2000]");
        assert_eq!(
            incomplete_due_between(from, to),
            "@completed:{false} @dueDate:[(1000 (2000]"
        );
    }
}
