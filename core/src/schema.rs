//! Index schema of the todo document.
//!
//! Describes which document fields the store indexes and with what kind of
//! index. Store implementations turn this into their own index definition;
//! the finder semantics on [`TodoStore`](crate::TodoStore) rely on it.

/// Index field names, as used in store queries.
pub mod field {
    /// Full-text title.
    pub const TITLE: &str = "title";
    /// Full-text description.
    pub const DESCRIPTION: &str = "description";
    /// Exact-match completion flag.
    pub const COMPLETED: &str = "completed";
    /// Exact-match priority.
    pub const PRIORITY: &str = "priority";
    /// Membership over the tag set.
    pub const TAGS: &str = "tags";
    /// Range over creation time.
    pub const CREATED_AT: &str = "createdAt";
    /// Range over last modification time.
    pub const UPDATED_AT: &str = "updatedAt";
    /// Range over due date.
    pub const DUE_DATE: &str = "dueDate";
}

/// Kind of secondary index maintained for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Tokenized full-text search.
    FullText,
    /// Exact match / set membership on literal values.
    Exact,
    /// Numeric range.
    Range,
}

/// One indexed field of the todo document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedField {
    /// Name used in queries.
    pub name: &'static str,
    /// `JSONPath` of the value inside the stored document.
    pub path: &'static str,
    /// Index kind.
    pub kind: IndexKind,
}

impl IndexedField {
    const fn new(name: &'static str, path: &'static str, kind: IndexKind) -> Self {
        Self { name, path, kind }
    }
}

/// All indexed fields of the todo document.
pub const TODO_INDEX: [IndexedField; 8] = [
    IndexedField::new(field::TITLE, "$.title", IndexKind::FullText),
    IndexedField::new(field::DESCRIPTION, "$.description", IndexKind::FullText),
    IndexedField::new(field::COMPLETED, "$.completed", IndexKind::Exact),
    IndexedField::new(field::PRIORITY, "$.priority", IndexKind::Exact),
    IndexedField::new(field::TAGS, "$.tags[*]", IndexKind::Exact),
    IndexedField::new(field::CREATED_AT, "$.createdAt", IndexKind::Range),
    IndexedField::new(field::UPDATED_AT, "$.updatedAt", IndexKind::Range),
    IndexedField::new(field::DUE_DATE, "$.dueDate", IndexKind::Range),
];

/// Punctuation that separates words in full-text fields, besides whitespace.
///
/// `_` is not a separator: `snake_case` is a single word.
pub const TOKEN_SEPARATORS: &str = ",./(){}[]:;\\~!@#$%^&*-=+|'`\"<>?";

/// Splits full-text content into lowercased words, the way the full-text
/// index does.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(c))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_indexed_once() {
        let mut names: Vec<_> = TODO_INDEX.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TODO_INDEX.len());
    }

    #[test]
    fn text_fields_are_title_and_description() {
        let text: Vec<_> = TODO_INDEX
            .iter()
            .filter(|f| f.kind == IndexKind::FullText)
            .map(|f| f.name)
            .collect();
        assert_eq!(text, vec![field::TITLE, field::DESCRIPTION]);
    }

    #[test]
    fn tokenize_splits_on_punctuation_but_keeps_underscores() {
        assert_eq!(tokenize("Fix snake_case bug"), vec!["fix", "snake_case", "bug"]);
        assert_eq!(tokenize("CI/CD: pipeline-setup!"), vec!["ci", "cd", "pipeline", "setup"]);
        assert_eq!(tokenize("a\\b \"c\" <d>"), vec!["a", "b", "c", "d"]);
        assert!(tokenize(" ?! ").is_empty());
    }
}
