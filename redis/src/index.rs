//! `FT.CREATE` definition of the todo index.

use todo_service_core::schema::{IndexKind, TODO_INDEX};

/// Reply fragment RediSearch uses when the index is already there.
pub const ALREADY_EXISTS: &str = "Index already exists";

fn kind_args(kind: IndexKind) -> &'static [&'static str] {
    match kind {
        IndexKind::FullText => &["TEXT"],
        IndexKind::Exact => &["TAG"],
        IndexKind::Range => &["NUMERIC", "SORTABLE"],
    }
}

/// Arguments following `FT.CREATE`.
///
/// ```text
/// <index> ON JSON PREFIX 1 <prefix> SCHEMA $.title AS title TEXT ...
/// ```
#[must_use]
pub fn create_args(index_name: &str, key_prefix: &str) -> Vec<String> {
    let mut args: Vec<String> = [index_name, "ON", "JSON", "PREFIX", "1", key_prefix, "SCHEMA"]
        .into_iter()
        .map(str::to_string)
        .collect();

    for field in &TODO_INDEX {
        args.push(field.path.to_string());
        args.push("AS".to_string());
        args.push(field.name.to_string());
        args.extend(kind_args(field.kind).iter().map(|a| (*a).to_string()));
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_covers_every_field() {
        let args = create_args("todo-idx", "todo:").join(" ");

        assert!(args.starts_with("todo-idx ON JSON PREFIX 1 todo: SCHEMA "));
        assert!(args.contains("$.title AS title TEXT"));
        assert!(args.contains("$.description AS description TEXT"));
        assert!(args.contains("$.completed AS completed TAG "));
        assert!(args.contains("$.priority AS priority TAG "));
        assert!(args.contains("$.tags[*] AS tags TAG "));
        assert!(!args.contains("CASESENSITIVE"));
        assert!(args.contains("$.createdAt AS createdAt NUMERIC SORTABLE"));
        assert!(args.contains("$.updatedAt AS updatedAt NUMERIC SORTABLE"));
        assert!(args.ends_with("$.dueDate AS dueDate NUMERIC SORTABLE"));
    }
}
