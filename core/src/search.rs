//! Search criteria and their dispatch.
//!
//! A search applies **one** predicate. Criteria are checked in a fixed order
//! (term, completed, priority, tag, due-before) and the first one present
//! wins; the rest are ignored. Supplying `completed` and `priority` together
//! therefore filters on `completed` only. This is the long-standing behaviour
//! of the search endpoint and is kept as is; [`SearchCriteria::ignored`]
//! names what was dropped so callers can log it.

use crate::todo::Priority;
use chrono::NaiveDateTime;

/// Criteria accepted by the search operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Free text matched against title and description.
    pub search_term: Option<String>,
    /// Completion flag.
    pub completed: Option<bool>,
    /// Priority level.
    pub priority: Option<Priority>,
    /// A single tag.
    pub tag: Option<String>,
    /// Due date strictly before this instant.
    pub due_before: Option<NaiveDateTime>,
}

/// The single store query a search resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Full-text query over title and description.
    FullText(String),
    /// Exact completion flag.
    Completed(bool),
    /// Exact priority.
    Priority(Priority),
    /// Tag membership.
    Tag(String),
    /// Due date before.
    DueBefore(NaiveDateTime),
    /// No usable criterion: everything.
    All,
}

impl SearchPlan {
    /// Request field name of the applied criterion, `"none"` for [`SearchPlan::All`].
    #[must_use]
    pub const fn criterion(&self) -> &'static str {
        match self {
            Self::FullText(_) => "searchTerm",
            Self::Completed(_) => "completed",
            Self::Priority(_) => "priority",
            Self::Tag(_) => "tag",
            Self::DueBefore(_) => "dueBefore",
            Self::All => "none",
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl SearchCriteria {
    /// Picks the first present criterion. Blank strings count as absent.
    #[must_use]
    pub fn plan(&self) -> SearchPlan {
        if let Some(term) = non_blank(self.search_term.as_ref()) {
            SearchPlan::FullText(term.to_string())
        } else if let Some(completed) = self.completed {
            SearchPlan::Completed(completed)
        } else if let Some(priority) = self.priority {
            SearchPlan::Priority(priority)
        } else if let Some(tag) = non_blank(self.tag.as_ref()) {
            SearchPlan::Tag(tag.to_string())
        } else if let Some(due_before) = self.due_before {
            SearchPlan::DueBefore(due_before)
        } else {
            SearchPlan::All
        }
    }

    /// Names of supplied criteria that [`plan`](Self::plan) does not apply.
    #[must_use]
    pub fn ignored(&self) -> Vec<&'static str> {
        let present = [
            ("searchTerm", non_blank(self.search_term.as_ref()).is_some()),
            ("completed", self.completed.is_some()),
            ("priority", self.priority.is_some()),
            ("tag", non_blank(self.tag.as_ref()).is_some()),
            ("dueBefore", self.due_before.is_some()),
        ];

        present
            .into_iter()
            .filter(|(_, is_present)| *is_present)
            .skip(1)
            .map(|(name, _)| name)
            .collect()
    }
}
