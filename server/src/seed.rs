//! Sample data bootstrap.
//!
//! Wipes the store and loads five fixed todos. Only runs when
//! `SEED_SAMPLE_DATA=true`.

use chrono::{NaiveDateTime, TimeDelta};
use todo_service_core::environment::Clock;
use todo_service_core::{Priority, Todo, TodoStore, timestamp};

struct Sample {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    tags: [&'static str; 3],
    due_in_days: i64,
    completed: bool,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        title: "Complete Redis OM Spring Documentation",
        description: "Write comprehensive documentation for the Redis OM Spring todo application",
        priority: Priority::High,
        tags: ["documentation", "work", "redis"],
        due_in_days: 7,
        completed: false,
    },
    Sample {
        title: "Setup CI/CD Pipeline",
        description: "Configure GitHub Actions for automated testing and deployment",
        priority: Priority::Medium,
        tags: ["devops", "automation", "github"],
        due_in_days: 5,
        completed: false,
    },
    Sample {
        title: "Learn Redis Vector Search",
        description: "Study and implement vector similarity search capabilities",
        priority: Priority::Low,
        tags: ["learning", "redis", "ai"],
        due_in_days: 14,
        completed: false,
    },
    Sample {
        title: "Write Unit Tests",
        description: "Create comprehensive unit tests for all service methods",
        priority: Priority::Urgent,
        tags: ["testing", "quality", "development"],
        due_in_days: 2,
        completed: true,
    },
    Sample {
        title: "Create LinkedIn Post",
        description: "Share the Redis OM Spring demo application on LinkedIn",
        priority: Priority::Medium,
        tags: ["social", "networking", "promotion"],
        due_in_days: 3,
        completed: false,
    },
];

impl Sample {
    fn to_todo(&self, now: NaiveDateTime) -> Todo {
        let mut todo = Todo::new(self.title, now);
        todo.description = Some(self.description.to_string());
        todo.priority = self.priority;
        todo.tags = self.tags.iter().map(ToString::to_string).collect();
        todo.due_date = Some(now + TimeDelta::days(self.due_in_days));
        todo.completed = self.completed;
        // Finished work was started the day before.
        if self.completed {
            todo.created_at = now - TimeDelta::days(1);
        }
        todo
    }
}

/// Sample todos stamped relative to `now`.
#[must_use]
pub fn sample_todos(now: NaiveDateTime) -> Vec<Todo> {
    SAMPLES.iter().map(|sample| sample.to_todo(now)).collect()
}

/// Deletes every todo, then saves the samples.
///
/// Returns the store's count afterwards.
///
/// # Errors
///
/// Store failure; the store may be left partially seeded.
pub async fn load_sample_data(store: &dyn TodoStore, clock: &dyn Clock) -> todo_service_core::Result<u64> {
    tracing::info!("Loading sample data");

    let removed = store.delete_all().await?;
    tracing::info!(removed, "Cleared existing todos");

    let now = timestamp::truncate(clock.now().naive_utc());
    for todo in sample_todos(now) {
        let saved = store.save(todo).await?;
        tracing::debug!(todo_id = ?saved.id, title = %saved.title, "Seeded todo");
        metrics::counter!("todo.seed.loaded").increment(1);
    }

    let total = store.count().await?;
    tracing::info!(total, "Sample data loaded");
    Ok(total)
}
