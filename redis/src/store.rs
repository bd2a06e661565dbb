//! Redis-based todo store.
//!
//! # Architecture
//!
//! Todos are stored as RedisJSON documents:
//! - **Key**: `{prefix}{id}` (default `todo:{id}`) → [`TodoDocument`]
//! - **Index**: a RediSearch index over every key with the prefix, defined
//!   in [`crate::index`]
//!
//! Finders and counts are single `FT.SEARCH` calls with a query from
//! [`crate::query`]; point operations use the key directly.
//!
//! # Example
//!
//! ```no_run
//! use todo_service_redis::{RedisTodoStore, StoreSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedisTodoStore::new("redis://127.0.0.1:6379", StoreSettings::default()).await?;
//! store.ensure_index().await?;
//! # Ok(())
//! # }
//! ```

use crate::document::TodoDocument;
use crate::{index, query, reply};
use chrono::NaiveDateTime;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError, RedisResult, Value};
use todo_service_core::{
    Priority, Result, StoreError, StoreFuture, Tags, Todo, TodoId, TodoStore,
};

/// Keys fetched per `SCAN` round when wiping.
const SCAN_BATCH: u64 = 500;

/// Index and key layout of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// RediSearch index name.
    pub index_name: String,
    /// Prefix of every todo key.
    pub key_prefix: String,
    /// Upper bound on records returned by one finder.
    pub query_limit: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            index_name: "todo-idx".to_string(),
            key_prefix: "todo:".to_string(),
            query_limit: 10_000,
        }
    }
}

/// Todo store over Redis JSON and RediSearch.
///
/// Cloning is cheap: clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisTodoStore {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
    settings: StoreSettings,
}

/// Maps a client error to the store taxonomy and counts it.
fn store_error(operation: &'static str, error: &RedisError) -> StoreError {
    metrics::counter!("todo.store.errors", "operation" => operation).increment(1);
    tracing::debug!(operation, error = %error, "Redis command failed");

    if error.is_io_error()
        || error.is_connection_dropped()
        || error.is_connection_refusal()
        || error.is_timeout()
    {
        StoreError::Connection(format!("{operation}: {error}"))
    } else {
        StoreError::Command(format!("{operation}: {error}"))
    }
}

impl RedisTodoStore {
    /// Connect to Redis.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., `"redis://127.0.0.1:6379"`)
    /// * `settings` - index name, key prefix, query limit
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid or Redis is
    /// unreachable.
    pub async fn new(redis_url: &str, settings: StoreSettings) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis connection manager: {e}"))
        })?;

        tracing::info!(
            index = %settings.index_name,
            key_prefix = %settings.key_prefix,
            "Connected to Redis"
        );

        Ok(Self {
            conn_manager,
            settings,
        })
    }

    /// Store layout in use.
    #[must_use]
    pub const fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Create the search index unless it already exists.
    ///
    /// # Errors
    ///
    /// [`StoreError::Index`] if Redis refuses the definition (for example when
    /// the RediSearch module is missing).
    pub async fn ensure_index(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let args = index::create_args(&self.settings.index_name, &self.settings.key_prefix);

        let created: RedisResult<()> = redis::cmd("FT.CREATE").arg(args).query_async(&mut conn).await;

        match created {
            Ok(()) => {
                tracing::info!(index = %self.settings.index_name, "Created search index");
                Ok(())
            }
            Err(e) if e.to_string().contains(index::ALREADY_EXISTS) => {
                tracing::debug!(index = %self.settings.index_name, "Search index already exists");
                Ok(())
            }
            Err(e) => Err(StoreError::Index(format!(
                "Failed to create index {}: {e}",
                self.settings.index_name
            ))),
        }
    }

    fn key(&self, id: &TodoId) -> String {
        format!("{}{}", self.settings.key_prefix, id.as_str())
    }

    async fn search(&self, operation: &'static str, query: String) -> Result<Vec<Todo>> {
        let mut conn = self.conn_manager.clone();
        tracing::debug!(operation, query = %query, "FT.SEARCH");

        let reply: Value = redis::cmd("FT.SEARCH")
            .arg(&self.settings.index_name)
            .arg(&query)
            .arg("LIMIT")
            .arg(0)
            .arg(self.settings.query_limit)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error(operation, &e))?;

        let todos = reply::search_todos(&reply)?;
        let total = reply::search_total(&reply)?;
        if let Some(dropped) = reply::truncated(total, todos.len()) {
            tracing::warn!(
                operation,
                total,
                returned = todos.len(),
                dropped,
                query_limit = self.settings.query_limit,
                "Search result truncated at query limit"
            );
        }

        Ok(todos)
    }

    async fn search_optional(
        &self,
        operation: &'static str,
        query: Option<String>,
    ) -> Result<Vec<Todo>> {
        match query {
            Some(query) => self.search(operation, query).await,
            None => Ok(Vec::new()),
        }
    }

    async fn count_matching(&self, operation: &'static str, query: String) -> Result<u64> {
        let mut conn = self.conn_manager.clone();
        tracing::debug!(operation, query = %query, "FT.SEARCH count");

        let reply: Value = redis::cmd("FT.SEARCH")
            .arg(&self.settings.index_name)
            .arg(&query)
            .arg("LIMIT")
            .arg(0)
            .arg(0)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error(operation, &e))?;

        reply::search_total(&reply)
    }

    async fn save_todo(&self, mut todo: Todo) -> Result<Todo> {
        let mut conn = self.conn_manager.clone();
        let id = todo.id.get_or_insert_with(TodoId::generate).clone();
        let json = TodoDocument::from_todo(&id, &todo).to_json()?;

        let _: () = redis::cmd("JSON.SET")
            .arg(self.key(&id))
            .arg("$")
            .arg(json)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("save", &e))?;

        tracing::debug!(todo_id = %id, "Stored todo document");
        Ok(todo)
    }

    async fn get_todo(&self, id: TodoId) -> Result<Option<Todo>> {
        let mut conn = self.conn_manager.clone();

        let reply: Value = redis::cmd("JSON.GET")
            .arg(self.key(&id))
            .arg("$")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("find_by_id", &e))?;

        reply::json_get(&reply)
    }

    async fn key_exists(&self, id: TodoId) -> Result<bool> {
        let mut conn = self.conn_manager.clone();

        redis::cmd("EXISTS")
            .arg(self.key(&id))
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("exists_by_id", &e))
    }

    async fn delete_key(&self, id: TodoId) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let removed: u64 = redis::cmd("DEL")
            .arg(self.key(&id))
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("delete_by_id", &e))?;

        tracing::debug!(todo_id = %id, removed, "Deleted todo document");
        Ok(())
    }

    async fn delete_prefixed(&self) -> Result<u64> {
        let mut conn = self.conn_manager.clone();
        let pattern = format!("{}*", self.settings.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| store_error("delete_all", &e))?;

            if !keys.is_empty() {
                let deleted: u64 = redis::cmd("DEL")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| store_error("delete_all", &e))?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::info!(removed, pattern = %pattern, "Wiped todo documents");
        Ok(removed)
    }

    async fn title_lookup(&self, title: String) -> Result<Option<Todo>> {
        let candidates = self
            .search("find_by_title", query::title_phrase(&title))
            .await?;
        Ok(candidates.into_iter().find(|t| t.title == title))
    }

    async fn ping_server(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("ping", &e))?;

        Ok(())
    }
}

impl TodoStore for RedisTodoStore {
    fn save(&self, todo: Todo) -> StoreFuture<'_, Todo> {
        Box::pin(self.save_todo(todo))
    }

    fn find_by_id(&self, id: TodoId) -> StoreFuture<'_, Option<Todo>> {
        Box::pin(self.get_todo(id))
    }

    fn exists_by_id(&self, id: TodoId) -> StoreFuture<'_, bool> {
        Box::pin(self.key_exists(id))
    }

    fn delete_by_id(&self, id: TodoId) -> StoreFuture<'_, ()> {
        Box::pin(self.delete_key(id))
    }

    fn delete_all(&self) -> StoreFuture<'_, u64> {
        Box::pin(self.delete_prefixed())
    }

    fn find_all(&self) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search("find_all", query::ALL.to_string()))
    }

    fn find_by_title(&self, title: String) -> StoreFuture<'_, Option<Todo>> {
        Box::pin(self.title_lookup(title))
    }

    fn find_by_completed(&self, completed: bool) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search("find_by_completed", query::completed(completed)))
    }

    fn find_by_priority(&self, priority: Priority) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search("find_by_priority", query::priority(priority)))
    }

    fn find_by_due_date_before(&self, before: NaiveDateTime) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search("find_by_due_date_before", query::due_before(before)))
    }

    fn find_by_created_at_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search(
            "find_by_created_at_between",
            query::created_between(from, to),
        ))
    }

    fn find_incomplete_due_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search(
            "find_incomplete_due_between",
            query::incomplete_due_between(from, to),
        ))
    }

    fn find_by_tag(&self, tag: String) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search_optional("find_by_tag", query::tag(&tag)))
    }

    fn find_by_tags(&self, tags: Tags) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search_optional("find_by_tags", query::any_tag(&tags)))
    }

    fn search_todos(&self, term: String) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(self.search_optional("search_todos", query::full_text(&term)))
    }

    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(self.count_matching("count", query::ALL.to_string()))
    }

    fn count_by_completed(&self, completed: bool) -> StoreFuture<'_, u64> {
        Box::pin(self.count_matching("count_by_completed", query::completed(completed)))
    }

    fn count_by_priority(&self, priority: Priority) -> StoreFuture<'_, u64> {
        Box::pin(self.count_matching("count_by_priority", query::priority(priority)))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(self.ping_server())
    }
}
