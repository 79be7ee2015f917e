//! SQLite-backed store.
//!
//! All statements run on the blocking thread pool; the connection is shared
//! behind a mutex, so statements are serialized per store instance.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexSet;
use parking_lot::Mutex;
use problemset_core::{
    Difficulty, DifficultyCounts, NewProblem, Pagination, Problem, ProblemFilter, ProblemPatch,
    ProblemStatistics,
};
use rusqlite::types::{Type, Value};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::traits::{ProblemStore, SEARCH_LIMIT};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS problems (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        frontend_question_id TEXT,
        title TEXT NOT NULL,
        title_slug TEXT NOT NULL UNIQUE,
        difficulty TEXT NOT NULL CHECK(difficulty IN ('Easy', 'Medium', 'Hard')),
        paid_only INTEGER NOT NULL DEFAULT 0,
        url TEXT,
        description_url TEXT,
        solution_url TEXT,
        solution_code_url TEXT,
        description TEXT,
        solution TEXT,
        solution_code_python TEXT,
        solution_code_java TEXT,
        solution_code_cpp TEXT,
        category TEXT NOT NULL DEFAULT 'Algorithms',
        acceptance_rate REAL,
        topics TEXT NOT NULL DEFAULT '[]',
        hints TEXT NOT NULL DEFAULT '[]',
        likes INTEGER NOT NULL DEFAULT 0 CHECK(likes >= 0),
        dislikes INTEGER NOT NULL DEFAULT 0 CHECK(dislikes >= 0),
        total_accepted TEXT,
        total_submission TEXT,
        similar_questions TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_problems_difficulty ON problems(difficulty);
    CREATE INDEX IF NOT EXISTS idx_problems_likes ON problems(likes DESC);
";

const COLUMNS: &str = "id, frontend_question_id, title, title_slug, difficulty, paid_only, \
    url, description_url, solution_url, solution_code_url, description, solution, \
    solution_code_python, solution_code_java, solution_code_cpp, category, acceptance_rate, \
    topics, hints, likes, dislikes, total_accepted, total_submission, similar_questions, \
    created_at, updated_at";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`ProblemStore`] on top of a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let location = path.display().to_string();

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            )
            .map_err(|e| StoreError::unavailable(format!("failed to open database: {}", e)))?;
            prepare(&conn)?;
            Ok(conn)
        })
        .await
        .map_err(|e| StoreError::unavailable(format!("blocking task failed: {}", e)))??;

        info!(path = %location, "SQLite store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::unavailable(format!("failed to open database: {}", e)))?;
        prepare(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    /// Returns the database location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Runs `f` with the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::unavailable(format!("blocking task failed: {}", e)))?
    }
}

fn prepare(conn: &Connection) -> Result<(), StoreError> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(map_error)?;
    register_functions(conn)?;
    conn.execute_batch(SCHEMA).map_err(map_error)
}

/// Name of the Unicode-aware lower-casing SQL function.
///
/// The built-in `LOWER()` only folds ASCII, while search needles are
/// lower-cased with [`str::to_lowercase`].
const UNICODE_LOWER: &str = "unicode_lower";

fn register_functions(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
    .map_err(map_error)
}

fn map_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(code, message) = &err {
        if code.code == ErrorCode::ConstraintViolation {
            let message = message.clone().unwrap_or_default();
            // "UNIQUE constraint failed: problems.title_slug"
            let field = if message.contains("problems.title_slug") {
                "titleSlug"
            } else if message.contains("problems.id") {
                "id"
            } else {
                return StoreError::query(message);
            };
            return StoreError::conflict(field, String::new());
        }
    }
    StoreError::query(err.to_string())
}

/// Fills in the offending value on a conflict raised for `problem`.
fn with_conflict_value(err: StoreError, problem: &Problem) -> StoreError {
    match err {
        StoreError::Conflict { field, .. } => {
            let value = if field == "id" {
                problem.id.to_string()
            } else {
                problem.title_slug.clone()
            };
            StoreError::Conflict { field, value }
        },
        other => other,
    }
}

fn decode_failure<E>(index: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn row_to_problem(row: &Row<'_>) -> rusqlite::Result<Problem> {
    let difficulty: String = row.get(4)?;
    let topics: String = row.get(17)?;
    let hints: String = row.get(18)?;

    Ok(Problem {
        id: row.get(0)?,
        frontend_question_id: row.get(1)?,
        title: row.get(2)?,
        title_slug: row.get(3)?,
        difficulty: difficulty
            .parse::<Difficulty>()
            .map_err(|e| decode_failure(4, e))?,
        paid_only: row.get(5)?,
        url: row.get(6)?,
        description_url: row.get(7)?,
        solution_url: row.get(8)?,
        solution_code_url: row.get(9)?,
        description: row.get(10)?,
        solution: row.get(11)?,
        solution_code_python: row.get(12)?,
        solution_code_java: row.get(13)?,
        solution_code_cpp: row.get(14)?,
        category: row.get(15)?,
        acceptance_rate: row.get(16)?,
        topics: serde_json::from_str(&topics).map_err(|e| decode_failure(17, e))?,
        hints: serde_json::from_str(&hints).map_err(|e| decode_failure(18, e))?,
        likes: row.get(19)?,
        dislikes: row.get(20)?,
        total_accepted: row.get(21)?,
        total_submission: row.get(22)?,
        similar_questions: row.get(23)?,
        created_at: row.get(24)?,
        updated_at: row.get(25)?,
    })
}

fn encode_list(values: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(values).map_err(|e| StoreError::query(e.to_string()))
}

/// Builds the WHERE clause and its positional parameters for a filter.
fn where_clause(filter: &ProblemFilter) -> (String, Vec<Value>) {
    let filter = filter.normalized();
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(difficulty) = filter.difficulty {
        clauses.push("difficulty = ?");
        values.push(Value::Text(difficulty.as_str().to_string()));
    }
    if let Some(topic) = filter.topic {
        clauses.push("EXISTS (SELECT 1 FROM json_each(problems.topics) WHERE json_each.value = ?)");
        values.push(Value::Text(topic));
    }
    if let Some(search) = filter.search {
        clauses.push(
            "(unicode_lower(title) LIKE ? ESCAPE '\\' OR unicode_lower(title_slug) LIKE ? ESCAPE '\\')",
        );
        let pattern = like_pattern(&search);
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn query_problems(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
) -> Result<Vec<Problem>, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(map_error)?;
    let rows = stmt
        .query_map(params_from_iter(values), row_to_problem)
        .map_err(map_error)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn select_by_id(conn: &Connection, id: i64) -> Result<Option<Problem>, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM problems WHERE id = ?1", COLUMNS),
        params![id],
        row_to_problem,
    )
    .optional()
    .map_err(map_error)
}

fn write_row(conn: &Connection, sql: &str, id: Option<i64>, p: &Problem) -> Result<usize, StoreError> {
    conn.execute(
        sql,
        params![
            id,
            p.frontend_question_id,
            p.title,
            p.title_slug,
            p.difficulty.as_str(),
            p.paid_only,
            p.url,
            p.description_url,
            p.solution_url,
            p.solution_code_url,
            p.description,
            p.solution,
            p.solution_code_python,
            p.solution_code_java,
            p.solution_code_cpp,
            p.category,
            p.acceptance_rate,
            encode_list(&p.topics)?,
            encode_list(&p.hints)?,
            p.likes,
            p.dislikes,
            p.total_accepted,
            p.total_submission,
            p.similar_questions,
            p.created_at,
            p.updated_at,
        ],
    )
    .map_err(|e| with_conflict_value(map_error(e), p))
}

#[async_trait]
impl ProblemStore for SqliteStore {
    async fn find_page(
        &self,
        filter: &ProblemFilter,
        pagination: Pagination,
    ) -> Result<Vec<Problem>, StoreError> {
        let (clause, mut values) = where_clause(filter);
        values.push(Value::Integer(i64::from(pagination.limit())));
        values.push(Value::Integer(pagination.offset() as i64));
        let sql = format!(
            "SELECT {} FROM problems{} ORDER BY id ASC LIMIT ? OFFSET ?",
            COLUMNS, clause
        );

        self.with_conn(move |conn| query_problems(conn, &sql, values))
            .await
    }

    async fn count(&self, filter: &ProblemFilter) -> Result<u64, StoreError> {
        let (clause, values) = where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM problems{}", clause);

        self.with_conn(move |conn| {
            let count: i64 = conn
                .query_row(&sql, params_from_iter(values), |row| row.get(0))
                .map_err(map_error)?;
            Ok(count as u64)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError> {
        self.with_conn(move |conn| select_by_id(conn, id)).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Problem>, StoreError> {
        let slug = slug.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM problems WHERE title_slug = ?1", COLUMNS),
                params![slug],
                row_to_problem,
            )
            .optional()
            .map_err(map_error)
        })
        .await
    }

    async fn find_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<Problem>, StoreError> {
        let filter = ProblemFilter::new().with_difficulty(difficulty);
        let (clause, values) = where_clause(&filter);
        let sql = format!("SELECT {} FROM problems{} ORDER BY id ASC", COLUMNS, clause);

        self.with_conn(move |conn| query_problems(conn, &sql, values))
            .await
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Problem>, StoreError> {
        let sql = format!(
            "SELECT {} FROM problems \
             WHERE EXISTS (SELECT 1 FROM json_each(problems.topics) WHERE json_each.value = ?) \
             ORDER BY id ASC",
            COLUMNS
        );
        let values = vec![Value::Text(topic.to_string())];

        self.with_conn(move |conn| query_problems(conn, &sql, values))
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Problem>, StoreError> {
        let filter = ProblemFilter::new().with_search(query);
        let (clause, mut values) = where_clause(&filter);
        values.push(Value::Integer(SEARCH_LIMIT as i64));
        let sql = format!(
            "SELECT {} FROM problems{} ORDER BY likes DESC, id ASC LIMIT ?",
            COLUMNS, clause
        );

        self.with_conn(move |conn| query_problems(conn, &sql, values))
            .await
    }

    async fn create(&self, input: NewProblem) -> Result<Problem, StoreError> {
        self.with_conn(move |conn| {
            let requested = input.id;
            let mut problem = input.into_problem(requested.unwrap_or_default(), Utc::now());
            let sql = format!(
                "INSERT INTO problems ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, \
                 ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
                COLUMNS
            );

            write_row(conn, &sql, requested, &problem)?;
            problem.id = conn.last_insert_rowid();

            debug!(id = problem.id, slug = %problem.title_slug, "Problem inserted");
            Ok(problem)
        })
        .await
    }

    async fn update(&self, id: i64, patch: &ProblemPatch) -> Result<Option<Problem>, StoreError> {
        let patch = patch.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(map_error)?;

            let Some(mut problem) = select_by_id(&tx, id)? else {
                return Ok(None);
            };
            patch.apply(&mut problem, Utc::now());

            let sql = "UPDATE problems SET id = ?1, frontend_question_id = ?2, title = ?3, \
                title_slug = ?4, difficulty = ?5, paid_only = ?6, url = ?7, description_url = ?8, \
                solution_url = ?9, solution_code_url = ?10, description = ?11, solution = ?12, \
                solution_code_python = ?13, solution_code_java = ?14, solution_code_cpp = ?15, \
                category = ?16, acceptance_rate = ?17, topics = ?18, hints = ?19, likes = ?20, \
                dislikes = ?21, total_accepted = ?22, total_submission = ?23, \
                similar_questions = ?24, created_at = ?25, updated_at = ?26 WHERE id = ?1";
            write_row(&tx, sql, Some(id), &problem)?;

            tx.commit().map_err(map_error)?;
            Ok(Some(problem))
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let affected = conn
                .execute("DELETE FROM problems WHERE id = ?1", params![id])
                .map_err(map_error)?;
            Ok(affected > 0)
        })
        .await
    }

    async fn statistics(&self) -> Result<ProblemStatistics, StoreError> {
        self.with_conn(|conn| {
            let mut counts = DifficultyCounts::default();
            let mut stmt = conn
                .prepare("SELECT difficulty, COUNT(*) FROM problems GROUP BY difficulty")
                .map_err(map_error)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
                .map_err(map_error)?;
            for row in rows {
                let (difficulty, count) = row.map_err(map_error)?;
                let count = count as u64;
                match difficulty.parse::<Difficulty>() {
                    Ok(Difficulty::Easy) => counts.easy = count,
                    Ok(Difficulty::Medium) => counts.medium = count,
                    Ok(Difficulty::Hard) => counts.hard = count,
                    Err(e) => return Err(StoreError::Corrupt(e.to_string())),
                }
            }

            let mut topics = IndexSet::new();
            let mut stmt = conn
                .prepare("SELECT topics FROM problems ORDER BY id ASC")
                .map_err(map_error)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(map_error)?;
            for row in rows {
                let raw = row.map_err(map_error)?;
                let list: Vec<String> =
                    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
                topics.extend(list);
            }

            Ok(ProblemStatistics::new(counts, topics.into_iter().collect()))
        })
        .await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(|e| StoreError::unavailable(e.to_string()))
        })
        .await
    }

    fn name(&self) -> &str {
        "sqlite"
    }

    async fn close(&self) -> Result<(), StoreError> {
        // Refresh planner statistics; the connection itself closes on drop.
        self.with_conn(|conn| conn.execute_batch("PRAGMA optimize;").map_err(map_error))
            .await?;
        info!(path = %self.location, "SQLite store closed");
        Ok(())
    }
}
