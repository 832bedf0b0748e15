//! Prompt 记录存储

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row};

use super::model::{NewPrompt, PromptRecord};

/// Prompt 记录仓库
///
/// 方法都是同步的，异步调用方需要放到 `spawn_blocking` 中执行
pub trait PromptRepository: Send + Sync {
    /// 全部记录，按 id 降序（最新在前）
    fn list_all(&self) -> Result<Vec<PromptRecord>>;

    /// 按 id 查询，不存在时返回 `Ok(None)`
    fn get_by_id(&self, id: i64) -> Result<Option<PromptRecord>>;

    /// 插入新记录并提交，返回分配了 id 和 created_at 的完整记录
    fn insert(&self, prompt: NewPrompt) -> Result<PromptRecord>;
}

/// 基于 SQLite 的存储实现
pub struct SqlitePromptStore {
    conn: Mutex<Connection>,
}

impl SqlitePromptStore {
    /// 打开（或创建）数据库文件
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("打开数据库失败: {}", db_path))?;
        Self::init(conn)
    }

    /// 打开内存数据库
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prompts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_prompt TEXT NOT NULL,
                optimized_prompt TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .context("初始化 prompts 表失败")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PromptRepository for SqlitePromptStore {
    fn list_all(&self) -> Result<Vec<PromptRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, original_prompt, optimized_prompt, created_at
             FROM prompts ORDER BY id DESC",
        )?;
        let records = stmt
            .query_map([], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<PromptRecord>> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT id, original_prompt, optimized_prompt, created_at
                 FROM prompts WHERE id = ?1",
                [id],
                map_row,
            )
            .optional()?;
        Ok(record)
    }

    fn insert(&self, prompt: NewPrompt) -> Result<PromptRecord> {
        let conn = self.conn.lock();

        // 持锁后取时间，保证 id 越大 created_at 不会越早；
        // 以存储精度（微秒）回读，保证插入结果与后续查询一致
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let created_at = parse_timestamp(&timestamp)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO prompts (original_prompt, optimized_prompt, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![prompt.original_prompt, prompt.optimized_prompt, timestamp],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(PromptRecord {
            id,
            original_prompt: prompt.original_prompt,
            optimized_prompt: prompt.optimized_prompt,
            created_at,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<PromptRecord> {
    let timestamp: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(PromptRecord {
        id: row.get(0)?,
        original_prompt: row.get(1)?,
        optimized_prompt: row.get(2)?,
        created_at,
    })
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(timestamp)
        .with_context(|| format!("无效的时间戳: {}", timestamp))?
        .with_timezone(&Utc))
}
