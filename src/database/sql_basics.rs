//! Example: Plain SQL CRUD over SQLite, a stock transfer transaction and a
//! small connection pool.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

#[derive(Error, Debug)]
pub enum ProductError {
    #[error("product not found")]
    NotFound,

    #[error("insufficient stock for product {id}: requested {requested}, available {available}")]
    InsufficientStock { id: i64, requested: i64, available: i64 },

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, ProductError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// A product not yet stored; `create` fills in id and created_at.
    pub fn new(name: impl Into<String>, price: f64, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            description: description.into(),
            stock: 0,
            created_at: DateTime::<Utc>::default(),
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            description: row.get(3)?,
            stock: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            stock INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
}

const SELECT_PRODUCT: &str =
    "SELECT id, name, price, description, stock, created_at FROM products";

#[derive(Debug)]
pub struct ProductRepository {
    conn: Connection,
}

impl ProductRepository {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Self::new(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Inserts `product`, writing the new id and creation time back into it.
    pub fn create(&self, product: &mut Product) -> Result<()> {
        let created_at = Utc::now();
        let id = self.conn.query_row(
            "INSERT INTO products (name, price, description, stock, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
            params![product.name, product.price, product.description, product.stock, created_at],
            |row| row.get(0),
        )?;
        product.id = id;
        product.created_at = created_at;
        debug!(id, name = %product.name, "product created");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Product> {
        self.conn
            .query_row(
                &format!("{SELECT_PRODUCT} WHERE id = ?1"),
                [id],
                Product::from_row,
            )
            .optional()?
            .ok_or(ProductError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_PRODUCT} ORDER BY id"))?;
        let products = stmt
            .query_map([], Product::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    /// Writes name, price, description and stock; reloads created_at from the row.
    pub fn update(&self, product: &mut Product) -> Result<()> {
        let created_at = self
            .conn
            .query_row(
                "UPDATE products
                 SET name = ?1, price = ?2, description = ?3, stock = ?4
                 WHERE id = ?5
                 RETURNING created_at",
                params![product.name, product.price, product.description, product.stock, product.id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(ProductError::NotFound)?;
        product.created_at = created_at;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(ProductError::NotFound);
        }
        debug!(id, "product deleted");
        Ok(())
    }

    /// Moves `quantity` units of stock in one transaction. Nothing changes
    /// unless both products exist and the source has enough stock.
    pub fn transfer_stock(&mut self, from: i64, to: i64, quantity: i64) -> Result<()> {
        let tx = self.conn.transaction()?;

        let debited = tx.execute(
            "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
            params![quantity, from],
        )?;
        if debited == 0 {
            let available: Option<i64> = tx
                .query_row("SELECT stock FROM products WHERE id = ?1", [from], |row| row.get(0))
                .optional()?;
            return Err(match available {
                Some(available) => ProductError::InsufficientStock {
                    id: from,
                    requested: quantity,
                    available,
                },
                None => ProductError::NotFound,
            });
        }

        let credited = tx.execute(
            "UPDATE products SET stock = stock + ?1 WHERE id = ?2",
            params![quantity, to],
        )?;
        if credited == 0 {
            return Err(ProductError::NotFound);
        }

        tx.commit()?;
        info!(from, to, quantity, "stock transferred");
        Ok(())
    }
}

// =============================================================================
// Connection pool
// =============================================================================

pub type SqlitePool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_open: u32,
    /// Idle connections the pool keeps warm.
    pub max_idle: u32,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_open: 25,
            max_idle: 5,
            max_lifetime: Duration::from_secs(5 * 60),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&DatabaseConfig> for PoolSettings {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_open: config.max_open_conns,
            max_idle: config.max_idle_conns,
            max_lifetime: config.conn_max_lifetime(),
            ..Self::default()
        }
    }
}

/// Hands out SQLite connections to one database file through r2d2.
#[derive(Clone)]
pub struct ConnectionPool {
    pool: SqlitePool,
    settings: PoolSettings,
}

impl ConnectionPool {
    /// Builds the pool and opens the idle connections up front.
    pub fn new(path: impl AsRef<Path>, settings: PoolSettings) -> Result<Self> {
        let max_size = settings.max_open.max(1);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(settings.max_idle.min(max_size)))
            .max_lifetime(Some(settings.max_lifetime).filter(|d| !d.is_zero()))
            .connection_timeout(settings.acquire_timeout.max(Duration::from_millis(1)))
            .build(SqliteConnectionManager::file(path))?;
        info!(max_size, min_idle = settings.max_idle, "connection pool ready");
        Ok(Self { pool, settings })
    }

    pub fn settings(&self) -> PoolSettings {
        self.settings
    }

    /// Open and idle connection counts.
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    /// Waits up to `acquire_timeout` for a connection; dropping it returns
    /// the connection to the pool.
    pub fn get(&self) -> Result<PooledConnection> {
        self.pool.get().map_err(|err| {
            debug!(%err, "pool checkout failed");
            ProductError::Pool(err)
        })
    }
}
