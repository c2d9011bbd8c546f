//! Example: ORM-style catalog over SQLite
//!
//! Categories and products with creation hooks, eager loading of the
//! category, closure transactions and soft deletes.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("record not found")]
    NotFound,

    #[error("category {0:?} already exists")]
    DuplicateCategory(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, OrmError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub stock: i64,
    pub category_id: i64,
    /// Filled only by the preloading query.
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogProduct {
    pub fn new(name: impl Into<String>, price: f64, description: impl Into<String>, stock: i64, category_id: i64) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
            stock,
            category_id,
            ..Self::default()
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn before_create(&mut self) {
        let now = Utc::now();
        self.created_at = now;
        self.updated_at = now;
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            price: row.get("price")?,
            description: row.get("description")?,
            stock: row.get("stock")?,
            category_id: row.get("category_id")?,
            category: None,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
        })
    }
}

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.price, p.description, p.stock, p.category_id, \
     p.created_at, p.updated_at, p.deleted_at";

fn insert_product(conn: &Connection, product: &mut CatalogProduct) -> Result<()> {
    product.before_create();
    product.id = conn.query_row(
        "INSERT INTO catalog_products
            (name, price, description, stock, category_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING id",
        params![
            product.name,
            product.price,
            product.description,
            product.stock,
            product.category_id,
            product.created_at,
            product.updated_at
        ],
        |row| row.get(0),
    )?;
    debug!(id = product.id, name = %product.name, "catalog product created");
    Ok(())
}

fn adjust_stock(conn: &Connection, id: i64, delta: i64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE catalog_products SET stock = stock + ?1, updated_at = ?2
         WHERE id = ?3 AND deleted_at IS NULL",
        params![delta, Utc::now(), id],
    )?;
    if changed == 0 {
        return Err(OrmError::NotFound);
    }
    Ok(())
}

/// The operations available inside [`Catalog::transaction`].
pub struct CatalogTx<'c> {
    tx: &'c Transaction<'c>,
}

impl CatalogTx<'_> {
    pub fn create_product(&self, product: &mut CatalogProduct) -> Result<()> {
        insert_product(self.tx, product)
    }

    pub fn adjust_stock(&self, id: i64, delta: i64) -> Result<()> {
        adjust_stock(self.tx, id, delta)
    }
}

#[derive(Debug)]
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn in_memory() -> Result<Self> {
        let catalog = Self::new(Connection::open_in_memory()?);
        catalog.migrate()?;
        Ok(catalog)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS catalog_products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                stock INTEGER NOT NULL DEFAULT 0,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
             );
             CREATE INDEX IF NOT EXISTS idx_catalog_products_deleted_at
                ON catalog_products(deleted_at);",
        )?;
        info!("catalog schema migrated");
        Ok(())
    }

    pub fn create_category(&self, category: &mut Category) -> Result<()> {
        let now = Utc::now();
        let inserted = self.conn.query_row(
            "INSERT INTO categories (name, created_at, updated_at) VALUES (?1, ?2, ?2) RETURNING id",
            params![category.name, now],
            |row| row.get(0),
        );
        category.id = match inserted {
            Ok(id) => id,
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                return Err(OrmError::DuplicateCategory(category.name.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        category.created_at = now;
        category.updated_at = now;
        Ok(())
    }

    pub fn create_product(&self, product: &mut CatalogProduct) -> Result<()> {
        insert_product(&self.conn, product)
    }

    pub fn find_product(&self, id: i64) -> Result<CatalogProduct> {
        self.conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM catalog_products p WHERE p.id = ?1 AND p.deleted_at IS NULL"),
                [id],
                CatalogProduct::from_row,
            )
            .optional()?
            .ok_or(OrmError::NotFound)
    }

    /// Live products with their category loaded, ordered by id.
    pub fn find_products_with_category(&self) -> Result<Vec<CatalogProduct>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS},
                    c.id AS c_id, c.name AS c_name,
                    c.created_at AS c_created_at, c.updated_at AS c_updated_at
             FROM catalog_products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.deleted_at IS NULL
             ORDER BY p.id"
        ))?;
        let products = stmt
            .query_map([], |row| {
                let mut product = CatalogProduct::from_row(row)?;
                product.category = Some(Category {
                    id: row.get("c_id")?,
                    name: row.get("c_name")?,
                    created_at: row.get("c_created_at")?,
                    updated_at: row.get("c_updated_at")?,
                });
                Ok(product)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    pub fn update_price(&self, product: &mut CatalogProduct, price: f64) -> Result<()> {
        let updated_at = Utc::now();
        let changed = self.conn.execute(
            "UPDATE catalog_products SET price = ?1, updated_at = ?2 WHERE id = ?3 AND deleted_at IS NULL",
            params![price, updated_at, product.id],
        )?;
        if changed == 0 {
            return Err(OrmError::NotFound);
        }
        product.price = price;
        product.updated_at = updated_at;
        Ok(())
    }

    pub fn find_where_price_above(&self, min_price: f64) -> Result<Vec<CatalogProduct>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog_products p
             WHERE p.price > ?1 AND p.deleted_at IS NULL
             ORDER BY p.id"
        ))?;
        let products = stmt
            .query_map([min_price], CatalogProduct::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    /// Runs `f` in a transaction, committing on `Ok` and rolling back on `Err`.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&CatalogTx<'_>) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let value = f(&CatalogTx { tx: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    pub fn soft_delete(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE catalog_products SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(OrmError::NotFound);
        }
        debug!(id, "catalog product soft-deleted");
        Ok(())
    }

    /// Every product, soft-deleted ones included.
    pub fn find_unscoped(&self) -> Result<Vec<CatalogProduct>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM catalog_products p ORDER BY p.id"))?;
        let products = stmt
            .query_map([], CatalogProduct::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }
}

#[cfg(test)]
mod orm_tests {
    use super::*;

    fn seeded() -> (Catalog, Category, CatalogProduct) {
        let catalog = Catalog::in_memory().unwrap();
        let mut electronics = Category::new("Electronics");
        catalog.create_category(&mut electronics).unwrap();
        let mut phone = CatalogProduct::new("Smartphone", 999.99, "Latest smartphone model", 10, electronics.id);
        catalog.create_product(&mut phone).unwrap();
        (catalog, electronics, phone)
    }

    #[test]
    fn test_create_sets_ids_and_timestamps() {
        let (_, category, phone) = seeded();
        assert_eq!(category.id, 1);
        assert_eq!(phone.id, 1);
        assert_eq!(phone.created_at, phone.updated_at);
        assert!(phone.created_at > DateTime::<Utc>::default());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let (catalog, _, _) = seeded();
        let err = catalog.create_category(&mut Category::new("Electronics")).unwrap_err();
        assert!(matches!(err, OrmError::DuplicateCategory(name) if name == "Electronics"));
    }

    #[test]
    fn test_preload_category() {
        let (catalog, _, _) = seeded();
        let products = catalog.find_products_with_category().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(
            products[0].category.as_ref().map(|c| c.name.as_str()),
            Some("Electronics")
        );
    }

    #[test]
    fn test_update_price_and_filter() {
        let (catalog, _, mut phone) = seeded();
        let before = phone.updated_at;
        catalog.update_price(&mut phone, 1099.99).unwrap();
        assert!(phone.updated_at >= before);
        assert_eq!(catalog.find_product(phone.id).unwrap().price, 1099.99);

        let expensive = catalog.find_where_price_above(1000.0).unwrap();
        assert_eq!(expensive.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["Smartphone"]);
        assert!(catalog.find_where_price_above(2000.0).unwrap().is_empty());
    }

    #[test]
    fn test_transaction_commits() {
        let (mut catalog, category, phone) = seeded();
        let tablet_id = catalog
            .transaction(|tx| {
                tx.adjust_stock(phone.id, -1)?;
                let mut tablet = CatalogProduct::new("Tablet", 499.99, "New tablet model", 5, category.id);
                tx.create_product(&mut tablet)?;
                Ok(tablet.id)
            })
            .unwrap();

        assert_eq!(catalog.find_product(phone.id).unwrap().stock, 9);
        assert_eq!(catalog.find_product(tablet_id).unwrap().name, "Tablet");
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let (mut catalog, category, phone) = seeded();
        let result: Result<()> = catalog.transaction(|tx| {
            tx.adjust_stock(phone.id, -1)?;
            let mut tablet = CatalogProduct::new("Tablet", 499.99, "", 5, category.id);
            tx.create_product(&mut tablet)?;
            tx.adjust_stock(404, -1)
        });

        assert!(matches!(result, Err(OrmError::NotFound)));
        assert_eq!(catalog.find_product(phone.id).unwrap().stock, 10);
        assert_eq!(catalog.find_unscoped().unwrap().len(), 1);
    }

    #[test]
    fn test_soft_delete_hides_from_default_queries() {
        let (catalog, _, phone) = seeded();
        catalog.soft_delete(phone.id).unwrap();

        assert!(matches!(catalog.find_product(phone.id), Err(OrmError::NotFound)));
        assert!(catalog.find_products_with_category().unwrap().is_empty());
        assert!(matches!(catalog.soft_delete(phone.id), Err(OrmError::NotFound)));

        let all = catalog.find_unscoped().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_deleted());
    }
}
