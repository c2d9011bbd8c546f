//==============================================================================
// Databases - SQL, ORM-style catalog, analytics and three NoSQL store shapes
//==============================================================================

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use course_lab::database::analytics::{self, EventStore, DEFAULT_BATCH_SIZE};
use course_lab::database::document_store::{BlogStore, NewPost, NewUser, UserUpdate};
use course_lab::database::kv_store::KvStore;
use course_lab::database::orm::{Catalog, CatalogProduct, Category};
use course_lab::database::sql_basics::{ConnectionPool, PoolSettings, Product, ProductRepository};
use course_lab::database::table_store::{AttributeValue, Item, TableUser, UserTable};
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::{CourseConfig, Result};

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold().cyan());
}

fn sql(config: &CourseConfig) -> Result<()> {
    section("SQL basics");
    let mut repo = ProductRepository::in_memory()?;
    let mut laptop = Product::new("Laptop", 999.99, "High-performance laptop").with_stock(10);
    let mut mouse = Product::new("Mouse", 19.99, "Wireless mouse").with_stock(50);
    repo.create(&mut laptop)?;
    repo.create(&mut mouse)?;
    println!("created: {} (id {})", laptop.name, laptop.id);

    laptop.price = 899.99;
    repo.update(&mut laptop)?;
    for product in repo.list()? {
        println!("  {} ${:.2} stock {}", product.name, product.price, product.stock);
    }

    repo.transfer_stock(mouse.id, laptop.id, 5)?;
    if let Err(err) = repo.transfer_stock(laptop.id, mouse.id, 1000) {
        println!("transfer rejected: {}", err.to_string().yellow());
    }
    repo.delete(mouse.id)?;
    println!("after delete: {} product(s)", repo.list()?.len());

    let pool = ConnectionPool::new(config.database.path.clone(), PoolSettings::from(&config.database))?;
    {
        let conn = pool.get()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        println!("pool ping: {one}, state while held: {:?}", pool.state());
    }
    println!("pool state after release: {:?}", pool.state());
    Ok(())
}

fn orm() -> Result<()> {
    section("ORM-style catalog");
    let mut catalog = Catalog::in_memory()?;
    let mut electronics = Category::new("Electronics");
    catalog.create_category(&mut electronics)?;

    let mut phone = CatalogProduct::new("Smartphone", 699.99, "Latest model", 100, electronics.id);
    catalog.create_product(&mut phone)?;
    catalog.update_price(&mut phone, 649.99)?;

    let phone_id = phone.id;
    catalog.transaction(|tx| {
        tx.adjust_stock(phone_id, -1)?;
        let mut case = CatalogProduct::new("Phone case", 19.99, "Protective case", 250, electronics.id);
        tx.create_product(&mut case)
    })?;

    for product in catalog.find_products_with_category()? {
        let category = product.category.as_ref().map(|c| c.name.as_str()).unwrap_or("-");
        println!("  {} [{category}] ${:.2} stock {}", product.name, product.price, product.stock);
    }
    println!("over $100: {}", catalog.find_where_price_above(100.0)?.len());

    catalog.soft_delete(phone_id)?;
    println!(
        "visible after soft delete: {}, including deleted: {}",
        catalog.find_products_with_category()?.len(),
        catalog.find_unscoped()?.len()
    );
    Ok(())
}

fn analytics_demo() -> Result<()> {
    section("Analytics");
    let now = Utc::now();
    let mut store = EventStore::in_memory()?;
    let mut events = analytics::sample_events(&mut rand::thread_rng(), 5000, now);
    store.insert_batch(&mut events, DEFAULT_BATCH_SIZE)?;
    println!("inserted {} events", store.count()?);

    let start = now - chrono::Duration::hours(24);
    for bucket in store.hourly_event_counts("pageview", start, now)?.iter().take(5) {
        println!("  {} pageviews: {}", bucket.hour.format("%H:00"), bucket.count);
    }
    for stats in store.session_analytics(start, now, 100)? {
        println!(
            "  {} avg {:.1}s over {} sessions",
            stats.country, stats.avg_duration, stats.session_count
        );
    }
    Ok(())
}

fn key_value(config: &CourseConfig) -> Result<()> {
    section("Key-value store");
    let kv = KvStore::with_config(&config.kv_store);
    kv.set("session:42", "active", Some(Duration::from_secs(1800)));
    println!("session:42 = {:?} (ttl {:?})", kv.get("session:42")?, kv.ttl("session:42"));

    kv.lpush("recent", &["page1", "page2", "page3"])?;
    println!("recent: {:?}", kv.lrange("recent", 0, -1)?);

    kv.hset("user:1", [("name", "John"), ("email", "john@example.com")])?;
    println!("user:1 = {:?}", kv.hgetall("user:1")?);

    kv.sadd("tags", &["rust", "storage", "rust"])?;
    println!("tags: {:?}", kv.smembers("tags")?);

    kv.zadd("leaderboard", &[(100.0, "alice"), (85.0, "bob"), (120.0, "carol")])?;
    println!("top scores: {:?}", kv.zrange_by_score("leaderboard", 90.0, f64::INFINITY)?);

    if let Err(err) = kv.lpush("user:1", &["oops"]) {
        println!("type check: {}", err.to_string().yellow());
    }

    let subscription = kv.subscribe("news");
    let receivers = kv.publish("news", "hello subscribers");
    println!("published to {receivers} subscriber(s)");
    if let Some(message) = subscription.recv_timeout(Duration::from_millis(100))? {
        println!("received on {}: {}", message.channel, message.payload);
    }
    Ok(())
}

fn documents() -> Result<()> {
    section("Document store");
    let blog = BlogStore::new();
    let user = blog.create_user(NewUser {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        age: 30,
        interests: vec!["rust".into(), "databases".into(), "web development".into()],
    });
    blog.create_post(
        user.id,
        NewPost {
            title: "Getting Started with Document Stores".to_string(),
            content: "Document stores keep related data together...".to_string(),
            tags: vec!["nosql".into(), "database".into()],
        },
    )?;
    for post in blog.user_posts(user.id, 1, 10)? {
        println!("  {} {:?}", post.title, post.tags);
    }

    let mut interests = user.interests.clone();
    interests.push("cloud".to_string());
    let updated = blog.update_user(
        user.id,
        UserUpdate {
            age: Some(31),
            interests: Some(interests),
            ..UserUpdate::default()
        },
    )?;
    println!("updated: age {} interests {:?}", updated.age, updated.interests);

    let removed = blog.delete_user_and_posts(user.id)?;
    println!("deleted user and {removed} post(s)");
    Ok(())
}

fn tables() -> Result<()> {
    section("Table store");
    let table = UserTable::new();
    let mut user = TableUser::new("user1", "John Doe", "john@example.com", 30, &["rust", "cloud"]);
    table.put_user(&mut user);
    println!("stored: {:?}", table.get_user("user1")?);

    let updates = Item::from([
        ("name".to_string(), AttributeValue::S("John Smith".to_string())),
        ("age".to_string(), AttributeValue::N("31".to_string())),
    ]);
    table.update_user("user1", updates)?;

    for user in table.query_by_age(25, 35)? {
        println!("  {} (age: {})", user.name, user.age);
    }
    table.delete_user("user1")?;
    println!("users left: {}", table.len());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;

    println!("{}", "Databases".bold().green());
    sql(&config).context("SQL examples")?;
    orm().context("catalog examples")?;
    analytics_demo().context("analytics examples")?;
    key_value(&config).context("key-value examples")?;
    documents().context("document store examples")?;
    tables().context("table store examples")?;
    Ok(())
}
