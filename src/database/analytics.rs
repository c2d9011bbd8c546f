//! Example: Analytics events in a columnar-style table
//!
//! Events are inserted in batches and queried with hourly and per-country
//! aggregations. Timestamps are stored as Unix seconds.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

const EVENT_TYPES: [&str; 3] = ["pageview", "click", "purchase"];
const PATHS: [&str; 4] = ["/home", "/products", "/cart", "/checkout"];
const DEVICES: [&str; 3] = ["mobile", "desktop", "tablet"];
const COUNTRIES: [&str; 4] = ["US", "UK", "DE", "JP"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    pub id: i64,
    pub user_id: i64,
    pub event_type: String,
    pub path: String,
    pub device: String,
    pub country: String,
    pub timestamp: DateTime<Utc>,
    pub duration: f64,
    /// UTC day of `timestamp`; set on insert.
    pub date: Option<NaiveDate>,
}

impl UserEvent {
    pub fn new(
        user_id: i64,
        event_type: &str,
        path: &str,
        device: &str,
        country: &str,
        timestamp: DateTime<Utc>,
        duration: f64,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            event_type: event_type.to_string(),
            path: path.to_string(),
            device: device.to_string(),
            country: country.to_string(),
            timestamp,
            duration,
            date: None,
        }
    }

    fn before_create(&mut self) {
        self.date = Some(self.timestamp.date_naive());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: DateTime<Utc>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub country: String,
    pub avg_duration: f64,
    pub session_count: i64,
}

/// Random events spread over the 24 hours before `now`.
pub fn sample_events<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<UserEvent> {
    let pick = |rng: &mut R, options: &[&'static str]| -> &'static str {
        options.choose(rng).copied().unwrap_or_default()
    };
    (0..count)
        .map(|_| {
            let offset = Duration::seconds(rng.gen_range(0..24 * 3600));
            UserEvent::new(
                rng.gen_range(1..=50),
                pick(rng, &EVENT_TYPES),
                pick(rng, &PATHS),
                pick(rng, &DEVICES),
                pick(rng, &COUNTRIES),
                now - offset,
                (rng.gen_range(5..600) as f64) / 10.0,
            )
        })
        .collect()
}

#[derive(Debug)]
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                path TEXT NOT NULL,
                device TEXT NOT NULL,
                country TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                duration REAL NOT NULL,
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_user_events_ts ON user_events(timestamp, user_id);",
        )?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> rusqlite::Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Inserts `events` in transactions of `batch_size` rows, filling in each
    /// event's id and date.
    pub fn insert_batch(&mut self, events: &mut [UserEvent], batch_size: usize) -> rusqlite::Result<usize> {
        let batch_size = batch_size.max(1);
        for chunk in events.chunks_mut(batch_size) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO user_events
                        (user_id, event_type, path, device, country, timestamp, duration, date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for event in chunk.iter_mut() {
                    event.before_create();
                    stmt.execute(params![
                        event.user_id,
                        event.event_type,
                        event.path,
                        event.device,
                        event.country,
                        event.timestamp.timestamp(),
                        event.duration,
                        event.date.map(|d| d.to_string()),
                    ])?;
                    event.id = tx.last_insert_rowid();
                }
            }
            tx.commit()?;
            debug!(rows = chunk.len(), "event batch committed");
        }
        info!(total = events.len(), "events inserted");
        Ok(events.len())
    }

    pub fn count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM user_events", [], |row| row.get(0))
    }

    /// Events of `event_type` per hour in `[start, end]`, ordered by hour.
    pub fn hourly_event_counts(
        &self,
        event_type: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<HourlyCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT (timestamp / 3600) * 3600 AS hour, COUNT(*) AS count
             FROM user_events
             WHERE event_type = ?1 AND timestamp BETWEEN ?2 AND ?3
             GROUP BY hour
             ORDER BY hour",
        )?;
        let rows = stmt.query_map(
            params![event_type, start.timestamp(), end.timestamp()],
            |row| {
                let hour: i64 = row.get(0)?;
                Ok(HourlyCount {
                    hour: DateTime::from_timestamp(hour, 0).unwrap_or_default(),
                    count: row.get(1)?,
                })
            },
        )?;
        rows.collect()
    }

    /// Per-country average duration and session count for countries with
    /// more than `min_sessions` events, busiest first.
    pub fn session_analytics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        min_sessions: i64,
    ) -> rusqlite::Result<Vec<SessionStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT country, AVG(duration) AS avg_duration, COUNT(*) AS session_count
             FROM user_events
             WHERE timestamp BETWEEN ?1 AND ?2
             GROUP BY country
             HAVING session_count > ?3
             ORDER BY session_count DESC, country",
        )?;
        let rows = stmt.query_map(params![start.timestamp(), end.timestamp(), min_sessions], |row| {
            Ok(SessionStats {
                country: row.get(0)?,
                avg_duration: row.get(1)?,
                session_count: row.get(2)?,
            })
        })?;
        rows.collect()
    }
}

#[cfg(test)]
mod analytics_tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn event(event_type: &str, country: &str, ts: DateTime<Utc>, duration: f64) -> UserEvent {
        UserEvent::new(1, event_type, "/home", "mobile", country, ts, duration)
    }

    #[test]
    fn test_insert_batch_fills_date_and_ids() {
        let mut store = EventStore::in_memory().unwrap();
        let mut events = vec![
            event("pageview", "US", at(23, 59), 2.5),
            event("click", "UK", at(0, 1), 1.8),
            event("pageview", "US", at(10, 0), 3.0),
        ];
        assert_eq!(store.insert_batch(&mut events, 2).unwrap(), 3);
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_hourly_counts() {
        let mut store = EventStore::in_memory().unwrap();
        let mut events = vec![
            event("pageview", "US", at(9, 10), 1.0),
            event("pageview", "US", at(9, 50), 1.0),
            event("pageview", "US", at(11, 5), 1.0),
            event("click", "US", at(9, 20), 1.0),
            event("pageview", "US", at(20, 0), 1.0),
        ];
        store.insert_batch(&mut events, DEFAULT_BATCH_SIZE).unwrap();

        let counts = store.hourly_event_counts("pageview", at(0, 0), at(12, 0)).unwrap();
        assert_eq!(
            counts,
            vec![
                HourlyCount { hour: at(9, 0), count: 2 },
                HourlyCount { hour: at(11, 0), count: 1 },
            ]
        );
    }

    #[test]
    fn test_session_analytics_having_and_order() {
        let mut store = EventStore::in_memory().unwrap();
        let mut events = Vec::new();
        for i in 0..4 {
            events.push(event("pageview", "US", at(10, i), 2.0 + i as f64));
        }
        for i in 0..3 {
            events.push(event("pageview", "UK", at(10, i), 1.0));
        }
        events.push(event("pageview", "DE", at(10, 0), 9.0));
        store.insert_batch(&mut events, 3).unwrap();

        let stats = store.session_analytics(at(0, 0), at(23, 0), 1).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].country, "US");
        assert_eq!(stats[0].session_count, 4);
        assert!((stats[0].avg_duration - 3.5).abs() < 1e-9);
        assert_eq!(stats[1].country, "UK");
    }

    #[test]
    fn test_sample_events_stay_in_window() {
        let now = at(12, 0);
        let mut rng = StdRng::seed_from_u64(7);
        let events = sample_events(&mut rng, 200, now);
        assert_eq!(events.len(), 200);
        assert!(events
            .iter()
            .all(|e| e.timestamp <= now && e.timestamp > now - Duration::hours(24)));
        assert!(events.iter().all(|e| COUNTRIES.contains(&e.country.as_str())));

        let mut store = EventStore::in_memory().unwrap();
        let mut events = events;
        store.insert_batch(&mut events, 64).unwrap();
        let total: i64 = store
            .session_analytics(now - Duration::hours(24), now, 0)
            .unwrap()
            .iter()
            .map(|s| s.session_count)
            .sum();
        assert_eq!(total, 200);
    }
}
