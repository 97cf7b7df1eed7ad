/// Database test utilities with singleton pattern
///
/// Postgres tests only run when `TEST_DATABASE_URL` is set; the pool and the
/// tables are created once per test binary.
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, Pool};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

type PgPool = Pool<ConnectionManager<PgConnection>>;

static DB_POOL: OnceLock<Option<Arc<PgPool>>> = OnceLock::new();

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS campaigns (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS contacts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        linkedin_url TEXT,
        email TEXT,
        company TEXT,
        position TEXT,
        connected_on DATE,
        source TEXT,
        owner_id UUID,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS campaign_contacts (
        campaign_id UUID NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
        contact_id UUID NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (campaign_id, contact_id)
    )",
];

/// Shared pool, or `None` when no test database is configured
pub fn get_test_db_pool() -> Option<Arc<PgPool>> {
    DB_POOL
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL").ok()?;

            let manager = ConnectionManager::<PgConnection>::new(test_db_url);
            let pool = r2d2::Pool::builder()
                .max_size(10)
                .build(manager)
                .expect("Failed to create test database pool");

            let mut conn = pool.get().expect("Failed to get DB connection");
            for statement in SCHEMA {
                diesel::sql_query(statement)
                    .execute(&mut conn)
                    .expect("Failed to create test schema");
            }

            Some(Arc::new(pool))
        })
        .clone()
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db(pool: &PgPool) {
    let mut conn = pool.get().expect("Failed to get DB connection");

    diesel::sql_query("TRUNCATE TABLE campaign_contacts, contacts, campaigns CASCADE")
        .execute(&mut conn)
        .expect("Failed to clean contact tables");
}

pub fn create_campaign(pool: &PgPool, name: &str) -> Uuid {
    use leadbook::schema::campaigns;

    let mut conn = pool.get().expect("Failed to get DB connection");
    diesel::insert_into(campaigns::table)
        .values(campaigns::name.eq(name))
        .returning(campaigns::id)
        .get_result(&mut conn)
        .expect("Failed to create campaign")
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
pub fn acquire_test_lock() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
