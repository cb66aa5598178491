use clinicdesk::database::Database;

pub struct TestDatabase {
    db: Database,
    path: String,
}

impl TestDatabase {
    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // Install drivers for AnyPool (required for tests)
    sqlx::any::install_default_drivers();

    // Use file-based SQLite for tests (unique UUID per test for parallel execution)
    use uuid::Uuid;
    let temp_file = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", temp_file);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    setup_schema(&db).await;

    TestDatabase {
        db,
        path: temp_file,
    }
}

async fn setup_schema(db: &Database) {
    let pool = db.pool();

    sqlx::query(
        "CREATE TABLE appointments (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            starts_at TEXT NOT NULL,
            ends_at TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled' CHECK(status IN ('scheduled', 'cancelled', 'completed')),
            source TEXT NOT NULL DEFAULT 'admin' CHECK(source IN ('admin', 'public')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create appointments table");

    sqlx::query("CREATE INDEX idx_appointments_starts_at ON appointments(starts_at)")
        .execute(pool)
        .await
        .ok();

    sqlx::query("CREATE INDEX idx_appointments_interval ON appointments(starts_at, ends_at)")
        .execute(pool)
        .await
        .ok();

    sqlx::query(
        "CREATE TABLE schedule (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            timezone TEXT NOT NULL DEFAULT 'Europe/Moscow',
            days TEXT NOT NULL DEFAULT '[]',
            overrides TEXT NOT NULL DEFAULT '[]',
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create schedule table");

    sqlx::query(
        "CREATE TABLE sessions (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            token TEXT NOT NULL UNIQUE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create sessions table");
}

pub async fn teardown_test_db(test_db: TestDatabase) {
    test_db.db.pool().close().await;
    let _ = std::fs::remove_file(&test_db.path);
}
