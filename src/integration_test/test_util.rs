use crate::app_env;
use crate::persistence::{self, ExternalConnectivity};
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::{env, future::Future};
use tokio::runtime::Runtime;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let schema_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{schema_id}");
        let mut conn = PgConnection::connect(base_url).await?;

        sqlx::query(&format!("CREATE DATABASE {db_name}"))
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: base_url.to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn drop_db(self) {
        let conn = PgConnection::connect(&self.base_url).await;
        let mut conn = match conn {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {conn_err}",
                    self.db_name
                );
                return;
            }
        };

        let drop_result = sqlx::query(&format!("DROP DATABASE {} WITH (FORCE)", self.db_name))
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {db_err}",
                self.db_name
            );
        }
    }
}

/// Creates a fresh, migrated database for a single test and drops it afterwards.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(ExternalConnectivity, PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(app_env::test::TEST_DB_URL).unwrap_or_else(|_| {
            panic!(
                "You must provide the {} environment variable as the base postgres connection string",
                app_env::test::TEST_DB_URL
            )
        });
        let test_db = TestDatabase::create(&base_url)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to start test database: {db_err}"));

        let pool = persistence::connect_sqlx(&test_db.url(), 5)
            .await
            .expect("Could not connect to and migrate the test database");
        let ext_cxn = ExternalConnectivity::new(pool.clone())
            .expect("Could not build connectivity for the test database");

        test_fn(ext_cxn, pool.clone()).await;

        pool.close().await;
        test_db.drop_db().await;
    });
}

/// Inserts a user straight into the database, returning its ID
pub async fn insert_user(db: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users(email, password, user_role) VALUES ($1, '$argon2id$test', 'USER') RETURNING id",
    )
    .bind(email)
    .fetch_one(db)
    .await
    .expect("Could not insert test user")
}

/// Inserts a todo with a fixed modification time, returning its ID
pub async fn insert_todo(
    db: &PgPool,
    owner_id: Option<i64>,
    title: &str,
    modified_at: chrono::DateTime<chrono::Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO todos(title, contents, weather, user_id, modified_at) \
         VALUES ($1, 'contents', 'Sunny', $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(owner_id)
    .bind(modified_at)
    .fetch_one(db)
    .await
    .expect("Could not insert test todo")
}
