pub mod migrations;
pub mod pool;
pub mod profiles;

pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_POOL_SIZE, DbPoolError, PgPool, create_pool_from_url};
