/// Database plumbing
///
/// - `pool`: PostgreSQL connection pool construction and health check
/// - `migrations`: embedded migration runner

pub mod migrations;
pub mod pool;
