pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://recipe_box.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_SESSION_SECRET: &str = "dev-session-secret-change-me";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 14 * 24;
pub const DEFAULT_SECURE_COOKIES: bool = false;
