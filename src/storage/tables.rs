use redb::TableDefinition;

/// Users: user_id -> User (msgpack)
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Unique index: email -> user_id
pub const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");

/// Tokens: token string -> Token (msgpack)
pub const TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("tokens");

/// Secondary index: user_id -> most recently issued token string
pub const ACTIVE_TOKENS: TableDefinition<u64, &str> = TableDefinition::new("active_tokens");

/// Id allocation: sequence name -> last allocated id
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub const USER_SEQUENCE: &str = "users";
pub const TOKEN_SEQUENCE: &str = "tokens";
