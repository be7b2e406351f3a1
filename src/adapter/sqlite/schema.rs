/// Idempotent schema for the keyword list and classification history.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS spam_keyword (
    id INTEGER PRIMARY KEY,
    word VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS email_record (
    id INTEGER PRIMARY KEY,
    email_text TEXT NOT NULL,
    result VARCHAR(50) NOT NULL,
    confidence VARCHAR(20),
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";
