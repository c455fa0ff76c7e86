pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS results (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL,
    payload_json TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_results_kind_created
    ON results(kind, created_at DESC);
"#;
