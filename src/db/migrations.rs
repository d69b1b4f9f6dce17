use rusqlite::{Connection, Result};

/// すべてのデータベースマイグレーションを実行する
///
/// # 引数
/// * `conn` - データベース接続
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // ユーザーテーブルを作成
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // セッションテーブルを作成
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        [],
    )?;

    // サブスクリプションテーブルを作成
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subscriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            price INTEGER NOT NULL CHECK(price >= 0),
            payment_cycle TEXT NOT NULL CHECK(payment_cycle IN ('monthly', 'yearly')),
            category TEXT,
            next_payment_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // サブスクリプションテーブルのインデックスを作成
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subscriptions_category ON subscriptions(category)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_migrations_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // 各テーブルが作成されていることを確認
        for table in ["users", "sessions", "subscriptions"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "テーブル {table} が存在しません");
        }
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_price_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // 負の金額は挿入できない
        let result = conn.execute(
            "INSERT INTO subscriptions (user_id, name, price, payment_cycle, created_at, updated_at)
             VALUES ('u1', 'Netflix', -100, 'monthly', '2025-01-01', '2025-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_payment_cycle_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // 未知の支払いサイクルは挿入できない
        let result = conn.execute(
            "INSERT INTO subscriptions (user_id, name, price, payment_cycle, created_at, updated_at)
             VALUES ('u1', 'Netflix', 100, 'weekly', '2025-01-01', '2025-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
