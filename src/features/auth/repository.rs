use super::models::{AuthSession, StoredCredentials, User};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::nanoid::generate_user_id;
use chrono::Utc;
use chrono_tz::Asia::Tokyo;
use rusqlite::{params, Connection, OptionalExtension};

/// ユーザーを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `email` - メールアドレス（検証済み）
/// * `password_hash` - ソルト付きパスワードハッシュ
/// * `salt` - ハッシュに使用したソルト
///
/// # 戻り値
/// 作成されたユーザー、または失敗時はエラー
pub fn create_user(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    salt: &str,
) -> AppResult<User> {
    let user_id = generate_user_id();

    // JSTで現在時刻を取得
    let now = Utc::now().with_timezone(&Tokyo).to_rfc3339();

    conn.execute(
        "INSERT INTO users (id, email, password_hash, salt, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, email, password_hash, salt, now, now],
    )?;

    Ok(User {
        id: user_id,
        email: email.to_string(),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// メールアドレスで保存済み認証情報を取得する
///
/// # 引数
/// * `conn` - データベース接続
/// * `email` - メールアドレス
///
/// # 戻り値
/// 認証情報（存在しない場合はNone）、または失敗時はエラー
pub fn find_credentials_by_email(
    conn: &Connection,
    email: &str,
) -> AppResult<Option<StoredCredentials>> {
    conn.query_row(
        "SELECT id, email, password_hash, salt, created_at, updated_at
         FROM users WHERE email = ?1",
        params![email],
        |row| {
            Ok(StoredCredentials {
                user: User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                },
                password_hash: row.get(2)?,
                salt: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| AppError::Database(e.to_string()))
}

/// セッションを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `user` - ログインするユーザー
///
/// # 戻り値
/// 作成されたセッション、または失敗時はエラー
pub fn create_session(conn: &Connection, user: &User) -> AppResult<AuthSession> {
    let session_id = uuid::Uuid::new_v4().to_string();

    // JSTで現在時刻を取得
    let now = Utc::now().with_timezone(&Tokyo).to_rfc3339();

    conn.execute(
        "INSERT INTO sessions (id, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![session_id, user.id, now],
    )?;

    Ok(AuthSession {
        id: session_id,
        user_id: user.id.clone(),
        email: user.email.clone(),
        created_at: now,
    })
}

/// セッションを取得する
///
/// # 引数
/// * `conn` - データベース接続
/// * `session_id` - セッションID
///
/// # 戻り値
/// セッション（存在しない場合はNone）、または失敗時はエラー
pub fn find_session(conn: &Connection, session_id: &str) -> AppResult<Option<AuthSession>> {
    conn.query_row(
        "SELECT s.id, s.user_id, u.email, s.created_at
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.id = ?1",
        params![session_id],
        |row| {
            Ok(AuthSession {
                id: row.get(0)?,
                user_id: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| AppError::Database(e.to_string()))
}

/// セッションを削除する
///
/// # 引数
/// * `conn` - データベース接続
/// * `session_id` - セッションID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
///
/// 既に存在しないセッションの削除はエラーにしない。
pub fn delete_session(conn: &Connection, session_id: &str) -> AppResult<()> {
    conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;
    Ok(())
}
