use serde::{Deserialize, Serialize};

/// ユーザーデータモデル（認証情報は含まない）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,         // nanoId形式
    pub email: String,
    pub created_at: String, // RFC3339形式（JST）
    pub updated_at: String, // RFC3339形式（JST）
}

/// ログイン中のセッション
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthSession {
    pub id: String,      // セッションID（UUID v4）
    pub user_id: String,
    pub email: String,
    pub created_at: String,
}

/// フロントエンドへ返す現在のユーザー情報
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

impl From<&AuthSession> for CurrentUser {
    fn from(session: &AuthSession) -> Self {
        Self {
            id: session.user_id.clone(),
            email: session.email.clone(),
        }
    }
}

/// 保存済み認証情報（パスワード検証用、リポジトリ内部でのみ使用）
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
    pub salt: String,
}
