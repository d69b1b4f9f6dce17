use super::models::{AuthSession, User};
use super::repository;
use crate::shared::errors::{AppError, AppResult};
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

/// メールアドレスの形式検証用パターン
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("固定パターンは常に有効"));

/// パスワードの最小文字数
const MIN_PASSWORD_LENGTH: usize = 8;

/// ソルトの文字数
const SALT_LENGTH: usize = 32;

/// 新規ユーザーを登録する
///
/// # 引数
/// * `conn` - データベース接続
/// * `email` - メールアドレス
/// * `password` - パスワード（平文）
///
/// # 戻り値
/// 作成されたユーザー、または失敗時はエラー
///
/// 登録してもログイン状態にはならない。ユーザーは改めてサインインする。
pub fn sign_up(conn: &Connection, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim();

    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation(
            "メールアドレスの形式が正しくありません",
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "パスワードは{MIN_PASSWORD_LENGTH}文字以上で入力してください"
        )));
    }

    if repository::find_credentials_by_email(conn, email)?.is_some() {
        return Err(AppError::validation(
            "このメールアドレスは既に登録されています",
        ));
    }

    let salt = generate_salt();
    let password_hash = hash_password(password, &salt);

    let user = repository::create_user(conn, email, &password_hash, &salt)?;
    log::info!("ユーザーを登録しました: user_id={}", user.id);

    Ok(user)
}

/// サインインしてセッションを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `email` - メールアドレス
/// * `password` - パスワード（平文）
///
/// # 戻り値
/// 作成されたセッション、または失敗時はエラー
pub fn sign_in(conn: &Connection, email: &str, password: &str) -> AppResult<AuthSession> {
    let credentials = repository::find_credentials_by_email(conn, email.trim())?
        .ok_or_else(invalid_credentials)?;

    if hash_password(password, &credentials.salt) != credentials.password_hash {
        return Err(invalid_credentials());
    }

    let session = repository::create_session(conn, &credentials.user)?;
    log::info!("ログインしました: user_id={}", session.user_id);

    Ok(session)
}

/// サインアウトしてセッションを破棄する
///
/// # 引数
/// * `conn` - データベース接続
/// * `session_id` - セッションID
pub fn sign_out(conn: &Connection, session_id: &str) -> AppResult<()> {
    repository::delete_session(conn, session_id)?;
    log::info!("ログアウトしました: session_id={session_id}");
    Ok(())
}

/// セッションが有効かどうかを確認する
///
/// # 引数
/// * `conn` - データベース接続
/// * `session_id` - セッションID
///
/// # 戻り値
/// 有効なセッション（存在しない場合はNone）、または失敗時はエラー
pub fn current_session(conn: &Connection, session_id: &str) -> AppResult<Option<AuthSession>> {
    repository::find_session(conn, session_id)
}

/// メールアドレス・パスワード不一致時のエラーを作成する
///
/// ユーザーの存在有無を外から区別できないよう、どちらの場合も同じメッセージを返す。
fn invalid_credentials() -> AppError {
    AppError::auth("メールアドレスまたはパスワードが正しくありません")
}

/// ソルト付きでパスワードをハッシュ化する
///
/// # 引数
/// * `password` - パスワード（平文）
/// * `salt` - ユーザーごとのソルト
///
/// # 戻り値
/// SHA-256ハッシュの16進文字列表現
fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// ランダムなソルトを生成する
fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect()
}
