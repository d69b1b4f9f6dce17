use super::editor::SubscriptionStore;
use super::models::{Category, PaymentCycle, Subscription, SubscriptionInput};
use crate::shared::errors::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Tokyo;
use rusqlite::{params, Connection, Row};

/// 一覧・単体取得で共通して使う列並び
const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, name, price, payment_cycle, category, next_payment_date, created_at, updated_at";

/// サブスクリプションを作成する
///
/// # 引数
/// * `conn` - データベース接続
/// * `input` - サブスクリプション保存用DTO
/// * `user_id` - 所有ユーザーID
///
/// # 戻り値
/// 作成されたサブスクリプション、または失敗時はエラー
pub fn create(
    conn: &Connection,
    input: &SubscriptionInput,
    user_id: &str,
) -> AppResult<Subscription> {
    // JSTで現在時刻を取得
    let now = Utc::now().with_timezone(&Tokyo).to_rfc3339();

    conn.execute(
        "INSERT INTO subscriptions (user_id, name, price, payment_cycle, category, next_payment_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user_id,
            input.name,
            input.price,
            input.payment_cycle.as_str(),
            input.category.map(|c| c.as_str()),
            input.next_payment_date.map(|d| d.to_string()),
            now,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id, user_id)
}

/// IDでサブスクリプションを取得する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サブスクリプションID
/// * `user_id` - 所有ユーザーID
///
/// # 戻り値
/// サブスクリプション、または失敗時はエラー
pub fn find_by_id(conn: &Connection, id: i64, user_id: &str) -> AppResult<Subscription> {
    conn.query_row(
        &format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ?1 AND user_id = ?2"
        ),
        params![id, user_id],
        row_to_subscription,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::not_found("サブスクリプション"),
        _ => AppError::Database(e.to_string()),
    })
}

/// サブスクリプション一覧を取得する
///
/// # 引数
/// * `conn` - データベース接続
/// * `user_id` - 所有ユーザーID
///
/// # 戻り値
/// 登録が新しい順のサブスクリプションのリスト、または失敗時はエラー
pub fn find_all(conn: &Connection, user_id: &str) -> AppResult<Vec<Subscription>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
         WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;

    let subscriptions = stmt.query_map([user_id], row_to_subscription)?;

    subscriptions
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))
}

/// サブスクリプションを更新する
///
/// 部分更新ではなく、DTOの内容でレコード全体を置き換える。
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サブスクリプションID
/// * `input` - サブスクリプション保存用DTO
/// * `user_id` - 所有ユーザーID
///
/// # 戻り値
/// 更新されたサブスクリプション、または失敗時はエラー
pub fn update(
    conn: &Connection,
    id: i64,
    input: &SubscriptionInput,
    user_id: &str,
) -> AppResult<Subscription> {
    // JSTで現在時刻を取得
    let now = Utc::now().with_timezone(&Tokyo).to_rfc3339();

    let affected_rows = conn.execute(
        "UPDATE subscriptions
         SET name = ?1, price = ?2, payment_cycle = ?3, category = ?4, next_payment_date = ?5, updated_at = ?6
         WHERE id = ?7 AND user_id = ?8",
        params![
            input.name,
            input.price,
            input.payment_cycle.as_str(),
            input.category.map(|c| c.as_str()),
            input.next_payment_date.map(|d| d.to_string()),
            now,
            id,
            user_id
        ],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("サブスクリプション"));
    }

    find_by_id(conn, id, user_id)
}

/// サブスクリプションを削除する
///
/// # 引数
/// * `conn` - データベース接続
/// * `id` - サブスクリプションID
/// * `user_id` - 所有ユーザーID
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラー
pub fn delete(conn: &Connection, id: i64, user_id: &str) -> AppResult<()> {
    let affected_rows = conn.execute(
        "DELETE FROM subscriptions WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if affected_rows == 0 {
        return Err(AppError::not_found("サブスクリプション"));
    }

    Ok(())
}

/// 1行分をデータモデルに変換する
fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let cycle_text: String = row.get(4)?;
    let payment_cycle = PaymentCycle::parse(&cycle_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("不正な支払いサイクル: {cycle_text}").into(),
        )
    })?;

    // 未知のカテゴリ値は未設定として読み出す（表示側で「その他」になる）
    let category_text: Option<String> = row.get(5)?;
    let category = category_text.as_deref().and_then(Category::parse);

    let date_text: Option<String> = row.get(6)?;
    let next_payment_date = date_text
        .map(|t| {
            NaiveDate::parse_from_str(&t, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()?;

    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        payment_cycle,
        category,
        next_payment_date,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// 編集セッションから利用するSQLite保存先
///
/// 現在ログイン中のユーザーに紐づけて挿入・更新を行う。
pub struct SqliteSubscriptionStore<'a> {
    conn: &'a Connection,
    user_id: &'a str,
}

impl<'a> SqliteSubscriptionStore<'a> {
    /// 指定ユーザーに紐づく保存先を作成する
    pub fn new(conn: &'a Connection, user_id: &'a str) -> Self {
        Self { conn, user_id }
    }
}

impl SubscriptionStore for SqliteSubscriptionStore<'_> {
    fn insert(&mut self, input: &SubscriptionInput) -> AppResult<i64> {
        create(self.conn, input, self.user_id).map(|s| s.id)
    }

    fn update(&mut self, id: i64, input: &SubscriptionInput) -> AppResult<()> {
        update(self.conn, id, input, self.user_id).map(|_| ())
    }
}
