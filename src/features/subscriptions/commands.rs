use super::editor::{Draft, DraftField, SaveOutcome};
use super::models::CategoryFilter;
use super::repository::{self, SqliteSubscriptionStore};
use super::view_model::{self, DashboardView};
use crate::shared::errors::AppError;
use crate::AppState;
use chrono::Utc;
use chrono_tz::Asia::Tokyo;
use tauri::State;

/// 現在ログイン中のユーザーIDを取得する
///
/// # 戻り値
/// ユーザーID、または未ログイン時はエラーメッセージ
fn current_user_id(state: &State<'_, AppState>) -> Result<String, String> {
    let auth = state
        .auth
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;

    auth.as_ref()
        .map(|session| session.user_id.clone())
        .ok_or_else(|| AppError::auth("ログインが必要です").into())
}

/// 一覧画面の表示内容を取得する
///
/// # 引数
/// * `filter` - カテゴリフィルター（"all" ですべて）
/// * `state` - アプリケーション状態
///
/// # 戻り値
/// フィルター・並び替え・月額合計を適用済みの表示内容、または失敗時はエラーメッセージ
#[tauri::command]
pub async fn get_dashboard(
    filter: CategoryFilter,
    state: State<'_, AppState>,
) -> Result<DashboardView, String> {
    let user_id = current_user_id(&state)?;

    // データベース接続を取得
    let db = state
        .db
        .lock()
        .map_err(|e| format!("データベースロックエラー: {e}"))?;

    let subscriptions = repository::find_all(&db, &user_id)?;

    // 残り日数の判定は日本時間の暦日で行う
    let today = Utc::now().with_timezone(&Tokyo).date_naive();

    Ok(view_model::build_dashboard(subscriptions, filter, today))
}

/// 追加・編集モーダルを開く
///
/// # 引数
/// * `id` - 編集対象のサブスクリプションID。Noneなら新規追加モード
/// * `state` - アプリケーション状態
///
/// # 戻り値
/// モーダルの初期表示に使うドラフト、または失敗時はエラーメッセージ
#[tauri::command]
pub async fn open_subscription_editor(
    id: Option<i64>,
    state: State<'_, AppState>,
) -> Result<Draft, String> {
    let mut editor = state
        .editor
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;

    match id {
        None => Ok(editor.open_for_create()),
        Some(id) => {
            let user_id = current_user_id(&state)?;

            let db = state
                .db
                .lock()
                .map_err(|e| format!("データベースロックエラー: {e}"))?;

            let subscription = repository::find_by_id(&db, id, &user_id)?;
            Ok(editor.open_for_edit(&subscription))
        }
    }
}

/// ドラフトの1フィールドを更新する
///
/// # 引数
/// * `field` - 更新対象フィールドと新しい値
/// * `state` - アプリケーション状態
#[tauri::command]
pub async fn update_subscription_draft(
    field: DraftField,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let mut editor = state
        .editor
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;

    editor.update_field(field)?;
    Ok(())
}

/// 追加・編集モーダルをキャンセルして閉じる
///
/// ドラフトは破棄され、データベースには一切アクセスしない。
#[tauri::command]
pub async fn cancel_subscription_editor(state: State<'_, AppState>) -> Result<(), String> {
    let mut editor = state
        .editor
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;

    editor.cancel();
    Ok(())
}

/// ドラフトを保存する（新規追加または更新）
///
/// # 戻り値
/// 保存結果、または失敗時はエラーメッセージ。
/// 成功時はフロントエンド側で一覧を再取得する。
#[tauri::command]
pub async fn save_subscription_draft(state: State<'_, AppState>) -> Result<SaveOutcome, String> {
    let user_id = current_user_id(&state)?;

    let mut editor = state
        .editor
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;

    let db = state
        .db
        .lock()
        .map_err(|e| format!("データベースロックエラー: {e}"))?;

    let mut store = SqliteSubscriptionStore::new(&db, &user_id);
    let outcome = editor.save(&mut store)?;

    log::info!("サブスクリプションを保存しました: {outcome:?}");
    Ok(outcome)
}

/// サブスクリプションを削除する
///
/// # 引数
/// * `id` - サブスクリプションID
/// * `confirmed` - 確認ダイアログの結果
/// * `state` - アプリケーション状態
///
/// # 戻り値
/// 削除した場合はtrue。確認がキャンセルされた場合は何もせずfalse。
#[tauri::command]
pub async fn delete_subscription(
    id: i64,
    confirmed: bool,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    // 確認ダイアログでキャンセルされた場合は何もしない
    if !confirmed {
        return Ok(false);
    }

    let user_id = current_user_id(&state)?;

    let db = state
        .db
        .lock()
        .map_err(|e| format!("データベースロックエラー: {e}"))?;

    repository::delete(&db, id, &user_id)?;

    log::info!("サブスクリプションを削除しました: id={id}");
    Ok(true)
}
