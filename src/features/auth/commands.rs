use super::models::CurrentUser;
use super::service;
use crate::AppState;
use tauri::State;

/// 新規ユーザーを登録する
///
/// # 引数
/// * `email` - メールアドレス
/// * `password` - パスワード
/// * `state` - アプリケーション状態
///
/// # 戻り値
/// 成功時はOk(())、失敗時はエラーメッセージ
///
/// 登録が成功してもログイン状態にはならない。
#[tauri::command]
pub async fn sign_up(
    email: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    // データベース接続を取得
    let db = state
        .db
        .lock()
        .map_err(|e| format!("データベースロックエラー: {e}"))?;

    service::sign_up(&db, &email, &password)?;
    Ok(())
}

/// サインインする
///
/// # 引数
/// * `email` - メールアドレス
/// * `password` - パスワード
/// * `state` - アプリケーション状態
///
/// # 戻り値
/// ログインしたユーザー情報、または失敗時はエラーメッセージ
#[tauri::command]
pub async fn sign_in(
    email: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<CurrentUser, String> {
    let session = {
        let db = state
            .db
            .lock()
            .map_err(|e| format!("データベースロックエラー: {e}"))?;

        service::sign_in(&db, &email, &password)?
    };

    let current = CurrentUser::from(&session);

    // ログイン状態を更新
    let mut auth = state
        .auth
        .lock()
        .map_err(|e| format!("状態ロックエラー: {e}"))?;
    *auth = Some(session);

    Ok(current)
}

/// サインアウトする
///
/// ログイン状態を解除する。セッション行の削除に失敗しても
/// ログアウト自体は成立させ、失敗はログに残すのみとする。
#[tauri::command]
pub async fn sign_out(state: State<'_, AppState>) -> Result<(), String> {
    let session = {
        let mut auth = state
            .auth
            .lock()
            .map_err(|e| format!("状態ロックエラー: {e}"))?;
        auth.take()
    };

    if let Some(session) = session {
        let db = state
            .db
            .lock()
            .map_err(|e| format!("データベースロックエラー: {e}"))?;

        if let Err(e) = service::sign_out(&db, &session.id) {
            log::warn!("セッション行の削除に失敗しました: {}", e.details());
        }
    }

    Ok(())
}

/// 現在ログイン中のユーザーを取得する
///
/// # 戻り値
/// ログイン中のユーザー情報。未ログインの場合はNone。
///
/// セッション行がデータベースから消えていた場合は
/// ログイン状態も解除してNoneを返す。
#[tauri::command]
pub async fn current_user(state: State<'_, AppState>) -> Result<Option<CurrentUser>, String> {
    let session = {
        let auth = state
            .auth
            .lock()
            .map_err(|e| format!("状態ロックエラー: {e}"))?;
        auth.clone()
    };

    let Some(session) = session else {
        return Ok(None);
    };

    let stored = {
        let db = state
            .db
            .lock()
            .map_err(|e| format!("データベースロックエラー: {e}"))?;

        service::current_session(&db, &session.id)?
    };

    match stored {
        Some(stored) => Ok(Some(CurrentUser::from(&stored))),
        None => {
            // セッションが無効になっていたらログイン状態を解除する
            let mut auth = state
                .auth
                .lock()
                .map_err(|e| format!("状態ロックエラー: {e}"))?;
            *auth = None;

            Ok(None)
        }
    }
}
