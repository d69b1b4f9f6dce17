use crate::shared::config::{initialize_application, log_initialization_complete};
use crate::shared::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;
use tauri::AppHandle;

/// データベース接続を初期化し、マイグレーションを実行する
///
/// # 引数
/// * `app_handle` - Tauriアプリケーションハンドル
///
/// # 戻り値
/// データベース接続、または失敗時はエラーメッセージ
///
/// # 処理内容
/// 1. アプリケーション全体の初期化を実行
/// 2. データベース接続を開く
/// 3. 初期化完了ログを出力
pub fn initialize_database(app_handle: &AppHandle) -> Result<Connection, String> {
    // アプリケーション全体の初期化を実行
    let init_result = initialize_application(app_handle)?;

    // データベース接続を開く
    let conn = open_database(&init_result.database_path)
        .map_err(|e| format!("データベースのオープンに失敗しました: {}", e.details()))?;

    // 初期化完了ログを出力
    log_initialization_complete(&init_result);

    Ok(conn)
}

/// 指定パスのデータベースを開き、接続ごとの設定を適用する
///
/// # 引数
/// * `database_path` - データベースファイルのパス
///
/// # 戻り値
/// データベース接続、または失敗時はエラー
pub fn open_database(database_path: &Path) -> AppResult<Connection> {
    let conn = Connection::open(database_path)?;

    // 外部キー制約は接続単位でしか有効にならない
    conn.execute_batch("PRAGMA foreign_keys = ON")?;

    Ok(conn)
}
