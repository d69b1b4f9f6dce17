pub mod db;
pub mod features;
pub mod shared;

use features::auth::commands as auth_commands;
use features::auth::models::AuthSession;
use features::subscriptions::commands as subscription_commands;
use features::subscriptions::editor::EditSession;
use log::{error, info, warn};
use rusqlite::Connection;
use shared::config::get_log_level;
use std::sync::Mutex;
use tauri::Manager;

/// アプリケーション状態（データベース接続・ログイン状態・編集セッションを保持）
pub struct AppState {
    pub db: Mutex<Connection>,
    pub auth: Mutex<Option<AuthSession>>,
    pub editor: Mutex<EditSession>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // ログシステムを初期化
            initialize_logging_system();

            info!("アプリケーション初期化を開始します...");

            // 環境変数を読み込み（.envファイルがある場合）
            if let Err(_) = dotenv::dotenv() {
                // .envファイルがない場合は無視（本番環境では環境変数が直接設定される）
                warn!(".envファイルが見つかりません。環境変数が直接設定されていることを確認してください。");
            } else {
                info!(".envファイルを読み込みました");
            }

            // アプリ起動時にデータベースを初期化
            info!("データベースを初期化しています...");
            let db_conn = db::initialize_database(app.handle())
                .map_err(|e| {
                    error!("データベースの初期化に失敗しました: {e}");
                    e
                })?;

            info!("データベースの初期化が完了しました");

            // データベース接続と各状態をアプリ状態に保存
            app.manage(AppState {
                db: Mutex::new(db_conn),
                auth: Mutex::new(None),
                editor: Mutex::new(EditSession::default()),
            });

            info!("アプリケーション初期化が完了しました");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 認証コマンド
            auth_commands::sign_up,
            auth_commands::sign_in,
            auth_commands::sign_out,
            auth_commands::current_user,
            // サブスクリプションコマンド
            subscription_commands::get_dashboard,
            subscription_commands::delete_subscription,
            // 追加・編集モーダルコマンド
            subscription_commands::open_subscription_editor,
            subscription_commands::update_subscription_draft,
            subscription_commands::cancel_subscription_editor,
            subscription_commands::save_subscription_draft,
        ])
        .run(tauri::generate_context!())
        .expect("Tauriアプリケーションの実行中にエラーが発生しました");
}

/// ログシステムを初期化
fn initialize_logging_system() {
    // ログレベルを設定
    let log_level = get_log_level();

    let filter = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    // env_loggerを初期化
    env_logger::Builder::from_default_env()
        .filter_level(filter)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .init();

    info!("ログシステムを初期化しました: level={log_level}");
}
