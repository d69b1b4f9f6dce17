/// サブスクリプション管理機能
///
/// - models: データモデルとDTO
/// - view_model: 一覧表示用の計算ロジック（残り日数・並び順・月額合計）
/// - editor: 追加・編集モーダルの状態管理
/// - repository: SQLiteによる永続化
/// - commands: Tauriコマンド
pub mod commands;
pub mod editor;
pub mod models;
pub mod repository;
pub mod view_model;
