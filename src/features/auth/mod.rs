/// 認証機能（ローカルアカウント）
///
/// - models: ユーザー・セッションのデータモデル
/// - repository: users / sessions テーブルの操作
/// - service: サインアップ・サインイン・サインアウトの業務ロジック
/// - commands: Tauriコマンド
pub mod commands;
pub mod models;
pub mod repository;
pub mod service;
