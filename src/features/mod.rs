/// 機能モジュール
pub mod auth;
pub mod subscriptions;
