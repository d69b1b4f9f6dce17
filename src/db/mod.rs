/// データベース接続管理
pub mod connection;
/// データベースマイグレーション
pub mod migrations;

pub use connection::initialize_database;
