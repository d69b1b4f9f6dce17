/// アプリケーション全体で共有されるモジュール
pub mod config;
pub mod errors;
pub mod utils;
