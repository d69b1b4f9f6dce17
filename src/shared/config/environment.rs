/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 現在の実行環境を判定する
///
/// # 戻り値
/// 現在の実行環境（Development または Production）
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    // コンパイル時埋め込み環境変数を最優先
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        return parse_environment(embedded_env);
    }

    // 実行時環境変数を確認
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        return parse_environment(&env_var);
    }

    // フォールバック: ビルド設定に基づく判定
    if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    }
}

/// 環境変数の値を実行環境に変換する
fn parse_environment(value: &str) -> Environment {
    match value {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

/// ログレベル設定を取得する
///
/// # 戻り値
/// ログレベル文字列（未設定時は "info"）
///
/// # 判定ロジック
/// コンパイル時埋め込み値 → 実行時環境変数 LOG_LEVEL → "info" の順
pub fn get_log_level() -> String {
    if let Some(embedded_level) = option_env!("EMBEDDED_LOG_LEVEL") {
        return embedded_level.to_string();
    }

    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// 環境に応じたデータベースファイル名を取得する
///
/// # 引数
/// * `env` - 実行環境
///
/// # 戻り値
/// データベースファイル名
///
/// # ファイル名の規則
/// - 開発環境: "dev_subsclist.db"
/// - プロダクション環境: "subsclist.db"
pub fn get_database_filename(env: Environment) -> &'static str {
    match env {
        Environment::Development => "dev_subsclist.db",
        Environment::Production => "subsclist.db",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_database_filename() {
        // 開発環境のデータベースファイル名をテスト
        assert_eq!(
            get_database_filename(Environment::Development),
            "dev_subsclist.db"
        );

        // プロダクション環境のデータベースファイル名をテスト
        assert_eq!(
            get_database_filename(Environment::Production),
            "subsclist.db"
        );
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("development"), Environment::Development);
        // 未知の値は開発環境として扱う
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn test_get_environment() {
        // 現在の環境を取得（実際の値はビルド設定に依存）
        let env = get_environment();

        // デバッグビルドかリリースビルドかのいずれかであることを確認
        assert!(matches!(
            env,
            Environment::Development | Environment::Production
        ));
    }

    #[test]
    fn test_get_log_level_is_not_empty() {
        // 既定値またはビルド設定由来の値が返ること
        assert!(!get_log_level().is_empty());
    }
}
