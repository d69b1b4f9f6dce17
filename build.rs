use std::env;

fn main() {
    // ビルド時に環境変数を埋め込む
    // 環境変数は外部（スクリプトや `pnpm tauri dev` 実行時の .env ファイル）から提供されることを前提とする
    // 開発環境（pnpm tauri dev）では .env ファイルが自動的に読み込まれる

    if let Ok(environment) = env::var("ENVIRONMENT") {
        println!("cargo:rustc-env=EMBEDDED_ENVIRONMENT={}", environment);
        println!("cargo:warning=ビルド環境: {}", environment);
    }

    // ログレベル
    if let Ok(log_level) = env::var("LOG_LEVEL") {
        println!("cargo:rustc-env=EMBEDDED_LOG_LEVEL={}", log_level);
    }

    tauri_build::build()
}
