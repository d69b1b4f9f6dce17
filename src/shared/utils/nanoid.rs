use nanoid::nanoid;

/// ユーザーID用のnanoIdを生成する
///
/// # 戻り値
/// 21文字のURL-safeなnanoId
///
/// # 特性
/// - 文字セット: A-Za-z0-9_- (64文字)
/// - 長さ: 21文字
/// - 衝突確率: 1兆個のIDで1%未満
pub fn generate_user_id() -> String {
    nanoid!()
}

/// ユーザーIDが有効な形式かどうかを検証する
///
/// # 引数
/// * `id` - 検証するID文字列
///
/// # 戻り値
/// 有効な場合はtrue、無効な場合はfalse
///
/// # 検証条件
/// - 長さが21文字
/// - URL-safe文字（A-Za-z0-9_-）のみを含む
pub fn is_valid_user_id(id: &str) -> bool {
    id.len() == 21
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
