use super::models::{Category, CategoryFilter, PaymentCycle, Subscription};
use chrono::NaiveDate;
use serde::Serialize;

/// 緊急表示の対象となる残り日数の上限（当日から7日後まで）
const URGENT_WINDOW_DAYS: i64 = 7;

/// 表示用サブスクリプション（一覧描画のたびに再計算される）
#[derive(Debug, Serialize, Clone)]
pub struct DisplaySubscription {
    #[serde(flatten)]
    pub subscription: Subscription,
    /// 正規化済みカテゴリ（未設定は「その他」）
    pub display_category: Category,
    /// 次回支払日までの残り日数（支払日未設定の場合はnull）
    pub days_until_renewal: Option<i64>,
    /// 残り日数が0〜7日のとき真
    pub is_urgent: bool,
    /// 月換算金額（年払いのみ価格と異なる）
    pub monthly_equivalent: i64,
}

/// 一覧画面に渡す計算結果一式
#[derive(Debug, Serialize, Clone)]
pub struct DashboardView {
    pub subscriptions: Vec<DisplaySubscription>,
    /// フィルター適用後の月額合計（円）
    pub total_monthly: i64,
}

/// 次回支払日までの残り日数を計算する
///
/// # 引数
/// * `date` - 次回支払日（未設定の場合はNone）
/// * `today` - 今日の日付
///
/// # 戻り値
/// 残り日数。過去日は負、当日は0、翌日は1。支払日未設定はNone。
///
/// # 補足
/// NaiveDateは時刻を持たないため差は常に日単位で割り切れる。
pub fn days_until_renewal(date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    date.map(|d| (d - today).num_days())
}

/// 残り日数が緊急表示の対象かどうかを判定する
///
/// 当日（0日）から7日後までを対象とする。支払日が過ぎたもの（負数）は対象外。
pub fn is_urgent(days_until_renewal: Option<i64>) -> bool {
    matches!(days_until_renewal, Some(days) if (0..=URGENT_WINDOW_DAYS).contains(&days))
}

/// 表示用カテゴリを取得する
///
/// カテゴリ未設定のレコードはすべてここで「その他」に正規化される。
/// フィルター・一覧表示はこの関数経由でのみカテゴリを参照する。
pub fn normalized_category(subscription: &Subscription) -> Category {
    subscription.category.unwrap_or(Category::Other)
}

/// カテゴリでフィルタリングする
///
/// # 引数
/// * `subscriptions` - 対象のサブスクリプション一覧
/// * `filter` - フィルター条件（「すべて」の場合は入力をそのまま返す）
///
/// # 戻り値
/// 条件に合うレコードのみ。順序は入力のまま。
pub fn filter_by_category(
    subscriptions: Vec<Subscription>,
    filter: CategoryFilter,
) -> Vec<Subscription> {
    match filter {
        CategoryFilter::All => subscriptions,
        CategoryFilter::Category(selected) => subscriptions
            .into_iter()
            .filter(|s| normalized_category(s) == selected)
            .collect(),
    }
}

/// 一覧表示用に並び替える
///
/// # 並び順
/// 1. 支払日が近い（緊急）もの
/// 2. 支払日が設定済みで緊急でないもの
/// 3. 支払日未設定のもの
///
/// 同じグループ内では入力順（ストアの新しい順）を保つ安定ソート。
/// 残り日数や日付そのものでは並び替えない。
pub fn sort_for_display(
    mut subscriptions: Vec<Subscription>,
    today: NaiveDate,
) -> Vec<Subscription> {
    subscriptions.sort_by_key(|s| display_rank(s, today));
    subscriptions
}

/// 並び替え用のグループ番号を計算する
fn display_rank(subscription: &Subscription, today: NaiveDate) -> u8 {
    match days_until_renewal(subscription.next_payment_date, today) {
        Some(days) if is_urgent(Some(days)) => 0,
        Some(_) => 1,
        None => 2,
    }
}

/// 月換算金額を計算する
///
/// 月払いは金額そのまま。年払いは12で割って円未満を四捨五入する
/// （0.5円はちょうど切り上げ）。
pub fn monthly_equivalent(subscription: &Subscription) -> i64 {
    match subscription.payment_cycle {
        PaymentCycle::Monthly => subscription.price,
        // 金額は0以上なので整数演算で四捨五入できる
        PaymentCycle::Yearly => (subscription.price + 6) / 12,
    }
}

/// 月額合計を計算する
///
/// # 引数
/// * `subscriptions` - フィルター適用後の一覧
///
/// # 戻り値
/// 月換算金額の合計（円）
pub fn total_monthly_cost(subscriptions: &[Subscription]) -> i64 {
    subscriptions.iter().fold(0, |acc, s| {
        acc + monthly_equivalent(s)
    })
}

/// 一覧画面に渡す計算結果一式を組み立てる
///
/// # 処理内容
/// 1. カテゴリでフィルタリング
/// 2. フィルター適用後の月額合計を計算
/// 3. 緊急度順に並び替え
/// 4. 表示用の計算値を付与
pub fn build_dashboard(
    subscriptions: Vec<Subscription>,
    filter: CategoryFilter,
    today: NaiveDate,
) -> DashboardView {
    let filtered = filter_by_category(subscriptions, filter);
    let total_monthly = total_monthly_cost(&filtered);
    let subscriptions = sort_for_display(filtered, today)
        .into_iter()
        .map(|s| to_display(s, today))
        .collect();

    DashboardView {
        subscriptions,
        total_monthly,
    }
}

/// 1件分の表示用データを組み立てる
fn to_display(subscription: Subscription, today: NaiveDate) -> DisplaySubscription {
    let days = days_until_renewal(subscription.next_payment_date, today);

    DisplaySubscription {
        display_category: normalized_category(&subscription),
        days_until_renewal: days,
        is_urgent: is_urgent(days),
        monthly_equivalent: monthly_equivalent(&subscription),
        subscription,
    }
}
