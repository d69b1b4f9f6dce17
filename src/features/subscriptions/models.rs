use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 支払いサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCycle {
    /// 月払い
    #[default]
    Monthly,
    /// 年払い
    Yearly,
}

impl PaymentCycle {
    /// データベース保存用の文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCycle::Monthly => "monthly",
            PaymentCycle::Yearly => "yearly",
        }
    }

    /// データベースの文字列表現から変換する
    ///
    /// # 戻り値
    /// 未知の値の場合はNone
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(PaymentCycle::Monthly),
            "yearly" => Some(PaymentCycle::Yearly),
            _ => None,
        }
    }
}

/// サブスクリプションのカテゴリ
///
/// 固定の5種類。画面のフィルターボタンと編集モーダルの選択肢で共有する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// エンタメ
    Entertainment,
    /// 生活
    Living,
    /// 学習
    Learning,
    /// 仕事
    Work,
    /// その他
    Other,
}

impl Category {
    /// 画面表示順の全カテゴリ
    pub const ALL: [Category; 5] = [
        Category::Entertainment,
        Category::Living,
        Category::Learning,
        Category::Work,
        Category::Other,
    ];

    /// データベース保存用の文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::Living => "living",
            Category::Learning => "learning",
            Category::Work => "work",
            Category::Other => "other",
        }
    }

    /// データベースの文字列表現から変換する
    ///
    /// # 戻り値
    /// 未知の値の場合はNone（読み出し側では「その他」として扱われる）
    pub fn parse(value: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// カテゴリフィルター
///
/// 「すべて」の番兵値を含む。フィルターバーの選択状態そのもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// すべてのカテゴリ
    All,
    /// 特定カテゴリのみ
    #[serde(untagged)]
    Category(Category),
}

/// サブスクリプションデータモデル
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub user_id: String,                      // 所有ユーザーID（nanoId形式）
    pub name: String,                         // サービス名
    pub price: i64,                           // 金額（円、0以上）
    pub payment_cycle: PaymentCycle,          // 月払い・年払い
    pub category: Option<Category>,           // 未設定は「その他」扱いで表示される
    pub next_payment_date: Option<NaiveDate>, // 次回支払日（任意）
    pub created_at: String,                   // RFC3339形式（JST）
    pub updated_at: String,                   // RFC3339形式（JST）
}

/// サブスクリプション保存用DTO（新規作成・更新共通）
///
/// IDと所有者・タイムスタンプはストア側で付与するため含まない。
/// 更新時はこの内容でレコード全体を置き換える。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubscriptionInput {
    pub name: String,
    pub price: i64,
    pub payment_cycle: PaymentCycle,
    pub category: Option<Category>,
    pub next_payment_date: Option<NaiveDate>,
}
