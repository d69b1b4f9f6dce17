use super::models::{Category, PaymentCycle, Subscription, SubscriptionInput};
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 編集モーダルで新規作成時に選択済みとして表示するカテゴリ
const DEFAULT_DRAFT_CATEGORY: Category = Category::ALL[0];

/// 入力中のドラフト
///
/// モーダルの各入力欄に対応する一時データ。保存されるまで永続化されない。
/// 金額は入力欄の生テキストのまま保持し、保存時に数値へ変換する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub price: String,
    pub payment_cycle: PaymentCycle,
    pub category: Category,
    pub next_payment_date: Option<NaiveDate>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            payment_cycle: PaymentCycle::Monthly,
            category: DEFAULT_DRAFT_CATEGORY,
            next_payment_date: None,
        }
    }
}

impl Draft {
    /// 既存レコードからドラフトを作成する
    ///
    /// 各フィールドをそのまま写す。カテゴリ未設定のレコードは
    /// モーダルが常に具体的な選択肢を表示できるよう既定値で埋める。
    fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            name: subscription.name.clone(),
            price: subscription.price.to_string(),
            payment_cycle: subscription.payment_cycle,
            category: subscription.category.unwrap_or(DEFAULT_DRAFT_CATEGORY),
            next_payment_date: subscription.next_payment_date,
        }
    }

    /// ドラフトを検証して保存用DTOに変換する
    ///
    /// # 戻り値
    /// 保存用DTO、または入力不備の場合はバリデーションエラー
    ///
    /// ドラフト自体は変更しない（失敗しても入力内容は残る）。
    fn validate(&self) -> AppResult<SubscriptionInput> {
        let name = self.name.trim();
        let price_text = self.price.trim();

        if name.is_empty() || price_text.is_empty() {
            return Err(AppError::validation("サービス名と金額を入力してください"));
        }

        let price: i64 = price_text
            .parse()
            .map_err(|_| AppError::validation("金額には数値を入力してください"))?;

        if price < 0 {
            return Err(AppError::validation("金額は0以上で入力してください"));
        }

        Ok(SubscriptionInput {
            name: name.to_string(),
            price,
            payment_cycle: self.payment_cycle,
            category: Some(self.category),
            next_payment_date: self.next_payment_date,
        })
    }
}

/// ドラフトの1フィールド分の更新内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftField {
    Name(String),
    Price(String),
    PaymentCycle(PaymentCycle),
    Category(Category),
    NextPaymentDate(Option<NaiveDate>),
}

/// 保存結果
///
/// いずれの場合もフロントエンド側は一覧を再取得する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum SaveOutcome {
    /// 新規作成した（値は発行されたID）
    Created(i64),
    /// 既存レコードを更新した
    Updated(i64),
}

/// レコード保存先の抽象
///
/// SQLite実装はrepositoryにある。テストではモックに差し替える。
pub trait SubscriptionStore {
    /// 新規レコードを挿入し、発行されたIDを返す
    fn insert(&mut self, input: &SubscriptionInput) -> AppResult<i64>;

    /// 既存レコードをドラフトの内容で丸ごと置き換える
    fn update(&mut self, id: i64, input: &SubscriptionInput) -> AppResult<()>;
}

/// 追加・編集モーダルの状態機械
///
/// Idle（モーダル非表示）とEditing（入力中）の2状態のみ。
/// ドラフトはEditing状態の中にしか存在せず、保存成功または
/// キャンセルで必ず破棄される。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditSession {
    /// モーダル非表示
    #[default]
    Idle,
    /// 入力中
    Editing {
        draft: Draft,
        /// 編集対象のID。Noneなら新規追加モード
        editing_id: Option<i64>,
    },
}

impl EditSession {
    /// 新規追加モードでモーダルを開く
    ///
    /// どの状態からでも呼べる。ドラフトは既定値にリセットされる。
    ///
    /// # 戻り値
    /// 画面の初期表示に使うドラフトの内容
    pub fn open_for_create(&mut self) -> Draft {
        let draft = Draft::default();
        *self = EditSession::Editing {
            draft: draft.clone(),
            editing_id: None,
        };
        draft
    }

    /// 編集モードでモーダルを開く
    ///
    /// # 引数
    /// * `subscription` - 編集対象のレコード。全フィールドがドラフトに写される
    ///
    /// # 戻り値
    /// 画面の初期表示に使うドラフトの内容
    pub fn open_for_edit(&mut self, subscription: &Subscription) -> Draft {
        let draft = Draft::from_subscription(subscription);
        *self = EditSession::Editing {
            draft: draft.clone(),
            editing_id: Some(subscription.id),
        };
        draft
    }

    /// ドラフトの1フィールドを置き換える
    ///
    /// この時点では入力内容の検証は行わない（検証は保存時）。
    ///
    /// # 戻り値
    /// 成功時はOk(())、モーダルが開いていない場合はバリデーションエラー
    pub fn update_field(&mut self, field: DraftField) -> AppResult<()> {
        let EditSession::Editing { draft, .. } = self else {
            return Err(AppError::validation("編集セッションが開始されていません"));
        };

        match field {
            DraftField::Name(name) => draft.name = name,
            DraftField::Price(price) => draft.price = price,
            DraftField::PaymentCycle(payment_cycle) => draft.payment_cycle = payment_cycle,
            DraftField::Category(category) => draft.category = category,
            DraftField::NextPaymentDate(date) => draft.next_payment_date = date,
        }

        Ok(())
    }

    /// モーダルを閉じてドラフトを破棄する
    ///
    /// ストアには一切アクセスしない。
    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }

    /// ドラフトを検証して保存する
    ///
    /// # 引数
    /// * `store` - 保存先
    ///
    /// # 戻り値
    /// 保存結果、または失敗時はエラー
    ///
    /// # 動作
    /// - 編集対象IDがなければ新規挿入、あればそのIDのレコードを丸ごと更新する
    /// - 成功時はIdleに戻る（ドラフト破棄）。呼び出し側は一覧を再取得する
    /// - 検証失敗・ストア失敗時はEditingのまま、ドラフトも変更されない。
    ///   自動リトライはしない
    pub fn save<S: SubscriptionStore>(&mut self, store: &mut S) -> AppResult<SaveOutcome> {
        let EditSession::Editing { draft, editing_id } = self else {
            return Err(AppError::validation("編集セッションが開始されていません"));
        };

        let input = draft.validate()?;

        let outcome = match editing_id {
            None => SaveOutcome::Created(store.insert(&input)?),
            Some(id) => {
                store.update(*id, &input)?;
                SaveOutcome::Updated(*id)
            }
        };

        *self = EditSession::Idle;
        Ok(outcome)
    }

    /// 入力中のドラフトを取得する
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            EditSession::Editing { draft, .. } => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// モーダルが開いているかどうか
    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 呼び出しを記録するモックストア
    #[derive(Default)]
    struct MockStore {
        inserts: Vec<SubscriptionInput>,
        updates: Vec<(i64, SubscriptionInput)>,
        fail_message: Option<String>,
        next_id: i64,
    }

    impl SubscriptionStore for MockStore {
        fn insert(&mut self, input: &SubscriptionInput) -> AppResult<i64> {
            if let Some(message) = &self.fail_message {
                return Err(AppError::Database(message.clone()));
            }
            self.inserts.push(input.clone());
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn update(&mut self, id: i64, input: &SubscriptionInput) -> AppResult<()> {
            if let Some(message) = &self.fail_message {
                return Err(AppError::Database(message.clone()));
            }
            self.updates.push((id, input.clone()));
            Ok(())
        }
    }

    fn existing_subscription() -> Subscription {
        Subscription {
            id: 42,
            user_id: "owner".to_string(),
            name: "Netflix".to_string(),
            price: 1490,
            payment_cycle: PaymentCycle::Monthly,
            category: Some(Category::Entertainment),
            next_payment_date: NaiveDate::from_ymd_opt(2025, 8, 20),
            created_at: "2025-01-01T00:00:00+09:00".to_string(),
            updated_at: "2025-01-01T00:00:00+09:00".to_string(),
        }
    }

    #[test]
    fn test_open_for_create_resets_draft() {
        let mut session = EditSession::default();
        assert!(!session.is_editing());

        let draft = session.open_for_create();

        assert_eq!(draft.name, "");
        assert_eq!(draft.price, "");
        assert_eq!(draft.payment_cycle, PaymentCycle::Monthly);
        assert_eq!(draft.category, Category::Entertainment);
        assert_eq!(draft.next_payment_date, None);
        assert!(session.is_editing());
    }

    #[test]
    fn test_open_for_edit_copies_fields() {
        let mut session = EditSession::default();
        let subscription = existing_subscription();

        let draft = session.open_for_edit(&subscription);

        assert_eq!(draft.name, "Netflix");
        assert_eq!(draft.price, "1490");
        assert_eq!(draft.payment_cycle, PaymentCycle::Monthly);
        assert_eq!(draft.category, Category::Entertainment);
        assert_eq!(
            draft.next_payment_date,
            NaiveDate::from_ymd_opt(2025, 8, 20)
        );

        match session {
            EditSession::Editing { editing_id, .. } => assert_eq!(editing_id, Some(42)),
            EditSession::Idle => panic!("編集状態になっていない"),
        }
    }

    #[test]
    fn test_open_for_edit_fills_missing_category_with_default() {
        let mut session = EditSession::default();
        let mut subscription = existing_subscription();
        subscription.category = None;

        // モーダルは常に具体的なカテゴリを表示する
        let draft = session.open_for_edit(&subscription);
        assert_eq!(draft.category, Category::Entertainment);
    }

    #[test]
    fn test_update_field_replaces_single_field() {
        let mut session = EditSession::default();
        session.open_for_create();

        session
            .update_field(DraftField::Name("Spotify".to_string()))
            .unwrap();
        session
            .update_field(DraftField::Price("980".to_string()))
            .unwrap();
        session
            .update_field(DraftField::PaymentCycle(PaymentCycle::Yearly))
            .unwrap();
        session
            .update_field(DraftField::Category(Category::Entertainment))
            .unwrap();
        session
            .update_field(DraftField::NextPaymentDate(NaiveDate::from_ymd_opt(
                2025, 9, 1,
            )))
            .unwrap();

        let draft = session.draft().unwrap();
        assert_eq!(draft.name, "Spotify");
        assert_eq!(draft.price, "980");
        assert_eq!(draft.payment_cycle, PaymentCycle::Yearly);
    }

    #[test]
    fn test_update_field_without_session_is_an_error() {
        let mut session = EditSession::default();

        let result = session.update_field(DraftField::Name("X".to_string()));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_cancel_discards_draft_without_store_access() {
        let mut session = EditSession::default();
        let store = MockStore::default();

        session.open_for_edit(&existing_subscription());
        session.cancel();

        assert!(!session.is_editing());
        assert_eq!(session.draft(), None);

        // ストアには一切触れていない
        assert!(store.inserts.is_empty());
        assert!(store.updates.is_empty());
    }

    #[test]
    fn test_save_with_empty_name_fails_validation() {
        let mut session = EditSession::default();
        let mut store = MockStore::default();

        session.open_for_create();
        session
            .update_field(DraftField::Price("980".to_string()))
            .unwrap();
        let draft_before = session.draft().unwrap().clone();

        let result = session.save(&mut store);

        assert!(matches!(result, Err(AppError::Validation(_))));
        // Editingのまま、ドラフトも変更されない
        assert!(session.is_editing());
        assert_eq!(session.draft(), Some(&draft_before));
        assert!(store.inserts.is_empty());
    }

    #[test]
    fn test_save_with_non_numeric_price_fails_validation() {
        let mut session = EditSession::default();
        let mut store = MockStore::default();

        session.open_for_create();
        session
            .update_field(DraftField::Name("Netflix".to_string()))
            .unwrap();
        session
            .update_field(DraftField::Price("千円".to_string()))
            .unwrap();

        let result = session.save(&mut store);

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(session.is_editing());
        assert!(store.inserts.is_empty());
    }

    #[test]
    fn test_save_without_editing_id_inserts() {
        let mut session = EditSession::default();
        let mut store = MockStore::default();

        session.open_for_create();
        session
            .update_field(DraftField::Name("Spotify".to_string()))
            .unwrap();
        session
            .update_field(DraftField::Price("980".to_string()))
            .unwrap();

        let outcome = session.save(&mut store).unwrap();

        assert_eq!(outcome, SaveOutcome::Created(1));
        assert_eq!(store.inserts.len(), 1);
        assert_eq!(store.inserts[0].name, "Spotify");
        assert_eq!(store.inserts[0].price, 980);
        assert!(store.updates.is_empty());

        // 成功したらIdleに戻る
        assert!(!session.is_editing());
    }

    #[test]
    fn test_save_with_editing_id_updates_whole_record() {
        let mut session = EditSession::default();
        let mut store = MockStore::default();

        session.open_for_edit(&existing_subscription());
        session
            .update_field(DraftField::Price("1980".to_string()))
            .unwrap();

        let outcome = session.save(&mut store).unwrap();

        assert_eq!(outcome, SaveOutcome::Updated(42));
        assert!(store.inserts.is_empty());
        assert_eq!(store.updates.len(), 1);

        let (id, input) = &store.updates[0];
        assert_eq!(*id, 42);
        // 触っていないフィールドも開いたときの値で丸ごと置き換える
        assert_eq!(input.name, "Netflix");
        assert_eq!(input.price, 1980);
        assert_eq!(input.category, Some(Category::Entertainment));
        assert_eq!(
            input.next_payment_date,
            NaiveDate::from_ymd_opt(2025, 8, 20)
        );
        assert!(!session.is_editing());
    }

    #[test]
    fn test_save_store_failure_keeps_editing_state() {
        let mut session = EditSession::default();
        let mut store = MockStore {
            fail_message: Some("disk I/O error".to_string()),
            ..MockStore::default()
        };

        session.open_for_create();
        session
            .update_field(DraftField::Name("Netflix".to_string()))
            .unwrap();
        session
            .update_field(DraftField::Price("1490".to_string()))
            .unwrap();
        let draft_before = session.draft().unwrap().clone();

        let result = session.save(&mut store);

        // ストアのエラーがそのまま返り、状態は進まない
        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(session.is_editing());
        assert_eq!(session.draft(), Some(&draft_before));
    }

    #[test]
    fn test_second_save_after_success_is_rejected() {
        let mut session = EditSession::default();
        let mut store = MockStore::default();

        session.open_for_create();
        session
            .update_field(DraftField::Name("Netflix".to_string()))
            .unwrap();
        session
            .update_field(DraftField::Price("1490".to_string()))
            .unwrap();

        session.save(&mut store).unwrap();

        // 2回目はセッションが閉じているため二重登録にならない
        let result = session.save(&mut store);
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.inserts.len(), 1);
    }
}
