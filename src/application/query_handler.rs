/// レコード取得ハンドラー
///
/// エンベロープから`data.user`を取り出し、該当ユーザーの
/// 全レコードをストレージバックエンドから取得して返す。
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::application::request_parser::RequestParser;
use crate::application::response;
use crate::domain::Record;
use crate::infrastructure::RecordRepository;

/// レコード取得リクエストを処理するハンドラー
///
/// リポジトリはコンストラクタで注入され、プロセスグローバルな
/// シングルトンには依存しない。
pub struct QueryHandler<R>
where
    R: RecordRepository,
{
    /// レコードリポジトリ
    repo: R,
}

impl<R> QueryHandler<R>
where
    R: RecordRepository,
{
    /// 新しいQueryHandlerを作成
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// レコード取得リクエストを処理する
    ///
    /// # 処理フロー
    /// 1. エンベロープをパースしてdataを取り出す
    /// 2. userフィールドの存在を検証
    /// 3. userキーで1回だけクエリを発行
    /// 4. バックエンドのステータスコードと結果をレスポンスに整形
    ///
    /// # 引数
    /// * `event` - API Gatewayプロキシイベント（JSON）
    ///
    /// # 戻り値
    /// レスポンスエンベロープ `{ "statusCode": <int>, "body": <string> }`
    pub async fn handle(&self, event: &Value) -> Value {
        let record = match RequestParser::parse(event) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "リクエストボディのパースに失敗");
                return response::client_error(response::INCORRECT_BODY_FORMAT);
            }
        };

        // userフィールドが無い場合は暗黙のフォールスルーではなく明示的に400を返す
        let Some(user) = record.user() else {
            warn!("userフィールドがありません");
            return response::client_error(response::MISSING_USER_FIELD);
        };

        debug!(user = user, "レコードクエリ発行");

        match self.repo.query_by_user(user).await {
            Ok(result) => {
                let items: Vec<Value> = result
                    .records
                    .into_iter()
                    .map(Record::into_value)
                    .collect();

                response::success(result.status_code, Value::Array(items).to_string())
            }
            Err(err) => {
                error!(user = user, error = %err, "レコードクエリに失敗");
                response::backend_error("record query failed")
            }
        }
    }
}
