/// レコード作成ハンドラー
///
/// エンベロープからレコードを取り出し、timestampが無ければ
/// 現在時刻を補完してストレージバックエンドに保存する。
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::application::request_parser::RequestParser;
use crate::application::response;
use crate::domain::current_timestamp;
use crate::infrastructure::RecordRepository;

/// レコード作成リクエストを処理するハンドラー
///
/// リポジトリはコンストラクタで注入され、プロセスグローバルな
/// シングルトンには依存しない。
pub struct CreateHandler<R>
where
    R: RecordRepository,
{
    /// レコードリポジトリ
    repo: R,
}

impl<R> CreateHandler<R>
where
    R: RecordRepository,
{
    /// 新しいCreateHandlerを作成
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// レコード作成リクエストを処理する
    ///
    /// # 処理フロー
    /// 1. エンベロープをパースしてdataを取り出す
    /// 2. timestampが無ければ現在時刻（エポック秒）を設定
    /// 3. レコードを1回のputで保存
    /// 4. バックエンドのステータスコードと保存結果をレスポンスに整形
    ///
    /// 重複排除キーは無いため、同一リクエストの再送は重複レコードを作る。
    ///
    /// # 引数
    /// * `event` - API Gatewayプロキシイベント（JSON）
    ///
    /// # 戻り値
    /// レスポンスエンベロープ `{ "statusCode": <int>, "body": <string> }`
    pub async fn handle(&self, event: &Value) -> Value {
        let mut record = match RequestParser::parse(event) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "リクエストボディのパースに失敗");
                return response::client_error(response::INCORRECT_BODY_FORMAT);
            }
        };

        // timestampが無い場合のみ現在時刻を補完する
        record.ensure_timestamp(current_timestamp());

        debug!(user = record.user().unwrap_or("(none)"), "レコード保存");

        match self.repo.put(&record).await {
            Ok(result) => response::success(result.status_code, record.to_value().to_string()),
            Err(err) => {
                error!(error = %err, "レコード保存に失敗");
                response::backend_error("record create failed")
            }
        }
    }
}
