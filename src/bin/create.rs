/// レコード作成Lambdaハンドラー
///
/// API Gatewayのリクエストを受け取り、`data`のレコードを
/// DynamoDBに新しいアイテムとして保存する。
/// timestampが無い場合は現在時刻を補完する。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use records::application::CreateHandler;
use records::infrastructure::{init_logging, DynamoDbConfig, DynamoRecordRepository};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. DynamoDB設定を環境から読み込み
/// 2. リポジトリを構築してCreateHandlerに注入
/// 3. レスポンスエンベロープを返却
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    // アクセスログ情報を取得
    let source_ip = event
        .payload
        .get("requestContext")
        .and_then(|ctx| ctx.get("identity"))
        .and_then(|identity| identity.get("sourceIp"))
        .and_then(|ip| ip.as_str())
        .unwrap_or("unknown");

    info!(
        source_ip = source_ip,
        event_type = "create",
        "レコード作成リクエスト受信"
    );

    // DynamoDB設定を環境から読み込み
    let config = match DynamoDbConfig::from_env().await {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "DynamoDB設定読み込み失敗");
            return Ok(serde_json::json!({
                "statusCode": 500,
                "body": "Internal server error"
            }));
        }
    };

    // リポジトリを作成してハンドラーに注入
    let repo = DynamoRecordRepository::new(
        config.client().clone(),
        config.table_name().to_string(),
    );
    let create_handler = CreateHandler::new(repo);

    Ok(create_handler.handle(&event.payload).await)
}
