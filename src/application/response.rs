/// レスポンスエンベロープ構築
///
/// すべてのハンドラーは`{ "statusCode": <int>, "body": <string> }`形状の
/// エンベロープを返す。bodyは操作結果またはエラーメッセージの
/// シリアライズ済みJSON文字列。
use serde_json::{json, Value};

/// リクエストボディ不備の固定診断メッセージ
pub const INCORRECT_BODY_FORMAT: &str = "[!] incorrect request body format";

/// userフィールド欠落の固定診断メッセージ
pub const MISSING_USER_FIELD: &str = "[!] missing user field";

/// 成功レスポンスを構築する
///
/// ステータスコードはバックエンドの値をそのまま引き継ぐ。
pub fn success(status_code: u16, body: String) -> Value {
    json!({
        "statusCode": status_code,
        "body": body,
    })
}

/// クライアントエラー（400）レスポンスを構築する
///
/// bodyは診断メッセージをJSON文字列としてシリアライズしたもの。
pub fn client_error(message: &str) -> Value {
    json!({
        "statusCode": 400,
        "body": Value::String(message.to_string()).to_string(),
    })
}

/// バックエンドエラー（502）レスポンスを構築する
///
/// クライアント入力エラーと区別するため、構造化されたエラーボディを返す。
pub fn backend_error(message: &str) -> Value {
    json!({
        "statusCode": 502,
        "body": json!({"error": message}).to_string(),
    })
}
