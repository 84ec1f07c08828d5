/// リクエストエンベロープパーサー
///
/// API Gatewayプロキシイベントの`body`（JSON文字列）から
/// `data`オブジェクトを取り出し、レコードに変換する。
/// エンベロープ形状は`{ "body": "{\"data\": {...}}" }`に統一する。
use serde_json::Value;
use thiserror::Error;

use crate::domain::Record;

/// エンベロープパースエラー
///
/// いずれのエラーもクライアント入力の不備であり、
/// ハンドラー側で一律400レスポンスに変換される。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// bodyフィールドが無い、または文字列でない
    #[error("missing request body")]
    MissingBody,

    /// bodyがJSONとしてパースできない
    #[error("failed to parse request body as JSON")]
    InvalidJson,

    /// パース結果にdataキーが無い
    #[error("missing data field")]
    MissingData,

    /// dataがJSONオブジェクトでない
    #[error("data must be a JSON object")]
    InvalidData,
}

/// リクエストエンベロープパーサー
pub struct RequestParser;

impl RequestParser {
    /// Lambdaイベントペイロードからレコードを取り出す
    ///
    /// # 引数
    /// * `event` - API Gatewayプロキシイベント（JSON）
    ///
    /// # 戻り値
    /// * `Ok(Record)` - `body`内の`data`オブジェクト
    /// * `Err(ParseError)` - エンベロープ不備
    pub fn parse(event: &Value) -> Result<Record, ParseError> {
        // bodyはJSON文字列として渡される
        let body = event
            .get("body")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingBody)?;

        let payload: Value = serde_json::from_str(body).map_err(|_| ParseError::InvalidJson)?;

        let data = payload
            .get("data")
            .cloned()
            .ok_or(ParseError::MissingData)?;

        Record::from_value(data).map_err(|_| ParseError::InvalidData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_envelope() {
        let event = json!({"body": r#"{"data": {"user": "alice"}}"#});
        let record = RequestParser::parse(&event).expect("Failed to parse");
        assert_eq!(record.user(), Some("alice"));
    }

    #[test]
    fn test_parse_preserves_all_fields() {
        let event = json!({"body": r#"{"data": {"user": "bob", "ph": 7.4, "note": "ok"}}"#});
        let record = RequestParser::parse(&event).expect("Failed to parse");
        assert_eq!(record.fields().len(), 3);
        assert_eq!(
            record.fields().get("ph").map(|v| v.to_string()),
            Some("7.4".to_string())
        );
    }

    #[test]
    fn test_parse_missing_body() {
        let event = json!({"data": {"user": "alice"}});
        assert_eq!(RequestParser::parse(&event), Err(ParseError::MissingBody));
    }

    #[test]
    fn test_parse_body_not_string() {
        // bodyがオブジェクトのままのイベントは不正
        let event = json!({"body": {"data": {"user": "alice"}}});
        assert_eq!(RequestParser::parse(&event), Err(ParseError::MissingBody));
    }

    #[test]
    fn test_parse_invalid_json_body() {
        let event = json!({"body": "not json"});
        assert_eq!(RequestParser::parse(&event), Err(ParseError::InvalidJson));
    }

    #[test]
    fn test_parse_missing_data() {
        let event = json!({"body": r#"{"other": {}}"#});
        assert_eq!(RequestParser::parse(&event), Err(ParseError::MissingData));
    }

    #[test]
    fn test_parse_data_not_object() {
        let event = json!({"body": r#"{"data": "flat"}"#});
        assert_eq!(RequestParser::parse(&event), Err(ParseError::InvalidData));
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(ParseError::MissingBody.to_string(), "missing request body");
        assert_eq!(
            ParseError::InvalidJson.to_string(),
            "failed to parse request body as JSON"
        );
        assert_eq!(ParseError::MissingData.to_string(), "missing data field");
        assert_eq!(ParseError::InvalidData.to_string(), "data must be a JSON object");
    }
}
