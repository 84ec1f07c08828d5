/// レコードドメインモデル
///
/// ストレージに保存される1件のレコードを表現する。
/// レコードはフラットなフィールド名→値のマッピングで、
/// `user`と`timestamp`を概念上のキーとする。
/// スキーマ検証は存在チェックのみで、それ以外のフィールドは型付けしない。
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::warn;

/// レコード操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    /// レコードデータがJSONオブジェクトでない
    #[error("record data must be a JSON object")]
    NotAnObject,
}

/// ストレージに保存される1件のレコード
///
/// `serde_json::Map`を内部表現とし、数値フィールドは
/// arbitrary_precisionにより10進リテラルのまま保持される。
/// 一度書き込まれたレコードは不変（更新・削除操作はスコープ外）。
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// JSON値からレコードを構築する
    ///
    /// # 戻り値
    /// * `Ok(Record)` - 値がオブジェクトの場合
    /// * `Err(RecordError::NotAnObject)` - オブジェクト以外の場合
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// `user`フィールドの値を取得する（文字列でなければNone）
    pub fn user(&self) -> Option<&str> {
        self.fields.get("user").and_then(Value::as_str)
    }

    /// `timestamp`フィールドを持つか
    pub fn has_timestamp(&self) -> bool {
        self.fields.contains_key("timestamp")
    }

    /// `timestamp`フィールドが無い場合のみ指定の値を設定する
    ///
    /// 既にtimestampを持つレコードは一切変更しない。
    pub fn ensure_timestamp(&mut self, timestamp: Number) {
        self.fields
            .entry("timestamp".to_string())
            .or_insert(Value::Number(timestamp));
    }

    /// フィールドマッピングへの参照を取得する
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// JSON値に変換する
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// JSON値に変換する（所有権を移動）
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// 現在の壁時計時刻をエポック秒として返す
///
/// マイクロ秒精度の小数部を持つ10進リテラルとして生成するため、
/// 浮動小数点の丸めを経由せずストレージまで精度が保たれる。
pub fn current_timestamp() -> Number {
    let micros = chrono::Utc::now().timestamp_micros();
    let secs = micros.div_euclid(1_000_000);
    let frac = micros.rem_euclid(1_000_000);

    // フォーマット済みの10進リテラルは常に有効なJSON数値
    format!("{secs}.{frac:06}").parse().unwrap_or_else(|err| {
        // 到達しない想定。万一発生した場合は秒精度へ切り詰めて継続する
        warn!(secs = secs, error = %err, "タイムスタンプの小数リテラル生成に失敗、秒精度で継続");
        Number::from(secs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// テスト用のレコードを作成
    fn record_from_json(value: Value) -> Record {
        Record::from_value(value).expect("Failed to create record")
    }

    #[test]
    fn test_from_value_object() {
        let record = record_from_json(json!({"user": "alice", "note": "hello"}));
        assert_eq!(record.user(), Some("alice"));
        assert_eq!(record.fields().len(), 2);
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert_eq!(
            Record::from_value(json!("not an object")),
            Err(RecordError::NotAnObject)
        );
        assert_eq!(Record::from_value(json!([1, 2])), Err(RecordError::NotAnObject));
        assert_eq!(Record::from_value(Value::Null), Err(RecordError::NotAnObject));
    }

    #[test]
    fn test_record_error_display() {
        assert_eq!(
            RecordError::NotAnObject.to_string(),
            "record data must be a JSON object"
        );
    }

    #[test]
    fn test_user_missing_or_not_string() {
        let record = record_from_json(json!({"note": "no user"}));
        assert_eq!(record.user(), None);

        // userが文字列でない場合もNone
        let record = record_from_json(json!({"user": 42}));
        assert_eq!(record.user(), None);
    }

    #[test]
    fn test_ensure_timestamp_sets_when_missing() {
        let mut record = record_from_json(json!({"user": "bob"}));
        assert!(!record.has_timestamp());

        record.ensure_timestamp(current_timestamp());

        assert!(record.has_timestamp());
        let ts = record.fields().get("timestamp").and_then(Value::as_f64);
        assert!(ts.is_some());
    }

    #[test]
    fn test_ensure_timestamp_preserves_existing() {
        // 既存のtimestampは小数リテラルまで一切変更されない
        let mut record = record_from_json(json!({"user": "bob", "timestamp": 1700000000.5}));
        record.ensure_timestamp(current_timestamp());

        let ts = record.fields().get("timestamp").expect("timestamp missing");
        assert_eq!(ts.to_string(), "1700000000.5");
    }

    #[test]
    fn test_decimal_literal_preserved_through_parse() {
        // arbitrary_precisionにより小数リテラルがそのまま保持される
        let value: Value =
            serde_json::from_str(r#"{"user":"bob","timestamp":1700000000.5}"#).expect("parse");
        let record = record_from_json(value);
        assert_eq!(
            record.fields().get("timestamp").map(|v| v.to_string()),
            Some("1700000000.5".to_string())
        );
    }

    #[test]
    fn test_current_timestamp_monotonically_non_decreasing() {
        let first = current_timestamp().as_f64().expect("timestamp as f64");
        let second = current_timestamp().as_f64().expect("timestamp as f64");
        assert!(second >= first);

        // エポック秒として妥当な範囲（2023年以降）
        assert!(first > 1_700_000_000.0);
    }

    #[test]
    fn test_current_timestamp_keeps_microsecond_literal() {
        // 小数部6桁の10進リテラルとして生成されること
        // （秒精度への切り詰めが起きればリテラルに小数点が現れない）
        let literal = current_timestamp().to_string();
        let (secs, frac) = literal.split_once('.').expect("fractional part missing");
        assert!(secs.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(frac.len(), 6);
        assert!(frac.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_to_value_round_trip() {
        let json = json!({"user": "alice", "level": 3, "active": true});
        let record = record_from_json(json.clone());
        assert_eq!(record.to_value(), json);
        assert_eq!(record.into_value(), json);
    }
}
