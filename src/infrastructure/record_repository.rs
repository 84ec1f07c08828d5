/// DynamoDBでレコードを管理するためのレコードリポジトリ
///
/// ストレージバックエンドを`query_by_user`と`put`の2操作に抽象化する。
/// 異なる実装を可能にします（実際のDynamoDB、テスト用モック）。
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::Record;

/// レコードリポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordRepositoryError {
    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// JSONとDynamoDB属性値の相互変換に失敗
    #[error("Transcoding error: {0}")]
    TranscodingError(String),
}

/// クエリ結果
///
/// バックエンドのHTTPステータスコードを保持し、
/// ハンドラーはこれをレスポンスエンベロープへそのまま引き継ぐ。
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    /// userキーに合致したレコード
    pub records: Vec<Record>,
    /// バックエンドのHTTPステータスコード
    pub status_code: u16,
}

/// 書き込み結果
#[derive(Debug, Clone, PartialEq)]
pub struct PutResponse {
    /// バックエンドのHTTPステータスコード
    pub status_code: u16,
}

/// レコード永続化用トレイト
///
/// ハンドラーはこのトレイトを介してストレージへアクセスする。
/// 1回のputはバックエンド側で原子的に実行され、クライアント側の
/// ロック・バッチ・トランザクション調整は行わない。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// `user`フィールドが一致するレコードをすべて取得する
    ///
    /// # 引数
    /// * `user` - 検索するユーザー識別子
    ///
    /// # 戻り値
    /// * `Ok(QueryResponse)` - 合致したレコードとステータスコード
    /// * `Err(RecordRepositoryError)` - クエリ実行エラー
    async fn query_by_user(&self, user: &str) -> Result<QueryResponse, RecordRepositoryError>;

    /// レコードを新しいアイテムとして保存する
    ///
    /// 重複排除キーは存在しないため、同一レコードを2回保存すると
    /// 2件の独立したアイテムが作られる。
    ///
    /// # 引数
    /// * `record` - 保存するレコード
    ///
    /// # 戻り値
    /// * `Ok(PutResponse)` - 保存結果のステータスコード
    /// * `Err(RecordRepositoryError)` - 書き込みエラー
    async fn put(&self, record: &Record) -> Result<PutResponse, RecordRepositoryError>;
}

/// RecordRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoRecordRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// レコードテーブル名
    table_name: String,
}

impl DynamoRecordRepository {
    /// 新しいDynamoRecordRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - レコードテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl RecordRepository for DynamoRecordRepository {
    async fn query_by_user(&self, user: &str) -> Result<QueryResponse, RecordRepositoryError> {
        // "user"はDynamoDBの予約語のため式属性名でエスケープする
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#u = :user")
            .expression_attribute_names("#u", "user")
            .expression_attribute_values(":user", AttributeValue::S(user.to_string()))
            .send()
            .await
            .map_err(|err| {
                RecordRepositoryError::ReadError(err.into_service_error().to_string())
            })?;

        let mut records = Vec::new();
        for item in result.items() {
            records.push(record_from_item(item)?);
        }

        // SDKは2xx応答のみOkを返すため、成功時のステータスは200で確定する
        Ok(QueryResponse {
            records,
            status_code: 200,
        })
    }

    async fn put(&self, record: &Record) -> Result<PutResponse, RecordRepositoryError> {
        let item = item_from_record(record)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| {
                RecordRepositoryError::WriteError(err.into_service_error().to_string())
            })?;

        Ok(PutResponse { status_code: 200 })
    }
}

/// レコードをDynamoDB属性マップに変換する
pub fn item_from_record(
    record: &Record,
) -> Result<HashMap<String, AttributeValue>, RecordRepositoryError> {
    record
        .fields()
        .iter()
        .map(|(name, value)| Ok((name.clone(), attribute_from_value(value)?)))
        .collect()
}

/// DynamoDB属性マップからレコードを復元する
pub fn record_from_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<Record, RecordRepositoryError> {
    let mut fields = Map::new();
    for (name, attr) in item {
        fields.insert(name.clone(), value_from_attribute(attr)?);
    }

    Record::from_value(Value::Object(fields))
        .map_err(|err| RecordRepositoryError::TranscodingError(err.to_string()))
}

/// JSON値をDynamoDB属性値に変換する
///
/// 数値は10進リテラルをそのままN型（10進文字列）へ写すため、
/// 浮動小数点の丸めによる精度損失が起きない。
fn attribute_from_value(value: &Value) -> Result<AttributeValue, RecordRepositoryError> {
    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(flag) => Ok(AttributeValue::Bool(*flag)),
        Value::Number(number) => Ok(AttributeValue::N(number.to_string())),
        Value::String(text) => Ok(AttributeValue::S(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(attribute_from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(AttributeValue::L),
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| Ok((name.clone(), attribute_from_value(value)?)))
            .collect::<Result<HashMap<_, _>, _>>()
            .map(AttributeValue::M),
    }
}

/// DynamoDB属性値をJSON値に変換する
fn value_from_attribute(attr: &AttributeValue) -> Result<Value, RecordRepositoryError> {
    match attr {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::N(literal) => literal
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|err| {
                RecordRepositoryError::TranscodingError(format!(
                    "invalid number literal {literal}: {err}"
                ))
            }),
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::L(items) => items
            .iter()
            .map(value_from_attribute)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => {
            let mut fields = Map::new();
            for (name, attr) in map {
                fields.insert(name.clone(), value_from_attribute(attr)?);
            }
            Ok(Value::Object(fields))
        }
        other => Err(RecordRepositoryError::TranscodingError(format!(
            "unsupported attribute type: {other:?}"
        ))),
    }
}
