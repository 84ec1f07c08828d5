// インフラストラクチャ層モジュール
pub mod config;
pub mod logging;
pub mod record_repository;

// 再エクスポート
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use logging::init_logging;
pub use record_repository::{
    DynamoRecordRepository, PutResponse, QueryResponse, RecordRepository, RecordRepositoryError,
};
