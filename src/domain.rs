// ドメイン層モジュール
pub mod record;

// 再エクスポート
pub use record::{current_timestamp, Record, RecordError};
