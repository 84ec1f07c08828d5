// アプリケーション層モジュール
pub mod create_handler;
pub mod query_handler;
pub mod request_parser;
pub mod response;

// 再エクスポート
pub use create_handler::CreateHandler;
pub use query_handler::QueryHandler;
pub use request_parser::{ParseError, RequestParser};
