pub mod ask;
pub mod chat;
pub mod dispatch;
pub mod fetch;
pub mod report;
pub mod tool_schema;
