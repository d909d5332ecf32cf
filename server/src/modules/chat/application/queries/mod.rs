// Chat Queries - 查询定义和处理器

mod list_messages;

pub use list_messages::*;
