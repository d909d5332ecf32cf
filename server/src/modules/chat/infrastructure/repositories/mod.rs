// Chat Infrastructure - Repositories
//
// 仓储实现：
// - InMemoryMessageRepository: 内存仓储，用于测试和 `memory` 存储配置
// - SqliteMessageRepository: SQLite 持久化仓储

mod in_memory_message_repository;
mod migration;
mod sqlite_message_repository;

pub use in_memory_message_repository::*;
pub use migration::*;
pub use sqlite_message_repository::*;
