//! 存储层
//!
//! 基于 SeaORM 的数据库存储，支持 SQLite、MySQL/MariaDB 和 PostgreSQL。
//! 简历与追踪事件的全部持久化操作都从这里走。

pub mod backend;

pub use backend::SeaOrmStorage;
