//! 应用生命周期
//!
//! 启动准备（存储、地理解析、追踪 worker）、HTTP 服务器运行和
//! 优雅关闭。

pub mod lifetime;
pub mod server;

pub use server::run_server;
