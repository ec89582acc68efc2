//! HTTP API 层
//!
//! 按业务域拆分的 service + 路由注册函数，由 runtime 在启动时挂载。

pub mod services;
