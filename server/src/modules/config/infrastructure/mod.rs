// Config Infrastructure Layer
//
// 配置来源：JSON 文件与环境变量

mod loader;

pub use loader::*;
