// Config Domain Layer
//
// 领域层定义配置结构与校验规则

pub mod entities;

pub use entities::*;
