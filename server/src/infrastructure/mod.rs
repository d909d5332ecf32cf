// Application Infrastructure
//
// 应用级装配：全局状态与组件构建

mod state;

pub use state::*;
