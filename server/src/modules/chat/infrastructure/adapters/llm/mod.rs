// LLM Adapters
// 托管对话模型的适配器实现

mod openai;

pub use openai::*;
