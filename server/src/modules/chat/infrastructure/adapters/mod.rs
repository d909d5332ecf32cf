// Chat Adapters

pub mod classifier;
pub mod llm;
pub mod reply;
