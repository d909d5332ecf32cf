// Classifier Adapters
// 情感分类模型的适配器实现

mod hosted_inference;

pub use hosted_inference::*;
