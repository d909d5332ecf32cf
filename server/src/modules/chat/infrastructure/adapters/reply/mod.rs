// Reply Adapters
// 回复生成器的适配器实现

mod hosted;

pub use hosted::*;
