// Chat Domain - Value Objects
// 值对象是不可变的，通过值而非标识来比较

mod emotion;
mod emotion_scores;
mod session_id;

pub use emotion::*;
pub use emotion_scores::*;
pub use session_id::*;
