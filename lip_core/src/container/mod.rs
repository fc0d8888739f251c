//! # LIP 容器读写
//!
//! 文件布局（小端序）：
//!
//! ```text
//! "ALPD" | body_size: u32 | row_count: u32 | 偏移表 | 字符串区 | 填充区
//! ```
//!
//! 偏移表每行一个 `(voice_index, text_offset, command_offset)` 三元组，
//! 字符串区依次存放每行的文本和口型指令，均以 `0x00` 结尾。

pub mod reader;
pub mod writer;

pub use reader::SourceContainer;
pub use writer::ContainerWriter;
