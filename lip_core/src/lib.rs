//! 将替换表中的文本与口型指令写回 LIP 口型同步资源。
//!
//! 典型流程：[`discover_pairs`] 找到成对的替换表与参考文件，
//! [`rebuild_file`] 逐个重建并写出新的 LIP 文件。

pub mod config;
pub mod container;
pub mod encoder;
pub mod error;
pub mod io;
pub mod model;
pub mod rebuild;
pub mod retimer;
pub mod table;

pub use config::*;
pub use container::{ContainerWriter, SourceContainer};
pub use encoder::{CharTable, FullWidthTable, MappedTable, UnmappedChar, encode_text};
pub use error::*;
pub use io::*;
pub use model::*;
pub use rebuild::*;
pub use retimer::{pack_commands, retime};
pub use table::{read_rows, read_rows_from_path};
