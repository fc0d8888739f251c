use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// 替换表文件的扩展名。
pub const TABLE_EXTENSION: &str = "csv";

/// 一组待处理的文件：替换表与同名的参考 LIP 文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPair {
    /// 去掉 `.csv` 后的文件名，同时也是参考文件和输出文件的文件名。
    pub name: String,
    /// 替换表路径。
    pub table_path: PathBuf,
    /// 参考 LIP 文件路径。
    pub source_path: PathBuf,
}

impl BatchPair {
    /// 该组文件在输出目录中的路径。
    #[must_use]
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.name)
    }
}

/// 查找 `translate_dir` 中所有在 `source_dir` 里有同名参考文件的替换表。
///
/// 例如 `translate/LIPSYNC01.LIP.csv` 对应 `source/LIPSYNC01.LIP`。
/// 结果按文件名排序。
pub fn discover_pairs(translate_dir: &Path, source_dir: &Path) -> Result<Vec<BatchPair>> {
    let mut pairs = Vec::new();

    for entry in fs::read_dir(translate_dir)? {
        let table_path = entry?.path();
        let is_table = table_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
        if !is_table || !table_path.is_file() {
            continue;
        }

        let Some(name) = table_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
        else {
            continue;
        };

        let source_path = source_dir.join(&name);
        if source_path.is_file() {
            pairs.push(BatchPair {
                name,
                table_path,
                source_path,
            });
        } else {
            tracing::debug!(
                "[Discover] {} 没有对应的参考文件 {}，已跳过。",
                table_path.display(),
                source_path.display()
            );
        }
    }

    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(pairs)
}
