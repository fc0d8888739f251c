use std::path::Path;

use lip_core::{BatchPair, CharTable, LipError, RebuildOptions, RebuildReport, rebuild_file};
use rayon::prelude::*;

use crate::error::AppResult;

/// 单个文件的处理结果。
#[derive(Debug)]
pub enum FileOutcome {
    Written(RebuildReport),
    Failed { name: String, error: LipError },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_written: usize,
    /// 跳过或失败的文件名。
    pub unfinished: Vec<String>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.unfinished.is_empty()
    }
}

/// 依次（或以 `jobs` 个线程并行）处理所有文件。
///
/// 单个文件失败只会记录日志，不影响其他文件。
pub fn run_batch(
    pairs: &[BatchPair],
    output_dir: &Path,
    options: &RebuildOptions,
    table: &dyn CharTable,
    jobs: usize,
) -> AppResult<BatchSummary> {
    let process = |pair: &BatchPair| process_pair(pair, output_dir, options, table);

    let outcomes: Vec<FileOutcome> = if jobs > 1 && pairs.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(|| pairs.par_iter().map(process).collect())
    } else {
        pairs.iter().map(process).collect()
    };

    Ok(summarize(&outcomes))
}

fn process_pair(
    pair: &BatchPair,
    output_dir: &Path,
    options: &RebuildOptions,
    table: &dyn CharTable,
) -> FileOutcome {
    let span = tracing::info_span!("file", name = %pair.name);
    let _enter = span.enter();

    match rebuild_file(pair, output_dir, options, table) {
        Ok(report) => {
            tracing::info!("[Batch] {report}");
            FileOutcome::Written(report)
        }
        Err(error) => {
            if error.is_format() {
                tracing::warn!("[Batch] {}: 已跳过: {error}", pair.source_path.display());
            } else {
                tracing::error!("[Batch] {}: 处理失败: {error}", pair.table_path.display());
            }
            FileOutcome::Failed {
                name: pair.name.clone(),
                error,
            }
        }
    }
}

fn summarize(outcomes: &[FileOutcome]) -> BatchSummary {
    outcomes
        .iter()
        .fold(BatchSummary::default(), |mut summary, outcome| {
            match outcome {
                FileOutcome::Written(report) => {
                    summary.written += 1;
                    summary.bytes_written += report.bytes_written;
                }
                FileOutcome::Failed { name, error } => {
                    if error.is_format() {
                        summary.skipped += 1;
                    } else {
                        summary.failed += 1;
                    }
                    summary.unfinished.push(name.clone());
                }
            }
            summary
        })
}
