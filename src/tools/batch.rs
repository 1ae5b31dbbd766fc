//! 批量解码模块
//!
//! 扫描目录中的 SILK 文件，使用rayon做文件级并行；每个文件独占一个解码会话，
//! 结果按扫描顺序返回。

use super::cli::AppConfig;
use super::constants::SILK_EXTENSIONS;
use super::utils;
use crate::decoder::SilkPrimitive;
use crate::error::{ErrorCategory, SilkError, SilkResult};
use crate::output::OutputFormat;
use crate::pipeline::{DecodeSummary, decode_file};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 单个文件的批量处理结果
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: SilkResult<DecodeSummary>,
}

/// 递归扫描目录中的 SILK 文件，按路径排序
pub fn scan_silk_files(dir_path: &Path) -> SilkResult<Vec<PathBuf>> {
    if !dir_path.is_dir() {
        return Err(SilkError::InvalidInput(format!(
            "路径不是目录 / Not a directory: {}",
            dir_path.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir_path).follow_links(false) {
        let entry = entry.map_err(|e| {
            SilkError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("目录遍历失败 / directory walk failed")
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && SILK_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 单个输入的输出规划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub path: PathBuf,
    /// 改名后仍与其他输入的输出重名，该输入不解码
    pub conflict: bool,
}

/// 为每个输入规划互不重叠的输出路径
///
/// 默认 `<stem>.<ext>`。多个输入映射到同一输出时（如 `a.silk` 与 `a.slk`），
/// 这些输入改用完整文件名 `<name>.<ext>`；仍然重名的标记为冲突。
/// 路径按小写比较，兼容大小写不敏感的文件系统。
pub fn plan_output_paths(
    files: &[PathBuf],
    root: &Path,
    out_dir: Option<&Path>,
    format: OutputFormat,
) -> Vec<PlannedOutput> {
    let plain: Vec<PathBuf> = files
        .iter()
        .map(|input| utils::derive_batch_output_path(input, root, out_dir, format, false))
        .collect();
    let plain_counts = count_output_keys(&plain);

    let paths: Vec<PathBuf> = files
        .iter()
        .zip(plain)
        .map(|(input, path)| {
            if plain_counts[&output_key(&path)] > 1 {
                let renamed = utils::derive_batch_output_path(input, root, out_dir, format, true);
                debug!(input = %input.display(), output = %renamed.display(), "output name collision, keeping source extension");
                renamed
            } else {
                path
            }
        })
        .collect();
    let counts = count_output_keys(&paths);

    paths
        .into_iter()
        .map(|path| {
            let conflict = counts[&output_key(&path)] > 1;
            PlannedOutput { path, conflict }
        })
        .collect()
}

fn output_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

fn count_output_keys(paths: &[PathBuf]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for path in paths {
        *counts.entry(output_key(path)).or_insert(0) += 1;
    }
    counts
}

fn ensure_parent_dir(output: &Path) -> SilkResult<()> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| SilkError::IoOpen {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// 批量解码
///
/// 单个文件失败不影响其他文件；并发度为1或线程池创建失败时串行执行。
pub fn decode_batch<P>(primitive: &P, files: &[PathBuf], config: &AppConfig) -> SilkResult<Vec<BatchEntry>>
where
    P: SilkPrimitive + Sync,
{
    let out_dir = config.output_path.as_deref();
    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir).map_err(|source| SilkError::IoOpen {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let options = config.decode_options();
    let plan = plan_output_paths(files, &config.input_path, out_dir, config.output_format);
    let decode_one = |(input, planned): (&PathBuf, &PlannedOutput)| {
        let output = planned.path.clone();
        let result = if planned.conflict {
            Err(SilkError::InvalidInput(format!(
                "输出路径与其他输入冲突 / Output path collides with another input: {}",
                output.display()
            )))
        } else if out_dir.is_some() {
            ensure_parent_dir(&output).and_then(|()| {
                decode_file(primitive, input, &output, config.output_format, &options)
            })
        } else {
            decode_file(primitive, input, &output, config.output_format, &options)
        };
        match &result {
            Ok(summary) => info!(
                file = %utils::extract_filename_lossy(input),
                samples = summary.samples,
                "decoded"
            ),
            Err(e) => warn!(file = %utils::extract_filename_lossy(input), error = %e, "decode failed"),
        }
        BatchEntry {
            input: input.clone(),
            output,
            result,
        }
    };

    let degree = utils::effective_parallel_degree(config.parallel_files, Some(files.len()));
    if degree <= 1 {
        return Ok(files.iter().zip(&plan).map(decode_one).collect());
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(degree)
        .thread_name(|i| format!("silk-worker-{i}"))
        .build()
    {
        // 输出路径互不重叠；par_iter().map().collect() 保持输入顺序
        Ok(pool) => Ok(pool.install(|| {
            files
                .par_iter()
                .zip(plan.par_iter())
                .map(decode_one)
                .collect()
        })),
        Err(e) => {
            warn!(error = %e, "线程池创建失败，回退到串行 / thread pool unavailable, decoding serially");
            Ok(files.iter().zip(&plan).map(decode_one).collect())
        }
    }
}

/// 失败文件数
pub fn count_failed(entries: &[BatchEntry]) -> usize {
    entries.iter().filter(|e| e.result.is_err()).count()
}

/// 生成批量结果表格
pub fn render_batch_table(entries: &[BatchEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Status", "Frames", "Samples", "Warnings"]);

    for entry in entries {
        let name = utils::extract_filename_lossy(&entry.input);
        let row = match &entry.result {
            Ok(summary) => vec![
                Cell::new(name),
                Cell::new("OK"),
                Cell::new(summary.frames).set_alignment(CellAlignment::Right),
                Cell::new(summary.samples).set_alignment(CellAlignment::Right),
                Cell::new(summary.stats.total_warnings).set_alignment(CellAlignment::Right),
            ],
            Err(e) => vec![
                Cell::new(name),
                Cell::new(format!("FAIL [{}]", ErrorCategory::from_error(e).display_name())),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ],
        };
        table.add_row(row);
    }

    table.to_string()
}
