//! 工具函数模块
//!
//! 文件路径处理与并发度计算。

use super::constants::parallel_limits;
use crate::output::OutputFormat;
use std::path::{Path, PathBuf};

/// 提取文件名（返回String，用于日志显示）
#[inline]
pub fn extract_filename_lossy(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// 获取父目录，如果不存在则返回当前目录
#[inline]
pub fn get_parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// 由输入路径推导输出路径：`<dir>/<stem>.<pcm|wav>`
///
/// `out_dir` 为空时与输入文件同目录。
pub fn derive_output_path(input: &Path, out_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    let dir = out_dir.unwrap_or_else(|| get_parent_dir(input));
    dir.join(format!("{stem}.{}", format.extension()))
}

/// 批量模式的输出路径
///
/// 有 `out_dir` 时保留输入相对 `root` 的子目录；
/// `keep_extension` 为真时使用完整文件名 `<name>.<pcm|wav>`，用于区分同名不同扩展名的输入。
pub fn derive_batch_output_path(
    input: &Path,
    root: &Path,
    out_dir: Option<&Path>,
    format: OutputFormat,
    keep_extension: bool,
) -> PathBuf {
    let dir = match out_dir {
        Some(out) => {
            let relative = input
                .strip_prefix(root)
                .ok()
                .and_then(Path::parent)
                .unwrap_or_else(|| Path::new(""));
            out.join(relative)
        }
        None => get_parent_dir(input).to_path_buf(),
    };
    let name = if keep_extension {
        input.file_name()
    } else {
        input.file_stem()
    }
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "audio".to_string());
    dir.join(format!("{name}.{}", format.extension()))
}

/// 将请求的并发度限制在合法范围内，并且不超过任务数
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    let degree = requested.clamp(
        parallel_limits::MIN_PARALLEL_DEGREE,
        parallel_limits::MAX_PARALLEL_DEGREE,
    );
    match task_count {
        Some(n) if n > 0 => degree.min(n),
        _ => degree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_next_to_input() {
        let out = derive_output_path(Path::new("/tmp/voice/a.silk"), None, OutputFormat::RawPcm);
        assert_eq!(out, PathBuf::from("/tmp/voice/a.pcm"));
    }

    #[test]
    fn output_path_in_out_dir() {
        let out = derive_output_path(
            Path::new("clip.slk"),
            Some(Path::new("/out")),
            OutputFormat::Wav,
        );
        assert_eq!(out, PathBuf::from("/out/clip.wav"));
    }

    #[test]
    fn batch_output_keeps_subdirectory() {
        let out = derive_batch_output_path(
            Path::new("/src/x/c.silk"),
            Path::new("/src"),
            Some(Path::new("/out")),
            OutputFormat::RawPcm,
            false,
        );
        assert_eq!(out, PathBuf::from("/out/x/c.pcm"));

        let out = derive_batch_output_path(
            Path::new("/src/c.silk"),
            Path::new("/src"),
            Some(Path::new("/out")),
            OutputFormat::RawPcm,
            false,
        );
        assert_eq!(out, PathBuf::from("/out/c.pcm"));
    }

    #[test]
    fn batch_output_can_keep_source_extension() {
        let out = derive_batch_output_path(
            Path::new("/src/a.slk"),
            Path::new("/src"),
            None,
            OutputFormat::Wav,
            true,
        );
        assert_eq!(out, PathBuf::from("/src/a.slk.wav"));
    }

    #[test]
    fn bare_file_name_uses_current_dir() {
        assert_eq!(get_parent_dir(Path::new("a.silk")), Path::new("."));
    }

    #[test]
    fn parallel_degree_is_clamped() {
        assert_eq!(effective_parallel_degree(0, None), 1);
        assert_eq!(effective_parallel_degree(64, None), 16);
        assert_eq!(effective_parallel_degree(8, Some(3)), 3);
        assert_eq!(effective_parallel_degree(8, Some(0)), 8);
    }
}
