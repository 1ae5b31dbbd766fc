//! JSON 解码报告

use crate::error::{ErrorCategory, SilkResult};
use crate::output::OutputFormat;
use crate::pipeline::DecodeSummary;
use anyhow::Context;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单个文件的解码结果
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ok: bool,
    pub error_category: Option<&'static str>,
    pub error: Option<String>,
    pub summary: Option<DecodeSummary>,
}

impl FileReport {
    pub fn from_result(input: &Path, output: &Path, result: &SilkResult<DecodeSummary>) -> Self {
        let (summary, error_category, error) = match result {
            Ok(summary) => (Some(summary.clone()), None, None),
            Err(e) => (
                None,
                Some(ErrorCategory::from_error(e).key()),
                Some(e.to_string()),
            ),
        };
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            ok: result.is_ok(),
            error_category,
            error,
            summary,
        }
    }
}

/// 一次运行的完整报告
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub generated_at: DateTime<Local>,
    pub version: &'static str,
    pub sample_rate: u32,
    pub output_format: OutputFormat,
    pub files: Vec<FileReport>,
}

impl DecodeReport {
    pub fn new(sample_rate: u32, output_format: OutputFormat, files: Vec<FileReport>) -> Self {
        Self {
            generated_at: Local::now(),
            version: env!("CARGO_PKG_VERSION"),
            sample_rate,
            output_format,
            files,
        }
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.ok).count()
    }
}

/// 以格式化 JSON 写出报告
pub fn write_report(path: &Path, report: &DecodeReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("序列化报告失败 / failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("写入报告失败 / failed to write report {}", path.display()))
}
