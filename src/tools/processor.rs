//! 解码任务处理模块
//!
//! 根据配置分派单文件或批量模式，输出结果摘要并写出报告。

use super::batch::{self, BatchEntry};
use super::cli::AppConfig;
use super::report::{DecodeReport, FileReport, write_report};
use super::utils;
use crate::decoder::SilkPrimitive;
use crate::error::{SilkError, SilkResult};
use crate::pipeline::{DecodeSummary, decode_file};
use std::io;
use std::path::Path;

/// 执行一次完整的解码运行
pub fn run_decode<P>(primitive: &P, config: &AppConfig) -> SilkResult<()>
where
    P: SilkPrimitive + Sync,
{
    config.decode_options().validate()?;

    if config.is_batch_mode() {
        process_batch(primitive, config)
    } else {
        process_single(primitive, config)
    }
}

/// 单文件模式
fn process_single<P: SilkPrimitive>(primitive: &P, config: &AppConfig) -> SilkResult<()> {
    let output = config.output_path.clone().unwrap_or_else(|| {
        utils::derive_output_path(&config.input_path, None, config.output_format)
    });

    let result = decode_file(
        primitive,
        &config.input_path,
        &output,
        config.output_format,
        &config.decode_options(),
    );

    if config.report_path.is_some() {
        let files = vec![FileReport::from_result(&config.input_path, &output, &result)];
        save_report(config, files)?;
    }

    let summary = result?;
    show_summary(&output, &summary, config.verbose);
    Ok(())
}

/// 批量模式
fn process_batch<P>(primitive: &P, config: &AppConfig) -> SilkResult<()>
where
    P: SilkPrimitive + Sync,
{
    let files = batch::scan_silk_files(&config.input_path)?;
    println!(
        "找到 {} 个SILK文件 / Found {} SILK files in {}",
        files.len(),
        files.len(),
        config.input_path.display()
    );
    if files.is_empty() {
        return Ok(());
    }

    let entries = batch::decode_batch(primitive, &files, config)?;
    println!("{}", batch::render_batch_table(&entries));

    if config.report_path.is_some() {
        save_report(config, entries.iter().map(entry_report).collect())?;
    }

    let failed = batch::count_failed(&entries);
    if failed > 0 {
        return Err(SilkError::BatchFailed {
            failed,
            total: entries.len(),
        });
    }
    Ok(())
}

fn entry_report(entry: &BatchEntry) -> FileReport {
    FileReport::from_result(&entry.input, &entry.output, &entry.result)
}

fn save_report(config: &AppConfig, files: Vec<FileReport>) -> SilkResult<()> {
    let Some(path) = &config.report_path else {
        return Ok(());
    };
    let report = DecodeReport::new(config.sample_rate, config.output_format, files);
    write_report(path, &report).map_err(|e| SilkError::OutputWrite(io::Error::other(format!("{e:#}"))))?;
    if config.verbose {
        println!("报告已保存到 / Report saved to: {}", path.display());
    }
    Ok(())
}

fn show_summary(output: &Path, summary: &DecodeSummary, verbose: bool) {
    println!(
        "已解码 / Decoded {} 帧/frames, {} 样本/samples ({:.2}s @ {} Hz) -> {}",
        summary.frames,
        summary.samples,
        summary.audio_secs(),
        summary.sample_rate,
        output.display()
    );
    if summary.stats.is_degraded() {
        println!(
            "[WARNING] {} 个子帧解码返回非0状态，输出可能有失真 / sub-frames reported decode errors, audio may be degraded",
            summary.stats.total_warnings
        );
    }
    if verbose {
        println!(
            "   文件头 / Header: {:?} (offset {})",
            summary.header.variant, summary.header.payload_offset
        );
        println!(
            "   包 / Packets: {} (子帧 / sub-frames {}, 空包 / empty {}), 样本/包 min {} max {} mean {:.1}",
            summary.stats.total_packets,
            summary.stats.total_sub_frames,
            summary.stats.empty_packets,
            summary.stats.min_samples,
            summary.stats.max_samples,
            summary.stats.mean_samples
        );
        println!("   耗时 / Elapsed: {:.3}s", summary.duration_secs);
    }
}
