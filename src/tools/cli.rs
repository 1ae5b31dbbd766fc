//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::defaults;
use crate::output::OutputFormat;
use crate::pipeline::{DEFAULT_SAMPLE_RATE, DecodeOptions};
use clap::{Arg, ArgMatches, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SILK 文件（单文件模式）或目录（批量模式）
    pub input_path: PathBuf,

    /// 输出文件（单文件模式）或输出目录（批量模式）；缺省时与输入同目录
    pub output_path: Option<PathBuf>,

    /// 输出采样率（Hz）
    pub sample_rate: u32,

    pub output_format: OutputFormat,

    /// 负帧长度视为错误
    pub strict: bool,

    /// JSON 解码报告路径
    pub report_path: Option<PathBuf>,

    /// 批量模式并发度，1为串行
    pub parallel_files: usize,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            sample_rate: self.sample_rate,
            strict: self.strict,
            cancel: None,
        }
    }
}

/// 构建命令定义
pub fn build_command() -> Command {
    Command::new("silk-decoder")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("INPUT")
                .help("SILK v3 文件或目录路径 / SILK v3 file or directory")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("输出PCM文件（批量模式为输出目录）/ Output file (directory in batch mode)")
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("rate")
                .long("rate")
                .short('r')
                .help("输出采样率，默认24000 / Output sample rate in Hz (default 24000)")
                .value_name("HZ")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("wav")
                .long("wav")
                .help("输出WAV而非原始PCM / Write WAV instead of raw PCM")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("负帧长度视为损坏 / Treat negative frame lengths as corruption")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("写出JSON解码报告 / Write a JSON decode report")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .help("批量模式并发文件数，默认4 / Files decoded in parallel in batch mode (default 4)")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / Verbose output")
                .action(clap::ArgAction::SetTrue),
        )
}

fn config_from_matches(matches: &ArgMatches) -> AppConfig {
    let output_format = if matches.get_flag("wav") {
        OutputFormat::Wav
    } else {
        OutputFormat::RawPcm
    };

    AppConfig {
        input_path: matches
            .get_one::<PathBuf>("INPUT")
            .cloned()
            .unwrap_or_default(),
        output_path: matches.get_one::<PathBuf>("OUTPUT").cloned(),
        sample_rate: matches
            .get_one::<u32>("rate")
            .copied()
            .unwrap_or(DEFAULT_SAMPLE_RATE),
        output_format,
        strict: matches.get_flag("strict"),
        report_path: matches.get_one::<PathBuf>("report").cloned(),
        parallel_files: matches
            .get_one::<usize>("jobs")
            .copied()
            .unwrap_or(defaults::PARALLEL_FILES_DEGREE),
        verbose: matches.get_flag("verbose"),
    }
}

/// 解析命令行参数并创建配置（参数错误时由clap打印用法并退出）
pub fn parse_args() -> AppConfig {
    config_from_matches(&build_command().get_matches())
}

/// 从给定参数列表解析，便于测试
pub fn parse_args_from<I, T>(args: I) -> Result<AppConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    build_command()
        .try_get_matches_from(args)
        .map(|m| config_from_matches(&m))
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    if config.verbose {
        println!("SILK v3 Decoder v{VERSION}");
        println!("{DESCRIPTION}");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = parse_args_from(["silk-decoder", "in.silk"]).unwrap();
        assert_eq!(config.input_path, PathBuf::from("in.silk"));
        assert_eq!(config.output_path, None);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(config.output_format, OutputFormat::RawPcm);
        assert_eq!(config.parallel_files, defaults::PARALLEL_FILES_DEGREE);
        assert!(!config.strict && !config.verbose);
    }

    #[test]
    fn all_flags_parse() {
        let config = parse_args_from([
            "silk-decoder",
            "in.silk",
            "out.wav",
            "-r",
            "16000",
            "--wav",
            "--strict",
            "--report",
            "r.json",
            "-j",
            "2",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.output_path, Some(PathBuf::from("out.wav")));
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.output_format, OutputFormat::Wav);
        assert_eq!(config.report_path, Some(PathBuf::from("r.json")));
        assert_eq!(config.parallel_files, 2);
        assert!(config.strict && config.verbose);
        assert_eq!(config.decode_options().sample_rate, 16000);
    }

    #[test]
    fn missing_input_is_rejected() {
        assert!(parse_args_from(["silk-decoder"]).is_err());
        assert!(parse_args_from(["silk-decoder", "a.silk", "-r", "fast"]).is_err());
    }
}
