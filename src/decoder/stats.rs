//! 包统计模块
//!
//! 累积每个包的样本数和子帧告警，用于解码摘要与报告。

use super::packet::PacketOutcome;
use serde::Serialize;
use tracing::debug;

/// 包大小统计信息
#[derive(Debug, Clone, Serialize)]
pub struct PacketStats {
    pub total_packets: usize,
    pub total_sub_frames: usize,
    pub total_warnings: usize,
    pub total_samples: u64,
    pub min_samples: usize,
    pub max_samples: usize,
    pub mean_samples: f64,
    /// 产生0个样本的包数
    pub empty_packets: usize,
}

impl Default for PacketStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketStats {
    pub fn new() -> Self {
        Self {
            total_packets: 0,
            total_sub_frames: 0,
            total_warnings: 0,
            total_samples: 0,
            min_samples: usize::MAX,
            max_samples: 0,
            mean_samples: 0.0,
            empty_packets: 0,
        }
    }

    /// 添加一个包的统计信息
    ///
    /// 使用饱和加法防止 total_samples 溢出
    pub fn add_packet(&mut self, outcome: &PacketOutcome) {
        self.total_packets += 1;
        self.total_sub_frames += outcome.sub_frames;
        self.total_warnings += outcome.warnings;
        self.total_samples = self.total_samples.saturating_add(outcome.samples as u64);
        self.min_samples = self.min_samples.min(outcome.samples);
        self.max_samples = self.max_samples.max(outcome.samples);
        if outcome.samples == 0 {
            self.empty_packets += 1;
        }

        if self.total_packets <= 5 || self.total_packets % 500 == 0 {
            debug!(
                packet = self.total_packets,
                samples = outcome.samples,
                sub_frames = outcome.sub_frames,
                "packet stats"
            );
        }
    }

    pub fn finalize(&mut self) {
        if self.total_packets > 0 {
            self.mean_samples = self.total_samples as f64 / self.total_packets as f64;
        }
        // 修复边界情况
        if self.min_samples == usize::MAX {
            self.min_samples = 0;
        }
    }

    /// 出现过子帧告警（输出可能有降级音频）
    pub fn is_degraded(&self) -> bool {
        self.total_warnings > 0
    }
}
