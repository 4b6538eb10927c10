//! 통계 및 유틸리티 모듈
//!
//! 변환 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::converter::{ConvertResult, ConvertStatus};

/// 변환 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 총 파일 수
    pub total_files: usize,
    /// 변환 성공 수
    pub success_count: usize,
    /// 변환 실패 수
    pub error_count: usize,
    /// 건너뛴 파일 수
    pub skipped_count: usize,
    /// 읽은 총 바이트
    pub total_bytes_read: u64,
    /// 쓴 총 바이트
    pub total_bytes_written: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 파일 하나의 변환 결과 반영
    pub fn record(&mut self, result: &ConvertResult) {
        match result.status {
            ConvertStatus::Converted => {
                self.success_count += 1;
                self.total_bytes_read += result.bytes_read;
                self.total_bytes_written += result.bytes_written;
            }
            ConvertStatus::Skipped => self.skipped_count += 1,
            ConvertStatus::Failed => self.error_count += 1,
        }
    }

    /// 처리한 파일 수 (성공 + 실패 + 건너뜀)
    pub fn processed(&self) -> usize {
        self.success_count + self.error_count + self.skipped_count
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 성공률 (%)
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_files == 0 {
            return None;
        }
        Some((self.success_count as f64 / self.total_files as f64) * 100.0)
    }

    /// 일괄 변환 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            self.success_count.to_string().green()
        );

        if self.error_count > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.error_count.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        if self.skipped_count > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "⏭️".bright_yellow(),
                self.skipped_count.to_string().yellow()
            );
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.total_bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.total_bytes_written)
        );

        if let Some(rate) = self.success_rate() {
            println!("  {} 성공률:       {:.1}%", "📈".bright_white(), rate);
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use dconvert::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        format!("{}시간 {}분", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}분 {}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
