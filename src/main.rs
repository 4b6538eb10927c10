//! dconvert - DOCX TO PDF CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dconvert::{
    batch::{plan_batch, run_batch, BatchPlan},
    cli::{Args, RunMode},
    converter::{convert_file, ConvertOptions, ConvertResult, ConvertStatus},
    error::ConvertError,
    install::{install_dependencies, PackageManager},
    path::{ensure_dir, resolve_output_path},
    pattern::FileFilter,
    LibreOffice, RenderBackend,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // 의존 패키지 설치 모드
    if args.run_mode() == RunMode::Install {
        run_install_mode();
        return Ok(());
    }

    let backend = LibreOffice::locate(args.soffice.clone());
    debug!("LibreOffice 실행 파일: {:?}", backend.program());

    run(&args, &backend)
}

/// 백엔드 확인 후 실행 모드에 맞는 변환 수행
fn run<B: RenderBackend + ?Sized>(args: &Args, backend: &B) -> Result<()> {
    // 드라이런은 렌더링하지 않으므로 백엔드 확인 생략
    if !args.dry_run && !check_backend(backend) {
        return Ok(());
    }

    match args.run_mode() {
        RunMode::Directory => run_directory_mode(args, backend),
        _ => run_single_mode(args, backend),
    }
}

/// 렌더링 백엔드 확인, 없으면 설치 안내 출력
fn check_backend<B: RenderBackend + ?Sized>(backend: &B) -> bool {
    if backend.is_available() {
        return true;
    }

    let error = ConvertError::BackendUnavailable {
        backend: backend.name().to_string(),
    };
    println!("{} {}", "❌".bright_red(), error.to_string().red());
    println!("  다음 명령으로 설치하세요:");
    println!("    {}", "dconvert --install".bright_white());
    if let Some(manager) = PackageManager::detect() {
        println!("    {}", manager.install_hint().bright_white());
    }
    println!("  LibreOffice가 다른 위치에 있다면 --soffice 또는 DCONVERT_SOFFICE로 지정하세요.");

    false
}

/// 의존 패키지 설치 모드 실행
fn run_install_mode() {
    println!("\n{}", "📦 필요한 패키지를 설치합니다...".bright_cyan());

    let Some(manager) = PackageManager::detect() else {
        println!("{} {}", "✗".red(), ConvertError::NoPackageManager);
        println!("  https://www.libreoffice.org/download/ 에서 LibreOffice를 직접 설치하세요.");
        return;
    };

    if manager.needs_root() {
        println!(
            "  {} {} 설치에는 관리자 권한이 필요할 수 있습니다.",
            "ℹ️".bright_blue(),
            manager.program()
        );
    }

    let result = install_dependencies(manager, |package, result| match result {
        Ok(()) => println!("  {} {} 설치 완료", "✓".green(), package),
        Err(e) => println!("  {} {}", "✗".red(), e),
    });

    match result {
        Ok(()) => println!("\n{} 모든 의존 패키지를 설치했습니다!\n", "✅".bright_green()),
        Err(_) => println!(
            "\n{} 일부 의존 패키지를 설치하지 못했습니다.\n",
            "❌".bright_red()
        ),
    }
}

/// 단일 파일 변환 모드 실행
fn run_single_mode<B: RenderBackend + ?Sized>(args: &Args, backend: &B) -> Result<()> {
    let Some(input) = args.input.as_deref() else {
        println!("{}", "오류: 입력 DOCX 파일을 지정하세요.".red());
        Args::command().print_help()?;
        return Ok(());
    };

    let output = resolve_output_path(input, args.output.as_deref());

    if args.dry_run {
        println!("  {:?} → {:?}", input, output);
        return Ok(());
    }

    println!(
        "{} {:?} → {:?} 변환 중...",
        "📄".bright_cyan(),
        input,
        output
    );

    let options = ConvertOptions::new().with_mode(args.mode);
    let result = convert_file(backend, input, Some(&output), &options);
    print_result(&result);

    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &collect_errors(std::slice::from_ref(&result)))?;
    }

    Ok(())
}

/// 폴더 일괄 변환 모드 실행
fn run_directory_mode<B: RenderBackend + ?Sized>(args: &Args, backend: &B) -> Result<()> {
    let Some(input_dir) = args.input.as_deref() else {
        println!("{}", "오류: -d 옵션과 함께 폴더를 지정하세요.".red());
        return Ok(());
    };

    let filter = match FileFilter::new(args.pattern.clone()) {
        Ok(filter) => filter,
        Err(e) => {
            println!("{} {}", "❌".bright_red(), e.to_string().red());
            return Ok(());
        }
    };

    let plan = match plan_batch(input_dir, args.output.as_deref(), &filter) {
        Ok(plan) => plan,
        Err(e) => {
            println!("{} {}", "❌".bright_red(), e.to_string().red());
            return Ok(());
        }
    };

    print_header(args, &plan, backend);

    // 지정한 출력 폴더는 변환할 파일이 없어도 만든다
    if args.output.is_some() && !args.dry_run {
        if let Err(e) = ensure_dir(&plan.output_dir) {
            println!("{} {}", "❌".bright_red(), e.to_string().red());
            return Ok(());
        }
    }

    if plan.is_empty() {
        println!(
            "{}",
            format!("⚠️ {:?} 폴더에 DOCX 파일이 없습니다.", plan.input_dir).yellow()
        );
        return Ok(());
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        plan.len().to_string().bright_green()
    );

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    run_conversion(args, backend, &plan)
}

/// 계획된 파일 변환 및 결과 보고
fn run_conversion<B: RenderBackend + ?Sized>(
    args: &Args,
    backend: &B,
    plan: &BatchPlan,
) -> Result<()> {
    let pb = create_progress_bar(plan.len());
    let options = ConvertOptions::new().with_mode(args.mode);
    let mut errors: Vec<(PathBuf, String)> = Vec::new();
    let mut backend_errors = 0;

    println!("\n{}", "⚡ 변환 중...".bright_cyan());

    let stats = run_batch(backend, plan, &options, |result| {
        pb.inc(1);
        let name = result.input.file_name().unwrap_or_default();

        match result.status {
            ConvertStatus::Converted if args.verbose => {
                pb.println(format!("  {} {:?}", "✓".green(), name));
            }
            ConvertStatus::Skipped if args.verbose => {
                pb.println(format!("  {} {:?} (건너뜀)", "⏭️".yellow(), name));
            }
            ConvertStatus::Failed => {
                if result.error.as_ref().is_some_and(|e| e.is_backend_error()) {
                    backend_errors += 1;
                }
                let message = result.error_message().unwrap_or_default();
                errors.push((result.input.clone(), message));
            }
            _ => {}
        }
    });

    let stats = match stats {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon();
            println!("{} {}", "❌".bright_red(), e.to_string().red());
            return Ok(());
        }
    };

    pb.finish_with_message("완료!");

    // 에러 출력
    print_errors(&errors, args.verbose);
    if backend_errors > 0 {
        print_backend_hint();
    }

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)?;
    }

    // 통계 출력
    stats.print_summary();

    println!(
        "\n{} {}/{} 개 파일을 변환했습니다: {:?}\n",
        if stats.error_count == 0 {
            "✅".bright_green()
        } else {
            "⚠️".bright_yellow()
        },
        stats.success_count.to_string().bright_green(),
        stats.total_files,
        plan.output_dir
    );

    Ok(())
}

/// 헤더 출력
fn print_header<B: RenderBackend + ?Sized>(args: &Args, plan: &BatchPlan, backend: &B) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 DOCX TO PDF CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), plan.input_dir);
    println!("  {} 출력 폴더: {:?}", "📄".bright_green(), plan.output_dir);
    println!("  {} 모드: {}", "⚙️".bright_yellow(), args.mode);
    println!("  {} 백엔드: {}", "🖨️".bright_white(), backend.name());

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 드라이런 출력
fn print_dry_run(plan: &BatchPlan) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, job) in plan.jobs.iter().enumerate() {
        let name = job.input.file_name().unwrap_or_default();
        match &job.conflict {
            None => println!("  {}. {:?} → {:?}", i + 1, name, job.output),
            Some(first) => println!(
                "  {}. {:?} → {}",
                i + 1,
                name,
                format!("건너뜀 ({:?}와 출력 이름이 겹침)", first.file_name().unwrap_or_default())
                    .yellow()
            ),
        }
    }
    let count = plan.jobs.iter().filter(|job| job.conflict.is_none()).count();
    println!(
        "\n{} 총 {} 개의 파일이 변환될 예정입니다.",
        "ℹ️".bright_blue(),
        count.to_string().bright_green()
    );
}

/// 단일 파일 변환 결과 출력
fn print_result(result: &ConvertResult) {
    let output = result.output.as_deref().unwrap_or(Path::new(""));

    match result.status {
        ConvertStatus::Converted => println!(
            "{} 변환 성공! PDF 저장 위치: {:?}",
            "✓".bright_green(),
            output
        ),
        ConvertStatus::Skipped => println!(
            "{} 출력 파일이 이미 있어 건너뜀: {:?}",
            "⏭️".bright_yellow(),
            output
        ),
        ConvertStatus::Failed => {
            println!(
                "{} {}",
                "✗".bright_red(),
                result.error_message().unwrap_or_default().red()
            );
            if result.error.as_ref().is_some_and(|e| e.is_backend_error()) {
                print_backend_hint();
            }
        }
    }
}

/// 백엔드 실패 시 디버그 로그 안내
fn print_backend_hint() {
    println!(
        "  {} 자세한 LibreOffice 출력은 RUST_LOG=debug 로 실행해 확인하세요.",
        "ℹ️".bright_blue()
    );
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 실패한 파일만 (경로, 메시지) 목록으로 수집
fn collect_errors(results: &[ConvertResult]) -> Vec<(PathBuf, String)> {
    results
        .iter()
        .filter_map(|r| r.error_message().map(|m| (r.input.clone(), m)))
        .collect()
}

/// 에러 목록 출력
fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 변환 실패 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "dconvert 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", unix_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn unix_now() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::TempDir;

    /// 렌더링 횟수를 세는 백엔드
    struct CountingBackend {
        available: bool,
        renders: Cell<usize>,
    }

    impl CountingBackend {
        fn new(available: bool) -> Self {
            Self {
                available,
                renders: Cell::new(0),
            }
        }
    }

    impl RenderBackend for CountingBackend {
        fn name(&self) -> &str {
            "counting"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn render(&self, _input: &Path, output: &Path) -> dconvert::Result<()> {
            self.renders.set(self.renders.get() + 1);
            fs::write(output, b"%PDF-1.7").unwrap();
            Ok(())
        }
    }

    fn parse(args: &[&OsStr]) -> Args {
        let mut argv = vec![OsStr::new("dconvert")];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_unavailable_backend_stops_before_render() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("memo.docx");
        fs::write(&input, b"PK").unwrap();
        let backend = CountingBackend::new(false);

        assert!(!check_backend(&backend));

        let args = parse(&[input.as_os_str()]);
        run(&args, &backend).unwrap();

        assert_eq!(backend.renders.get(), 0);
        assert!(!temp_dir.path().join("memo.pdf").exists());
    }

    #[test]
    fn test_unavailable_backend_allows_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("memo.docx"), b"PK").unwrap();
        let backend = CountingBackend::new(false);

        let args = parse(&[
            OsStr::new("-d"),
            temp_dir.path().as_os_str(),
            OsStr::new("--dry-run"),
        ]);
        run(&args, &backend).unwrap();

        assert_eq!(backend.renders.get(), 0);
        assert!(!temp_dir.path().join("memo.pdf").exists());
    }

    #[test]
    fn test_available_backend_converts_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("memo.docx");
        fs::write(&input, b"PK").unwrap();
        let backend = CountingBackend::new(true);

        let args = parse(&[input.as_os_str()]);
        run(&args, &backend).unwrap();

        assert_eq!(backend.renders.get(), 1);
        assert!(temp_dir.path().join("memo.pdf").exists());
    }

    #[test]
    fn test_empty_directory_still_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("empty");
        fs::create_dir(&input_dir).unwrap();
        let output_dir = temp_dir.path().join("pdfs");
        let backend = CountingBackend::new(true);

        let args = parse(&[
            OsStr::new("-d"),
            input_dir.as_os_str(),
            OsStr::new("-o"),
            output_dir.as_os_str(),
        ]);
        run(&args, &backend).unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(backend.renders.get(), 0);
    }

    #[test]
    fn test_dry_run_does_not_create_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("empty");
        fs::create_dir(&input_dir).unwrap();
        let output_dir = temp_dir.path().join("pdfs");
        let backend = CountingBackend::new(true);

        let args = parse(&[
            OsStr::new("-d"),
            input_dir.as_os_str(),
            OsStr::new("-o"),
            output_dir.as_os_str(),
            OsStr::new("--dry-run"),
        ]);
        run(&args, &backend).unwrap();

        assert!(!output_dir.exists());
    }

    #[test]
    fn test_collect_errors_only_failures() {
        let results = vec![
            ConvertResult::converted(
                PathBuf::from("ok.docx"),
                PathBuf::from("ok.pdf"),
                10,
                20,
            ),
            ConvertResult::failure(
                PathBuf::from("bad.docx"),
                None,
                ConvertError::InputNotFound {
                    path: PathBuf::from("bad.docx"),
                },
            ),
        ];

        let errors = collect_errors(&results);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, PathBuf::from("bad.docx"));
        assert!(errors[0].1.contains("bad.docx"));
    }

    #[test]
    fn test_write_error_log() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("errors.log");
        let errors = vec![(PathBuf::from("broken.docx"), "변환 실패".to_string())];

        write_error_log(&log_path, &errors).unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("총 에러 수: 1"));
        assert!(content.contains("broken.docx"));
        assert!(content.contains("변환 실패"));
    }
}
