//! 단일 파일 변환 모듈
//!
//! 입력 검증, 출력 경로 결정, 백엔드 호출, 결과 확인을 담당합니다.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::RenderBackend;
use crate::cli::WriteMode;
use crate::error::{ConvertError, Result};
use crate::path::{ensure_parent_dir, has_extension, resolve_output_path, DOCX_EXTENSION};

/// 파일 변환 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStatus {
    /// PDF 생성 완료
    Converted,
    /// 출력 파일이 이미 있어 건너뜀 (Skip 모드)
    Skipped,
    /// 변환 실패
    Failed,
}

/// 파일 변환 결과
#[derive(Debug)]
pub struct ConvertResult {
    /// 입력 DOCX 경로
    pub input: PathBuf,
    /// 실제 사용한 출력 PDF 경로 (결정되기 전에 실패하면 None)
    pub output: Option<PathBuf>,
    /// 변환 상태
    pub status: ConvertStatus,
    /// 실패 원인
    pub error: Option<ConvertError>,
    /// 입력 파일 크기
    pub bytes_read: u64,
    /// 출력 파일 크기
    pub bytes_written: u64,
}

impl ConvertResult {
    /// 성공 결과 생성
    pub fn converted(input: PathBuf, output: PathBuf, bytes_read: u64, bytes_written: u64) -> Self {
        Self {
            input,
            output: Some(output),
            status: ConvertStatus::Converted,
            error: None,
            bytes_read,
            bytes_written,
        }
    }

    /// 건너뜀 결과 생성
    pub fn skipped(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output: Some(output),
            status: ConvertStatus::Skipped,
            error: None,
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// 실패 결과 생성
    pub fn failure(input: PathBuf, output: Option<PathBuf>, error: ConvertError) -> Self {
        Self {
            input,
            output,
            status: ConvertStatus::Failed,
            error: Some(error),
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// PDF가 실제로 만들어졌는지 여부
    pub fn is_success(&self) -> bool {
        self.status == ConvertStatus::Converted
    }

    /// 사용자에게 보여줄 에러 메시지
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// 변환 옵션
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// 출력 파일이 이미 있을 때의 처리 방식
    pub mode: WriteMode,
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 출력 모드 설정
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }
}

/// 단일 DOCX 파일을 PDF로 변환
///
/// 실패해도 에러를 반환하지 않고 `ConvertResult`에 담아 돌려줍니다.
///
/// # Arguments
/// * `backend` - 렌더링 백엔드
/// * `input` - 입력 DOCX 파일 경로
/// * `output` - 출력 PDF 경로 (None이면 입력 파일 옆에 생성)
/// * `options` - 변환 옵션
pub fn convert_file<B: RenderBackend + ?Sized>(
    backend: &B,
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> ConvertResult {
    let target = resolve_output_path(input, output);

    match convert_file_internal(backend, input, &target, options) {
        Ok(Some((bytes_read, bytes_written))) => {
            ConvertResult::converted(input.to_path_buf(), target, bytes_read, bytes_written)
        }
        Ok(None) => ConvertResult::skipped(input.to_path_buf(), target),
        Err(e) => ConvertResult::failure(input.to_path_buf(), Some(target), e),
    }
}

/// 입력 파일 검증
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(ConvertError::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    if !input.is_file() || !has_extension(input, DOCX_EXTENSION) {
        return Err(ConvertError::NotADocx {
            path: input.to_path_buf(),
        });
    }

    Ok(())
}

/// 내부 변환 로직
///
/// 건너뛴 경우 `None`, 변환한 경우 (입력 크기, 출력 크기)를 반환한다.
fn convert_file_internal<B: RenderBackend + ?Sized>(
    backend: &B,
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<Option<(u64, u64)>> {
    validate_input(input)?;

    if output.exists() {
        match options.mode {
            WriteMode::Skip => {
                debug!("이미 존재하여 건너뜀: {:?}", output);
                return Ok(None);
            }
            WriteMode::Error => {
                return Err(ConvertError::OutputExists {
                    path: output.to_path_buf(),
                })
            }
            WriteMode::Overwrite => {
                // 남아 있는 이전 PDF가 존재 확인을 통과시키지 않도록 먼저 지운다
                fs::remove_file(output).map_err(|e| ConvertError::RemoveOutputError {
                    path: output.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
        }
    }

    ensure_parent_dir(output)?;

    debug!("{} 렌더링: {:?} -> {:?}", backend.name(), input, output);
    backend.render(input, output)?;

    if !output.exists() {
        return Err(ConvertError::OutputMissing {
            path: output.to_path_buf(),
        });
    }

    let bytes_read = file_size(input);
    let bytes_written = file_size(output);

    Ok(Some((bytes_read, bytes_written)))
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// 호출 횟수를 세고, 설정에 따라 PDF를 쓰거나 실패하는 백엔드
    struct StubBackend {
        calls: Cell<usize>,
        write_output: bool,
        fail: bool,
    }

    impl StubBackend {
        fn writing() -> Self {
            Self {
                calls: Cell::new(0),
                write_output: true,
                fail: false,
            }
        }
    }

    impl RenderBackend for StubBackend {
        fn name(&self) -> &str {
            "stub"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn render(&self, input: &Path, output: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ConvertError::BackendFailed {
                    file: input.to_path_buf(),
                    reason: "stub failure".to_string(),
                });
            }
            if self.write_output {
                fs::write(output, b"%PDF-1.7 stub").unwrap();
            }
            Ok(())
        }
    }

    fn docx(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"PK\x03\x04 docx").unwrap();
        path
    }

    #[test]
    fn test_convert_default_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        let backend = StubBackend::writing();

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        assert!(result.is_success());
        assert_eq!(result.output, Some(temp_dir.path().join("memo.pdf")));
        assert!(temp_dir.path().join("memo.pdf").exists());
        assert_eq!(result.bytes_written, 13);
        assert_eq!(backend.calls.get(), 1);
    }

    #[test]
    fn test_wrong_extension_skips_backend() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("memo.txt");
        fs::write(&input, "text").unwrap();
        let backend = StubBackend::writing();

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        assert_eq!(result.status, ConvertStatus::Failed);
        assert!(matches!(result.error, Some(ConvertError::NotADocx { .. })));
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_directory_named_docx_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("folder.docx");
        fs::create_dir(&input).unwrap();
        let backend = StubBackend::writing();

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        assert!(matches!(result.error, Some(ConvertError::NotADocx { .. })));
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_backend_ok_without_output_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        let backend = StubBackend {
            write_output: false,
            ..StubBackend::writing()
        };

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        assert!(!result.is_success());
        assert!(matches!(result.error, Some(ConvertError::OutputMissing { .. })));
    }

    #[test]
    fn test_overwrite_removes_stale_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        let stale = temp_dir.path().join("memo.pdf");
        fs::write(&stale, b"old").unwrap();
        let backend = StubBackend {
            fail: true,
            ..StubBackend::writing()
        };

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        assert!(!result.is_success());
        assert!(result.error.as_ref().unwrap().is_backend_error());
        assert!(!stale.exists());
    }

    #[test]
    fn test_undeletable_output_is_not_backend_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        fs::create_dir(temp_dir.path().join("memo.pdf")).unwrap();
        let backend = StubBackend::writing();

        let result = convert_file(&backend, &input, None, &ConvertOptions::new());

        let error = result.error.as_ref().unwrap();
        assert!(matches!(error, ConvertError::RemoveOutputError { .. }));
        assert!(!error.is_backend_error());
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_skip_mode_keeps_existing() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        let existing = temp_dir.path().join("memo.pdf");
        fs::write(&existing, b"keep").unwrap();
        let backend = StubBackend::writing();
        let options = ConvertOptions::new().with_mode(WriteMode::Skip);

        let result = convert_file(&backend, &input, None, &options);

        assert_eq!(result.status, ConvertStatus::Skipped);
        assert!(!result.is_success());
        assert_eq!(fs::read(&existing).unwrap(), b"keep");
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_error_mode_rejects_existing() {
        let temp_dir = TempDir::new().unwrap();
        let input = docx(temp_dir.path(), "memo.docx");
        fs::write(temp_dir.path().join("memo.pdf"), b"keep").unwrap();
        let backend = StubBackend::writing();
        let options = ConvertOptions::new().with_mode(WriteMode::Error);

        let result = convert_file(&backend, &input, None, &options);

        assert!(matches!(result.error, Some(ConvertError::OutputExists { .. })));
        assert_eq!(backend.calls.get(), 0);
    }
}
