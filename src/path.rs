//! 경로 처리 모듈
//!
//! 출력 경로 계산, 확장자 검사, 출력 폴더 생성을 담당합니다.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// 입력 문서 확장자
pub const DOCX_EXTENSION: &str = "docx";

/// 출력 문서 확장자
pub const PDF_EXTENSION: &str = "pdf";

/// 경로의 확장자가 `ext`인지 확인 (대소문자 무시)
///
/// # Examples
/// ```
/// use dconvert::path::has_extension;
/// use std::path::Path;
///
/// assert!(has_extension(Path::new("report.DOCX"), "docx"));
/// assert!(!has_extension(Path::new("report.doc"), "docx"));
/// ```
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// 입력 파일 옆에 같은 이름의 PDF 경로 생성
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(PDF_EXTENSION)
}

/// 실제로 사용할 출력 경로 결정
///
/// 출력 경로가 없으면 입력 파일의 확장자를 `.pdf`로 바꾸고,
/// 출력 경로가 `.pdf`로 끝나지 않으면 확장자를 `.pdf`로 교체합니다.
///
/// # Examples
/// ```
/// use dconvert::path::resolve_output_path;
/// use std::path::{Path, PathBuf};
///
/// let input = Path::new("docs/report.docx");
/// assert_eq!(resolve_output_path(input, None), PathBuf::from("docs/report.pdf"));
/// assert_eq!(
///     resolve_output_path(input, Some(Path::new("out/final.txt"))),
///     PathBuf::from("out/final.pdf")
/// );
/// ```
pub fn resolve_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        None => default_output_path(input),
        Some(p) if has_extension(p, PDF_EXTENSION) => p.to_path_buf(),
        Some(p) => p.with_extension(PDF_EXTENSION),
    }
}

/// 일괄 변환 시 출력 폴더 안의 PDF 경로 생성
pub fn batch_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PDF_EXTENSION);
    output_dir.join(name)
}

/// 출력 파일의 상위 폴더가 없으면 생성
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// 폴더가 없으면 (중간 폴더 포함) 생성
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ConvertError::CreateDirError {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}
