//! 에러 타입 정의 모듈
//!
//! dconvert에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// dconvert에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 입력 파일이 존재하지 않음
    #[error("입력 파일이 존재하지 않습니다: {path}")]
    InputNotFound { path: PathBuf },

    /// 입력 파일이 DOCX가 아님
    #[error("DOCX 파일이 아닙니다: {path}")]
    NotADocx { path: PathBuf },

    /// 입력 폴더가 존재하지 않음
    #[error("입력 폴더가 존재하지 않습니다: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// 입력이 폴더가 아님
    #[error("입력 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 출력 파일이 이미 존재 (Error 모드에서)
    #[error("출력 파일이 이미 존재합니다: {path}")]
    OutputExists { path: PathBuf },

    /// 이전 출력 파일 삭제 실패 (Overwrite 모드에서)
    #[error("기존 출력 파일을 삭제할 수 없습니다 ({path}): {reason}")]
    RemoveOutputError { path: PathBuf, reason: String },

    /// 같은 폴더의 다른 문서가 이미 같은 PDF 이름을 사용
    #[error("출력 파일 이름이 겹칩니다 ({path}): {first} 에서 이미 사용 중")]
    DuplicateOutput { path: PathBuf, first: PathBuf },

    /// 출력 폴더 생성 실패
    #[error("출력 폴더를 만들 수 없습니다 ({path}): {reason}")]
    CreateDirError { path: PathBuf, reason: String },

    /// 렌더링 백엔드를 찾을 수 없음
    #[error("렌더링 백엔드를 사용할 수 없습니다: {backend}")]
    BackendUnavailable { backend: String },

    /// 렌더링 백엔드 실행 실패
    #[error("변환 중 오류 발생 ({file}): {reason}")]
    BackendFailed { file: PathBuf, reason: String },

    /// 백엔드가 정상 종료했지만 PDF가 없음
    #[error("변환 실패 - 출력 파일이 생성되지 않았습니다: {path}")]
    OutputMissing { path: PathBuf },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 지원하는 패키지 관리자가 없음
    #[error("지원하는 패키지 관리자를 찾을 수 없습니다")]
    NoPackageManager,

    /// 패키지 설치 실패
    #[error("패키지 설치 실패 ({package}): {reason}")]
    InstallFailed { package: String, reason: String },
}

impl ConvertError {
    /// 렌더링 백엔드 쪽 문제인지 여부 (입력 오류와 구분)
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            ConvertError::BackendUnavailable { .. }
                | ConvertError::BackendFailed { .. }
                | ConvertError::OutputMissing { .. }
        )
    }
}

/// dconvert 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
