//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 출력 파일이 이미 있을 때의 처리 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum WriteMode {
    /// 기존 파일이 있으면 덮어쓰기
    #[default]
    Overwrite,
    /// 기존 파일이 있으면 건너뛰기
    Skip,
    /// 기존 파일이 있으면 에러
    Error,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Overwrite => write!(f, "Overwrite"),
            WriteMode::Skip => write!(f, "Skip"),
            WriteMode::Error => write!(f, "Error"),
        }
    }
}

/// dconvert CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "dconvert",
    author = "YourName <your@email.com>",
    version,
    about = "DOCX TO PDF CONVERTER - DOCX 문서를 서식 그대로 PDF로 변환하는 CLI 도구",
    long_about = r#"
DOCX TO PDF CONVERTER
=====================

DOCX 문서를 원본 서식을 유지한 채 PDF로 변환합니다.
실제 렌더링은 LibreOffice(헤드리스 모드)가 담당합니다.

예제:
  # 단일 파일 변환
  dconvert document.docx

  # 출력 경로 지정
  dconvert document.docx -o output.pdf

  # 폴더 안의 모든 DOCX 변환
  dconvert -d ./documents

  # 다른 폴더로 일괄 변환
  dconvert -d ./documents -o ./pdfs

  # 필요한 패키지 설치
  dconvert --install
"#
)]
pub struct Args {
    /// 입력 DOCX 파일 또는 폴더 경로
    pub input: Option<PathBuf>,

    /// 출력 PDF 파일 또는 폴더 경로
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 입력을 DOCX 파일이 들어 있는 폴더로 취급
    #[arg(short, long)]
    pub directory: bool,

    /// 필요한 패키지 설치
    #[arg(long)]
    pub install: bool,

    /// 출력 파일이 이미 있을 때의 처리 방식
    #[arg(short, long, value_enum, default_value_t = WriteMode::Overwrite)]
    pub mode: WriteMode,

    /// 폴더 모드에서 파일 이름 패턴 필터 (glob 형식, 예: "report_*")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// LibreOffice 실행 파일 경로 (기본값: 자동 탐색)
    #[arg(long, env = "DCONVERT_SOFFICE")]
    pub soffice: Option<PathBuf>,
}

impl Args {
    /// 선택된 실행 모드 반환
    pub fn run_mode(&self) -> RunMode {
        if self.install {
            RunMode::Install
        } else if self.directory {
            RunMode::Directory
        } else {
            RunMode::SingleFile
        }
    }
}

/// 실행 모드
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunMode {
    /// 단일 파일 변환 (기본값)
    SingleFile,
    /// 폴더 일괄 변환
    Directory,
    /// 의존 패키지 설치
    Install,
}
