//! dconvert - DOCX TO PDF CONVERTER
//!
//! DOCX 문서를 원본 서식 그대로 PDF로 변환하는 CLI 도구입니다.
//! 실제 렌더링은 외부 백엔드(LibreOffice 헤드리스 모드)가 담당하고,
//! 이 크레이트는 경로 처리, 폴더 탐색, 결과 집계를 맡습니다.
//!
//! # 주요 기능
//!
//! - 📄 **단일 파일 변환**: 출력 경로를 생략하면 같은 이름의 PDF 생성
//! - 📂 **폴더 일괄 변환**: 폴더 안의 모든 DOCX를 순서대로 변환
//! - 🔍 **패턴 필터링**: glob 형식의 파일 이름 필터링
//! - 📝 **출력 모드**: 기존 PDF 덮어쓰기, 건너뛰기, 에러 처리
//! - 🧪 **드라이런 모드**: 실제 변환 없이 처리될 파일 목록 미리 확인
//! - 📦 **의존성 설치**: 플랫폼 패키지 관리자로 LibreOffice와 글꼴 설치
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! dconvert report.docx
//!
//! # 폴더 일괄 변환
//! dconvert -d ./documents -o ./pdfs
//!
//! # 의존 패키지 설치
//! dconvert --install
//! ```

pub mod backend;
pub mod batch;
pub mod cli;
pub mod converter;
pub mod error;
pub mod install;
pub mod path;
pub mod pattern;
pub mod stats;

// Re-exports for convenient access
pub use backend::{LibreOffice, RenderBackend};
pub use batch::{convert_directory, plan_batch, run_batch, BatchJob, BatchPlan};
pub use cli::{Args, RunMode, WriteMode};
pub use converter::{convert_file, ConvertOptions, ConvertResult, ConvertStatus};
pub use error::{ConvertError, Result};
pub use install::PackageManager;
pub use pattern::FileFilter;
pub use stats::{format_bytes, Statistics};
