//! 렌더링 백엔드 모듈
//!
//! DOCX → PDF 렌더링은 외부 프로그램이 담당합니다. 이 모듈은
//! 렌더링 기능을 `RenderBackend` 트레이트로 추상화하고,
//! LibreOffice 헤드리스 모드를 사용하는 기본 구현을 제공합니다.

use log::{debug, warn};
use std::cell::OnceCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{ConvertError, Result};
use crate::path::batch_output_path;

/// DOCX 문서를 PDF로 렌더링하는 외부 기능
pub trait RenderBackend {
    /// 사용자에게 보여줄 백엔드 이름
    fn name(&self) -> &str;

    /// 백엔드를 실행할 수 있는지 확인
    fn is_available(&self) -> bool;

    /// `input` 문서를 렌더링하여 `output` 경로에 PDF로 저장
    ///
    /// `output`의 상위 폴더는 호출자가 미리 만들어 둡니다.
    fn render(&self, input: &Path, output: &Path) -> Result<()>;
}

/// LibreOffice 실행 파일 후보 (PATH 검색 포함)
const SOFFICE_CANDIDATES: &[&str] = &[
    "soffice",
    "libreoffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    r"C:\Program Files\LibreOffice\program\soffice.exe",
];

/// LibreOffice 헤드리스 변환 백엔드
#[derive(Debug, Clone)]
pub struct LibreOffice {
    program: PathBuf,
    /// `--version` 확인 결과 (한 번만 실행)
    available: OnceCell<bool>,
}

impl LibreOffice {
    /// 지정한 실행 파일로 백엔드 생성
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            available: OnceCell::new(),
        }
    }

    /// 실행 파일 위치 결정
    ///
    /// 명시적으로 지정된 경로가 있으면 그대로 사용하고, 없으면 알려진
    /// 후보 중 실행 가능한 첫 번째 것을 고릅니다. 후보 확인 결과는
    /// 반환된 백엔드에 남아 `is_available`이 다시 실행하지 않습니다.
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        if let Some(program) = explicit {
            return Self::new(program);
        }

        let mut candidates: Vec<Self> = SOFFICE_CANDIDATES
            .iter()
            .map(|candidate| Self::new(*candidate))
            .collect();
        let index = candidates
            .iter()
            .position(|backend| backend.is_available())
            .unwrap_or(0);
        candidates.swap_remove(index)
    }

    /// 사용 중인 실행 파일 경로
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `--version`으로 실행 가능 여부 확인
    fn probe(&self) -> bool {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("{:?} 실행 불가: {}", self.program, e);
                false
            }
        }
    }
}

impl RenderBackend for LibreOffice {
    fn name(&self) -> &str {
        "LibreOffice"
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.probe())
    }

    fn render(&self, input: &Path, output: &Path) -> Result<()> {
        let failed = |reason: String| ConvertError::BackendFailed {
            file: input.to_path_buf(),
            reason,
        };

        // LibreOffice는 출력 파일 이름을 지정할 수 없으므로 임시 폴더에 만든 뒤 옮긴다
        let scratch = tempfile::Builder::new()
            .prefix("dconvert-")
            .tempdir()
            .map_err(|e| failed(format!("임시 폴더 생성 실패: {}", e)))?;
        let out_dir = scratch.path().join("out");
        let profile_dir = scratch.path().join("profile");

        let mut command = Command::new(&self.program);
        command
            .arg(format!("-env:UserInstallation={}", file_url(&profile_dir)))
            .args(["--headless", "--norestore", "--convert-to", "pdf", "--outdir"])
            .arg(&out_dir)
            .arg(input)
            .stdin(Stdio::null());

        debug!("렌더링 명령: {:?}", command);

        let result = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::BackendUnavailable {
                backend: self.program.display().to_string(),
            },
            _ => failed(format!("{:?} 실행 실패: {}", self.program, e)),
        })?;

        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();

        if !result.status.success() {
            return Err(failed(format!("{} ({})", result.status, stderr)));
        }

        let produced = batch_output_path(input, &out_dir);
        if !produced.exists() {
            // 손상된 문서는 종료 코드 0으로 끝나면서 PDF만 만들지 않는 경우가 있다
            let reason = if stderr.is_empty() {
                "PDF가 생성되지 않았습니다".to_string()
            } else {
                stderr
            };
            return Err(failed(reason));
        }

        move_file(&produced, output).map_err(|e| failed(format!("PDF 이동 실패: {}", e)))
    }
}

/// 파일 이동 (다른 파일 시스템이면 복사 후 삭제)
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        warn!("임시 파일 삭제 실패 {:?}: {}", from, e);
    }
    Ok(())
}

/// LibreOffice `-env:UserInstallation`용 file URL 생성
fn file_url(path: &Path) -> String {
    let path = path
        .to_string_lossy()
        .replace('\\', "/")
        .replace(' ', "%20");

    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}
