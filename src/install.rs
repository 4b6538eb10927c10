//! 의존 패키지 설치 모듈
//!
//! 플랫폼 패키지 관리자를 찾아 LibreOffice와 문서용 글꼴을 설치합니다.

use log::debug;
use std::process::{Command, Stdio};

use crate::error::{ConvertError, Result};

/// 지원하는 패키지 관리자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Zypper,
    Brew,
    Winget,
}

impl PackageManager {
    /// 현재 플랫폼에서 탐색할 후보 (우선순위 순)
    pub fn candidates() -> &'static [PackageManager] {
        if cfg!(target_os = "macos") {
            return &[PackageManager::Brew];
        }
        if cfg!(target_os = "windows") {
            return &[PackageManager::Winget];
        }
        &[
            PackageManager::Apt,
            PackageManager::Dnf,
            PackageManager::Pacman,
            PackageManager::Zypper,
        ]
    }

    /// 실행 가능한 첫 번째 패키지 관리자 탐색
    pub fn detect() -> Option<Self> {
        Self::candidates().iter().copied().find(|pm| pm.is_available())
    }

    /// 실행 파일 이름
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
            PackageManager::Brew => "brew",
            PackageManager::Winget => "winget",
        }
    }

    /// 설치할 패키지 목록 (렌더러, 라틴 호환 글꼴, CJK 글꼴)
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Apt => &["libreoffice-writer", "fonts-liberation", "fonts-noto-cjk"],
            PackageManager::Dnf => &[
                "libreoffice-writer",
                "liberation-fonts",
                "google-noto-sans-cjk-fonts",
            ],
            PackageManager::Pacman => &["libreoffice-fresh", "ttf-liberation", "noto-fonts-cjk"],
            PackageManager::Zypper => &[
                "libreoffice-writer",
                "liberation-fonts",
                "noto-sans-cjk-fonts",
            ],
            PackageManager::Brew => &["libreoffice", "font-liberation", "font-noto-sans-cjk"],
            PackageManager::Winget => &["TheDocumentFoundation.LibreOffice"],
        }
    }

    /// 패키지 하나를 설치하는 인자 목록
    pub fn install_args(&self, package: &str) -> Vec<String> {
        let args = match self {
            PackageManager::Apt | PackageManager::Dnf => vec!["install", "-y", package],
            PackageManager::Pacman => vec!["-S", "--noconfirm", "--needed", package],
            PackageManager::Zypper => vec!["--non-interactive", "install", package],
            PackageManager::Brew => vec!["install", "--cask", package],
            PackageManager::Winget => vec![
                "install",
                "-e",
                "--id",
                package,
                "--accept-package-agreements",
                "--accept-source-agreements",
            ],
        };
        args.into_iter().map(String::from).collect()
    }

    /// 관리자 권한이 필요한지 여부
    pub fn needs_root(&self) -> bool {
        !matches!(self, PackageManager::Brew | PackageManager::Winget)
    }

    /// 사용자에게 보여줄 설치 명령
    ///
    /// # Examples
    /// ```
    /// use dconvert::install::PackageManager;
    ///
    /// assert_eq!(
    ///     PackageManager::Apt.install_hint(),
    ///     "sudo apt-get install -y libreoffice-writer fonts-liberation fonts-noto-cjk"
    /// );
    /// ```
    pub fn install_hint(&self) -> String {
        let mut args = self.install_args(&self.packages().join(" "));
        args.insert(0, self.program().to_string());
        if self.needs_root() {
            args.insert(0, "sudo".to_string());
        }
        args.join(" ")
    }

    fn is_available(&self) -> bool {
        Command::new(self.program())
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// 패키지 하나 설치 (패키지 관리자 출력은 그대로 터미널에 표시)
pub fn install_package(manager: PackageManager, package: &str) -> Result<()> {
    let mut command = Command::new(manager.program());
    command.args(manager.install_args(package));

    debug!("설치 명령: {:?}", command);

    let status = command.status().map_err(|e| ConvertError::InstallFailed {
        package: package.to_string(),
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(ConvertError::InstallFailed {
            package: package.to_string(),
            reason: status.to_string(),
        });
    }

    Ok(())
}

/// 필요한 패키지를 차례로 설치
///
/// 패키지마다 `report`를 호출하고, 처음 실패한 패키지에서 중단합니다.
pub fn install_dependencies<F>(manager: PackageManager, mut report: F) -> Result<()>
where
    F: FnMut(&str, &Result<()>),
{
    for package in manager.packages() {
        let result = install_package(manager, package);
        report(package, &result);
        result?;
    }
    Ok(())
}
