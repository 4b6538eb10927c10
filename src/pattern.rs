//! 파일 필터 모듈
//!
//! 확장자 검사와 glob 패턴을 사용한 파일 이름 필터링을 담당합니다.

use glob::{MatchOptions, Pattern};
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::path::{has_extension, DOCX_EXTENSION};

/// 일괄 변환 대상 파일 필터
pub struct FileFilter {
    extension: String,
    pattern: Option<Pattern>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extension: DOCX_EXTENSION.to_string(),
            pattern: None,
        }
    }
}

impl FileFilter {
    /// DOCX 파일 필터 생성
    ///
    /// # Arguments
    /// * `pattern` - 파일 이름 glob 패턴 (None이면 모든 DOCX 파일 매칭)
    ///
    /// # Examples
    /// ```
    /// use dconvert::pattern::FileFilter;
    /// use std::path::Path;
    ///
    /// let filter = FileFilter::new(Some("minutes_*".to_string())).unwrap();
    /// assert!(filter.matches(Path::new("minutes_0412.docx")));
    /// assert!(!filter.matches(Path::new("minutes_0412.pdf")));
    /// assert!(!filter.matches(Path::new("agenda.docx")));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let pattern = match pattern {
            Some(p) => Some(
                Pattern::new(&normalize_pattern(&p))
                    .map_err(|_| ConvertError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self {
            pattern,
            ..Default::default()
        })
    }

    /// 파일이 필터 조건을 모두 만족하는지 확인
    pub fn matches(&self, path: &Path) -> bool {
        if !has_extension(path, &self.extension) {
            return false;
        }

        let Some(pattern) = &self.pattern else {
            return true;
        };

        path.file_name()
            .and_then(|s| s.to_str())
            .map(|name| pattern.matches_with(name, match_options()))
            .unwrap_or(false)
    }

    /// 이름 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}

/// 확장자 없이 쓴 패턴은 `.docx`까지 매칭되도록 보정
///
/// `report_*`는 `report_*.docx`가 아니어도 `*`가 확장자까지 삼키므로
/// 그대로 두고, `draft?`처럼 끝이 고정된 패턴만 `.*`를 붙인다.
fn normalize_pattern(pattern: &str) -> String {
    let lower = pattern.to_ascii_lowercase();
    if lower.ends_with(".docx") || pattern.ends_with('*') {
        pattern.to_string()
    } else {
        format!("{}.*", pattern)
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_matches_docx_only() {
        let filter = FileFilter::default();
        assert!(filter.matches(Path::new("a.docx")));
        assert!(filter.matches(Path::new("B.DOCX")));
        assert!(!filter.matches(Path::new("a.doc")));
        assert!(!filter.matches(Path::new("a.pdf")));
        assert!(!filter.matches(Path::new("~$a.docx.tmp")));
        assert!(!filter.has_pattern());
    }

    #[test]
    fn test_pattern_with_wildcard() {
        let filter = FileFilter::new(Some("*_final*".to_string())).unwrap();
        assert!(filter.matches(Path::new("thesis_final.docx")));
        assert!(filter.matches(Path::new("dir/thesis_final_v2.docx")));
        assert!(!filter.matches(Path::new("thesis_draft.docx")));
        assert!(filter.has_pattern());
    }

    #[test]
    fn test_pattern_without_extension() {
        let filter = FileFilter::new(Some("draft?".to_string())).unwrap();
        assert!(filter.matches(Path::new("draft1.docx")));
        assert!(!filter.matches(Path::new("draft12.docx")));
        assert!(!filter.matches(Path::new("draft1.txt")));
    }

    #[test]
    fn test_pattern_with_extension() {
        let filter = FileFilter::new(Some("file[0-9].docx".to_string())).unwrap();
        assert!(filter.matches(Path::new("file1.docx")));
        assert!(filter.matches(Path::new("FILE9.DOCX")));
        assert!(!filter.matches(Path::new("fileA.docx")));
    }

    #[test]
    fn test_pattern_invalid() {
        let result = FileFilter::new(Some("[invalid".to_string()));
        assert!(matches!(result, Err(ConvertError::InvalidPattern { .. })));
    }
}
