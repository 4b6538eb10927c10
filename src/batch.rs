//! 폴더 일괄 변환 모듈
//!
//! 폴더 안의 DOCX 파일 수집과 순차 변환, 결과 집계를 담당합니다.

use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::backend::RenderBackend;
use crate::converter::{convert_file, ConvertOptions, ConvertResult};
use crate::error::{ConvertError, Result};
use crate::path::{batch_output_path, ensure_dir};
use crate::pattern::FileFilter;
use crate::stats::Statistics;

/// 입력 파일과 출력 파일 한 쌍
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// 같은 출력 경로를 먼저 차지한 입력 파일 (`a.docx`와 `a.DOCX` 등)
    pub conflict: Option<PathBuf>,
}

/// 일괄 변환 계획
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// 입력 폴더
    pub input_dir: PathBuf,
    /// 출력 폴더 (기본값: 입력 폴더)
    pub output_dir: PathBuf,
    /// 변환할 파일 목록 (파일 이름 순)
    pub jobs: Vec<BatchJob>,
}

impl BatchPlan {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

/// 입력 폴더 검증
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(ConvertError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    if !dir.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    Ok(())
}

/// 폴더 바로 아래의 DOCX 파일 수집 (하위 폴더는 탐색하지 않음)
pub fn collect_documents(dir: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    validate_directory(dir)?;

    let documents = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| filter.matches(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(documents)
}

/// 일괄 변환 계획 수립
///
/// # Arguments
/// * `input_dir` - DOCX 파일이 있는 폴더
/// * `output_dir` - PDF를 저장할 폴더 (None이면 입력 폴더)
/// * `filter` - 대상 파일 필터
pub fn plan_batch(
    input_dir: &Path,
    output_dir: Option<&Path>,
    filter: &FileFilter,
) -> Result<BatchPlan> {
    let documents = collect_documents(input_dir, filter)?;
    let output_dir = output_dir.unwrap_or(input_dir).to_path_buf();

    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let jobs = documents
        .into_iter()
        .map(|input| {
            let output = batch_output_path(&input, &output_dir);
            let conflict = claimed.get(&output).cloned();
            if conflict.is_none() {
                claimed.insert(output.clone(), input.clone());
            }
            BatchJob {
                input,
                output,
                conflict,
            }
        })
        .collect();

    Ok(BatchPlan {
        input_dir: input_dir.to_path_buf(),
        output_dir,
        jobs,
    })
}

/// 계획된 파일을 하나씩 변환
///
/// 개별 파일의 실패는 통계에만 반영하고 다음 파일로 넘어갑니다.
/// 출력 경로가 겹치는 파일은 렌더링하지 않고 실패로 기록합니다.
/// 출력 폴더를 만들 수 없을 때만 에러를 반환합니다.
///
/// # Arguments
/// * `on_result` - 파일 하나를 처리할 때마다 호출되는 콜백
pub fn run_batch<B, F>(
    backend: &B,
    plan: &BatchPlan,
    options: &ConvertOptions,
    mut on_result: F,
) -> Result<Statistics>
where
    B: RenderBackend + ?Sized,
    F: FnMut(&ConvertResult),
{
    ensure_dir(&plan.output_dir)?;

    let mut stats = Statistics::new(plan.len());

    for job in &plan.jobs {
        let result = match &job.conflict {
            Some(first) => ConvertResult::failure(
                job.input.clone(),
                Some(job.output.clone()),
                ConvertError::DuplicateOutput {
                    path: job.output.clone(),
                    first: first.clone(),
                },
            ),
            None => convert_file(backend, &job.input, Some(&job.output), options),
        };
        stats.record(&result);
        on_result(&result);
    }

    Ok(stats)
}

/// 폴더 안의 모든 DOCX 파일을 변환하고 성공 개수 반환
///
/// 폴더가 없거나 폴더가 아니면 0을 반환합니다.
pub fn convert_directory<B: RenderBackend + ?Sized>(
    backend: &B,
    input_dir: &Path,
    output_dir: Option<&Path>,
    options: &ConvertOptions,
) -> usize {
    let plan = match plan_batch(input_dir, output_dir, &FileFilter::default()) {
        Ok(plan) => plan,
        Err(e) => {
            warn!("{}", e);
            return 0;
        }
    };

    if plan.is_empty() {
        info!("DOCX 파일이 없습니다: {:?}", input_dir);
    }

    let stats = run_batch(backend, &plan, options, |result| {
        if let Some(message) = result.error_message() {
            warn!("{}", message);
        }
    });

    match stats {
        Ok(stats) => {
            info!("{}/{} 개 파일 변환 완료", stats.success_count, stats.total_files);
            stats.success_count
        }
        Err(e) => {
            warn!("{}", e);
            0
        }
    }
}
