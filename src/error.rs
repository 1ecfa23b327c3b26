//! Error types for envprops
//!
//! This module defines the error types used throughout the crate.

use thiserror::Error;

/// Filter 구성 및 실행 에러
#[derive(Error, Debug)]
pub enum FilterError {
    /// 정규식 패턴 컴파일 실패
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 매칭된 패턴의 캡처 그룹 수가 1이 아님
    #[error(
        "Pattern '{pattern}' returns {groups} group(s) but should only return 1. \
         Patterns must define exactly one capture group, e.g. '^KEY_(.+)$'"
    )]
    CaptureGroupCount { pattern: String, groups: usize },

    /// 소스 매핑 누락
    #[error("Environment mapping cannot be absent")]
    MissingEnvironment,

    /// 빈 문자열 치환 규칙
    #[error("Key replacement source cannot be empty (replacement to '{to}')")]
    EmptyReplacement { to: String },
}

impl FilterError {
    /// 구성 단계에서 발생하는 에러인지 확인
    ///
    /// Everything except the capture group check is rejected before a
    /// filter is ever built.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidPattern { .. }
                | FilterError::MissingEnvironment
                | FilterError::EmptyReplacement { .. }
        )
    }

    /// The offending pattern text, if the error concerns one
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FilterError::InvalidPattern { pattern, .. }
            | FilterError::CaptureGroupCount { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

/// Source 모듈 에러 타입
#[derive(Error, Debug)]
pub enum SourceError {
    /// 파일 읽기 실패
    #[error("Failed to read environment file: {0}")]
    Read(#[from] std::io::Error),

    /// 잘못된 라인
    #[error("Malformed line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },
}

/// Output rendering errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// JSON 직렬화 실패
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 직렬화 실패
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
