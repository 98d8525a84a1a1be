//! 컴파일된 규칙 데이터 구조

use std::fmt;

use regex::{Regex, RegexSet};
use serde::Serialize;

use eqalert_core::types::{Category, RuleGroupKind};

/// 컴파일된 분류 규칙
#[derive(Debug, Clone)]
pub struct Rule {
    /// 원본 패턴 (앵커 없음)
    pub pattern: &'static str,
    /// 결정되는 카테고리
    pub category: Category,
    /// 페이로드 전체에 앵커링된 정규식
    pub(crate) regex: Regex,
}

impl Rule {
    /// 페이로드 전체가 패턴과 일치하는지 확인합니다.
    pub fn matches(&self, payload: &str) -> bool {
        self.regex.is_match(payload)
    }
}

/// 컴파일된 규칙 그룹
///
/// 그룹 안의 규칙을 한 번에 검사하기 위해 `RegexSet`을 함께 보관합니다.
/// 매칭된 인덱스 중 가장 작은 것이 정의 순서상 첫 번째 규칙입니다.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    /// 그룹 종류
    pub kind: RuleGroupKind,
    /// 정의 순서대로 정렬된 규칙
    pub rules: Vec<Rule>,
    pub(crate) set: RegexSet,
}

impl RuleGroup {
    /// 첫 번째로 매칭되는 규칙의 인덱스를 반환합니다.
    pub fn first_match(&self, payload: &str) -> Option<usize> {
        self.set.matches(payload).iter().next()
    }
}

/// 캐스케이드 매칭 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// 매칭된 그룹
    pub group: RuleGroupKind,
    /// 그룹 안에서의 규칙 인덱스
    pub index: usize,
    /// 결정된 카테고리
    pub category: Category,
}

impl fmt::Display for RuleMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] -> {}", self.group, self.index, self.category)
    }
}
