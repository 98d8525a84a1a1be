//! 카테고리 캐스케이드 -- 순서가 있는 규칙 그룹으로 페이로드 분류
//!
//! 선언형 규칙 테이블([`table`])을 시작 시 한 번 컴파일하여
//! [`Cascade`]를 만듭니다. 컴파일된 캐스케이드는 불변이며
//! `Arc`로 여러 태스크에서 락 없이 공유됩니다.
//!
//! # 평가 순서
//! 그룹은 우선순위 순서로, 그룹 안의 규칙은 정의 순서로 평가하며
//! 처음 매칭된 규칙의 카테고리를 반환합니다. 어떤 규칙에도 매칭되지 않으면
//! [`Category::Undetermined`]입니다.
//!
//! # 아키텍처
//! - [`Cascade`]: 컴파일 및 평가 코디네이터
//! - [`table`]: 내장 규칙 테이블 (데이터)
//! - [`types`]: 컴파일된 규칙/그룹 구조

pub mod table;
pub mod types;

pub use table::{BUILTIN_GROUPS, GroupSpec, RuleSpec};
pub use types::{Rule, RuleGroup, RuleMatch};

use std::collections::HashMap;

use regex::{Regex, RegexSet};

use eqalert_core::types::Category;

use crate::error::LogPipelineError;

/// 분류 캐스케이드
///
/// # 사용 예시
/// ```
/// use eqalert_core::Category;
/// use eqalert_log_pipeline::rule::Cascade;
///
/// let cascade = Cascade::new().unwrap();
/// assert_eq!(cascade.classify("Welcome to level 10!"), Category::DingUp);
/// assert_eq!(cascade.classify("nothing to see"), Category::Undetermined);
/// ```
#[derive(Debug, Clone)]
pub struct Cascade {
    groups: Vec<RuleGroup>,
}

impl Cascade {
    /// 내장 규칙 테이블로 캐스케이드를 컴파일합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Self::from_tables(BUILTIN_GROUPS)
    }

    /// 주어진 규칙 테이블로 캐스케이드를 컴파일합니다.
    ///
    /// 모든 규칙을 검증합니다:
    /// - 패턴이 컴파일되어야 함
    /// - `undetermined`는 규칙의 카테고리가 될 수 없음
    /// - 같은 카테고리가 두 번 나타나면 안 됨
    pub fn from_tables(specs: &[GroupSpec]) -> Result<Self, LogPipelineError> {
        let mut seen: HashMap<Category, String> = HashMap::new();
        let mut groups = Vec::with_capacity(specs.len());

        for group_spec in specs {
            let mut rules = Vec::with_capacity(group_spec.rules.len());
            let mut anchored = Vec::with_capacity(group_spec.rules.len());

            for (idx, spec) in group_spec.rules.iter().enumerate() {
                let rule_id = format!("{}[{idx}]", group_spec.kind);

                if spec.category.is_undetermined() {
                    return Err(LogPipelineError::RuleValidation {
                        rule_id,
                        reason: "the fallback category cannot be assigned by a rule".to_owned(),
                    });
                }
                if let Some(previous) = seen.get(&spec.category) {
                    return Err(LogPipelineError::RuleValidation {
                        rule_id,
                        reason: format!(
                            "category '{}' is already assigned by {previous}",
                            spec.category
                        ),
                    });
                }

                let pattern = format!("^(?:{})$", spec.pattern);
                let regex =
                    Regex::new(&pattern).map_err(|e| LogPipelineError::RuleValidation {
                        rule_id: rule_id.clone(),
                        reason: format!("invalid pattern for '{}': {e}", spec.category),
                    })?;

                seen.insert(spec.category, rule_id);
                anchored.push(pattern);
                rules.push(Rule {
                    pattern: spec.pattern,
                    category: spec.category,
                    regex,
                });
            }

            let set = RegexSet::new(&anchored)?;
            groups.push(RuleGroup {
                kind: group_spec.kind,
                rules,
                set,
            });
        }

        let cascade = Self { groups };
        tracing::debug!(
            groups = cascade.group_count(),
            rules = cascade.rule_count(),
            "compiled classification cascade"
        );
        Ok(cascade)
    }

    /// 페이로드의 카테고리를 결정합니다.
    ///
    /// 모든 문자열(빈 문자열 포함)에 대해 정의되며 같은 입력에는 항상 같은 결과입니다.
    pub fn classify(&self, payload: &str) -> Category {
        self.explain(payload)
            .map_or(Category::Undetermined, |m| m.category)
    }

    /// 어떤 그룹의 몇 번째 규칙이 매칭되었는지 반환합니다.
    pub fn explain(&self, payload: &str) -> Option<RuleMatch> {
        self.groups.iter().find_map(|group| {
            group.first_match(payload).map(|index| RuleMatch {
                group: group.kind,
                index,
                category: group.rules[index].category,
            })
        })
    }

    /// 컴파일된 그룹 목록을 반환합니다.
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// 그룹 수를 반환합니다.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 전체 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }
}
