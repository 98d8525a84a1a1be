//! One-shot subcommands: `classify` and `categories`.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use eqalert_core::pipeline::LineClassifier;
use eqalert_core::types::{Category, RuleGroupKind};
use eqalert_log_pipeline::Classifier;
use eqalert_log_pipeline::diagnostic::Diagnostic;

use crate::cli::{CategoriesArgs, ClassifyArgs};
use crate::output::{OutputWriter, Render};

/// Execute the `classify` command.
pub fn classify(args: ClassifyArgs, writer: &OutputWriter) -> Result<()> {
    let classifier = Classifier::new()?;
    let report = build_classify_report(&classifier, &args.text, args.payload);
    writer.render(&report)
}

/// Execute the `categories` command.
pub fn categories(args: CategoriesArgs, writer: &OutputWriter) -> Result<()> {
    let report = build_category_report(args.group.as_deref())?;
    writer.render(&report)
}

#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub results: Vec<ClassifyEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyEntry {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Matching rule as `group[index]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// Classify each input either as a full log line or as a bare payload.
pub fn build_classify_report(
    classifier: &Classifier,
    inputs: &[String],
    bare_payload: bool,
) -> ClassifyReport {
    let results = inputs
        .iter()
        .map(|input| {
            let (timestamp, payload) = if bare_payload {
                (None, input.trim().to_owned())
            } else {
                match classifier.extract(input) {
                    Some(envelope) => (Some(envelope.timestamp), envelope.payload),
                    None => {
                        let diagnostic = Diagnostic::Unenveloped {
                            line: input.trim().to_owned(),
                        };
                        return ClassifyEntry {
                            input: input.clone(),
                            timestamp: None,
                            category: None,
                            rule: None,
                            diagnostic: Some(diagnostic.to_string()),
                        };
                    }
                }
            };

            let rule = classifier.explain(&payload);
            ClassifyEntry {
                input: input.clone(),
                timestamp,
                category: Some(rule.map_or(Category::Undetermined, |m| m.category)),
                rule: rule.map(|m| format!("{}[{}]", m.group, m.index)),
                diagnostic: None,
            }
        })
        .collect();

    ClassifyReport { results }
}

impl Render for ClassifyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for entry in &self.results {
            match (&entry.category, &entry.diagnostic) {
                (Some(category), _) => {
                    write!(w, "{:<32}", category.as_str())?;
                    if let Some(rule) = &entry.rule {
                        write!(w, " {rule:<20}")?;
                    } else {
                        write!(w, " {:<20}", "-")?;
                    }
                    writeln!(w, " {}", entry.input)?;
                }
                (None, Some(diagnostic)) => writeln!(w, "{diagnostic}")?,
                (None, None) => writeln!(w, "{}", entry.input)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryReport {
    pub total: usize,
    pub groups: Vec<CategoryGroupEntry>,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroupEntry {
    pub group: RuleGroupKind,
    pub categories: Vec<Category>,
}

/// List categories in cascade priority order.
///
/// `undetermined` is only counted in the full listing.
pub fn build_category_report(group: Option<&str>) -> Result<CategoryReport> {
    let kinds: Vec<RuleGroupKind> = match group {
        Some(name) => {
            let kind = RuleGroupKind::PRIORITY
                .into_iter()
                .find(|k| k.as_str() == name)
                .ok_or_else(|| {
                    let known: Vec<&str> =
                        RuleGroupKind::PRIORITY.iter().map(|k| k.as_str()).collect();
                    anyhow::anyhow!(
                        "unknown rule group '{}', expected one of: {}",
                        name,
                        known.join(", ")
                    )
                })?;
            vec![kind]
        }
        None => RuleGroupKind::PRIORITY.to_vec(),
    };

    let groups: Vec<CategoryGroupEntry> = kinds
        .into_iter()
        .map(|kind| CategoryGroupEntry {
            group: kind,
            categories: Category::in_group(kind).collect(),
        })
        .collect();

    let mut total: usize = groups.iter().map(|g| g.categories.len()).sum();
    if group.is_none() {
        total += 1;
    }

    Ok(CategoryReport { total, groups })
}

impl Render for CategoryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for entry in &self.groups {
            writeln!(w, "{} ({})", entry.group, entry.categories.len())?;
            for category in &entry.categories {
                writeln!(w, "  {category}")?;
            }
        }
        writeln!(w, "total: {}", self.total)
    }
}
