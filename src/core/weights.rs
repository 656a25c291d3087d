//! Effective-dated modality weight resolution.
//!
//! The scheduled and completed paths join governance on different dates:
//! scheduled exams take the weight in force on the snapshot's day of service,
//! completed exams the weight in force on their own service date. The two
//! entry points stay separate so callers always say which one they mean.

use crate::domain::model::{normalize_modality, GovernanceRule};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct WeightResolver {
    rules: HashMap<String, Vec<GovernanceRule>>,
}

impl WeightResolver {
    /// Builds a resolver from governance rules in source order.
    ///
    /// Rules for the same modality are kept latest-start first, then narrowest
    /// window (earliest end, open-ended last), then source order. When windows
    /// overlap, the first active rule in that order wins.
    pub fn new(rules: Vec<GovernanceRule>) -> Self {
        let mut by_modality: HashMap<String, Vec<GovernanceRule>> = HashMap::new();
        for rule in rules {
            let key = normalize_modality(&rule.modality);
            by_modality.entry(key).or_default().push(GovernanceRule {
                modality: normalize_modality(&rule.modality),
                ..rule
            });
        }

        for modality_rules in by_modality.values_mut() {
            // sort_by 為穩定排序，保留來源順序
            modality_rules.sort_by(precedence);
        }

        Self { rules: by_modality }
    }

    /// Weight for a scheduled exam, as of the snapshot's day of service.
    pub fn weight_for_snapshot(&self, modality: &str, dos: NaiveDate) -> Option<f64> {
        self.weight_as_of(modality, dos)
    }

    /// Weight for a completed exam, as of the exam's own service date.
    pub fn weight_for_service_date(&self, modality: &str, service_date: NaiveDate) -> Option<f64> {
        self.weight_as_of(modality, service_date)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    fn weight_as_of(&self, modality: &str, date: NaiveDate) -> Option<f64> {
        let candidates = self.rules.get(&normalize_modality(modality))?;
        let mut active = candidates.iter().filter(|rule| rule.is_active_on(date));
        let chosen = active.next()?;

        let overlapping = active.count();
        if overlapping > 0 {
            tracing::warn!(
                "⚠️ {} governance rules active for {} on {}; using weight {} (effective {})",
                overlapping + 1,
                chosen.modality,
                date,
                chosen.weight,
                chosen.effective_start
            );
        }

        Some(chosen.weight)
    }
}

fn precedence(a: &GovernanceRule, b: &GovernanceRule) -> Ordering {
    b.effective_start
        .cmp(&a.effective_start)
        .then_with(|| match (a.effective_end, b.effective_end) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
