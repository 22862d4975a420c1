//! Assessment data model, read-only to the session core.
//!
//! Fetched from the portal API by share token; the candidate never mutates
//! these records. Field names match the portal's JSON.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A question from the employer's question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub difficulty_level: String,
    /// Suggested time in minutes; an [`AssessmentQuestion`] may override it.
    #[serde(default)]
    pub estimated_duration: u32,
    /// Present only for coding questions. Drives the explanation field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Question {
    pub fn is_coding(&self) -> bool {
        self.programming_language.is_some()
    }
}

/// A question's placement within one assessment: position, points, and an
/// optional duration override. Many placements may reference one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: i64,
    pub question_id: i64,
    /// 1-based position within the assessment.
    pub order: u32,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_duration: Option<u32>,
    pub question: Question,
}

impl AssessmentQuestion {
    /// Effective per-question duration in minutes.
    pub fn duration_min(&self) -> u32 {
        self.custom_duration
            .unwrap_or(self.question.estimated_duration)
    }
}

/// One shared assessment with its ordered question list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Total time allowed for one attempt, in minutes.
    pub total_duration: u32,
    pub max_score: u32,
    pub questions: Vec<AssessmentQuestion>,
}

impl Assessment {
    /// Attempt duration in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn total_duration_secs(&self) -> u64 {
        u64::from(self.total_duration).saturating_mul(60)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sort questions into assessment order. Call once after fetching;
    /// the session relies on positional indexing afterwards.
    pub fn sort_questions(&mut self) {
        self.questions.sort_by_key(|q| q.order);
    }

    /// Question ids in assessment order, independent of the current sort of
    /// `questions`. Flush order is derived from this.
    pub fn ordered_question_ids(&self) -> Vec<i64> {
        let mut placements: Vec<(u32, i64)> = self
            .questions
            .iter()
            .map(|q| (q.order, q.question_id))
            .collect();
        placements.sort_unstable_by_key(|(order, _)| *order);
        placements.into_iter().map(|(_, id)| id).collect()
    }

    /// Check the invariants the session depends on: a positive duration and
    /// order values that are unique and contiguous starting at 1.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "total_duration".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        if self.questions.is_empty() {
            return Err(ValidationError::EmptyCollection("questions".into()));
        }
        let mut orders: Vec<u32> = self.questions.iter().map(|q| q.order).collect();
        orders.sort_unstable();
        for (i, order) in orders.iter().enumerate() {
            let expected = i as u32 + 1;
            if *order != expected {
                return Err(ValidationError::NonContiguousOrder {
                    expected,
                    found: *order,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64) -> Question {
        Question {
            id,
            title: format!("Question {id}"),
            description: String::new(),
            category: "debugging".into(),
            difficulty_level: "Medium".into(),
            estimated_duration: 10,
            programming_language: None,
            tags: None,
        }
    }

    fn assessment(orders: &[u32]) -> Assessment {
        Assessment {
            id: 1,
            title: "Backend screen".into(),
            description: String::new(),
            total_duration: 30,
            max_score: 100,
            questions: orders
                .iter()
                .map(|&order| AssessmentQuestion {
                    id: i64::from(order) * 10,
                    question_id: i64::from(order) * 100,
                    order,
                    points: 10,
                    custom_duration: None,
                    question: question(i64::from(order) * 100),
                })
                .collect(),
        }
    }

    #[test]
    fn contiguous_orders_validate() {
        assert!(assessment(&[2, 1, 3]).validate().is_ok());
    }

    #[test]
    fn gap_in_orders_is_rejected() {
        let err = assessment(&[1, 3]).validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonContiguousOrder {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        assert!(assessment(&[1, 1, 2]).validate().is_err());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut a = assessment(&[1]);
        a.total_duration = 0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn ordered_ids_follow_order_not_vec_position() {
        let a = assessment(&[2, 1, 3]);
        assert_eq!(a.ordered_question_ids(), vec![100, 200, 300]);
    }

    #[test]
    fn duration_override_wins() {
        let mut a = assessment(&[1]);
        assert_eq!(a.questions[0].duration_min(), 10);
        a.questions[0].custom_duration = Some(25);
        assert_eq!(a.questions[0].duration_min(), 25);
    }

    #[test]
    fn total_duration_secs() {
        assert_eq!(assessment(&[1]).total_duration_secs(), 30 * 60);
    }
}
