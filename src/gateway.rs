//! Interpretation gateway contract.
//!
//! The engine treats the narrative/plan generator as a black box: five
//! dimension totals in, a schema-validated [`DiagnosisPayload`] out. Any
//! deviation from the expected shape is a gateway failure; the caller
//! surfaces all gateway failures as a single retryable error and keeps the
//! questionnaire answers intact.

use crate::catalog::Dimension;
use crate::scoring::DimensionTotals;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("model response is empty")]
    EmptyResponse,
    #[error("model response does not match the report schema: {0}")]
    InvalidResponse(String),
}

/// One day of the activity plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub day: u8,
    pub task: String,
    pub tip: String,
}

/// One week of the activity plan: a weekly goal plus seven daily missions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub week: u8,
    pub title: String,
    pub missions: Vec<Mission>,
}

/// The gateway's output, minus the fields the caller attaches
/// (`scores`, `created_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisPayload {
    pub interpretation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub weekly_plans: Vec<WeeklyGoal>,
}

impl DiagnosisPayload {
    /// Enforce the wire contract: 3 strengths, 3 weaknesses, 4 weeks of
    /// 7 missions each, with weeks and days numbered in order.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.interpretation.trim().is_empty() {
            return Err(GatewayError::InvalidResponse(
                "interpretation is empty".into(),
            ));
        }
        if self.strengths.len() != 3 {
            return Err(GatewayError::InvalidResponse(format!(
                "expected 3 strengths, got {}",
                self.strengths.len()
            )));
        }
        if self.weaknesses.len() != 3 {
            return Err(GatewayError::InvalidResponse(format!(
                "expected 3 weaknesses, got {}",
                self.weaknesses.len()
            )));
        }
        if self.weekly_plans.len() != 4 {
            return Err(GatewayError::InvalidResponse(format!(
                "expected 4 weekly plans, got {}",
                self.weekly_plans.len()
            )));
        }
        for (index, plan) in self.weekly_plans.iter().enumerate() {
            if plan.week as usize != index + 1 {
                return Err(GatewayError::InvalidResponse(format!(
                    "weekly plan {} is numbered {}",
                    index + 1,
                    plan.week
                )));
            }
            if plan.missions.len() != 7 {
                return Err(GatewayError::InvalidResponse(format!(
                    "week {} has {} missions, expected 7",
                    plan.week,
                    plan.missions.len()
                )));
            }
            for (day_index, mission) in plan.missions.iter().enumerate() {
                if mission.day as usize != day_index + 1 {
                    return Err(GatewayError::InvalidResponse(format!(
                        "week {} mission {} is numbered day {}",
                        plan.week,
                        day_index + 1,
                        mission.day
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A completed diagnosis: the scores that were submitted plus everything the
/// gateway produced. Owned by the report view; discarded on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub scores: DimensionTotals,
    pub interpretation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub weekly_plans: Vec<WeeklyGoal>,
    pub created_at: DateTime<Utc>,
}

impl DiagnosisResult {
    pub fn from_payload(scores: DimensionTotals, payload: DiagnosisPayload) -> Self {
        Self {
            scores,
            interpretation: payload.interpretation,
            strengths: payload.strengths,
            weaknesses: payload.weaknesses,
            weekly_plans: payload.weekly_plans,
            created_at: Utc::now(),
        }
    }

    pub fn score(&self, dimension: Dimension) -> u32 {
        self.scores.get(&dimension).copied().unwrap_or(0)
    }
}

/// Capability interface for the narrative/plan generator. One attempt per
/// submission; retry is always a fresh user action.
#[async_trait]
pub trait InterpretationGateway: Send + Sync {
    async fn interpret(&self, scores: &DimensionTotals) -> Result<DiagnosisPayload, GatewayError>;
}
