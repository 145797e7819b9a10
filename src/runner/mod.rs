// ==================== PIPELINE RUNNER ====================
// Executes a fixed, ordered list of named steps over one shared context
// (the MongoDB handle). A step failure is logged and recorded, never fatal:
// the next step still runs. Only connection setup aborts the whole run.

use crate::utils::AppError;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::Serialize;
use std::time::Instant;

/// What a step hands back on success: a one-line summary for the report.
pub type StepResult = Result<String, AppError>;

/// A named unit of work in the pipeline. Each step gets its own clone of the
/// context (the MongoDB handle is a cheap Arc-backed clone).
pub struct Step<C> {
    pub name: &'static str,
    run: Box<dyn Fn(C) -> BoxFuture<'static, StepResult> + Send + Sync>,
}

impl<C> Step<C> {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(C) -> BoxFuture<'static, StepResult> + Send + Sync + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Success { summary: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub name: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub duration_ms: u64,
}

/// Ordered record of one pipeline run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Success { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.succeeded()
    }
}

/// Fixed ordered sequence of steps.
pub struct Runner<C> {
    steps: Vec<Step<C>>,
}

impl<C: Clone> Runner<C> {
    pub fn new(steps: Vec<Step<C>>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name).collect()
    }

    /// Run every step in order, catching and recording failures per step.
    pub async fn run(&self, ctx: &C) -> RunReport {
        let started_at = Utc::now();
        let mut steps = Vec::with_capacity(self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            log::info!("▶ [{}/{}] {}", i + 1, self.steps.len(), step.name);
            let timer = Instant::now();

            let outcome = match (step.run)(ctx.clone()).await {
                Ok(summary) => {
                    log::info!("   ✅ {}: {}", step.name, summary);
                    StepOutcome::Success { summary }
                }
                Err(err) => {
                    log::error!("   ❌ {}: {}", step.name, err);
                    StepOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };

            steps.push(StepReport {
                name: step.name,
                outcome,
                duration_ms: timer.elapsed().as_millis() as u64,
            });
        }

        RunReport {
            started_at,
            finished_at: Utc::now(),
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn ok_step(name: &'static str) -> Step<()> {
        Step::new(name, |_| async { Ok("done".to_string()) }.boxed())
    }

    fn failing_step(name: &'static str) -> Step<()> {
        Step::new(name, |_| {
            async { Err(AppError::NotFound("no such document".to_string())) }.boxed()
        })
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_sequence() {
        let runner = Runner::new(vec![ok_step("first"), failing_step("second"), ok_step("third")]);

        let report = runner.run(&()).await;

        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        // Order preserved, failure recorded against the right label
        assert_eq!(report.steps[1].name, "second");
        assert_eq!(
            report.steps[1].outcome,
            StepOutcome::Failed {
                error: "Not found: no such document".to_string()
            }
        );
        assert!(matches!(
            report.steps[2].outcome,
            StepOutcome::Success { .. }
        ));
    }

    #[tokio::test]
    async fn test_report_serializes_with_flattened_outcome() {
        let runner = Runner::new(vec![ok_step("only")]);
        let report = runner.run(&()).await;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["steps"][0]["name"], "only");
        assert_eq!(json["steps"][0]["status"], "success");
        assert_eq!(json["steps"][0]["summary"], "done");
    }

    #[tokio::test]
    async fn test_empty_runner() {
        let runner: Runner<()> = Runner::new(vec![]);
        assert!(runner.is_empty());
        let report = runner.run(&()).await;
        assert_eq!(report.steps.len(), 0);
        assert_eq!(report.failed(), 0);
    }
}
