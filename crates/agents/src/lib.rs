pub mod completion;

use std::sync::Arc;
use std::time::Instant;

use safar_core::{
    build_prompt, normalize, synthesize, PlanError, TripPlan, TripPolicy, TripRequest,
    TripRequestInput,
};
use safar_observability::{AppMetrics, FallbackReason};
use serde::Serialize;
use tracing::{info, instrument, warn};

pub use completion::{ChatCompletionsClient, ChatCompletionsConfig, Completion, CompletionModel};

/// Where a returned plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: TripPlan,
    pub source: PlanSource,
}

/// Validates trip input, asks the model for an itinerary, and repairs or
/// replaces whatever comes back. Model trouble never reaches the caller.
#[derive(Clone)]
pub struct PlannerAgent<M>
where
    M: CompletionModel,
{
    model: Arc<M>,
    policy: TripPolicy,
    metrics: Arc<AppMetrics>,
}

impl<M> PlannerAgent<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, policy: TripPolicy, metrics: Arc<AppMetrics>) -> Self {
        Self {
            model: Arc::new(model),
            policy,
            metrics,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub fn validate(&self, input: &TripRequestInput) -> Result<TripRequest, PlanError> {
        self.policy.evaluate(input)
    }

    /// Entry point for raw caller input. Only `InvalidRequest` can come back
    /// as an error.
    pub async fn plan(&self, input: &TripRequestInput) -> Result<PlanOutcome, PlanError> {
        self.metrics.inc_request();
        let request = match self.validate(input) {
            Ok(request) => request,
            Err(err) => {
                self.metrics.inc_rejected();
                info!(reason = %err, "trip request rejected");
                return Err(err);
            }
        };
        Ok(self.generate(&request).await)
    }

    #[instrument(skip(self, request), fields(from = %request.from, to = %request.to, mode = request.mode.as_str(), days = request.num_days()))]
    pub async fn generate(&self, request: &TripRequest) -> PlanOutcome {
        let started = Instant::now();
        let prompt = build_prompt(request);

        let attempt = match self.model.complete(&prompt).await {
            Ok(raw) => normalize(&raw, request),
            Err(err) => Err(err),
        };

        let outcome = match attempt {
            Ok(plan) => {
                self.metrics.inc_model_plan();
                PlanOutcome {
                    plan,
                    source: PlanSource::Model,
                }
            }
            Err(err) => {
                let reason = match err {
                    PlanError::MalformedResponse(_) => FallbackReason::Malformed,
                    _ => FallbackReason::Upstream,
                };
                warn!(
                    model = self.model.name(),
                    kind = err.kind(),
                    error = %err,
                    "model plan unavailable, synthesizing itinerary"
                );
                self.metrics.inc_fallback(reason);
                PlanOutcome {
                    plan: synthesize(request),
                    source: PlanSource::Fallback,
                }
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            source = ?outcome.source,
            days = outcome.plan.days.len(),
            total = %outcome.plan.trip_summary.estimated_total_cost,
            "trip plan ready"
        );
        outcome
    }
}
