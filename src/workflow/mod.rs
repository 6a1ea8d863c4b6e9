//! Orchestration pipeline for one analysis workflow
//!
//! A workflow drives at most three downstream calls in a fixed order:
//! analyze (fatal on failure), generate homepage (best-effort), screenshot
//! (best-effort, only after a generated homepage). The best-effort steps
//! return explicit [`HomepageOutcome`] variants instead of being silently
//! swallowed, so the policy is visible at the call site.

mod id;

pub use id::{IdSource, WorkflowIdSource};

use crate::api::models::AnalyzeRequest;
use crate::clients::{AnalyzerClient, BuilderClient, ServiceError};
use crate::observability::Metrics;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

/// Why homepage generation was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The caller did not ask for a homepage
    NotRequested,
    /// The analysis carried no usable business name to build around
    NoBusinessName,
}

/// Result of the best-effort homepage step.
///
/// Only `Generated` contributes to the response payload; `Skipped` and
/// `Failed` both leave the homepage absent without failing the workflow.
#[derive(Debug)]
pub enum HomepageOutcome {
    Generated(Value),
    Skipped(SkipReason),
    Failed(ServiceError),
}

impl HomepageOutcome {
    pub fn into_value(self) -> Option<Value> {
        match self {
            HomepageOutcome::Generated(value) => Some(value),
            HomepageOutcome::Skipped(_) | HomepageOutcome::Failed(_) => None,
        }
    }
}

/// Everything a completed workflow produced
#[derive(Debug)]
pub struct WorkflowOutput {
    pub analysis: Value,
    pub homepage: HomepageOutcome,
}

/// Drive one workflow end to end.
///
/// `url` is the already-validated target; `request` carries the remaining
/// caller options. An `Err` means the mandatory analysis step failed and
/// the whole request must fail; homepage and screenshot failures are
/// reported inside [`WorkflowOutput`] instead.
pub async fn run(
    workflow_id: &str,
    url: &str,
    request: &AnalyzeRequest,
    analyzer: &AnalyzerClient,
    builder: &BuilderClient,
    metrics: &Metrics,
) -> Result<WorkflowOutput, ServiceError> {
    metrics.workflow_started();
    info!(
        workflow_id,
        url,
        generate_homepage = request.generate_homepage,
        include_seo = request.include_seo,
        max_pages = request.max_pages,
        "Starting workflow"
    );

    // Step 1: analysis. The one step the product cannot function without.
    let step_started = Instant::now();
    let analysis = analyzer
        .analyze(url, request.include_seo, request.max_pages)
        .await
        .inspect_err(|e| {
            metrics.workflow_failed();
            warn!(workflow_id, error = %e, "Analyzer service failed");
        })?;

    info!(
        workflow_id,
        elapsed_ms = step_started.elapsed().as_millis() as u64,
        business_name = business_name(&analysis).unwrap_or("<none>"),
        recommendations = analysis
            .get("recommendations")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        "Analysis completed"
    );

    let homepage = generate_homepage(workflow_id, request, &analysis, builder, metrics).await;

    metrics.workflow_completed();
    Ok(WorkflowOutput { analysis, homepage })
}

/// Steps 2 and 2.5: homepage generation and its screenshot, both
/// best-effort
async fn generate_homepage(
    workflow_id: &str,
    request: &AnalyzeRequest,
    analysis: &Value,
    builder: &BuilderClient,
    metrics: &Metrics,
) -> HomepageOutcome {
    if !request.generate_homepage {
        info!(workflow_id, "Homepage generation not requested, skipping");
        return HomepageOutcome::Skipped(SkipReason::NotRequested);
    }

    let Some(business_name) = business_name(analysis) else {
        info!(
            workflow_id,
            "Analysis carries no business name, skipping homepage generation"
        );
        return HomepageOutcome::Skipped(SkipReason::NoBusinessName);
    };

    let step_started = Instant::now();
    let mut homepage = match builder
        .generate(
            analysis,
            business_name,
            request.style_preference.as_str(),
            request.include_booking,
        )
        .await
    {
        Ok(homepage) => homepage,
        Err(e) => {
            // Non-fatal: the caller still gets the analysis.
            warn!(workflow_id, error = %e, "Builder service failed");
            return HomepageOutcome::Failed(e);
        }
    };

    metrics.homepage_generated();
    info!(
        workflow_id,
        elapsed_ms = step_started.elapsed().as_millis() as u64,
        html_len = field_len(&homepage, "html_code"),
        css_len = field_len(&homepage, "css_code"),
        "Homepage generated"
    );

    // Step 2.5: screenshot the generated code. Failure leaves the
    // homepage without a screenshot field, nothing more.
    let html_code = homepage
        .get("html_code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let css_code = homepage
        .get("css_code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let shot_started = Instant::now();
    match builder.screenshot(&html_code, &css_code).await {
        Ok(shot) => {
            if let Some(size) = attach_screenshot(&mut homepage, &shot) {
                metrics.screenshot_captured();
                info!(
                    workflow_id,
                    elapsed_ms = shot_started.elapsed().as_millis() as u64,
                    screenshot_len = size,
                    "Screenshot captured"
                );
            } else {
                warn!(workflow_id, "Screenshot response carried no image data");
            }
        }
        Err(e) => {
            warn!(workflow_id, error = %e, "Screenshot failed");
        }
    }

    HomepageOutcome::Generated(homepage)
}

/// Non-empty business name from an analysis result, when present
fn business_name(analysis: &Value) -> Option<&str> {
    analysis
        .get("business_info")
        .and_then(|info| info.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Copy the base64 image out of a screenshot response into the homepage
/// value; returns the image size when one was attached
fn attach_screenshot(homepage: &mut Value, shot: &Value) -> Option<usize> {
    let image = shot.get("screenshot").and_then(Value::as_str)?;
    let size = image.len();

    homepage
        .as_object_mut()?
        .insert("screenshot".to_string(), Value::String(image.to_string()));

    Some(size)
}

fn field_len(value: &Value, key: &str) -> usize {
    value.get(key).and_then(Value::as_str).map_or(0, str::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn business_name_requires_non_empty_string() {
        let with_name = json!({"business_info": {"name": "Luna Bakery"}});
        assert_eq!(business_name(&with_name), Some("Luna Bakery"));

        let empty = json!({"business_info": {"name": ""}});
        assert_eq!(business_name(&empty), None);

        let missing = json!({"business_info": {}});
        assert_eq!(business_name(&missing), None);

        let no_info = json!({"url": "https://example.com"});
        assert_eq!(business_name(&no_info), None);

        let non_string = json!({"business_info": {"name": 42}});
        assert_eq!(business_name(&non_string), None);
    }

    #[test]
    fn attach_screenshot_inserts_image() {
        let mut homepage = json!({"html_code": "<html></html>"});
        let shot = json!({"screenshot": "data:image/png;base64,AAAA", "generation_time": 12});

        let size = attach_screenshot(&mut homepage, &shot);
        assert_eq!(size, Some(26));
        assert_eq!(homepage["screenshot"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn attach_screenshot_without_image_leaves_homepage_untouched() {
        let mut homepage = json!({"html_code": "<html></html>"});
        let shot = json!({"generation_time": 12});

        assert_eq!(attach_screenshot(&mut homepage, &shot), None);
        assert!(homepage.get("screenshot").is_none());
    }

    #[test]
    fn outcome_into_value_only_for_generated() {
        let generated = HomepageOutcome::Generated(json!({"id": "h-1"}));
        assert!(generated.into_value().is_some());

        let skipped = HomepageOutcome::Skipped(SkipReason::NotRequested);
        assert!(skipped.into_value().is_none());

        let failed = HomepageOutcome::Failed(ServiceError::Service("boom".to_string()));
        assert!(failed.into_value().is_none());
    }
}
