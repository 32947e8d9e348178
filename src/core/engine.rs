use crate::core::calculator::DoseCalculator;
use crate::domain::model::DoseReport;
use crate::domain::ports::{ParameterSource, ResultReporter};
use crate::utils::error::{DoseError, Result};

/// Load, compute, report. Reporters run in the order they were added.
pub struct DoseEngine<P: ParameterSource> {
    source: P,
    reporters: Vec<Box<dyn ResultReporter>>,
}

impl<P: ParameterSource> DoseEngine<P> {
    pub fn new(source: P) -> Self {
        Self {
            source,
            reporters: Vec::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: impl ResultReporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    /// Builds the report without handing it to any reporter.
    pub fn compute(&self) -> Result<DoseReport> {
        tracing::debug!("Loading parameters from {}", self.source.origin());
        let plan = self.source.load_plan()?;
        tracing::debug!(
            "Loaded {} dose target(s) with parameters {:?}",
            plan.targets.len(),
            plan.parameters
        );

        let calculator = DoseCalculator::new(plan.parameters);
        let rows = calculator.rows(&plan.targets);

        for (i, row) in rows.iter().enumerate() {
            if !row.result.is_finite() {
                return Err(DoseError::InvalidPhysicalParameter {
                    field: format!("sample_doses[{}]", i),
                    value: row.dose.gray(),
                    reason: format!(
                        "flow rate, time or volume is not finite at tier {} with these parameters",
                        row.result.attenuator_tier
                    ),
                });
            }
        }

        for row in &rows {
            tracing::debug!(
                "{} Gy -> tier {}, {:.3} uL/s, {:.3} uL over {:.3} s",
                row.dose.gray(),
                row.result.attenuator_tier,
                row.result.flow_rate,
                row.result.sample_volume,
                row.result.exposure_time
            );
            if row.result.exceeds(plan.parameters.volume_limit) {
                tracing::warn!(
                    "{} Gy needs {:.3} uL with both attenuators engaged, above the {} uL limit",
                    row.dose.gray(),
                    row.result.sample_volume,
                    plan.parameters.volume_limit
                );
            }
        }

        let summary = calculator.summarize(&rows);
        tracing::info!(
            "Computed {} dose(s): {:.3} uL total over {:.3} s",
            rows.len(),
            summary.total_sample_volume,
            summary.total_time
        );

        Ok(DoseReport {
            parameters: plan.parameters,
            rows,
            summary,
        })
    }

    pub fn run(&mut self) -> Result<DoseReport> {
        let report = self.compute()?;
        for reporter in &mut self.reporters {
            reporter.report(&report)?;
        }
        Ok(report)
    }
}
