//! Canned narratives for assets without a model explanation
//!
//! Four variants: alert above the particulate threshold, alert below it,
//! warning, and normal.

use super::{AssetVocabulary, NarrativeContext, RootCauseNarrator};
use crate::config::NarrativeConfig;
use crate::types::{AssetStatus, CausalityAnalysis, WhyStep};

/// Which canned narrative applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCase {
    ParticulateLoading,
    FlowRestriction,
    ElevatedPressure,
    NormalOperation,
}

impl TemplateCase {
    pub fn headline(self) -> &'static str {
        match self {
            TemplateCase::ParticulateLoading => "Primary Cause: Excessive Particulate Loading",
            TemplateCase::FlowRestriction => {
                "Primary Cause: Efficiency Loss Due to Flow Restriction"
            }
            TemplateCase::ElevatedPressure => {
                "Condition: Elevated Pressure Differential - Monitoring Required"
            }
            TemplateCase::NormalOperation => "Status: Normal Operation",
        }
    }
}

pub struct TemplateNarrator<'a> {
    pub config: &'a NarrativeConfig,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn actions(lines: &[String]) -> String {
    let mut out = String::from("**Recommended Actions:**");
    for line in lines {
        out.push_str("\n- ");
        out.push_str(line);
    }
    out
}

impl TemplateNarrator<'_> {
    pub fn case(&self, ctx: &NarrativeContext<'_>) -> TemplateCase {
        match ctx.status {
            AssetStatus::Alert if ctx.pressure > self.config.alert_pressure_threshold => {
                TemplateCase::ParticulateLoading
            }
            AssetStatus::Alert => TemplateCase::FlowRestriction,
            AssetStatus::Warning => TemplateCase::ElevatedPressure,
            AssetStatus::Normal => TemplateCase::NormalOperation,
        }
    }

    fn particulate_loading(&self, ctx: &NarrativeContext<'_>, v: &AssetVocabulary) -> String {
        let pu = v.pressure_unit;
        let flow_loss = (ctx.design_flow - ctx.flow_rate).max(0.0);
        format!(
            "Differential pressure has exceeded {:.0} {pu} (currently {:.2} {pu}), indicating severe \
             {} {} fouling. Analysis of pressure trend shows acceleration in the last 5 days, suggesting:\n\n\
             1. **Upstream Process Change**: Possible increase in crude sediment content or corrosion product carryover from storage tanks\n\
             2. **{} Degradation**: {} {} may have partial collapse, reducing effective filtration area by 30-40%\n\
             3. **Flow Rate Impact**: Current flow ({:.0} {fu}) is {:.0} {fu} below design, affecting downstream unit performance\n\n{}",
            self.config.alert_pressure_threshold,
            ctx.pressure,
            v.noun,
            v.element,
            capitalize(v.element),
            v.title,
            v.mesh,
            ctx.flow_rate,
            flow_loss,
            actions(&[
                format!("Immediate {} required to prevent pump cavitation", v.service_noun),
                format!("Inspect {} for damage during maintenance", v.element),
                "Sample debris for crude quality analysis".to_string(),
                "Consider temporary bypass if pump suction pressure approaches NPSH limit".to_string(),
            ]),
            fu = v.flow_unit,
        )
    }

    fn flow_restriction(&self, ctx: &NarrativeContext<'_>, v: &AssetVocabulary) -> String {
        let flow_loss = (ctx.design_flow - ctx.flow_rate).max(0.0);
        let loss_pct = if ctx.design_flow > 0.0 {
            flow_loss / ctx.design_flow * 100.0
        } else {
            0.0
        };
        format!(
            "{} efficiency has dropped to {:.1}%, below the {:.0}% critical threshold. \
             Root cause analysis indicates:\n\n\
             1. **Pressure Drop Correlation**: DP of {:.2} {} is causing significant flow restriction\n\
             2. **Pump Performance Impact**: Feed pump operating {:.1}% below design point, risking off-curve operation\n\
             3. **Debris Accumulation Pattern**: Historical data suggests {} is the primary contaminant\n\n{}",
            v.title,
            ctx.efficiency,
            self.config.efficiency_critical_percent,
            ctx.pressure,
            v.pressure_unit,
            loss_pct,
            ctx.primary_debris.to_string().to_lowercase(),
            actions(&[
                format!("Schedule {} within 48 hours", v.service_noun),
                "Verify upstream filtration/separation equipment performance".to_string(),
                "Review crude slate changes in last 2 weeks".to_string(),
                format!("Consider {} {} size optimization", v.element, v.mesh),
            ]),
        )
    }

    fn elevated_pressure(&self, ctx: &NarrativeContext<'_>, v: &AssetVocabulary) -> String {
        let fast = ctx.rate > self.config.warning_rate_threshold;
        let (pu, per) = (v.pressure_unit, ctx.period);
        format!(
            "{} showing early signs of fouling with DP at {:.2} {pu} and efficiency at {:.1}%. \
             Predictive model analysis:\n\n\
             1. **Fouling Rate**: Current DP increase rate is {:.3} {pu}/{per}, {} normal baseline (0.3-0.5 {pu}/{per})\n\
             2. **Time Projection**: At current fouling rate, {} will reach critical DP in {} {per}s ({})\n\
             3. **Comparison to Fleet**: This unit is fouling {} than fleet average, suggesting {}\n\n{}",
            v.title,
            ctx.pressure,
            ctx.efficiency,
            ctx.rate,
            if fast { "above" } else { "within" },
            v.noun,
            ctx.periods_until_critical,
            ctx.projected_breach_date.format("%Y-%m-%d"),
            if fast { "faster" } else { "slower" },
            if fast {
                "localized crude quality issue or upstream process upset"
            } else {
                "normal wear pattern"
            },
            actions(&[
                "Continue monitoring; plan maintenance for next scheduled turnaround".to_string(),
                "Track daily DP trends for acceleration".to_string(),
                format!(
                    "Coordinate {} with next scheduled {} ({})",
                    v.service_noun,
                    v.service_verb,
                    ctx.next_service_due.format("%Y-%m-%d")
                ),
                "No immediate intervention required".to_string(),
            ]),
        )
    }

    fn normal_operation(&self, ctx: &NarrativeContext<'_>, v: &AssetVocabulary) -> String {
        let (pu, per) = (v.pressure_unit, ctx.period);
        format!(
            "{} operating within design parameters. Current metrics indicate healthy performance:\n\n\
             1. **Pressure Profile**: DP of {:.2} {pu} is well below warning threshold ({:.0} {pu})\n\
             2. **Flow Performance**: Efficiency at {:.1}% indicates minimal fouling impact\n\
             3. **Maintenance Timing**: Last {} {:.0} days ago; next scheduled {} in {} days\n\
             4. **Predictive Outlook**: At current fouling rate ({:.3} {pu}/{per}), {} will operate safely for {}+ {per}s\n\n{}",
            v.title,
            ctx.pressure,
            self.config.normal_warning_pressure,
            ctx.efficiency,
            v.service_noun,
            ctx.days_since_service,
            v.service_noun,
            ctx.days_to_next_service,
            ctx.rate,
            v.noun,
            ctx.periods_until_critical,
            actions(&[
                "Maintain current monitoring schedule".to_string(),
                "Continue routine inspections".to_string(),
                "No immediate action required".to_string(),
            ]),
        )
    }
}

impl RootCauseNarrator for TemplateNarrator<'_> {
    fn root_cause(&self, ctx: &NarrativeContext<'_>) -> String {
        let case = self.case(ctx);
        let v = ctx.vocab;
        let body = match case {
            TemplateCase::ParticulateLoading => self.particulate_loading(ctx, v),
            TemplateCase::FlowRestriction => self.flow_restriction(ctx, v),
            TemplateCase::ElevatedPressure => self.elevated_pressure(ctx, v),
            TemplateCase::NormalOperation => self.normal_operation(ctx, v),
        };
        format!("**{}**\n\n{}", case.headline(), body)
    }

    fn causality(&self, ctx: &NarrativeContext<'_>) -> CausalityAnalysis {
        let v = ctx.vocab;
        let debris = ctx.primary_debris.to_string().to_lowercase();
        let step = |question: String, explanation: String| WhyStep {
            question,
            explanation,
        };
        CausalityAnalysis {
            problem_statement: format!(
                "High DP ({:.2} {}) on {} {}",
                ctx.pressure, v.pressure_unit, v.noun, ctx.id
            ),
            five_whys: [
                step(
                    "Why is the differential pressure high?".to_string(),
                    format!("The {} {} is clogged with debris.", v.noun, v.element),
                ),
                step(
                    format!("Why is the {} clogged?", v.element),
                    format!("Increased carryover of {debris} from upstream."),
                ),
                step(
                    format!("Why is there increased {debris} carryover?"),
                    "Upstream desalter unit efficiency has dropped by 5% in the last week."
                        .to_string(),
                ),
                step(
                    "Why has desalter efficiency dropped?".to_string(),
                    "Emulsion layer control has been erratic.".to_string(),
                ),
                step(
                    "Why is emulsion control erratic?".to_string(),
                    "Interface level transmitter (LT-101) is showing noisy readings and requires calibration."
                        .to_string(),
                ),
            ],
        }
    }

    fn alert_message(&self, ctx: &NarrativeContext<'_>) -> String {
        self.case(ctx).headline().to_string()
    }

    fn is_explained(&self) -> bool {
        false
    }
}
