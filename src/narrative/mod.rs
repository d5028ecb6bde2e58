//! Narrative Composer
//!
//! Produces the root-cause text, the five-whys chain and the alert headline for
//! an asset. Two narrators implement [`RootCauseNarrator`]:
//!
//! - [`ExplainedNarrator`]: wraps the breach model's `reasons`/`actions`
//! - [`TemplateNarrator`]: canned text branching on status when there is no
//!   explanation to work from
//!
//! Both write against an [`AssetVocabulary`], so the same narrator serves every
//! asset kind.

mod templates;
pub mod vocabulary;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;
use crate::types::{AssetStatus, CausalityAnalysis, DebrisType, Explanation, Regime, WhyStep};

pub use templates::{TemplateCase, TemplateNarrator};
pub use vocabulary::AssetVocabulary;

/// Everything a narrator may quote. All figures are already derived.
#[derive(Debug, Clone)]
pub struct NarrativeContext<'a> {
    pub id: &'a str,
    pub vocab: &'a AssetVocabulary,
    pub status: AssetStatus,
    pub regime: Regime,
    pub pressure: f64,
    pub flow_rate: f64,
    pub design_flow: f64,
    pub efficiency: f64,
    pub days_since_service: f64,
    pub days_to_next_service: i64,
    pub next_service_due: NaiveDate,
    /// Raw pressure rate per projection period.
    pub rate: f64,
    /// Projection period label, e.g. "day".
    pub period: &'a str,
    pub periods_until_critical: u32,
    pub projected_breach_date: NaiveDate,
    pub primary_debris: DebrisType,
}

/// Composed narrative for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub root_cause: String,
    pub causality: CausalityAnalysis,
    pub alert_message: String,
    pub explained: bool,
}

pub trait RootCauseNarrator {
    fn root_cause(&self, ctx: &NarrativeContext<'_>) -> String;
    fn causality(&self, ctx: &NarrativeContext<'_>) -> CausalityAnalysis;
    fn alert_message(&self, ctx: &NarrativeContext<'_>) -> String;
    fn is_explained(&self) -> bool;

    fn narrate(&self, ctx: &NarrativeContext<'_>) -> Narrative {
        Narrative {
            root_cause: self.root_cause(ctx),
            causality: self.causality(ctx),
            alert_message: self.alert_message(ctx),
            explained: self.is_explained(),
        }
    }
}

/// Pick the narrator: an explanation with any reasons or actions wins,
/// otherwise the status templates.
pub fn compose(
    ctx: &NarrativeContext<'_>,
    explanation: Option<&Explanation>,
    cfg: &NarrativeConfig,
) -> Narrative {
    match explanation {
        Some(e) if !e.is_empty() => ExplainedNarrator { explanation: e }.narrate(ctx),
        _ => TemplateNarrator { config: cfg }.narrate(ctx),
    }
}

// ============================================================================
// Explained narrator
// ============================================================================

/// Narrator for assets that arrived with a model explanation.
pub struct ExplainedNarrator<'a> {
    pub explanation: &'a Explanation,
}

const NO_ACTION_FALLBACK: &str =
    "Continue standard monitoring cadence and follow breach response checklist if persistence criteria are met.";

impl RootCauseNarrator for ExplainedNarrator<'_> {
    fn root_cause(&self, ctx: &NarrativeContext<'_>) -> String {
        let mut lines = vec![format!("**Current Regime: {}**", ctx.regime), String::new()];

        let reasons = &self.explanation.reasons;
        if !reasons.is_empty() {
            lines.push("Drivers identified by the breach model:".to_string());
            lines.push(String::new());
            for (i, reason) in reasons.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, reason));
            }
            lines.push(String::new());
        }

        lines.push(format!(
            "Current DP is approximately {:.2} {} with efficiency near {:.1}%. \
             Last {} was about {:.0} days ago and projected flow is {:.0} {}.",
            ctx.pressure,
            ctx.vocab.pressure_unit,
            ctx.efficiency,
            ctx.vocab.service_noun,
            ctx.days_since_service,
            ctx.flow_rate.max(0.0),
            ctx.vocab.flow_unit,
        ));
        lines.push(String::new());

        lines.push("**Recommended Actions:**".to_string());
        if self.explanation.actions.is_empty() {
            lines.push(format!("- {NO_ACTION_FALLBACK}"));
        } else {
            lines.extend(self.explanation.actions.iter().map(|a| format!("- {a}")));
        }

        lines.join("\n")
    }

    fn causality(&self, ctx: &NarrativeContext<'_>) -> CausalityAnalysis {
        CausalityAnalysis {
            problem_statement: format!(
                "Live {} {} DP trending {}",
                ctx.vocab.noun, ctx.id, ctx.status
            ),
            five_whys: five_whys(&self.explanation.reasons, ctx.vocab),
        }
    }

    fn alert_message(&self, ctx: &NarrativeContext<'_>) -> String {
        match ctx.status {
            AssetStatus::Alert => "Live feed indicates DP above safe band",
            AssetStatus::Warning => "DP rising faster than baseline",
            AssetStatus::Normal => "Operating normally",
        }
        .to_string()
    }

    fn is_explained(&self) -> bool {
        true
    }
}

/// Generic causes used to pad a short reason list, in order.
pub fn fallback_reasons(vocab: &AssetVocabulary) -> [String; 5] {
    [
        format!("{} has accumulated fouling over recent days.", vocab.title),
        "Upstream conditions increased particulate carryover.".to_string(),
        "Separator efficiency drifted from design values.".to_string(),
        "Maintenance interval extended beyond planned window.".to_string(),
        "Instrumentation indicates imbalance requiring calibration.".to_string(),
    ]
}

/// Exactly five why-steps: up to five supplied reasons with `**` emphasis
/// stripped, padded from [`fallback_reasons`].
pub fn five_whys(reasons: &[String], vocab: &AssetVocabulary) -> [WhyStep; 5] {
    let fallbacks = fallback_reasons(vocab);
    let mut chain = reasons
        .iter()
        .map(|r| r.replace("**", ""))
        .chain(fallbacks)
        .take(5)
        .enumerate()
        .map(|(i, explanation)| WhyStep {
            question: format!("Why {}?", i + 1),
            explanation,
        });

    std::array::from_fn(|i| {
        chain.next().unwrap_or_else(|| WhyStep {
            question: format!("Why {}?", i + 1),
            explanation: String::new(),
        })
    })
}
