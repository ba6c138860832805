//! Prediction Presenter

use feature_engine::{Column, DerivedValues, FeatureVector};
use inference_engine::RiskLabel;
use serde::Serialize;
use tracing::debug;

/// How the result should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// High risk, shown as an error
    Danger,
    /// Low risk, shown as a success
    Success,
}

/// Everything the result screen shows for one submission
#[derive(Debug, Clone, Serialize)]
pub struct DisplayPayload {
    /// One-line result with the probability, e.g. `High Return Risk! (Probability: 73.25%)`
    pub headline: String,
    /// Follow-up sentence
    pub detail: String,
    pub tone: Tone,
    pub label: RiskLabel,
    /// Probability of high risk (0.0 to 1.0)
    pub probability: f64,
    /// Probability as a percentage with two decimals
    pub probability_pct: String,
    /// Auto-calculated order values
    pub derived: DerivedValues,
    /// The exact vector handed to the classifier
    pub features: FeatureVector,
}

/// Format a probability the way the result screen shows it (`0.7325` → `73.25%`)
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Build the display payload for a prediction
pub fn present(
    label: RiskLabel,
    probability: f64,
    derived: DerivedValues,
    features: FeatureVector,
) -> DisplayPayload {
    let probability_pct = format_probability(probability);
    let (headline, detail, tone) = match label {
        RiskLabel::HighRisk => (
            format!("High Return Risk! (Probability: {probability_pct})"),
            "This product is likely to be returned based on the provided details.",
            Tone::Danger,
        ),
        RiskLabel::LowRisk => (
            format!("Low Return Risk. (Probability: {probability_pct})"),
            "This product has a low risk of being returned.",
            Tone::Success,
        ),
    };
    debug!("Presenting {} at {}", label.as_str(), probability_pct);

    DisplayPayload {
        headline,
        detail: detail.to_string(),
        tone,
        label,
        probability,
        probability_pct,
        derived,
        features,
    }
}

impl DisplayPayload {
    /// The auto-calculated values block
    pub fn render_derived(&self) -> String {
        format!(
            "Total Amount: {:.2}\nEffective Price: {:.2}\n",
            self.derived.total_amount, self.derived.effective_price
        )
    }

    /// Two-column table of the features, in schema order
    pub fn render_feature_table(&self) -> String {
        let width = Column::ALL
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0);

        let mut out = format!("{:<width$}  Value\n", "Feature");
        out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(10)));
        for column in Column::ALL {
            let value = self.features.get(column);
            let shown = if column.is_flag() || column == Column::Age {
                format!("{value:.0}")
            } else {
                format!("{value:.2}")
            };
            out.push_str(&format!("{:<width$}  {shown}\n", column.name()));
        }
        out
    }

    /// Full text report: result, derived values, feature table
    pub fn render_text(&self) -> String {
        let marker = match self.tone {
            Tone::Danger => "[!]",
            Tone::Success => "[ok]",
        };
        format!(
            "Prediction Results:\n{marker} {}\n{}\n\nAuto-calculated values\n{}\nInput Features for Prediction:\n{}",
            self.headline,
            self.detail,
            self.render_derived(),
            self.render_feature_table()
        )
    }

    /// The payload as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{compute_derived, FeatureBuilder, FEATURE_DIMENSION};
    use order_input::RawOrderInput;

    fn payload(label: RiskLabel, probability: f64) -> DisplayPayload {
        let (derived, features) = FeatureBuilder::default().build(&RawOrderInput::default());
        present(label, probability, derived, features)
    }

    #[test]
    fn test_probability_format() {
        assert_eq!(format_probability(0.7325), "73.25%");
        assert_eq!(format_probability(0.0), "0.00%");
        assert_eq!(format_probability(1.0), "100.00%");
    }

    #[test]
    fn test_high_risk_message() {
        let p = payload(RiskLabel::HighRisk, 0.8123);
        assert_eq!(p.headline, "High Return Risk! (Probability: 81.23%)");
        assert!(p.detail.contains("likely to be returned"));
        assert_eq!(p.tone, Tone::Danger);
    }

    #[test]
    fn test_low_risk_message() {
        let p = payload(RiskLabel::LowRisk, 0.12);
        assert_eq!(p.headline, "Low Return Risk. (Probability: 12.00%)");
        assert_eq!(p.detail, "This product has a low risk of being returned.");
        assert_eq!(p.tone, Tone::Success);
    }

    #[test]
    fn test_derived_block() {
        let features = FeatureVector::default();
        let p = present(RiskLabel::LowRisk, 0.1, compute_derived(2.0, 250.0, 20.0), features);
        assert_eq!(p.render_derived(), "Total Amount: 500.00\nEffective Price: 400.00\n");
    }

    #[test]
    fn test_feature_table_lists_every_column() {
        let table = payload(RiskLabel::LowRisk, 0.3).render_feature_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), FEATURE_DIMENSION + 2);
        assert!(lines[2].starts_with("Age"));
        assert!(lines[2].ends_with("30"));
        assert!(table.contains("Brand_Levie's"));
        assert!(lines.last().unwrap().starts_with("Region_North"));
    }

    #[test]
    fn test_feature_table_number_formats() {
        let order = RawOrderInput {
            price: 249.5,
            ..Default::default()
        };
        let (derived, features) = FeatureBuilder::default().build(&order);
        let table = present(RiskLabel::LowRisk, 0.2, derived, features).render_feature_table();
        let row = |name: &str| {
            table
                .lines()
                .find(|line| line.split("  ").next().map(str::trim_end) == Some(name))
                .map(|line| line.split_whitespace().last().unwrap_or_default().to_string())
                .unwrap()
        };
        assert_eq!(row("Age"), "30");
        assert_eq!(row("Price"), "249.50");
        assert_eq!(row("Gender"), "0");
        assert_eq!(row("Region_East"), "1");
    }

    #[test]
    fn test_json_exposes_features() {
        let json = payload(RiskLabel::HighRisk, 0.9).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["label"], "HighRisk");
        assert_eq!(value["tone"], "danger");
        assert_eq!(value["features"]["Region_East"], 1.0);
        assert_eq!(value["derived"]["effective_price"], 500.0);
    }
}
