use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

/// Preset tones offered by the questionnaire. Any other string is still
/// accepted if a client submits one programmatically.
pub const TONE_PRESETS: [&str; 5] = [
    "Professional & Authoritative",
    "Creative & Playful",
    "Minimalist & Modern",
    "Witty & Provocative",
    "Compassionate & Empowering",
];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserInput {
    pub name: String,
    pub industry: String,
    pub experience: String,
    pub goals: String,
    pub tone: String,
}

impl UserInput {
    /// All five fields are required; whitespace-only counts as missing.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("name", &self.name),
            ("industry", &self.industry),
            ("experience", &self.experience),
            ("goals", &self.goals),
            ("tone", &self.tone),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("field '{}' must not be empty", label));
            }
        }
        Ok(())
    }
}

/// One labeled axis of the archetype radar chart. Scores are expected in
/// [0, 100] but not clamped here; the chart scales whatever it gets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BrandArchetype {
    pub subject: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrategyStep {
    pub title: String,
    pub description: String,
}

/// The structured result of the text-generation call, parsed verbatim from
/// the model's JSON output. Field names stay camelCase on the wire to match
/// the response schema sent with the request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandStrategy {
    pub tagline: String,
    pub bio: String,
    pub mission: String,
    pub archetypes: Vec<BrandArchetype>,
    pub strategy_steps: Vec<StrategyStep>,
    pub visual_prompt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewState {
    Idle,
    GeneratingText,
    GeneratingImage,
    Completed,
    Error,
}

impl ViewState {
    /// A cycle is in flight while either generation call is pending.
    pub fn is_generating(self) -> bool {
        matches!(self, ViewState::GeneratingText | ViewState::GeneratingImage)
    }
}

/// Snapshot of the current generation cycle, as served to the front-end.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionSnapshot {
    pub state: ViewState,
    pub strategy: Option<BrandStrategy>,
    pub image: Option<String>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strategy_json_round_trips_exactly() {
        let json = serde_json::json!({
            "tagline": "Ship loud, ship proud",
            "bio": "Backend engineer turned brand voice.",
            "mission": "Make infrastructure visible.",
            "archetypes": [
                {"subject": "Hero", "value": 80.0},
                {"subject": "Sage", "value": 65.0},
                {"subject": "Creator", "value": 90.0},
                {"subject": "Ruler", "value": 40.0},
                {"subject": "Outlaw", "value": 55.0}
            ],
            "strategySteps": [
                {"title": "Audit", "description": "Review current presence."}
            ],
            "visualPrompt": "a glowing server rack at dusk"
        });
        let strategy: BrandStrategy = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(strategy.tagline, "Ship loud, ship proud");
        assert_eq!(strategy.archetypes.len(), 5);
        assert_eq!(strategy.archetypes[2].value, 90.0);
        assert_eq!(strategy.strategy_steps[0].title, "Audit");
        assert_eq!(strategy.visual_prompt, "a glowing server rack at dusk");
        assert_eq!(serde_json::to_value(&strategy).unwrap(), json);
    }

    #[test]
    fn strategy_rejects_missing_fields() {
        let json = serde_json::json!({"tagline": "only a tagline"});
        assert!(serde_json::from_value::<BrandStrategy>(json).is_err());
    }

    #[test]
    fn empty_archetype_list_is_not_an_error() {
        let json = serde_json::json!({
            "tagline": "t", "bio": "b", "mission": "m",
            "archetypes": [], "strategySteps": [], "visualPrompt": "v"
        });
        let strategy: BrandStrategy = serde_json::from_value(json).unwrap();
        assert!(strategy.archetypes.is_empty());
    }

    #[test]
    fn input_validation_flags_blank_fields() {
        let mut input = UserInput {
            name: "Jane Doe".into(),
            industry: "SaaS".into(),
            experience: "10y backend engineering".into(),
            goals: "grow LinkedIn authority".into(),
            tone: TONE_PRESETS[3].into(),
        };
        assert!(input.validate().is_ok());
        input.goals = "   ".into();
        assert_eq!(input.validate().unwrap_err(), "field 'goals' must not be empty");
    }
}
