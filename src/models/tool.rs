//! Tool metadata models produced by the generation pipeline.

use serde::{Deserialize, Serialize};

/// Directory category for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Image,
    Text,
    Video,
    Audio,
    Code,
    Productivity,
    Research,
    Marketing,
    #[default]
    #[serde(rename = "AI Tools")]
    AiTools,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Image,
        Category::Text,
        Category::Video,
        Category::Audio,
        Category::Code,
        Category::Productivity,
        Category::Research,
        Category::Marketing,
        Category::AiTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Text => "Text",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Code => "Code",
            Self::Productivity => "Productivity",
            Self::Research => "Research",
            Self::Marketing => "Marketing",
            Self::AiTools => "AI Tools",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }

    /// Parse free-form model output, coercing anything unrecognised to `AI Tools`.
    ///
    /// Surrounding whitespace, quotes and a trailing period are ignored.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::from_str(strip_answer_noise(raw)).unwrap_or_default()
    }
}

/// Strip whitespace, quotes, backticks and periods around a one-word answer.
fn strip_answer_noise(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '.'))
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ToolType {
    #[default]
    Free,
    Paid,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Paid => "Paid",
        }
    }

    /// Only an explicit "Paid" answer counts as paid.
    pub fn parse_lenient(raw: &str) -> Self {
        if strip_answer_noise(raw).eq_ignore_ascii_case("paid") {
            Self::Paid
        } else {
            Self::Free
        }
    }
}

/// Which acquisition path produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Rich structured record from the tool-detail site.
    Scraped,
    /// Assembled from independent search/LLM providers.
    Api,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scraped => "scraped",
            Self::Api => "api",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl PricingTier {
    /// A tier is free when either its label or its price mentions "free".
    pub fn is_free(&self) -> bool {
        self.name.to_lowercase().contains("free") || self.price.to_lowercase().contains("free")
    }
}

/// Review scores on a 0-5 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_reliability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_of_use: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functionality_features: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_flexibility: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_privacy_security: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_resources: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_efficiency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_capabilities: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f32>,
}

impl Ratings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Structured record extracted from the tool-detail site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedToolData {
    pub name: String,
    pub description: String,
    pub website_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub who_is_using: Vec<String>,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
    #[serde(default)]
    pub what_makes_unique: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Ratings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncommon_use_cases: Option<Vec<String>>,
}

/// Final tool metadata handed to the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedData {
    pub website_url: String,
    pub image_url: String,
    pub video_url: String,
    pub description: String,
    pub category: Category,
    pub tool_type: ToolType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_is_using: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_tiers: Option<Vec<PricingTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_makes_unique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Ratings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncommon_use_cases: Option<Vec<String>>,
    pub data_source: DataSource,
}

impl GeneratedData {
    /// Basic-path record with no rich fields.
    pub fn basic(
        website_url: String,
        image_url: String,
        video_url: String,
        description: String,
        category: Category,
        tool_type: ToolType,
    ) -> Self {
        Self {
            website_url,
            image_url,
            video_url,
            description,
            category,
            tool_type,
            key_features: None,
            pros: None,
            cons: None,
            who_is_using: None,
            pricing_tiers: None,
            what_makes_unique: None,
            ratings: None,
            uncommon_use_cases: None,
            data_source: DataSource::Api,
        }
    }

    pub fn to_partial(&self) -> PartialToolData {
        PartialToolData {
            website_url: Some(self.website_url.clone()),
            image_url: Some(self.image_url.clone()),
            video_url: Some(self.video_url.clone()),
            description: Some(self.description.clone()),
            category: Some(self.category),
            tool_type: Some(self.tool_type),
        }
    }
}

/// Best-effort field set returned alongside verification errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialToolData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<ToolType>,
}

/// Outcome of one auto-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGenerateResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<GeneratedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<super::VerificationResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_data: Option<PartialToolData>,
}

impl AutoGenerateResult {
    pub fn success(data: GeneratedData) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: None,
            partial_data: None,
        }
    }

    pub fn partial(partial: PartialToolData, errors: Vec<super::VerificationResult>) -> Self {
        Self {
            success: false,
            data: None,
            errors: Some(errors),
            partial_data: Some(partial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_display_names() {
        assert_eq!(
            serde_json::to_string(&Category::AiTools).unwrap(),
            "\"AI Tools\""
        );
        assert_eq!(serde_json::to_string(&Category::Code).unwrap(), "\"Code\"");
    }

    #[test]
    fn test_category_parse_lenient() {
        assert_eq!(Category::parse_lenient("Image"), Category::Image);
        assert_eq!(Category::parse_lenient("  \"video\".\n"), Category::Video);
        assert_eq!(Category::parse_lenient("'Code'."), Category::Code);
        assert_eq!(Category::parse_lenient("ai tools"), Category::AiTools);
        assert_eq!(Category::parse_lenient("Gardening"), Category::AiTools);
        assert_eq!(
            Category::parse_lenient("The category is Image"),
            Category::AiTools
        );
        assert_eq!(Category::parse_lenient(""), Category::AiTools);
    }

    #[test]
    fn test_tool_type_parse_lenient() {
        assert_eq!(ToolType::parse_lenient("Paid"), ToolType::Paid);
        assert_eq!(ToolType::parse_lenient(" paid. "), ToolType::Paid);
        assert_eq!(ToolType::parse_lenient("\"Paid\"."), ToolType::Paid);
        assert_eq!(ToolType::parse_lenient("`paid`"), ToolType::Paid);
        assert_eq!(ToolType::parse_lenient("Free"), ToolType::Free);
        assert_eq!(ToolType::parse_lenient("Freemium"), ToolType::Free);
    }

    #[test]
    fn test_pricing_tier_is_free() {
        let tier = PricingTier {
            name: "Free".to_string(),
            price: "$0".to_string(),
            features: None,
        };
        assert!(tier.is_free());

        let tier = PricingTier {
            name: "Pro".to_string(),
            price: "$20/month".to_string(),
            features: None,
        };
        assert!(!tier.is_free());

        let tier = PricingTier {
            name: "Starter".to_string(),
            price: "Free".to_string(),
            features: None,
        };
        assert!(tier.is_free());
    }

    #[test]
    fn test_generated_data_json_shape() {
        let data = GeneratedData::basic(
            "https://example.ai".to_string(),
            "https://example.ai/logo.png".to_string(),
            String::new(),
            "desc".to_string(),
            Category::AiTools,
            ToolType::Free,
        );
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["websiteUrl"], "https://example.ai");
        assert_eq!(json["category"], "AI Tools");
        assert_eq!(json["toolType"], "Free");
        assert_eq!(json["dataSource"], "api");
        assert!(json.get("keyFeatures").is_none());
    }

    #[test]
    fn test_ratings_empty() {
        assert!(Ratings::default().is_empty());
        let ratings = Ratings {
            ease_of_use: Some(4.5),
            ..Default::default()
        };
        assert!(!ratings.is_empty());
    }
}
