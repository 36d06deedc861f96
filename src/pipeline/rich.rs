//! Rich path: a pre-structured record from the tool-detail site.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{GenerateError, ToolDataSource};
use crate::image::{is_placeholder, ImageLocator};
use crate::llm::TextGenerator;
use crate::models::{
    AutoGenerateResult, DataSource, GeneratedData, PricingTier, ScrapedToolData, ToolType,
};
use crate::scrape::RichScraper;
use crate::utils::decode_html_entities;
use crate::video::VideoLocator;

/// Free if any pricing tier says so; a record without tiers counts as paid.
pub fn tool_type_from_pricing(tiers: &[PricingTier]) -> ToolType {
    if tiers.iter().any(PricingTier::is_free) {
        ToolType::Free
    } else {
        ToolType::Paid
    }
}

pub struct RichSource {
    scraper: RichScraper,
    images: ImageLocator,
    videos: VideoLocator,
    text: TextGenerator,
}

impl RichSource {
    pub fn new(
        scraper: RichScraper,
        images: ImageLocator,
        videos: VideoLocator,
        text: TextGenerator,
    ) -> Self {
        Self {
            scraper,
            images,
            videos,
            text,
        }
    }

    /// Image search result, unless it is only a placeholder and the scraped
    /// page offered a real image.
    async fn resolve_image(&self, tool_name: &str, scraped: &ScrapedToolData) -> String {
        let found = self
            .images
            .locate(&scraped.website_url, tool_name, &scraped.description)
            .await;
        if !is_placeholder(&found) {
            return found;
        }
        match scraped.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(scraped_image) => {
                debug!("Using scraped image for '{}'", tool_name);
                scraped_image.to_string()
            }
            None => found,
        }
    }
}

#[async_trait]
impl ToolDataSource for RichSource {
    fn name(&self) -> &'static str {
        "rich"
    }

    async fn generate(&self, tool_name: &str) -> Result<Option<AutoGenerateResult>, GenerateError> {
        let Some(scraped) = self.scraper.scrape(tool_name).await else {
            return Ok(None);
        };

        let image_url = self.resolve_image(tool_name, &scraped).await;
        let video_url = self
            .videos
            .locate(&scraped.website_url, tool_name, scraped.video_url.as_deref())
            .await;
        let category = self
            .text
            .classify_category_primary(tool_name, &scraped.description)
            .await;
        let tool_type = tool_type_from_pricing(&scraped.pricing_tiers);

        info!(
            "Rich record for '{}': category={}, type={}",
            tool_name,
            category,
            tool_type.as_str()
        );

        let data = GeneratedData {
            website_url: scraped.website_url,
            image_url,
            video_url,
            description: decode_html_entities(&scraped.description),
            category,
            tool_type,
            key_features: Some(scraped.key_features),
            pros: Some(scraped.pros),
            cons: Some(scraped.cons),
            who_is_using: Some(scraped.who_is_using),
            pricing_tiers: Some(scraped.pricing_tiers),
            what_makes_unique: Some(scraped.what_makes_unique),
            ratings: scraped.ratings,
            uncommon_use_cases: scraped.uncommon_use_cases,
            data_source: DataSource::Scraped,
        };
        Ok(Some(AutoGenerateResult::success(data)))
    }
}
