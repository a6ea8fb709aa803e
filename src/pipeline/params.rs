use serde::{Deserialize, Serialize};

/// Immutable run configuration supplied by the caller. Optional fields
/// gate which stages of the pipeline run at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    /// Enables the research tasks when set.
    pub country: Option<String>,
    pub platform: Option<String>,
    pub tone: Option<String>,
    pub audience: Option<String>,
    /// Free text, comma separated. Empty is fine.
    pub keywords: String,
    /// Enables the image stage when set (and ad copy was produced).
    pub image_style: Option<String>,
}

impl Parameters {
    /// Build from raw form values. The form's select boxes use the
    /// literal "None" as their unselected sentinel; both that and the
    /// empty string normalize to unset.
    pub fn from_form(
        country: &str,
        platform: &str,
        tone: &str,
        audience: &str,
        keywords: &str,
        image_style: &str,
    ) -> Self {
        Self {
            country: normalize(country),
            platform: normalize(platform),
            tone: normalize(tone),
            audience: normalize(audience),
            keywords: keywords.trim().to_string(),
            image_style: normalize(image_style),
        }
    }

    /// Research tasks run only when a country is selected.
    pub fn research_enabled(&self) -> bool {
        self.country.is_some()
    }

    /// Campaign tasks need platform, tone and audience all set. This is
    /// a conjunction, not a majority.
    pub fn campaign_enabled(&self) -> bool {
        self.platform.is_some() && self.tone.is_some() && self.audience.is_some()
    }

    pub fn country_or_empty(&self) -> &str {
        self.country.as_deref().unwrap_or("")
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "None" {
        None
    } else {
        Some(trimmed.to_string())
    }
}
