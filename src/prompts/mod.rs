//! Task prompt catalog. Pure template functions: no I/O, no side
//! effects, and deterministic — identical inputs always produce
//! byte-identical text. Missing optional parameters interpolate as
//! empty strings.

use serde::{Deserialize, Serialize};

use crate::pipeline::params::Parameters;

/// A task description plus the specification of what a complete answer
/// looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPrompt {
    pub description: String,
    pub expected_output: String,
}

/// Everything the templates interpolate: the product under campaign and
/// the caller's run parameters.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub product_website: &'a str,
    pub product_details: &'a str,
    pub params: &'a Parameters,
}

const PHOTO_EXAMPLES: &str = "\
- a serene beach at sunrise with crystal clear waters, soft lighting, 4k, crisp
- a hiker standing at the edge of a cliff overlooking a vast landscape, dramatic lighting, 4k, crisp
- a close-up of native wildlife in their natural habitat, vibrant colors, 4k, crisp";

pub fn product_analysis(ctx: &PromptContext<'_>) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Analyze the product website: {website}.\n\
             Extra details provided by the company: {details}.\n\
             Target country: {country}\n\n\
             Focus on identifying unique features, benefits, and the overall \
             narrative presented.\n\n\
             Your final report should clearly articulate the product's key \
             selling points, its market appeal, and suggestions for enhancement \
             or positioning. Emphasize the aspects that make the product stand out.\n\n\
             Keep in mind, attention to detail is crucial for a comprehensive \
             analysis. It's currently 2024.",
            website = ctx.product_website,
            details = ctx.product_details,
            country = ctx.params.country_or_empty(),
        ),
        expected_output: "A comprehensive report detailing the unique features, benefits, \
                          and overall narrative of the product, including key selling \
                          points, market appeal, and suggestions for enhancement or \
                          positioning."
            .to_string(),
    }
}

pub fn competitor_analysis(ctx: &PromptContext<'_>) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Explore competitors of {website}.\n\
             Extra details provided by the company: {details}.\n\
             Target country: {country}\n\n\
             Identify the top 3 competitors and analyze their strategies, \
             market positioning, and customer perception.\n\n\
             Your final report MUST include BOTH all context about {website} \
             and a detailed comparison to the identified competitors.",
            website = ctx.product_website,
            details = ctx.product_details,
            country = ctx.params.country_or_empty(),
        ),
        expected_output: "A detailed analysis of the top 3 competitors, including their \
                          strategies, market positioning, and customer perception. The \
                          report should include a comparison with the product."
            .to_string(),
    }
}

pub fn campaign_development(ctx: &PromptContext<'_>) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Develop a targeted marketing campaign for {website}.\n\
             Extra details provided by the company: {details}.\n\n\
             Platform: {platform}\n\
             Tone of Voice: {tone}\n\
             Target Audience: {audience}\n\
             Target Country: {country}\n\n\
             Create a strategy and creative content ideas meticulously designed \
             to captivate and engage the target audience.\n\n\
             Based on your ideas, your co-workers will create the content for \
             the campaign.\n\n\
             Your final answer MUST include ideas that will resonate with the \
             audience and all context you have about the product.",
            website = ctx.product_website,
            details = ctx.product_details,
            platform = ctx.params.platform.as_deref().unwrap_or(""),
            tone = ctx.params.tone.as_deref().unwrap_or(""),
            audience = ctx.params.audience.as_deref().unwrap_or(""),
            country = ctx.params.country_or_empty(),
        ),
        expected_output: "A comprehensive marketing campaign strategy, including creative \
                          content ideas that resonate with the target audience and \
                          utilize all available context about the product."
            .to_string(),
    }
}

pub fn ad_copy(ctx: &PromptContext<'_>) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Craft engaging social media post copy for {website}. The copy \
             should be punchy, captivating, concise, and aligned with the \
             marketing strategy.\n\n\
             Keywords: {keywords}\n\
             Target Country: {country}\n\n\
             Focus on creating a message that resonates with the target \
             audience and highlights the unique selling points of the product.\n\n\
             Your ad copy must be attention-grabbing and should encourage \
             viewers to take action, whether it's visiting the website, making \
             a purchase, or learning more about the product.\n\n\
             Your final answer MUST be 3 options for an ad copy that not only \
             informs but also excites and persuades the audience.",
            website = ctx.product_website,
            keywords = ctx.params.keywords,
            country = ctx.params.country_or_empty(),
        ),
        expected_output: "Three punchy, captivating, and concise ad copies that highlight \
                          the unique selling points of the product and encourage viewers \
                          to take action."
            .to_string(),
    }
}

pub fn photograph_concept(ctx: &PromptContext<'_>, copy: &str) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Take the most amazing photo ever for a social media post. Use the \
             following copy:\n{copy}\n\n\
             This is the product you are working with: {website}.\n\
             Extra details provided by the company: {details}.\n\n\
             Image Style: {style}\n\n\
             Imagine what the photo should look like and describe it in a \
             paragraph. Here are some examples to follow:\n{examples}\n\n\
             Think creatively and focus on how the image can capture the \
             audience's attention. Don't show the actual product in the photo.\n\n\
             Your final answer must be 3 options of photographs, each with 1 \
             paragraph describing the photograph exactly like the examples \
             provided above.",
            copy = copy,
            website = ctx.product_website,
            details = ctx.product_details,
            style = ctx.params.image_style.as_deref().unwrap_or(""),
            examples = PHOTO_EXAMPLES,
        ),
        expected_output: "Three imaginative descriptions of potential photographs, each \
                          capturing a different aspect of the campaign and aligning with \
                          the provided examples."
            .to_string(),
    }
}

pub fn photograph_review(ctx: &PromptContext<'_>) -> TaskPrompt {
    TaskPrompt {
        description: format!(
            "Review the photos taken for the campaign. Ensure they are the best \
             possible and aligned with the product's goals. Review, approve, ask \
             clarifying questions, or delegate follow-up work if necessary.\n\n\
             This is the product you are working with: {website}.\n\
             Extra details provided by the company: {details}.\n\n\
             Here are some examples of how the final photographs should look:\n\
             {examples}\n\n\
             Your final answer must be 3 reviewed options of photographs, each \
             with 1 paragraph description following the examples provided above.",
            website = ctx.product_website,
            details = ctx.product_details,
            examples = PHOTO_EXAMPLES,
        ),
        expected_output: "Three reviewed photograph descriptions, ensuring each aligns \
                          with the campaign's goals and matches the provided examples."
            .to_string(),
    }
}
