use serde::{Deserialize, Serialize};

/// Capabilities a worker may use while executing its tasks. The
/// concrete backends live behind `providers::CapabilityProvider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Search,
    Scrape,
}

/// Immutable persona definition: one instance per role per pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSpec {
    pub role: String,
    pub objective: String,
    pub background: String,
    pub capabilities: Vec<Capability>,
    pub allow_delegation: bool,
}

impl WorkerSpec {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Static catalog of the five worker roles. Pure data; the orchestrator
/// materializes fresh specs for every run.
pub struct PersonaCatalog;

impl PersonaCatalog {
    pub fn lead_market_analyst() -> WorkerSpec {
        WorkerSpec {
            role: "Lead Market Analyst".to_string(),
            objective: "Conduct amazing analysis of the products and competitors, \
                        providing in-depth insights to guide marketing strategies."
                .to_string(),
            background: "As the Lead Market Analyst at a premier digital marketing firm, \
                         you specialize in dissecting online business landscapes."
                .to_string(),
            capabilities: vec![Capability::Search, Capability::Scrape],
            allow_delegation: false,
        }
    }

    pub fn chief_marketing_strategist() -> WorkerSpec {
        WorkerSpec {
            role: "Chief Marketing Strategist".to_string(),
            objective: "Synthesize amazing insights from product analysis to formulate \
                        incredible marketing strategies."
                .to_string(),
            background: "You are the Chief Marketing Strategist at a leading digital \
                         marketing agency, known for crafting bespoke strategies that \
                         drive success."
                .to_string(),
            capabilities: vec![Capability::Search, Capability::Scrape],
            allow_delegation: true,
        }
    }

    pub fn creative_content_creator() -> WorkerSpec {
        WorkerSpec {
            role: "Creative Content Creator".to_string(),
            objective: "Develop compelling and innovative content for social media \
                        campaigns, with a focus on creating high-impact ad copies."
                .to_string(),
            background: "As a Creative Content Creator at a top-tier digital marketing \
                         agency, you excel in crafting narratives that resonate with \
                         audiences on social media. Your expertise lies in turning \
                         marketing strategies into engaging stories and visual content \
                         that capture attention and inspire action."
                .to_string(),
            capabilities: vec![Capability::Search, Capability::Scrape],
            allow_delegation: true,
        }
    }

    pub fn senior_photographer() -> WorkerSpec {
        WorkerSpec {
            role: "Senior Photographer".to_string(),
            objective: "Take the most amazing photographs for social media ads that \
                        capture emotions and convey a compelling message."
                .to_string(),
            background: "As a Senior Photographer at a leading digital marketing agency, \
                         you are an expert at taking amazing photographs that inspire \
                         and engage. You are now working on a new campaign for a super \
                         important customer and you need to take the most amazing \
                         photograph."
                .to_string(),
            capabilities: vec![Capability::Search, Capability::Scrape],
            allow_delegation: false,
        }
    }

    pub fn chief_creative_director() -> WorkerSpec {
        WorkerSpec {
            role: "Chief Creative Director".to_string(),
            objective: "Oversee the work done by your team to make sure it is the best \
                        possible and aligned with the product's goals. Review, approve, \
                        ask clarifying questions or delegate follow-up work if necessary."
                .to_string(),
            background: "You are the Chief Content Officer of a leading digital marketing \
                         agency specializing in product branding. You are working on a \
                         new customer, trying to make sure your team is crafting the \
                         best possible content."
                .to_string(),
            capabilities: vec![Capability::Search, Capability::Scrape],
            allow_delegation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_roles() {
        assert_eq!(PersonaCatalog::lead_market_analyst().role, "Lead Market Analyst");
        assert_eq!(
            PersonaCatalog::chief_marketing_strategist().role,
            "Chief Marketing Strategist"
        );
        assert_eq!(
            PersonaCatalog::creative_content_creator().role,
            "Creative Content Creator"
        );
        assert_eq!(PersonaCatalog::senior_photographer().role, "Senior Photographer");
        assert_eq!(
            PersonaCatalog::chief_creative_director().role,
            "Chief Creative Director"
        );
    }

    #[test]
    fn test_capabilities() {
        let analyst = PersonaCatalog::lead_market_analyst();
        assert!(analyst.has_capability(Capability::Search));
        assert!(analyst.has_capability(Capability::Scrape));
        assert!(!analyst.allow_delegation);

        let director = PersonaCatalog::chief_creative_director();
        assert!(director.allow_delegation);
    }
}
