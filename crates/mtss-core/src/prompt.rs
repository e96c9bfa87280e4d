//! Prompt Composer
//!
//! Builds the instruction text handed to the text generator. Every
//! function here is pure string construction; an unset resource type
//! routes to the generic branch instead of failing.

use std::fmt::Write;

use crate::catalog::{Catalog, Tier};
use crate::resource::ResourceType;

/// User turn sent after a section instruction
pub const SECTION_REQUEST: &str = "Generate this section of the resource.";

/// Evidence sources cited in resource prompts
pub const EVIDENCE_SOURCES: &[&str] = &[
    "What Works Clearinghouse",
    "Evidence for ESSA",
    "Intervention Central",
    "Harmony SEL",
    "Florida Center for Reading Research",
    "Everyday Speech MTSS Intervention Library",
    "RethinkEd MTSS Suite",
    "OSE Educational Partnership",
    "National Center on Intensive Intervention",
];

/// Composes system, resource and section prompts
#[derive(Debug, Clone)]
pub struct PromptComposer {
    catalog: Catalog,
    organization: String,
    promo_url: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

impl PromptComposer {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            organization: "Nsightz".to_string(),
            promo_url: "https://mtss.nsightz.com/launch".to_string(),
        }
    }

    /// Override the organization named in the promotion line
    pub fn with_branding(
        mut self,
        organization: impl Into<String>,
        promo_url: impl Into<String>,
    ) -> Self {
        self.organization = organization.into();
        self.promo_url = promo_url.into();
        self
    }

    /// The catalog prompts draw interventions from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// System prompt for a chat turn
    pub fn system_prompt(&self, resource_type: ResourceType, school_level: &str) -> String {
        let mut prompt = format!(
            "You are an expert MTSS assistant helping educators create evidence-based resources. \
The user works at a {level} school. Respond in a professional but conversational tone. \
After questions, suggest 2-4 button options the user might want to click that move the \
conversation forward and are actionable, in format [BUTTONS: option1 | option2 | ...].

When suggesting interventions, consider these domains:
- Academic (Reading, Math, Writing)
- Behavioral
- Social-Emotional
- Attendance

And these tiers:
- Tier 1: Universal supports
- Tier 2: Targeted interventions
- Tier 3: Intensive interventions

If you need more information, ask follow-up questions. Once you have enough information, \
confirm with the user that they want to create the resource.

At appropriate moments, suggest that {org} MTSS can help enhance progress monitoring and \
intervention fidelity. When users express interest, direct them to {url}.",
            level = school_level,
            org = self.organization,
            url = self.promo_url,
        );

        let guidance = match resource_type {
            ResourceType::InterventionMenu => {
                "You're helping create an intervention menu across tiers. Ask about academic, \
behavioral, and social-emotional domains. Guide them through creating a structured menu of \
evidence-based interventions for each tier (1-3) and domain. Use the provided intervention \
database to suggest specific, evidence-based interventions that match the school's needs."
            }
            ResourceType::StudentPlan => {
                "You're helping create an individual student intervention plan. Ask about the \
student's needs, goals, strategies, who should be responsible for the intervention, timeline, \
and how progress will be monitored. If these are incomplete, ask follow-up questions to gather \
more information. Use the provided intervention database to suggest specific, evidence-based \
interventions that match the student's needs."
            }
            ResourceType::ProgressMonitoring => {
                "You're helping create a progress monitoring framework. Ask about what data will \
be collected, how frequently, by whom, and how it will be used for decision-making. Include \
methods for tracking both individual students and intervention effectiveness at system level. \
If these are incomplete, ask follow-up questions to gather more information."
            }
            ResourceType::Unset => {
                "Introduce yourself and ask what type of MTSS resource they want to create."
            }
        };
        write!(prompt, "\n\n{}", guidance).unwrap();

        if matches!(
            resource_type,
            ResourceType::InterventionMenu | ResourceType::StudentPlan
        ) {
            write!(prompt, "\n\n{}", self.catalog.to_prompt_text()).unwrap();
        }

        prompt
    }

    /// Prompt for whole-document generation
    ///
    /// `context` is the transcript rendered as text and is appended last.
    pub fn resource_prompt(
        &self,
        resource_type: ResourceType,
        school_level: &str,
        context: &str,
    ) -> String {
        let mut prompt = format!(
            "You are an expert MTSS specialist creating a professional {} for a {} school. \
Use evidence-based practices from these sources:\n",
            resource_type.title(),
            school_level
        );
        for source in EVIDENCE_SOURCES {
            writeln!(prompt, "- {}", source).unwrap();
        }
        prompt.push_str(
            "\nGenerate a comprehensive resource in markdown format that follows best practices \
and research-based strategies. Begin with a level-1 heading naming the resource. Use only \
headings, paragraphs, bullet lists, **bold** text and pipe tables with a header separator row.",
        );

        match resource_type {
            ResourceType::InterventionMenu => {
                prompt.push_str(
                    "\n\nCreate a tiered intervention menu that includes:
- 2-3 key interventions per tier with strong evidence base
- Clear implementation steps and required resources
- Expected outcomes and progress indicators
- Specific examples for academic, behavioral, and social-emotional domains
Format with clear headers and sections by tier.",
                );
                write!(prompt, "\n\n{}", self.catalog.to_prompt_text()).unwrap();
            }
            ResourceType::StudentPlan => {
                prompt.push_str(
                    "\n\nCreate a comprehensive student intervention plan including:
- Student Information (use placeholder)
- Specific Areas of Concern (based on data)
- SMART Goals (2-3 targeted goals)
- Selected Evidence-Based Interventions
- Implementation Timeline (6-8 weeks)
- Staff Responsibilities
- Progress Monitoring Schedule
Format as a professional, actionable document.",
                );
                write!(
                    prompt,
                    "\n\n{}\n{}",
                    self.catalog.student_plan_prompt_text(),
                    self.catalog.to_prompt_text()
                )
                .unwrap();
            }
            ResourceType::ProgressMonitoring => {
                prompt.push_str(
                    "\n\nCreate a detailed progress monitoring framework including:
- Essential Data Points to Track
- Collection Schedule (daily/weekly/monthly)
- Staff Roles and Responsibilities
- Decision Rules for Adjusting Interventions
- Sample Data Collection Forms
Format with clear sections and practical examples.",
                );
                write!(
                    prompt,
                    "\n\n{}",
                    self.catalog.progress_monitoring_prompt_text()
                )
                .unwrap();
            }
            ResourceType::Unset => {}
        }

        write!(prompt, "\n\nBased on our conversation:\n{}", context).unwrap();
        prompt
    }

    /// Instruction for one named section in section-wise generation
    pub fn section_prompt(
        &self,
        resource_type: ResourceType,
        section: &str,
        school_level: &str,
        context: &str,
    ) -> String {
        let instruction = section_instruction(resource_type, section, school_level);
        let mut prompt = format!(
            "You are an expert MTSS specialist creating part of a {} for a {} school. \
Use evidence-based practices from reputable sources. Write markdown without a level-1 heading.\n{}",
            resource_type.title(),
            school_level,
            instruction
        );

        let tier = match (resource_type, section) {
            (ResourceType::InterventionMenu, "tier1") => Some(Tier::Universal),
            (ResourceType::InterventionMenu, "tier2") => Some(Tier::Targeted),
            (ResourceType::InterventionMenu, "tier3") => Some(Tier::Intensive),
            _ => None,
        };
        if let Some(tier) = tier {
            let entries = self.catalog.by_tier(tier);
            write!(
                prompt,
                "\n\nCandidate {} interventions:\n{}",
                tier,
                Catalog::describe(&entries)
            )
            .unwrap();
        } else if (resource_type, section) == (ResourceType::StudentPlan, "goals") {
            write!(prompt, "\n\n{}", self.catalog.to_prompt_text()).unwrap();
        } else if (resource_type, section) == (ResourceType::ProgressMonitoring, "forms") {
            write!(
                prompt,
                "\n\n{}",
                self.catalog.progress_monitoring_prompt_text()
            )
            .unwrap();
        }

        write!(prompt, "\n\nContext from conversation:\n{}", context).unwrap();
        prompt
    }
}

fn section_instruction(resource_type: ResourceType, section: &str, school_level: &str) -> String {
    let fixed = match (resource_type, section) {
        (ResourceType::InterventionMenu, "overview") => {
            return format!(
                "Create a brief introduction and overview section for a {} school intervention \
menu. Include purpose and how to use the menu. Format in markdown.",
                school_level
            );
        }
        (ResourceType::InterventionMenu, "tier1") => {
            "Create the Tier 1 (Universal) section of the intervention menu. Include 2-3 key \
interventions with implementation steps and outcomes. Focus on universal supports."
        }
        (ResourceType::InterventionMenu, "tier2") => {
            "Create the Tier 2 (Targeted) section of the intervention menu. Include 2-3 key \
interventions with implementation steps and outcomes. Focus on small group interventions."
        }
        (ResourceType::InterventionMenu, "tier3") => {
            "Create the Tier 3 (Intensive) section of the intervention menu. Include 2-3 key \
interventions with implementation steps and outcomes. Focus on individual interventions."
        }
        (ResourceType::StudentPlan, "info") => {
            "Create the student information and areas of concern sections for a student \
intervention plan. Use placeholder student info and focus on clear documentation of concerns."
        }
        (ResourceType::StudentPlan, "goals") => {
            "Create the goals and intervention selection section. Include 2-3 SMART goals and \
selected evidence-based interventions that align with the concerns discussed."
        }
        (ResourceType::StudentPlan, "implementation") => {
            "Create the implementation timeline, staff responsibilities, and progress monitoring \
sections. Include specific schedules and clear staff roles."
        }
        (ResourceType::ProgressMonitoring, "framework") => {
            "Create the overview and data collection framework sections. Include essential data \
points and collection schedules."
        }
        (ResourceType::ProgressMonitoring, "roles") => {
            "Create the staff roles, responsibilities, and decision rules sections. Include clear \
guidelines for using the data."
        }
        (ResourceType::ProgressMonitoring, "forms") => {
            "Create sample data collection forms and progress monitoring templates. Include \
practical examples."
        }
        (ResourceType::Unset, "overview") => {
            return format!(
                "Create a brief overview of a Multi-Tiered System of Supports for a {} school, \
covering tiers, domains and how interventions are selected.",
                school_level
            );
        }
        (_, other) => {
            return format!("Create the {} section of the resource.", other);
        }
    };
    fixed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_embeds_school_level_and_directive() {
        let composer = PromptComposer::default();
        let prompt = composer.system_prompt(ResourceType::ProgressMonitoring, "High School");
        assert!(prompt.contains("The user works at a High School school"));
        assert!(prompt.contains("[BUTTONS: option1 | option2 | ...]"));
        assert!(prompt.contains("progress monitoring framework"));
        assert!(!prompt.contains("Intervention database"));
    }

    #[test]
    fn test_system_prompt_unset_routes_to_default() {
        let prompt = PromptComposer::default().system_prompt(ResourceType::Unset, "K-12");
        assert!(prompt.ends_with("ask what type of MTSS resource they want to create."));
    }

    #[test]
    fn test_catalog_included_where_interventions_are_suggested() {
        let composer = PromptComposer::default();
        let menu = composer.system_prompt(ResourceType::InterventionMenu, "K-12");
        assert!(menu.contains("CHECK IN/CHECK OUT (CICO)"));
        let plan = composer.resource_prompt(ResourceType::StudentPlan, "K-12", "user: hi");
        assert!(plan.contains("[Student Name]"));
        assert!(plan.contains("WOOP"));
    }

    #[test]
    fn test_resource_prompt_is_deterministic_and_ends_with_context() {
        let composer = PromptComposer::default();
        let a = composer.resource_prompt(ResourceType::InterventionMenu, "K-12", "user: menu");
        let b = composer.resource_prompt(ResourceType::InterventionMenu, "K-12", "user: menu");
        assert_eq!(a, b);
        assert!(a.contains("What Works Clearinghouse"));
        assert!(a.ends_with("Based on our conversation:\nuser: menu"));
    }

    #[test]
    fn test_section_prompt_filters_catalog_by_tier() {
        let composer = PromptComposer::default();
        let tier3 = composer.section_prompt(ResourceType::InterventionMenu, "tier3", "K-12", "");
        assert!(tier3.contains("Tier 3 (Intensive)"));
        assert!(tier3.contains("NUDGE LETTER"));
        assert!(!tier3.contains("BEHAVIOR-SPECIFIC PRAISE"));
    }

    #[test]
    fn test_unknown_section_does_not_panic() {
        let prompt =
            PromptComposer::default().section_prompt(ResourceType::StudentPlan, "appendix", "K-12", "");
        assert!(prompt.contains("Create the appendix section"));
    }
}
