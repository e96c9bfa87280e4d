//! Resource types and the generated resource document

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Category of document being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    InterventionMenu,
    StudentPlan,
    ProgressMonitoring,
    #[default]
    Unset,
}

impl ResourceType {
    /// Wire tag (`interventionMenu`, ..., `unset`)
    pub fn tag(self) -> &'static str {
        match self {
            ResourceType::InterventionMenu => "interventionMenu",
            ResourceType::StudentPlan => "studentPlan",
            ResourceType::ProgressMonitoring => "progressMonitoring",
            ResourceType::Unset => "unset",
        }
    }

    /// Human-readable resource title
    pub fn title(self) -> &'static str {
        match self {
            ResourceType::InterventionMenu => "MTSS Intervention Menu",
            ResourceType::StudentPlan => "Student Intervention Plan",
            ResourceType::ProgressMonitoring => "Progress Monitoring Framework",
            ResourceType::Unset => "MTSS Resource",
        }
    }

    /// Title used in page headers: `<Org> MTSS <Title>`
    pub fn header_title(self, organization: &str) -> String {
        let title = self.title().trim_start_matches("MTSS ");
        if organization.is_empty() {
            format!("MTSS {}", title)
        } else {
            format!("{} MTSS {}", organization, title)
        }
    }

    /// File name stem without extension
    pub fn file_stem(self) -> &'static str {
        match self {
            ResourceType::InterventionMenu => "Nsightz_Intervention_Menu",
            ResourceType::StudentPlan => "Nsightz_Student_Intervention_Plan",
            ResourceType::ProgressMonitoring => "Nsightz_Progress_Monitoring_Framework",
            ResourceType::Unset => "Nsightz_MTSS_Resource",
        }
    }

    /// File name with the given extension (`"pdf"`, `"html"`)
    pub fn filename(self, extension: &str) -> String {
        format!("{}.{}", self.file_stem(), extension.trim_start_matches('.'))
    }

    /// Ordered section names used by section-wise generation
    pub fn sections(self) -> &'static [&'static str] {
        match self {
            ResourceType::InterventionMenu => &["overview", "tier1", "tier2", "tier3"],
            ResourceType::StudentPlan => &["info", "goals", "implementation"],
            ResourceType::ProgressMonitoring => &["framework", "roles", "forms"],
            ResourceType::Unset => &["overview"],
        }
    }

    /// Buttons offered when a reply carries no directive
    pub fn default_buttons(self) -> &'static [&'static str] {
        match self {
            ResourceType::InterventionMenu => &[
                "Academic Interventions",
                "Behavioral Interventions",
                "Social-Emotional Interventions",
                "Next Step",
            ],
            ResourceType::StudentPlan => &[
                "Academic Goal",
                "Behavioral Goal",
                "Let me describe the student situation",
            ],
            ResourceType::ProgressMonitoring => &[
                "Weekly Monitoring",
                "Bi-weekly Monitoring",
                "Recommendations",
            ],
            ResourceType::Unset => &[
                "Intervention Menu",
                "Student Plan",
                "Progress Monitoring",
            ],
        }
    }

    /// Infer a resource type from a user message or button label
    ///
    /// Returns `None` when the text names no resource type.
    pub fn infer(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let menu_topics = [
            "academic interventions",
            "behavioral interventions",
            "social-emotional interventions",
            "attendance interventions",
        ];

        if lower.contains("intervention menu") || menu_topics.iter().any(|t| lower.contains(t)) {
            Some(ResourceType::InterventionMenu)
        } else if lower.contains("student") && lower.contains("plan") {
            Some(ResourceType::StudentPlan)
        } else if lower.contains("progress monitoring") {
            Some(ResourceType::ProgressMonitoring)
        } else {
            None
        }
    }

    /// Whether a concrete type has been chosen
    pub fn is_set(self) -> bool {
        self != ResourceType::Unset
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "interventionMenu" | "intervention-menu" | "menu" => Ok(ResourceType::InterventionMenu),
            "studentPlan" | "student-plan" | "plan" => Ok(ResourceType::StudentPlan),
            "progressMonitoring" | "progress-monitoring" | "monitoring" => {
                Ok(ResourceType::ProgressMonitoring)
            }
            "unset" | "" => Ok(ResourceType::Unset),
            other => Err(CoreError::InvalidInput(format!(
                "unknown resource type '{}'",
                other
            ))),
        }
    }
}

/// An assembled resource: title, type and markdown body
///
/// The markdown starts with a level-1 heading naming the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDocument {
    pub title: String,
    pub resource_type: ResourceType,
    pub markdown: String,
}

impl ResourceDocument {
    pub fn new(resource_type: ResourceType, markdown: impl Into<String>) -> Self {
        Self {
            title: resource_type.title().to_string(),
            resource_type,
            markdown: markdown.into(),
        }
    }

    /// File name for this document with the given extension
    pub fn filename(&self, extension: &str) -> String {
        self.resource_type.filename(extension)
    }
}
