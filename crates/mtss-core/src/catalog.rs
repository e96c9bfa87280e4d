//! Intervention Catalog
//!
//! A static, read-only table of evidence-based interventions with tier,
//! grade and domain metadata. The catalog is never mutated; prompts pull
//! filtered views of it.

use std::fmt;
use std::fmt::Write;

use serde::{Serialize, Serializer};

use crate::error::Result;

/// Intervention intensity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Universal supports for all students
    Universal,
    /// Targeted supports for students needing additional help
    Targeted,
    /// Intensive, individualized supports
    Intensive,
}

impl Tier {
    /// All tiers in ascending intensity
    pub const ALL: [Tier; 3] = [Tier::Universal, Tier::Targeted, Tier::Intensive];

    /// Tier number (1-3)
    pub fn number(self) -> u8 {
        match self {
            Tier::Universal => 1,
            Tier::Targeted => 2,
            Tier::Intensive => 3,
        }
    }

    /// Tier from its number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tier::Universal),
            2 => Some(Tier::Targeted),
            3 => Some(Tier::Intensive),
            _ => None,
        }
    }

    /// Short description used in prompts
    pub fn description(self) -> &'static str {
        match self {
            Tier::Universal => "Universal supports for all students",
            Tier::Targeted => "Targeted interventions for students needing additional support",
            Tier::Intensive => "Intensive interventions for students with significant needs",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.number())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

/// Best-fit support domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Domain {
    Academic,
    Behavior,
    Attendance,
    LifeSkills,
}

impl Domain {
    /// All domains
    pub const ALL: [Domain; 4] = [
        Domain::Academic,
        Domain::Behavior,
        Domain::Attendance,
        Domain::LifeSkills,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Domain::Academic => "Academic",
            Domain::Behavior => "Behavior",
            Domain::Attendance => "Attendance",
            Domain::LifeSkills => "Life Skills",
        }
    }

    /// Short description used in prompts
    pub fn description(self) -> &'static str {
        match self {
            Domain::Academic => "Interventions focused on improving academic skills and performance",
            Domain::Behavior => {
                "Interventions focused on improving student behavior and social interactions"
            }
            Domain::Attendance => {
                "Interventions focused on improving student attendance and reducing absences"
            }
            Domain::LifeSkills => {
                "Interventions focused on developing social-emotional skills and self-management"
            }
        }
    }

    /// Parse a domain from free text (`"behavior"`, `"life skills"`, `"ela"`...)
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        match lower.as_str() {
            "academic" | "academics" | "ela" | "math" | "reading" | "writing" => {
                Some(Domain::Academic)
            }
            "behavior" | "behavioral" | "behaviour" => Some(Domain::Behavior),
            "attendance" => Some(Domain::Attendance),
            "life skills" | "lifeskills" | "life-skills" | "sel" | "social-emotional" => {
                Some(Domain::LifeSkills)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A school grade; pre-kindergarten is `-1`, kindergarten `0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(pub i8);

impl Grade {
    pub const PRE_K: Grade = Grade(-1);
    pub const K: Grade = Grade(0);

    /// Parse `PK`, `K` or a grade number
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "PK" | "PRE-K" => Some(Grade::PRE_K),
            "K" => Some(Grade::K),
            other => other
                .parse::<i8>()
                .ok()
                .filter(|n| (1..=12).contains(n))
                .map(Grade),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -1 => f.write_str("PK"),
            0 => f.write_str("K"),
            n => write!(f, "{}", n),
        }
    }
}

/// Inclusive grade span an intervention is suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeRange {
    pub low: Grade,
    pub high: Grade,
}

impl GradeRange {
    pub const fn new(low: Grade, high: Grade) -> Self {
        Self { low, high }
    }

    /// Whether a grade falls inside the range
    pub fn contains(&self, grade: Grade) -> bool {
        self.low <= grade && grade <= self.high
    }

    /// Parse `"PK-12"`, `"3-12"`, `"K"`
    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once('-') {
            Some((low, high)) if !low.trim().eq_ignore_ascii_case("pre") => {
                Some(Self::new(Grade::parse(low)?, Grade::parse(high)?))
            }
            _ => Grade::parse(text).map(|g| Self::new(g, g)),
        }
    }
}

impl fmt::Display for GradeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl Serialize for GradeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Optional implementation guidance for an intervention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementationDetail {
    pub steps: &'static [&'static str],
    pub materials: &'static [&'static str],
    pub tips: &'static [&'static str],
    pub duration: &'static str,
    pub frequency: &'static str,
    pub monitoring: &'static str,
}

/// A named evidence-based intervention
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intervention {
    pub name: &'static str,
    pub description: &'static str,
    pub tiers: &'static [Tier],
    pub grades: GradeRange,
    pub domains: &'static [Domain],
    /// Best-fit label as published (e.g. `"ELA, Math, Other Academics"`)
    pub best_for: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImplementationDetail>,
}

impl Intervention {
    /// Whether the intervention is offered at a tier
    pub fn supports_tier(&self, tier: Tier) -> bool {
        self.tiers.contains(&tier)
    }

    /// Whether the intervention fits a domain
    pub fn fits_domain(&self, domain: Domain) -> bool {
        self.domains.contains(&domain)
    }

    /// Comma-separated tier numbers, e.g. `"1, 2"`
    pub fn tier_label(&self) -> String {
        self.tiers
            .iter()
            .map(|t| t.number().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Filter applied to the catalog; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub tier: Option<Tier>,
    pub domain: Option<Domain>,
    pub grade: Option<Grade>,
}

/// Placeholder template for an individual student plan
#[derive(Debug, Clone, Serialize)]
pub struct StudentPlanTemplate {
    pub student_info: &'static [(&'static str, &'static str)],
    pub area_of_concern: &'static str,
    pub tier: &'static str,
    pub baseline_data: &'static str,
    pub goal: &'static str,
    pub intervention_fields: &'static [(&'static str, &'static str)],
    pub progress_monitoring: &'static [(&'static str, &'static str)],
}

/// Template for a progress-monitoring framework
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMonitoringTemplate {
    pub individual_data_points: &'static [(&'static str, &'static str)],
    pub system_metrics: &'static [&'static str],
    pub recommended_frequency: &'static str,
}

/// Read-only view over the intervention table
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    interventions: &'static [Intervention],
}

#[derive(Serialize)]
struct CatalogExport<'a> {
    interventions: &'a [Intervention],
    student_plan_template: &'a StudentPlanTemplate,
    progress_monitoring_template: &'a ProgressMonitoringTemplate,
}

impl Catalog {
    /// The built-in catalog
    pub fn standard() -> Self {
        Self {
            interventions: &INTERVENTIONS,
        }
    }

    /// All interventions in catalog order
    pub fn all(&self) -> &'static [Intervention] {
        self.interventions
    }

    /// Number of interventions
    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    /// Look up an intervention by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&'static Intervention> {
        let name = name.trim();
        self.interventions
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Interventions offered at a tier
    pub fn by_tier(&self, tier: Tier) -> Vec<&'static Intervention> {
        self.filter(CatalogQuery {
            tier: Some(tier),
            ..Default::default()
        })
    }

    /// Interventions that fit a domain
    pub fn by_domain(&self, domain: Domain) -> Vec<&'static Intervention> {
        self.filter(CatalogQuery {
            domain: Some(domain),
            ..Default::default()
        })
    }

    /// Interventions matching every field set in the query
    pub fn filter(&self, query: CatalogQuery) -> Vec<&'static Intervention> {
        self.interventions
            .iter()
            .filter(|i| query.tier.map_or(true, |t| i.supports_tier(t)))
            .filter(|i| query.domain.map_or(true, |d| i.fits_domain(d)))
            .filter(|i| query.grade.map_or(true, |g| i.grades.contains(g)))
            .collect()
    }

    /// The student plan template
    pub fn student_plan_template(&self) -> &'static StudentPlanTemplate {
        &STUDENT_PLAN_TEMPLATE
    }

    /// The progress monitoring template
    pub fn progress_monitoring_template(&self) -> &'static ProgressMonitoringTemplate {
        &PROGRESS_MONITORING_TEMPLATE
    }

    /// Serialize the whole catalog (interventions and templates) as JSON
    pub fn to_prompt_json(&self) -> Result<String> {
        let export = CatalogExport {
            interventions: self.interventions,
            student_plan_template: &STUDENT_PLAN_TEMPLATE,
            progress_monitoring_template: &PROGRESS_MONITORING_TEMPLATE,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Render a list of interventions as prompt text
    pub fn describe(interventions: &[&Intervention]) -> String {
        let mut out = String::new();
        for i in interventions {
            writeln!(
                out,
                "- {} (Tier {}; Grades {}; Best for: {}): {}",
                i.name,
                i.tier_label(),
                i.grades,
                i.best_for,
                i.description
            )
            .unwrap();
            if let Some(ref detail) = i.detail {
                writeln!(
                    out,
                    "  Frequency: {}. Duration: {}. Monitoring: {}.",
                    detail.frequency, detail.duration, detail.monitoring
                )
                .unwrap();
            }
        }
        out
    }

    /// Render the full catalog, grouped by tier, as prompt text
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::from("Intervention database:\n");
        for tier in Tier::ALL {
            let entries = self.by_tier(tier);
            writeln!(out, "\n{} - {}:", tier, tier.description()).unwrap();
            out.push_str(&Self::describe(&entries));
        }
        out.push_str("\nDomains:\n");
        for domain in Domain::ALL {
            let names: Vec<&str> = self.by_domain(domain).iter().map(|i| i.name).collect();
            writeln!(
                out,
                "- {} ({}): {}",
                domain,
                domain.description(),
                names.join(", ")
            )
            .unwrap();
        }
        out
    }

    /// Student plan template as prompt text
    pub fn student_plan_prompt_text(&self) -> String {
        let t = &STUDENT_PLAN_TEMPLATE;
        let mut out = String::from("Student intervention plan template:\n");
        for (field, placeholder) in t.student_info {
            writeln!(out, "- {}: {}", field, placeholder).unwrap();
        }
        writeln!(out, "- Area of Concern: {}", t.area_of_concern).unwrap();
        writeln!(out, "- Tier: {}", t.tier).unwrap();
        writeln!(out, "- Baseline Data: {}", t.baseline_data).unwrap();
        writeln!(out, "- Goal: {}", t.goal).unwrap();
        out.push_str("- Interventions:\n");
        for (field, placeholder) in t.intervention_fields {
            writeln!(out, "  - {}: {}", field, placeholder).unwrap();
        }
        out.push_str("- Progress Monitoring:\n");
        for (field, placeholder) in t.progress_monitoring {
            writeln!(out, "  - {}: {}", field, placeholder).unwrap();
        }
        out
    }

    /// Progress monitoring template as prompt text
    pub fn progress_monitoring_prompt_text(&self) -> String {
        let t = &PROGRESS_MONITORING_TEMPLATE;
        let mut out = String::from("Progress monitoring template:\nIndividual data points:\n");
        for (field, placeholder) in t.individual_data_points {
            writeln!(out, "- {}: {}", field, placeholder).unwrap();
        }
        out.push_str("System-level metrics:\n");
        for metric in t.system_metrics {
            writeln!(out, "- {}", metric).unwrap();
        }
        writeln!(out, "Recommended frequency: {}", t.recommended_frequency).unwrap();
        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

use Domain::{Academic, Attendance, Behavior, LifeSkills};
use Tier::{Intensive, Targeted, Universal};

const PK_12: GradeRange = GradeRange::new(Grade::PRE_K, Grade(12));
const K_12: GradeRange = GradeRange::new(Grade::K, Grade(12));

static INTERVENTIONS: [Intervention; 15] = [
    Intervention {
        name: "2X10 RELATIONSHIP BUILDING",
        description: "Spend two minutes for 10 consecutive school days developing a positive relationship with a student. Provide positive attention through encouragement and recognition of the student's strengths and interests.",
        tiers: &[Targeted],
        grades: PK_12,
        domains: &[Behavior, LifeSkills],
        best_for: "Behavior, Life Skills",
        detail: None,
    },
    Intervention {
        name: "4 AT THE DOOR + 1 MORE",
        description: "Greet students intentionally at the door using protocols such as \"Eye to Eye\" and \"Name to Name.\"",
        tiers: &[Universal, Targeted],
        grades: PK_12,
        domains: &[LifeSkills],
        best_for: "Life Skills",
        detail: None,
    },
    Intervention {
        name: "BEAR BELLY BREATHING",
        description: "A simple activity for children to help introduce them to mindful breathing. This mindful breathing exercise calms the mind, relaxes the body, and increases student engagement.",
        tiers: &[Universal, Targeted],
        grades: GradeRange::new(Grade::PRE_K, Grade(5)),
        domains: &[LifeSkills],
        best_for: "Life Skills",
        detail: None,
    },
    Intervention {
        name: "BEHAVIOR-SPECIFIC PRAISE",
        description: "Behavior-specific praise is a type of praise that acknowledges students' appropriate behavior and provides them with the specifics on what appropriate behavior they are engaging in. When teachers provide immediate, frequent, and specific praise, students are able to identify what behaviors are positive and then they are more likely to engage in those behaviors in the future.",
        tiers: &[Universal],
        grades: PK_12,
        domains: &[Behavior],
        best_for: "Behavior",
        detail: None,
    },
    Intervention {
        name: "CHECK IN/CHECK OUT (CICO)",
        description: "At the beginning of each day, meet with the student to review the goals you've set together. Confirm the specific goal for that day and offer an incentive for the student to reach the goal. Observe the student and provide feedback throughout the day. Then, at the end of the day, talk about whether they were able to meet the goal. Provide recognition and the reward if they did, and provide encouragement and feedback if they did not.",
        tiers: &[Targeted, Intensive],
        grades: K_12,
        domains: &[Behavior],
        best_for: "Behavior",
        detail: Some(ImplementationDetail {
            steps: &[
                "Agree on two or three daily behavior goals with the student",
                "Morning check-in to review goals and hand out the point card",
                "Teachers rate each goal at the end of every class period",
                "Afternoon check-out to total points and give feedback",
            ],
            materials: &["Daily point card", "Incentive menu"],
            tips: &["Keep check-ins under five minutes", "Send the point card home daily"],
            duration: "5 minutes per check-in",
            frequency: "Daily",
            monitoring: "Percentage of daily points earned",
        }),
    },
    Intervention {
        name: "GRAPHIC ORGANIZER",
        description: "Graphic organizers are designed to visually represent thinking and to visually connect key ideas. Graphic organizers can serve many purposes for students, from helping them take notes in class, to recording different perspectives during a group discussion, to pre-writing, problem-solving, pre-reading, or synthesizing their thinking at the end of a lesson.",
        tiers: &[Universal, Targeted, Intensive],
        grades: GradeRange::new(Grade(3), Grade(12)),
        domains: &[Academic],
        best_for: "ELA, Math, Other Academics",
        detail: None,
    },
    Intervention {
        name: "HOME VISIT",
        description: "Arrange a home visit with the goal of building a relationship with the child's family. Seek to understand the family's hopes and aspirations for their child, and ask the family how you can best support them and their child.",
        tiers: &[Universal, Targeted, Intensive],
        grades: PK_12,
        domains: &[Attendance, Behavior, LifeSkills, Academic],
        best_for: "Attendance, Behavior, Life Skills, ELA, Math",
        detail: None,
    },
    Intervention {
        name: "LUNCH BUNCH",
        description: "Bring together a group of students to meet with the school counselor or social worker during lunchtime with a specific goal in mind. For example, a lunch bunch may be focused on developing a specific Life skill or on teaching conflict resolution skills.",
        tiers: &[Targeted],
        grades: K_12,
        domains: &[Behavior, LifeSkills],
        best_for: "Behavior, Life Skills",
        detail: None,
    },
    Intervention {
        name: "NUDGE LETTER",
        description: "Send a letter home to the student's family or caregiver with information about their child's absences. Communicate the importance of attendance, include the child's attendance data, and compare the child's records with other students' attendance.",
        tiers: &[Targeted, Intensive],
        grades: PK_12,
        domains: &[Attendance],
        best_for: "Attendance",
        detail: None,
    },
    Intervention {
        name: "PEER TUTORING",
        description: "Peer Tutoring allows students to become teachers. A student follows teacher-created materials as they explain a concept to a classmate. Roles reverse between students halfway through the activity so all students act as tutors at some point during the activity.",
        tiers: &[Targeted],
        grades: GradeRange::new(Grade(4), Grade(12)),
        domains: &[Academic],
        best_for: "Academics",
        detail: None,
    },
    Intervention {
        name: "ROSE, BUD, THORN",
        description: "In this reflective exercise, students identify positive moments and areas where they need support.",
        tiers: &[Universal, Targeted],
        grades: K_12,
        domains: &[LifeSkills],
        best_for: "Life Skills",
        detail: None,
    },
    Intervention {
        name: "SELF-MONITORING",
        description: "Self-monitoring strategies are individualized plans used to increase independence and awareness in academic, behavioral, and social areas. The student measures and records his or her own behavior and then compares that to behavior recorded by the teacher or an academic exemplar.",
        tiers: &[Universal, Targeted, Intensive],
        grades: K_12,
        domains: &[Behavior, LifeSkills],
        best_for: "Behavior, Life Skills",
        detail: Some(ImplementationDetail {
            steps: &[
                "Define the target behavior in observable terms",
                "Teach the student to record the behavior at set intervals",
                "Compare student and teacher ratings weekly",
            ],
            materials: &["Self-monitoring checklist", "Interval timer"],
            tips: &["Fade teacher matching as accuracy improves"],
            duration: "Embedded in class time",
            frequency: "Daily",
            monitoring: "Agreement between student and teacher ratings",
        }),
    },
    Intervention {
        name: "SIGHT WORD PRACTICE",
        description: "Sight words are words that should be memorized to increase a student's reading accuracy and rate. Provide additional instruction, drills, and exercises to promote students' ability to recognize common sight words.",
        tiers: &[Universal, Targeted, Intensive],
        grades: GradeRange::new(Grade::K, Grade(5)),
        domains: &[Academic],
        best_for: "ELA",
        detail: Some(ImplementationDetail {
            steps: &[
                "Assess which high-frequency words the student already knows",
                "Drill a small set of unknown words with flash cards",
                "Add mastered words to a review deck",
            ],
            materials: &["Sight word list", "Flash cards"],
            tips: &["Mix known and unknown words to keep success high"],
            duration: "10 minutes",
            frequency: "3-5 times per week",
            monitoring: "Words read correctly per minute",
        }),
    },
    Intervention {
        name: "TWO WORD CHECK-IN",
        description: "Ask students to choose two words to describe how they are feeling. This is a simple yet powerful exercise that enhances emotional awareness, promotes authenticity, and builds community.",
        tiers: &[Universal, Targeted],
        grades: K_12,
        domains: &[LifeSkills],
        best_for: "Life Skills",
        detail: None,
    },
    Intervention {
        name: "WOOP",
        description: "WOOP stands for Wish, Outcome, Obstacle, and Plan. WOOP helps you to explore what your wish is as well as the barriers that hold you back from fulfilling this desire.",
        tiers: &[Universal, Targeted],
        grades: K_12,
        domains: &[LifeSkills],
        best_for: "Life Skills",
        detail: None,
    },
];

static STUDENT_PLAN_TEMPLATE: StudentPlanTemplate = StudentPlanTemplate {
    student_info: &[
        ("Name", "[Student Name]"),
        ("Grade", "[Grade Level]"),
        ("Teacher", "[Teacher Name]"),
        ("Start Date", "[Start Date]"),
        ("End Date", "[End Date]"),
    ],
    area_of_concern: "[Academic/Behavioral/Attendance/Life Skills]",
    tier: "[Tier 2/Tier 3]",
    baseline_data: "[Describe current performance/behavior]",
    goal: "[Specific, Measurable, Achievable, Relevant, Time-bound goal]",
    intervention_fields: &[
        ("Name", "[Intervention Name]"),
        ("Description", "[Brief description]"),
        ("Frequency", "[Daily/Weekly/etc.]"),
        ("Duration", "[Length of each session]"),
        ("Responsible", "[Staff member responsible]"),
    ],
    progress_monitoring: &[
        ("Method", "[Assessment/Observation/Data Collection Method]"),
        ("Frequency", "[Daily/Weekly/Bi-weekly/Monthly]"),
        ("Next Review Date", "[Date for team to review progress]"),
    ],
};

static PROGRESS_MONITORING_TEMPLATE: ProgressMonitoringTemplate = ProgressMonitoringTemplate {
    individual_data_points: &[
        ("Date", "[Date]"),
        ("Intervention", "[Yes/No]"),
        ("Score", "[Score/Rating]"),
        ("On Track", "[Yes/No/Progressing]"),
        ("Notes", "[Observations and additional information]"),
    ],
    system_metrics: &[
        "Percentage of students in each tier",
        "Intervention enrollment by demographics",
        "Percentage of intervention plans on track",
        "Number of students exiting interventions",
        "Percentage of students meeting goals",
        "Most frequently used interventions",
        "Most successful interventions",
    ],
    recommended_frequency: "Review system-level data monthly with MTSS team",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_size() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 15);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = Catalog::standard();
        let woop = catalog.find("woop").unwrap();
        assert_eq!(woop.name, "WOOP");
        assert!(catalog.find("Nonexistent").is_none());
    }

    #[test]
    fn test_by_tier() {
        let catalog = Catalog::standard();
        let tier3: Vec<&str> = catalog.by_tier(Tier::Intensive).iter().map(|i| i.name).collect();
        assert!(tier3.contains(&"CHECK IN/CHECK OUT (CICO)"));
        assert!(tier3.contains(&"NUDGE LETTER"));
        assert!(!tier3.contains(&"WOOP"));
    }

    #[test]
    fn test_by_domain() {
        let catalog = Catalog::standard();
        let attendance: Vec<&str> = catalog
            .by_domain(Domain::Attendance)
            .iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(attendance, vec!["HOME VISIT", "NUDGE LETTER"]);
    }

    #[test]
    fn test_filter_by_grade() {
        let catalog = Catalog::standard();
        let prek_academic = catalog.filter(CatalogQuery {
            domain: Some(Domain::Academic),
            grade: Some(Grade::PRE_K),
            ..Default::default()
        });
        let names: Vec<&str> = prek_academic.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["HOME VISIT"]);
    }

    #[test]
    fn test_grade_range_parse_and_display() {
        let range = GradeRange::parse("PK-12").unwrap();
        assert_eq!(range, PK_12);
        assert_eq!(range.to_string(), "PK-12");
        assert_eq!(GradeRange::parse("3-12").unwrap().low, Grade(3));
        assert!(GradeRange::parse("13-14").is_none());
        assert!(range.contains(Grade::K));
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!(Domain::parse("Life Skills"), Some(Domain::LifeSkills));
        assert_eq!(Domain::parse("ELA"), Some(Domain::Academic));
        assert_eq!(Domain::parse("cooking"), None);
    }

    #[test]
    fn test_prompt_text_lists_every_intervention() {
        let catalog = Catalog::standard();
        let text = catalog.to_prompt_text();
        for intervention in catalog.all() {
            assert!(text.contains(intervention.name), "missing {}", intervention.name);
        }
        assert!(text.contains("Tier 1 - Universal supports"));
    }

    #[test]
    fn test_prompt_json_serializes_tiers_as_numbers() {
        let json = Catalog::standard().to_prompt_json().unwrap();
        assert!(json.contains("\"tiers\": [\n        2\n      ]"));
        assert!(json.contains("\"grades\": \"PK-12\""));
        assert!(json.contains("student_plan_template"));
    }
}
