//! Data model for catalog entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Catalog sections, serialized as their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Requirements & Analysis")]
    Requirements,
    #[serde(rename = "Customer Experience")]
    CustomerExperience,
    #[serde(rename = "Backlog Management")]
    Backlog,
    #[serde(rename = "Team Dynamics & Execution")]
    TeamDynamics,
    #[serde(rename = "Mapping & Visualization")]
    Mapping,
    #[serde(rename = "Documentation & Communication")]
    Documentation,
    #[serde(rename = "Prioritization")]
    Prioritization,
    #[serde(rename = "Role Clarity & Collaboration")]
    RoleClarity,
    #[serde(rename = "User Research & Personas")]
    UserResearch,
    #[serde(rename = "Discovery & Experimentation")]
    Discovery,
    #[serde(rename = "Agile Planning")]
    AgilePlanning,
    #[serde(rename = "PMI-PMP & Project Governance")]
    Governance,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Requirements,
        Category::CustomerExperience,
        Category::Backlog,
        Category::TeamDynamics,
        Category::Mapping,
        Category::Documentation,
        Category::Prioritization,
        Category::RoleClarity,
        Category::UserResearch,
        Category::Discovery,
        Category::AgilePlanning,
        Category::Governance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Requirements => "Requirements & Analysis",
            Category::CustomerExperience => "Customer Experience",
            Category::Backlog => "Backlog Management",
            Category::TeamDynamics => "Team Dynamics & Execution",
            Category::Mapping => "Mapping & Visualization",
            Category::Documentation => "Documentation & Communication",
            Category::Prioritization => "Prioritization",
            Category::RoleClarity => "Role Clarity & Collaboration",
            Category::UserResearch => "User Research & Personas",
            Category::Discovery => "Discovery & Experimentation",
            Category::AgilePlanning => "Agile Planning",
            Category::Governance => "PMI-PMP & Project Governance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Preset bindings shipped with a prompt, applied by merging over whatever
/// the user already filled in.
pub type SampleBindings = HashMap<String, String>;

/// One templated catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub focus: String,
    pub description: String,
    pub template: String,
    #[serde(default)]
    pub samples: Vec<SampleBindings>,
}

impl Prompt {
    /// Variable names the template expects, in first occurrence order.
    pub fn placeholders(&self) -> Vec<String> {
        crate::template::extract_placeholders(&self.template)
    }

    /// Render the template against `bindings`; unbound names stay literal.
    pub fn render(&self, bindings: &SampleBindings) -> String {
        crate::template::render(&self.template, bindings)
    }
}
