use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Technologies the candidate has mentioned, in first-seen order.
/// Only ever grows.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TechStack {
    items: IndexSet<String>,
}

impl TechStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds unseen technologies and returns how many were new.
    pub fn extend_from<I, S>(&mut self, techs: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.items.len();
        for tech in techs {
            self.items.insert(tech.into());
        }
        self.items.len() - before
    }

    pub fn contains(&self, tech: &str) -> bool {
        self.items.contains(tech)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn joined(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }
}

const LANGUAGES: &[&str] = &["python", "javascript", "java", "c++", "c#", "php", "ruby", "go", "rust"];
const FRAMEWORKS: &[&str] = &["react", "angular", "vue", "django", "flask", "spring", "express"];
const DATABASES: &[&str] = &["mysql", "postgresql", "mongodb", "redis"];
const CLOUD_PLATFORMS: &[&str] = &["aws", "azure", "gcp"];
const DEVOPS_TOOLS: &[&str] = &["docker", "kubernetes", "jenkins", "git"];

/// Groups a stack into display categories. Categories with no members are left out.
pub fn categorize_tech_stack(stack: &TechStack) -> IndexMap<&'static str, Vec<String>> {
    let mut categories: IndexMap<&'static str, Vec<String>> = [
        "Programming Languages",
        "Frameworks",
        "Databases",
        "Cloud Platforms",
        "DevOps Tools",
        "Other",
    ]
    .into_iter()
    .map(|name| (name, Vec::new()))
    .collect();

    for tech in stack.iter() {
        let category = if LANGUAGES.contains(&tech) {
            "Programming Languages"
        } else if FRAMEWORKS.contains(&tech) {
            "Frameworks"
        } else if DATABASES.contains(&tech) {
            "Databases"
        } else if CLOUD_PLATFORMS.contains(&tech) {
            "Cloud Platforms"
        } else if DEVOPS_TOOLS.contains(&tech) {
            "DevOps Tools"
        } else {
            "Other"
        };

        if let Some(members) = categories.get_mut(category) {
            members.push(tech.to_string());
        }
    }

    categories.retain(|_, members| !members.is_empty());
    categories
}
