use serde::Deserialize;

const EMBEDDED_CONTENT: &str = include_str!("../content/portfolio.json");

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Portfolio {
    pub bio: Bio,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Bio {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub years: u32,
    #[serde(default)]
    pub tech: Vec<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tools,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: SkillCategory,
    #[serde(default)]
    pub level: Option<SkillLevel>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkillTab {
    #[default]
    All,
    Frontend,
    Backend,
    Tools,
}

impl SkillTab {
    pub const ALL: [SkillTab; 4] = [Self::All, Self::Frontend, Self::Backend, Self::Tools];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
            Self::Tools => "Tools",
        }
    }

    fn category(self) -> Option<SkillCategory> {
        match self {
            Self::All => None,
            Self::Frontend => Some(SkillCategory::Frontend),
            Self::Backend => Some(SkillCategory::Backend),
            Self::Tools => Some(SkillCategory::Tools),
        }
    }
}

impl Portfolio {
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(EMBEDDED_CONTENT)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn skills_for(&self, tab: SkillTab) -> Vec<&Skill> {
        match tab.category() {
            None => self.skills.iter().collect(),
            Some(category) => self
                .skills
                .iter()
                .filter(|skill| skill.category == category)
                .collect(),
        }
    }
}

impl Project {
    pub fn has_links(&self) -> bool {
        self.github.is_some() || self.demo.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_decodes() {
        let portfolio = Portfolio::embedded().expect("embedded content should decode");

        assert_eq!(portfolio.bio.name, "Limson");
        assert_eq!(portfolio.skills.len(), 10);
        assert!(!portfolio.projects.is_empty());
        assert!(portfolio.experience.iter().all(|item| !item.bullets.is_empty()));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let raw = r#"{
            "bio": { "name": "A", "title": "B", "tagline": "C", "years": 1 },
            "skills": [{ "name": "Rust", "category": "Backend" }],
            "projects": [{ "title": "P", "description": "D" }]
        }"#;

        let portfolio = Portfolio::from_json(raw).expect("minimal content should decode");
        let skill = &portfolio.skills[0];
        let project = &portfolio.projects[0];

        assert_eq!(skill.icon, None);
        assert_eq!(skill.level, None);
        assert_eq!(skill.description, None);
        assert_eq!(project.image, None);
        assert!(!project.has_links());
        assert!(portfolio.experience.is_empty());
        assert!(portfolio.bio.tech.is_empty());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let raw = r#"{
            "bio": { "name": "A", "title": "B", "tagline": "C", "years": 1 },
            "skills": [{ "name": "Rust", "category": "Systems" }]
        }"#;

        assert!(Portfolio::from_json(raw).is_err());
    }

    #[test]
    fn skill_tabs_filter_by_category() {
        let portfolio = Portfolio::embedded().expect("embedded content should decode");

        assert_eq!(portfolio.skills_for(SkillTab::All).len(), portfolio.skills.len());
        assert!(portfolio
            .skills_for(SkillTab::Tools)
            .iter()
            .all(|skill| skill.category == SkillCategory::Tools));

        let split: usize = [SkillTab::Frontend, SkillTab::Backend, SkillTab::Tools]
            .into_iter()
            .map(|tab| portfolio.skills_for(tab).len())
            .sum();
        assert_eq!(split, portfolio.skills.len());
    }
}
