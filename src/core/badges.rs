use crate::core::scoring::MAX_SCORE;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    None,
    Bronze,
    Silver,
    Gold,
}

impl BadgeTier {
    pub fn for_score(score: i64) -> Self {
        if score >= 80 {
            BadgeTier::Gold
        } else if score >= 50 {
            BadgeTier::Silver
        } else if score > 0 {
            BadgeTier::Bronze
        } else {
            BadgeTier::None
        }
    }

    /// The next tier up and the score needed to reach it.
    /// Gold has no successor; its target is the score ceiling.
    pub fn next(&self) -> (Option<BadgeTier>, i64) {
        match self {
            BadgeTier::None => (Some(BadgeTier::Bronze), 1),
            BadgeTier::Bronze => (Some(BadgeTier::Silver), 50),
            BadgeTier::Silver => (Some(BadgeTier::Gold), 80),
            BadgeTier::Gold => (None, MAX_SCORE),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BadgeTier::None => "none",
            BadgeTier::Bronze => "bronze",
            BadgeTier::Silver => "silver",
            BadgeTier::Gold => "gold",
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Observation,
    Consistency,
    Hygiene,
    Communication,
    Habitat,
    Safety,
    Ethics,
    Handling,
    Operational,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub category: BadgeCategory,
    pub competency_code: &'static str,
    pub description: &'static str,
}

pub const BADGE_DEFINITIONS: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "eagle",
        name: "Eagle Eye",
        symbol: "eye",
        category: BadgeCategory::Observation,
        competency_code: "Observe and record behaviour/health",
        description: "Precision in monitoring and reporting animal signals.",
    },
    BadgeDefinition {
        id: "tortoise",
        name: "Tortoise Steady",
        symbol: "shell",
        category: BadgeCategory::Consistency,
        competency_code: "Routine animal care and husbandry",
        description: "Consistency in essential daily care and checks.",
    },
    BadgeDefinition {
        id: "otter",
        name: "Otter Method",
        symbol: "shield-drop",
        category: BadgeCategory::Hygiene,
        competency_code: "Hygiene, cleaning, and biosecurity",
        description: "Methodical approach to cleaning and infection control.",
    },
    BadgeDefinition {
        id: "dolphin",
        name: "Dolphin Signal",
        symbol: "wave-dot",
        category: BadgeCategory::Communication,
        competency_code: "Communication and record keeping",
        description: "Clarity and accuracy in handover and documentation.",
    },
    BadgeDefinition {
        id: "wombat",
        name: "Wombat Builder",
        symbol: "bricks",
        category: BadgeCategory::Habitat,
        competency_code: "Habitat/enclosure maintenance",
        description: "Maintaining safe and secure environments.",
    },
    BadgeDefinition {
        id: "kangaroo",
        name: "Kangaroo Guard",
        symbol: "shield",
        category: BadgeCategory::Safety,
        competency_code: "Workplace health and safety (WHS)",
        description: "Proactive hazard management and safe movement.",
    },
    BadgeDefinition {
        id: "bee",
        name: "Bee Diligent",
        symbol: "hexagon",
        category: BadgeCategory::Consistency,
        competency_code: "Enrichment participation and evaluation",
        description: "Focus on animal mental and physical stimulation.",
    },
    BadgeDefinition {
        id: "swan",
        name: "Swan Ethical",
        symbol: "heart",
        category: BadgeCategory::Ethics,
        competency_code: "Animal welfare and ethical practice",
        description: "Commitment to humane care and welfare decisions.",
    },
    BadgeDefinition {
        id: "bear",
        name: "Bear Secure",
        symbol: "lock",
        category: BadgeCategory::Handling,
        competency_code: "Safe handling and restraint",
        description: "Safety and confidence in physical interactions.",
    },
    BadgeDefinition {
        id: "owl",
        name: "Owl Guard",
        symbol: "bell",
        category: BadgeCategory::Operational,
        competency_code: "Visitor/operational safety",
        description: "Awareness of public and operational boundaries.",
    },
];

pub fn badge_by_id(id: &str) -> Option<&'static BadgeDefinition> {
    BADGE_DEFINITIONS
        .iter()
        .find(|b| b.id.eq_ignore_ascii_case(id.trim()))
}

/// A badge with its tier for the current score of the linked competency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub badge: &'static BadgeDefinition,
    pub score: i64,
    pub tier: BadgeTier,
    pub next_tier: Option<BadgeTier>,
    pub next_target: i64,
}

pub fn badge_progress(badge: &'static BadgeDefinition, score: i64) -> BadgeProgress {
    let tier = BadgeTier::for_score(score);
    let (next_tier, next_target) = tier.next();
    BadgeProgress {
        badge,
        score,
        tier,
        next_tier,
        next_target,
    }
}

/// Tier every badge, looking up linked-competency scores through `score_of`.
pub fn all_badges<F>(mut score_of: F) -> Vec<BadgeProgress>
where
    F: FnMut(&str) -> i64,
{
    BADGE_DEFINITIONS
        .iter()
        .map(|b| badge_progress(b, score_of(b.competency_code)))
        .collect()
}
