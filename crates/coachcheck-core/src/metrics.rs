use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    fn name(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

/// Space category by area per player. Boundaries are fixed coaching
/// heuristics, checked smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceCategory {
    VeryTight,
    Possession,
    GameLike,
    Transitions,
    Fitness,
}

impl SpaceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SpaceCategory::VeryTight => "very_tight",
            SpaceCategory::Possession => "possession",
            SpaceCategory::GameLike => "game_like",
            SpaceCategory::Transitions => "transitions",
            SpaceCategory::Fitness => "fitness",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SpaceCategory::VeryTight => {
                "Very Tight — suited for 1v1/close-quarters technique drills"
            }
            SpaceCategory::Possession => {
                "Possession — good for rondos, small-sided possession games"
            }
            SpaceCategory::GameLike => "Game-Like — realistic match spacing, SSGs",
            SpaceCategory::Transitions => {
                "Transitions — good for counter-attacks, transition exercises"
            }
            SpaceCategory::Fitness => {
                "Fitness/Open — large area, consider if players need more constraint"
            }
        }
    }
}

const CATEGORY_THRESHOLDS: &[(f64, SpaceCategory)] = &[
    (20.0, SpaceCategory::VeryTight),
    (50.0, SpaceCategory::Possession),
    (100.0, SpaceCategory::GameLike),
    (200.0, SpaceCategory::Transitions),
    (f64::INFINITY, SpaceCategory::Fitness),
];

fn categorize(area_per_player: f64) -> SpaceCategory {
    for (threshold, category) in CATEGORY_THRESHOLDS {
        if area_per_player < *threshold {
            return *category;
        }
    }
    SpaceCategory::Fitness
}

/// Geometry of one activity. Fields left out fall back to the session-wide
/// pitch dimensions and squad size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySpace {
    pub name: String,
    #[serde(default)]
    pub area_length: Option<f64>,
    #[serde(default)]
    pub area_width: Option<f64>,
    #[serde(default)]
    pub num_players: Option<u32>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub name: String,
    pub area_sqm: f64,
    pub area_per_player: f64,
    pub category: SpaceCategory,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvaluation {
    pub activities: Vec<ActivityMetrics>,
    pub overall_recommendations: Vec<String>,
    pub intensity_profile: Vec<String>,
}

const DEFAULT_DURATION_MINUTES: f64 = 10.0;

fn recommend(
    area_per_player: f64,
    duration_minutes: f64,
    category: SpaceCategory,
) -> Vec<String> {
    let mut recs = Vec::new();
    if area_per_player < 15.0 {
        recs.push(format!(
            "Very cramped ({area_per_player:.0}m²/player). Consider enlarging the area or reducing player count."
        ));
    }
    if area_per_player > 250.0 {
        recs.push(format!(
            "Very spacious ({area_per_player:.0}m²/player). Consider shrinking the area to increase engagement."
        ));
    }
    if duration_minutes > 20.0 && category == SpaceCategory::VeryTight {
        recs.push(
            "Long duration in a tight space may cause fatigue and reduce quality. Consider splitting into shorter bouts."
                .to_string(),
        );
    }
    recs
}

/// Evaluate a single activity's spacing. Player count is floored at one so
/// an empty roster cannot divide by zero.
pub fn evaluate_activity(
    name: &str,
    area_length: f64,
    area_width: f64,
    num_players: u32,
    duration_minutes: f64,
) -> ActivityMetrics {
    let area = area_length * area_width;
    let area_per_player = area / f64::from(num_players.max(1));
    let category = categorize(area_per_player);
    let recommendations = recommend(area_per_player, duration_minutes, category);
    ActivityMetrics {
        name: name.to_string(),
        area_sqm: area,
        area_per_player,
        category,
        recommendations,
    }
}

/// Evaluate a whole session's spatial and intensity profile.
pub fn evaluate_session(
    pitch_length: f64,
    pitch_width: f64,
    num_players: u32,
    activities: &[ActivitySpace],
) -> SessionEvaluation {
    let mut results = Vec::with_capacity(activities.len());
    let mut intensity_profile = Vec::with_capacity(activities.len());

    for activity in activities {
        let duration = activity.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        let metrics = evaluate_activity(
            &activity.name,
            activity.area_length.unwrap_or(pitch_length),
            activity.area_width.unwrap_or(pitch_width),
            activity.num_players.unwrap_or(num_players),
            duration,
        );
        intensity_profile.push(format!(
            "{}: {} intensity, {}min, {}",
            activity.name,
            activity.intensity.unwrap_or(Intensity::Medium).name(),
            duration,
            metrics.category.label(),
        ));
        results.push(metrics);
    }

    let mut overall = Vec::new();
    if !results.is_empty() && results.iter().all(|r| r.category == results[0].category) {
        overall.push(
            "All activities use similar spacing. Consider varying area sizes to challenge players differently."
                .to_string(),
        );
    }
    let stated: Vec<Intensity> = activities.iter().filter_map(|a| a.intensity).collect();
    if !stated.is_empty() && stated.iter().all(|i| *i == Intensity::High) {
        overall.push(
            "All activities are high intensity. Include recovery or technical activities to manage load."
                .to_string(),
        );
    }

    SessionEvaluation {
        activities: results,
        overall_recommendations: overall,
        intensity_profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_space() {
        let metrics = evaluate_activity("1v1", 10.0, 10.0, 8, 10.0);
        assert_eq!(metrics.area_per_player, 12.5);
        assert_eq!(metrics.category, SpaceCategory::VeryTight);
    }

    #[test]
    fn possession_space() {
        let metrics = evaluate_activity("Rondo", 20.0, 15.0, 8, 10.0);
        assert!(metrics.area_per_player >= 20.0 && metrics.area_per_player < 50.0);
        assert_eq!(metrics.category, SpaceCategory::Possession);
    }

    #[test]
    fn game_like_space() {
        let metrics = evaluate_activity("SSG", 40.0, 30.0, 16, 10.0);
        assert!(metrics.area_per_player >= 50.0 && metrics.area_per_player < 100.0);
        assert_eq!(metrics.category, SpaceCategory::GameLike);
    }

    #[test]
    fn cramped_recommendation() {
        let metrics = evaluate_activity("Tight", 5.0, 5.0, 10, 10.0);
        assert!(
            metrics
                .recommendations
                .iter()
                .any(|r| r.to_lowercase().contains("cramped") || r.to_lowercase().contains("enlarg"))
        );
    }

    #[test]
    fn fatigue_recommendation_in_tight_space() {
        let metrics = evaluate_activity("Grinder", 10.0, 10.0, 8, 25.0);
        assert!(metrics.recommendations.iter().any(|r| r.contains("fatigue")));
    }

    #[test]
    fn session_evaluation() {
        let activities = vec![
            ActivitySpace {
                name: "Warm-up Rondo".to_string(),
                area_length: Some(15.0),
                area_width: Some(15.0),
                num_players: Some(6),
                duration_minutes: None,
                intensity: Some(Intensity::Low),
            },
            ActivitySpace {
                name: "Passing Drill".to_string(),
                area_length: Some(30.0),
                area_width: Some(20.0),
                num_players: Some(12),
                duration_minutes: None,
                intensity: Some(Intensity::Medium),
            },
            ActivitySpace {
                name: "Match".to_string(),
                area_length: Some(60.0),
                area_width: Some(44.0),
                num_players: Some(16),
                duration_minutes: None,
                intensity: Some(Intensity::High),
            },
        ];
        let result = evaluate_session(105.0, 68.0, 16, &activities);
        assert_eq!(result.activities.len(), 3);
        assert_eq!(result.intensity_profile.len(), 3);
        assert_eq!(result.activities[0].category, SpaceCategory::Possession);
    }

    #[test]
    fn missing_intensity_data_is_not_flagged_as_high() {
        let activities = vec![
            ActivitySpace {
                name: "Rondo".to_string(),
                area_length: Some(15.0),
                area_width: Some(15.0),
                num_players: Some(6),
                duration_minutes: None,
                intensity: None,
            },
            ActivitySpace {
                name: "SSG".to_string(),
                area_length: Some(40.0),
                area_width: Some(30.0),
                num_players: Some(16),
                duration_minutes: None,
                intensity: None,
            },
        ];
        let result = evaluate_session(105.0, 68.0, 16, &activities);
        assert!(
            !result
                .overall_recommendations
                .iter()
                .any(|r| r.contains("high intensity"))
        );
    }

    #[test]
    fn uniform_high_intensity_flagged() {
        let activities = vec![ActivitySpace {
            name: "Sprints".to_string(),
            area_length: None,
            area_width: None,
            num_players: None,
            duration_minutes: None,
            intensity: Some(Intensity::High),
        }];
        let result = evaluate_session(105.0, 68.0, 16, &activities);
        assert!(
            result
                .overall_recommendations
                .iter()
                .any(|r| r.contains("high intensity"))
        );
    }
}
