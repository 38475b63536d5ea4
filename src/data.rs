//! Demo project data.
//!
//! The dashboard widgets are views over project data that lives outside this
//! crate. This module supplies a fixed sample of construction projects so the
//! dashboard has something to show. Dates are relative to the `today` passed
//! in, which keeps rendering deterministic in tests.

use chrono::{Duration, NaiveDate};
use std::fmt;

/// Construction phase of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Permits and design
    Planning,
    /// Excavation and foundation
    Foundation,
    /// Structure
    Framing,
    /// Interior and exterior finishing
    Finishing,
    /// Handover
    Closeout,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Planning => "planning",
            Phase::Foundation => "foundation",
            Phase::Framing => "framing",
            Phase::Finishing => "finishing",
            Phase::Closeout => "closeout",
        };
        write!(f, "{}", s)
    }
}

/// A construction project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Identifier, e.g. `P-100`
    pub id: String,
    /// Display name
    pub name: String,
    /// Current phase
    pub phase: Phase,
    /// Completion percentage (0-100)
    pub progress: u8,
    /// Approved budget in whole currency units
    pub budget: u64,
    /// Spend to date in whole currency units
    pub spent: u64,
    /// Site the project is built on
    pub site: String,
    /// Project manager
    pub manager: String,
    /// Planned completion date
    pub due: NaiveDate,
}

impl Project {
    /// Spend as a percentage of budget.
    pub fn spent_percent(&self) -> u64 {
        if self.budget == 0 {
            return 0;
        }
        self.spent * 100 / self.budget
    }
}

/// A task on a project.
#[derive(Debug, Clone)]
pub struct Task {
    /// Owning project
    pub project_id: String,
    /// Short description
    pub title: String,
    /// Person responsible
    pub assignee: String,
    /// Due date
    pub due: NaiveDate,
    /// Whether the task is done
    pub completed: bool,
}

/// One entry of the team activity feed.
#[derive(Debug, Clone)]
pub struct Activity {
    /// Team member
    pub who: String,
    /// What they did
    pub action: String,
    /// Minutes since the activity
    pub minutes_ago: u32,
}

/// Current weather at a site.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Site name
    pub site: String,
    /// Short condition, e.g. "Light rain"
    pub condition: String,
    /// Temperature in °C
    pub temp_c: i16,
    /// Wind speed in km/h
    pub wind_kph: u16,
    /// Chance of precipitation (0-100)
    pub precipitation: u8,
}

/// The data set rendered by the dashboard.
#[derive(Debug, Clone)]
pub struct DemoData {
    /// Date the data is relative to
    pub today: NaiveDate,
    /// All projects
    pub projects: Vec<Project>,
    /// All tasks
    pub tasks: Vec<Task>,
    /// Activity feed, newest first
    pub activity: Vec<Activity>,
    /// Weather per site
    pub weather: Vec<WeatherReport>,
}

impl DemoData {
    /// Builds the sample data set relative to `today`.
    pub fn sample(today: NaiveDate) -> Self {
        let day = |offset: i64| today + Duration::days(offset);
        let projects = vec![
            Project {
                id: "P-100".to_string(),
                name: "Harbor View Offices".to_string(),
                phase: Phase::Framing,
                progress: 48,
                budget: 12_500_000,
                spent: 5_900_000,
                site: "Site A".to_string(),
                manager: "Dana Whitfield".to_string(),
                due: day(210),
            },
            Project {
                id: "P-200".to_string(),
                name: "Maple Street Residences".to_string(),
                phase: Phase::Foundation,
                progress: 17,
                budget: 4_200_000,
                spent: 910_000,
                site: "Site B".to_string(),
                manager: "Luis Ortega".to_string(),
                due: day(365),
            },
            Project {
                id: "P-300".to_string(),
                name: "Riverside Bridge Retrofit".to_string(),
                phase: Phase::Finishing,
                progress: 86,
                budget: 2_750_000,
                spent: 2_890_000,
                site: "Site C".to_string(),
                manager: "Priya Raman".to_string(),
                due: day(45),
            },
        ];

        let task = |project: &str, title: &str, assignee: &str, due: i64, completed: bool| Task {
            project_id: project.to_string(),
            title: title.to_string(),
            assignee: assignee.to_string(),
            due: day(due),
            completed,
        };
        let tasks = vec![
            task("P-100", "Pour level 4 slab", "Crew 2", 2, false),
            task("P-100", "Steel delivery inspection", "M. Chen", 5, false),
            task("P-100", "Crane permit renewal", "D. Whitfield", 11, false),
            task("P-100", "Level 3 formwork strip", "Crew 2", -3, true),
            task("P-200", "Footing rebar sign-off", "L. Ortega", 1, false),
            task("P-200", "Soil compaction test", "GeoLab", 8, false),
            task("P-200", "Site fencing", "Crew 5", -10, true),
            task("P-300", "Deck coating final coat", "Crew 1", 4, false),
            task("P-300", "Load test scheduling", "P. Raman", 20, false),
            task("P-300", "Lighting install", "Brightline", 35, false),
        ];

        let activity = vec![
            Activity {
                who: "M. Chen".to_string(),
                action: "uploaded steel mill certificates".to_string(),
                minutes_ago: 12,
            },
            Activity {
                who: "L. Ortega".to_string(),
                action: "approved RFI #214".to_string(),
                minutes_ago: 47,
            },
            Activity {
                who: "P. Raman".to_string(),
                action: "flagged budget overrun on P-300".to_string(),
                minutes_ago: 95,
            },
            Activity {
                who: "Crew 2".to_string(),
                action: "completed level 3 formwork strip".to_string(),
                minutes_ago: 180,
            },
            Activity {
                who: "D. Whitfield".to_string(),
                action: "scheduled owner walkthrough".to_string(),
                minutes_ago: 320,
            },
            Activity {
                who: "GeoLab".to_string(),
                action: "posted boring log B-7".to_string(),
                minutes_ago: 1440,
            },
        ];

        let weather = vec![
            WeatherReport {
                site: "Site A".to_string(),
                condition: "Partly cloudy".to_string(),
                temp_c: 18,
                wind_kph: 22,
                precipitation: 10,
            },
            WeatherReport {
                site: "Site B".to_string(),
                condition: "Light rain".to_string(),
                temp_c: 13,
                wind_kph: 15,
                precipitation: 70,
            },
            WeatherReport {
                site: "Site C".to_string(),
                condition: "Clear".to_string(),
                temp_c: 24,
                wind_kph: 8,
                precipitation: 0,
            },
        ];

        Self {
            today,
            projects,
            tasks,
            activity,
            weather,
        }
    }

    /// Looks up a project by id.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Looks up the weather report of a site.
    pub fn weather_for(&self, site: &str) -> Option<&WeatherReport> {
        self.weather.iter().find(|w| w.site == site)
    }

    /// Tasks sorted by due date, optionally including completed ones.
    pub fn tasks_by_due(&self, include_completed: bool) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| include_completed || !t.completed)
            .collect();
        tasks.sort_by_key(|t| t.due);
        tasks
    }

    /// Days from today until `date` (negative when overdue).
    pub fn days_until(&self, date: NaiveDate) -> i64 {
        (date - self.today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    #[test]
    fn test_sample_projects_are_addressable() {
        let data = DemoData::sample(today());
        assert!(data.project("P-100").is_some());
        assert!(data.project("P-999").is_none());
    }

    #[test]
    fn test_tasks_by_due_excludes_completed_by_default() {
        let data = DemoData::sample(today());
        let open = data.tasks_by_due(false);
        assert!(open.iter().all(|t| !t.completed));
        assert!(open.windows(2).all(|w| w[0].due <= w[1].due));
        assert!(data.tasks_by_due(true).len() > open.len());
    }

    #[test]
    fn test_days_until_is_relative_to_today() {
        let data = DemoData::sample(today());
        assert_eq!(data.days_until(today() + Duration::days(3)), 3);
        assert_eq!(data.days_until(today() - Duration::days(2)), -2);
    }

    #[test]
    fn test_spent_percent_handles_overrun_and_zero_budget() {
        let data = DemoData::sample(today());
        let bridge = data.project("P-300").expect("exists");
        assert!(bridge.spent_percent() > 100);

        let mut empty = bridge.clone();
        empty.budget = 0;
        assert_eq!(empty.spent_percent(), 0);
    }
}
