//! Client and project dashboard counts

use std::collections::HashMap;

use uuid::Uuid;

use crate::model::Client;
use crate::model::ClientStatus;
use crate::model::Project;
use crate::model::ProjectStatus;
use crate::model::types::Money;

/// Number of projects per client id.
pub fn project_counts(projects: &[Project]) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    for project in projects {
        *counts.entry(project.client_id).or_insert(0) += 1;
    }
    counts
}

/// Counts shown above the client list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// Total matching clients across all pages.
    pub total: usize,
    /// Active clients on the loaded page.
    pub active: usize,
    pub total_projects: usize,
}

impl ClientStats {
    pub fn compute(total: usize, loaded: &[Client], project_counts: &HashMap<Uuid, usize>) -> Self {
        Self {
            total,
            active: loaded.iter().filter(|c| c.status == ClientStatus::Active).count(),
            total_projects: project_counts.values().sum(),
        }
    }
}

/// Counts shown above the project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Budget of the loaded page.
    pub total_budget: Money,
}

impl ProjectStats {
    pub fn compute(total: usize, loaded: &[Project]) -> Self {
        let count = |status: ProjectStatus| loaded.iter().filter(|p| p.status == status).count();
        Self {
            total,
            active: count(ProjectStatus::Active),
            completed: count(ProjectStatus::Completed),
            total_budget: loaded.iter().map(|p| p.budget.unwrap_or_default()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(client_id: Uuid, status: ProjectStatus, budget: Option<i64>) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "P".into(),
            description: None,
            client_id,
            start_date: None,
            end_date: None,
            status,
            budget: budget.map(Money::from_int),
            created_at: None,
        }
    }

    #[test]
    fn test_project_counts_and_stats() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let projects = vec![
            project(a, ProjectStatus::Active, Some(1000)),
            project(a, ProjectStatus::Completed, None),
            project(b, ProjectStatus::OnHold, Some(500)),
        ];
        let counts = project_counts(&projects);
        assert_eq!(counts[&a], 2);
        assert_eq!(counts[&b], 1);

        let stats = ProjectStats::compute(10, &projects);
        assert_eq!((stats.total, stats.active, stats.completed), (10, 1, 1));
        assert_eq!(stats.total_budget, Money::from_int(1500));

        let clients = ClientStats::compute(7, &[], &counts);
        assert_eq!(clients.total_projects, 3);
        assert_eq!(clients.active, 0);
    }
}
