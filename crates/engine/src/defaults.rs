//! Built-in seed data used for absent collections on load and by
//! `ResetToDefaults`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{
    Coa, CoaCategory, ComplexityLevel, ComplexityTable, Cost, CostCenter, Holiday,
    HolidayCategory, Money, Phase, RoleType, Task, TeamMember,
};

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn complexity() -> ComplexityTable {
    [
        ("Low", ComplexityLevel::new(2, 16.0)),
        ("Medium", ComplexityLevel::new(5, 40.0)),
        ("High", ComplexityLevel::new(10, 80.0)),
        ("Very High", ComplexityLevel::new(15, 120.0)),
    ]
    .into_iter()
    .map(|(key, level)| (key.to_string(), level))
    .collect()
}

const PHASES: &[(&str, &str, bool, &[(&str, &str, &str)])] = &[
    (
        "phase-analysis",
        "Analysis",
        false,
        &[
            ("task-requirements", "Requirement Gathering", "Medium"),
            ("task-process", "Business Process Design", "Medium"),
        ],
    ),
    (
        "phase-design",
        "Design",
        false,
        &[
            ("task-uiux", "UI/UX Design", "Medium"),
            ("task-architecture", "System Architecture", "High"),
        ],
    ),
    (
        "phase-development",
        "Development",
        false,
        &[
            ("task-backend", "Backend Development", "High"),
            ("task-frontend", "Frontend Development", "High"),
            ("task-integration", "Integration", "Medium"),
        ],
    ),
    (
        "phase-testing",
        "Testing",
        false,
        &[
            ("task-system-test", "System Testing", "Medium"),
            ("task-uat", "User Acceptance Testing", "Low"),
        ],
    ),
    (
        "phase-deployment",
        "Deployment",
        true,
        &[
            ("task-go-live", "Go Live", "Low"),
            ("task-hypercare", "Hypercare", "Medium"),
        ],
    ),
];

pub fn phases() -> Vec<Phase> {
    PHASES
        .iter()
        .zip(1..)
        .map(|((id, name, is_terminal, tasks), order)| Phase {
            id: (*id).to_string(),
            name: (*name).to_string(),
            order,
            task_ids: tasks.iter().map(|(task_id, ..)| (*task_id).to_string()).collect(),
            is_terminal: *is_terminal,
        })
        .collect()
}

pub fn tasks() -> Vec<Task> {
    PHASES
        .iter()
        .flat_map(|(phase_id, _, _, tasks)| {
            tasks.iter().map(move |(id, name, complexity)| Task {
                id: (*id).to_string(),
                phase_id: (*phase_id).to_string(),
                name: (*name).to_string(),
                complexity: (*complexity).to_string(),
            })
        })
        .collect()
}

/// Monthly rates in major units per role: (junior, senior).
const RATES: &[(RoleType, i64, i64)] = &[
    (RoleType::Ba, 12_000_000, 20_000_000),
    (RoleType::Pm, 18_000_000, 30_000_000),
    (RoleType::Fullstack, 15_000_000, 25_000_000),
    (RoleType::Backend, 14_000_000, 24_000_000),
    (RoleType::Frontend, 13_000_000, 22_000_000),
    (RoleType::Qa, 10_000_000, 16_000_000),
    (RoleType::Devops, 15_000_000, 26_000_000),
    (RoleType::Uiux, 12_000_000, 20_000_000),
];

pub fn costs() -> Vec<Cost> {
    RATES
        .iter()
        .flat_map(|(role, junior, senior)| {
            let slug = role.as_str().to_lowercase();
            [
                Cost {
                    id: format!("cost-{slug}-1"),
                    role: *role,
                    tier_level: 1,
                    resource_name: format!("Junior {}", role.as_str()),
                    rate: Money::from_major(*junior),
                },
                Cost {
                    id: format!("cost-{slug}-2"),
                    role: *role,
                    tier_level: 2,
                    resource_name: format!("Senior {}", role.as_str()),
                    rate: Money::from_major(*senior),
                },
            ]
        })
        .collect()
}

pub fn team_members() -> Vec<TeamMember> {
    let seed = [
        ("member-1", "Andi Pratama", RoleType::Pm, "cost-pm-2", "cc-ops"),
        ("member-2", "Siti Rahma", RoleType::Ba, "cost-ba-1", "cc-ops"),
        ("member-3", "Budi Santoso", RoleType::Backend, "cost-backend-2", "cc-eng"),
        ("member-4", "Dewi Lestari", RoleType::Frontend, "cost-frontend-1", "cc-eng"),
        ("member-5", "Rizky Hidayat", RoleType::Qa, "cost-qa-1", "cc-eng"),
    ];
    seed.into_iter()
        .map(|(id, name, role, tier, center)| TeamMember {
            cost_tier_id: Some(tier.to_string()),
            cost_center_id: Some(center.to_string()),
            default_coa_id: Some("coa-salaries".to_string()),
            ..TeamMember::new(id, name, role)
        })
        .collect()
}

pub fn cost_centers() -> Vec<CostCenter> {
    let at = seeded_at();
    let center = |id: &str, code: &str, name: &str, manager: &str, monthly: i64| CostCenter {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        manager: manager.to_string(),
        monthly_budget: Some(Money::from_major(monthly)),
        yearly_budget: Some(Money::from_major(monthly * 12)),
        budget_period: None,
        parent_cost_center_id: None,
        is_active: true,
        actual_monthly_cost: Money::ZERO,
        actual_yearly_cost: Money::ZERO,
        created_at: at,
        updated_at: at,
    };
    vec![
        center("cc-eng", "ENG", "Engineering", "Jane Doe", 500_000_000),
        center("cc-ops", "OPS", "Operations", "John Smith", 200_000_000),
    ]
}

pub fn coa() -> Vec<Coa> {
    let at = seeded_at();
    [
        ("coa-salaries", "6100", "Salaries and Wages", CoaCategory::Expense),
        ("coa-contractors", "6200", "Contractor Fees", CoaCategory::Expense),
        ("coa-revenue", "4100", "Project Revenue", CoaCategory::Revenue),
        ("coa-receivable", "1200", "Accounts Receivable", CoaCategory::Asset),
        ("coa-payable", "2100", "Accounts Payable", CoaCategory::Liability),
    ]
    .into_iter()
    .map(|(id, code, name, category)| Coa {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        category,
        created_at: at,
        updated_at: at,
    })
    .collect()
}

/// Fallback calendar until the holiday feed delivers.
pub fn holidays() -> Vec<Holiday> {
    [
        ("2026-01-01", "New Year's Day", HolidayCategory::National),
        ("2026-08-17", "Independence Day", HolidayCategory::National),
        ("2026-12-24", "Christmas Eve", HolidayCategory::MassLeave),
        ("2026-12-25", "Christmas Day", HolidayCategory::National),
    ]
    .into_iter()
    .filter_map(|(date, name, category)| {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(Holiday::new(format!("holiday-{date}"), date, name, category))
    })
    .collect()
}
