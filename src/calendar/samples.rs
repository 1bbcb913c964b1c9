use chrono::{Duration, NaiveDateTime};

use crate::models::{ComplianceTask, Priority, Regulation};

/// Seed tasks used when nothing has been persisted yet, dated relative to `now`.
pub fn sample_tasks(now: NaiveDateTime) -> Vec<ComplianceTask> {
    let seed = [
        (
            "GDPR Data Protection Impact Assessment",
            "Conduct DPIA for new customer data processing activities",
            3,
            Priority::High,
            Regulation::Gdpr,
            ["audit", "data-protection", "assessment"],
        ),
        (
            "HIPAA Security Rule Compliance Review",
            "Annual review of security measures for protected health information",
            7,
            Priority::High,
            Regulation::Hipaa,
            ["security", "review", "annual"],
        ),
        (
            "SOX Internal Control Testing",
            "Quarterly testing of financial reporting controls",
            10,
            Priority::Medium,
            Regulation::Sox,
            ["financial", "testing", "quarterly"],
        ),
        (
            "PCI DSS Security Scan",
            "Quarterly external vulnerability scan",
            -2,
            Priority::Medium,
            Regulation::Pci,
            ["security", "scan", "quarterly"],
        ),
        (
            "ISO 27001 Internal Audit",
            "Semi-annual internal audit of ISMS",
            14,
            Priority::Medium,
            Regulation::Iso,
            ["audit", "security", "isms"],
        ),
        (
            "Data Retention Policy Update",
            "Review and update data retention policies",
            5,
            Priority::Low,
            Regulation::Gdpr,
            ["policy", "update", "review"],
        ),
    ];

    seed.into_iter()
        .zip(1..)
        .map(
            |((title, description, days, priority, regulation, tags), id)| ComplianceTask {
                id,
                title: title.to_string(),
                description: description.to_string(),
                due_date: now + Duration::days(days),
                priority,
                regulation,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                completed: false,
            },
        )
        .collect()
}
