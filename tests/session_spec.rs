use chrono::{Duration, NaiveDate, NaiveDateTime};
use compliance_calendar::calendar::{format_relative, CalendarSession, NoticeLevel};
use compliance_calendar::db::Database;
use compliance_calendar::models::*;
use speculate2::speculate;

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-03-10 12:00", "%Y-%m-%d %H:%M").expect("valid timestamp")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn input(title: &str, due: &str, priority: Priority, regulation: Regulation) -> CreateTaskInput {
    CreateTaskInput {
        title: title.to_string(),
        description: String::new(),
        due_date: date(due),
        priority,
        regulation,
        tags: Vec::new(),
    }
}

fn persisted(db: &Database) -> PersistedState {
    let raw = db
        .get_item(STORAGE_KEY)
        .expect("Storage read failed")
        .expect("Nothing persisted");
    serde_json::from_str(&raw).expect("Persisted state is not valid JSON")
}

fn ids(tasks: &[&ComplianceTask]) -> Vec<u32> {
    tasks.iter().map(|t| t.id).collect()
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "load" {
        it "seeds the six sample tasks when nothing is stored" {
            let session = CalendarSession::open(db.clone(), now());
            assert_eq!(session.tasks().len(), 6);
            assert_eq!(session.theme(), Theme::Light);
            assert_eq!(session.current_date(), now());
        }

        it "falls back to the samples when the stored blob is invalid JSON" {
            db.set_item(STORAGE_KEY, "{not json").expect("Failed to write");
            let session = CalendarSession::open(db.clone(), now());
            assert_eq!(session.tasks().len(), 6);
            assert_eq!(session.tasks()[0].title, "GDPR Data Protection Impact Assessment");
        }

        it "keeps the samples when tasks are missing but restores the theme" {
            db.set_item(STORAGE_KEY, r#"{"theme":"dark","extra":42}"#).expect("Failed to write");
            let session = CalendarSession::open(db.clone(), now());
            assert_eq!(session.tasks().len(), 6);
            assert_eq!(session.theme(), Theme::Dark);
        }

        it "restores the month cursor" {
            db.set_item(
                STORAGE_KEY,
                r#"{"tasks":[],"currentDate":"2023-11-05T08:00:00.000"}"#,
            ).expect("Failed to write");
            let session = CalendarSession::open(db.clone(), now());
            assert!(session.tasks().is_empty());
            assert_eq!(session.current_date().date(), date("2023-11-05"));
        }

        it "treats an unknown theme as light" {
            db.set_item(STORAGE_KEY, r#"{"tasks":[],"theme":"sepia"}"#).expect("Failed to write");
            let session = CalendarSession::open(db.clone(), now());
            assert_eq!(session.theme(), Theme::Light);
        }
    }

    describe "add_task" {
        it "assigns sequential ids starting from one on an empty store" {
            db.set_item(STORAGE_KEY, r#"{"tasks":[]}"#).expect("Failed to write");
            let mut session = CalendarSession::open(db.clone(), now());

            for (i, regulation) in Regulation::ALL.iter().enumerate() {
                let task = session
                    .add_task(input(&format!("Task {i}"), "2024-04-01", Priority::Low, *regulation))
                    .expect("Failed to add task");
                assert_eq!(task.id, i as u32 + 1);
            }
            let all: Vec<u32> = session.tasks().iter().map(|t| t.id).collect();
            assert_eq!(all, vec![1, 2, 3, 4, 5]);
        }

        it "continues numbering after the samples and persists" {
            let mut session = CalendarSession::open(db.clone(), now());
            let task = session
                .add_task(input("Vendor review", "2024-03-20", Priority::High, Regulation::Sox))
                .expect("Failed to add task");

            assert_eq!(task.id, 7);
            assert!(!task.completed);
            assert_eq!(task.due_date, date("2024-03-20").and_hms_opt(0, 0, 0).unwrap());

            let stored = persisted(&db).tasks.expect("tasks persisted");
            assert_eq!(stored.len(), 7);
            assert_eq!(stored[6].title, "Vendor review");
        }

        it "accepts an empty title" {
            let mut session = CalendarSession::open(db.clone(), now());
            let task = session
                .add_task(input("", "2024-03-20", Priority::Medium, Regulation::Iso))
                .expect("Failed to add task");
            assert_eq!(task.title, "");
        }

        it "preserves tag order and duplicates" {
            let mut session = CalendarSession::open(db.clone(), now());
            let form = CreateTaskInput::from_form(
                "Tagged", "", "2024-03-20", "low", "pci", "scan, audit, scan",
            ).expect("valid form");
            let task = session.add_task(form).expect("Failed to add task");
            assert_eq!(task.tags, vec!["scan", "audit", "scan"]);
        }
    }

    describe "toggle_completed" {
        it "restores the original state after two toggles and persists both times" {
            let mut session = CalendarSession::open(db.clone(), now());

            let first = session.toggle_completed(3).expect("toggle failed").expect("task 3 exists");
            assert!(first.completed);
            assert!(persisted(&db).tasks.unwrap()[2].completed);

            let second = session.toggle_completed(3).expect("toggle failed").expect("task 3 exists");
            assert!(!second.completed);
            assert!(!persisted(&db).tasks.unwrap()[2].completed);
        }

        it "ignores unknown ids without writing" {
            let mut session = CalendarSession::open(db.clone(), now());
            let result = session.toggle_completed(99).expect("toggle failed");
            assert!(result.is_none());
            assert_eq!(db.get_item(STORAGE_KEY).expect("read failed"), None);
        }
    }

    describe "projections" {
        it "shows ids 1 and 6 in the list view when filtering by gdpr" {
            let mut session = CalendarSession::open(db.clone(), now());
            session.set_regulation_filter(Some(Regulation::Gdpr));
            assert_eq!(ids(&session.list_view()), vec![1, 6]);
        }

        it "sorts the upcoming panel by due date and omits completed tasks" {
            let mut session = CalendarSession::open(db.clone(), now());
            session.toggle_completed(4).expect("toggle failed");

            let upcoming = session.upcoming();
            assert_eq!(ids(&upcoming), vec![1, 6, 2, 3, 5]);
            assert!(upcoming.iter().all(|t| !t.completed));
        }

        it "sizes the list view by the active filters regardless of completion" {
            let mut session = CalendarSession::open(db.clone(), now());
            session.toggle_completed(2).expect("toggle failed");
            session.set_priority_filter(Some(Priority::High));

            let expected = session
                .tasks()
                .iter()
                .filter(|t| t.priority == Priority::High)
                .count();
            assert_eq!(session.list_view().len(), expected);
            assert_eq!(expected, 2);
        }

        it "returns day tasks regardless of the active filters" {
            db.set_item(STORAGE_KEY, r#"{"tasks":[]}"#).expect("Failed to write");
            let mut session = CalendarSession::open(db.clone(), now());
            session
                .add_task(input("A", "2024-03-15", Priority::High, Regulation::Gdpr))
                .expect("Failed to add task");
            session
                .add_task(input("B", "2024-03-15", Priority::Low, Regulation::Sox))
                .expect("Failed to add task");
            session
                .add_task(input("C", "2024-03-16", Priority::Low, Regulation::Sox))
                .expect("Failed to add task");
            session.set_filter(TaskFilter {
                regulation: Some(Regulation::Hipaa),
                priority: Some(Priority::Medium),
            });

            assert_eq!(ids(&session.day_tasks(date("2024-03-15"))), vec![1, 2]);
            assert!(session.list_view().is_empty());
        }

        it "counts the sample stats" {
            let session = CalendarSession::open(db.clone(), now());
            let stats = session.stats(now());
            assert_eq!(stats.total, 6);
            assert_eq!(stats.completed, 0);
            assert_eq!(stats.pending, 6);
            assert_eq!(stats.overdue, 1);
            // +3, +5 and +7 days; +7 sits exactly on the window edge.
            assert_eq!(stats.due_this_week, 3);
        }

        it "warns about overdue tasks" {
            let session = CalendarSession::open(db.clone(), now());
            let notice = session.overdue_notice(now()).expect("one task is overdue");
            assert_eq!(notice.level, NoticeLevel::Warning);
            assert_eq!(notice.message, "You have 1 overdue tasks!");
        }

        it "has no overdue notice once the late task is done" {
            let mut session = CalendarSession::open(db.clone(), now());
            session.toggle_completed(4).expect("toggle failed");
            assert!(session.overdue_notice(now()).is_none());
        }
    }

    describe "month grid" {
        it "follows the month cursor" {
            let mut session = CalendarSession::open(db.clone(), now());
            let grid = session.month_grid(now().date()).expect("valid month");
            assert_eq!(grid.title, "March 2024");
            assert_eq!(grid.days[12].task_count, 1); // sample 1 at +3 days

            session.change_month(-3);
            let grid = session.month_grid(now().date()).expect("valid month");
            assert_eq!(grid.title, "December 2023");
            assert!(grid.days.iter().all(|d| !d.is_today));
        }

        it "persists the cursor with the next save" {
            let mut session = CalendarSession::open(db.clone(), now());
            session.change_month(2);
            session.save().expect("save failed");

            let reloaded = CalendarSession::open(db.clone(), now());
            assert_eq!(reloaded.current_date().date(), date("2024-05-10"));
        }
    }

    describe "theme" {
        it "persists across reloads" {
            let mut session = CalendarSession::open(db.clone(), now());
            assert_eq!(session.toggle_theme().expect("toggle failed"), Theme::Dark);

            let reloaded = CalendarSession::open(db.clone(), now());
            assert_eq!(reloaded.theme(), Theme::Dark);
            assert_eq!(persisted(&db).theme.as_deref(), Some("dark"));
        }
    }

    describe "failed saves" {
        before {
            let unmigrated = Database::open_memory().expect("Failed to create in-memory database");
            let mut session = CalendarSession::open(unmigrated, now());
        }

        it "does not keep a task whose save failed" {
            let first = session.add_task(input("Lost", "2024-04-01", Priority::Low, Regulation::Iso));
            let second = session.add_task(input("Lost", "2024-04-01", Priority::Low, Regulation::Iso));
            assert!(first.is_err() && second.is_err());
            assert_eq!(session.tasks().len(), 6);
        }

        it "leaves the completion flag unchanged" {
            assert!(session.toggle_completed(1).is_err());
            assert!(!session.task(1).expect("task 1").completed);
        }

        it "keeps the previous theme" {
            assert!(session.toggle_theme().is_err());
            assert_eq!(session.theme(), Theme::Light);
        }
    }

    describe "format_relative" {
        it "labels tomorrow and far dates" {
            assert_eq!(format_relative(now() + Duration::days(1), now()), "Tomorrow");
            assert_eq!(format_relative(now() + Duration::days(14), now()), "Mar 24");
        }
    }
}

#[test]
fn state_survives_reopening_the_storage_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("calendar.db");

    {
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to migrate");
        let mut session = CalendarSession::open(db, now());
        session
            .add_task(input("Persisted", "2024-06-30", Priority::High, Regulation::Hipaa))
            .expect("Failed to add task");
        session.toggle_completed(1).expect("toggle failed");
    }

    let db = Database::open(path).expect("Failed to reopen database");
    db.migrate().expect("Failed to migrate");
    let session = CalendarSession::open(db, now());
    assert_eq!(session.tasks().len(), 7);
    assert_eq!(session.tasks()[6].title, "Persisted");
    assert!(session.task(1).expect("task 1").completed);
}
