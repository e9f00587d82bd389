//! Sample data seeding
//!
//! Creates a default admin, a handful of users, categories, seminars spread
//! around the current date and some applications. Every step checks what is
//! already present so running it twice changes nothing.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;
use crate::database::Store;
use crate::models::*;
use crate::utils::errors::Result;

/// Rows created by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub categories: usize,
    pub seminars: usize,
    pub applications: usize,
}

const USERS: &[(&str, &str, &str, Role)] = &[
    ("admin", "Administrator", "IT", Role::Admin),
    ("user", "Default User", "Engineering", Role::User),
    ("minho.kim", "Minho Kim", "Engineering", Role::User),
    ("jisoo.lee", "Jisoo Lee", "QA", Role::User),
    ("yunho.park", "Yunho Park", "Design", Role::User),
    ("soyeon.choi", "Soyeon Choi", "Planning", Role::User),
    ("jihyun.jung", "Jihyun Jung", "Marketing", Role::User),
];

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Backend", "server", "#3B82F6"),
    ("Frontend", "layout", "#10B981"),
    ("DevOps", "cloud", "#F59E0B"),
    ("Practices", "book", "#8B5CF6"),
];

/// (title, description, offset in hours from now, location, category index)
const SEMINARS: &[(&str, &str, i64, &str, usize)] = &[
    ("What's new in Spring Boot 3", "Major features and a migration guide.", 7 * 24, "Room A", 0),
    ("React 18 concurrent features", "Suspense and transitions in practice.", 10 * 24, "Room B", 1),
    ("Database tuning strategies", "Index design and query plans for PostgreSQL.", 14 * 24, "Main Hall", 0),
    ("Docker and Kubernetes in production", "Container rollout lessons learned.", 21 * 24, "Room A", 2),
    ("Clean code and refactoring", "Hands-on refactoring session.", 28 * 24, "Room C", 3),
    ("AI tooling for developers", "Building on hosted language model APIs.", 3, "Main Hall", 0),
    ("Advanced Git workflows", "Branching strategies that scale.", -3 * 24, "Room B", 3),
    ("REST API design principles", "Resource modelling and security concerns.", -7 * 24, "Room A", 0),
    ("Test-driven development", "Red, green, refactor on a real codebase.", -14 * 24, "Room C", 3),
];

fn username_email(username: &str) -> String {
    format!("{}@company.example", username)
}

/// Seed sample data relative to `now`
pub async fn seed_sample_data<S: Store>(store: &S, now: DateTime<Utc>) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let mut users = Vec::with_capacity(USERS.len());
    for (username, full_name, department, role) in USERS {
        let user = match store.find_user_by_username(username).await? {
            Some(existing) => existing,
            None => {
                report.users += 1;
                store
                    .create_user(User {
                        id: Uuid::new_v4(),
                        username: username.to_string(),
                        full_name: full_name.to_string(),
                        email: Some(username_email(username)),
                        department: Some(department.to_string()),
                        role: *role,
                        created_at: now,
                    })
                    .await?
            }
        };
        users.push(user);
    }
    let admin_id = users[0].id;

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for (order, (name, icon, color)) in CATEGORIES.iter().enumerate() {
        if store.category_name_exists(name).await? {
            let existing = store.list_categories(false).await?.into_iter().find(|c| c.name == *name);
            categories.push(existing.map(|c| c.id));
            continue;
        }

        let category = store
            .create_category(Category {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: None,
                icon_name: Some(icon.to_string()),
                color_code: Some(color.to_string()),
                display_order: order as i32,
                is_active: true,
                created_at: now,
            })
            .await?;
        report.categories += 1;
        categories.push(Some(category.id));
    }

    if store.count_seminars().await? == 0 {
        for (title, description, offset_hours, location, category) in SEMINARS {
            store
                .create_seminar(Seminar {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    date: now + Duration::hours(*offset_hours),
                    location: location.to_string(),
                    is_closed: false,
                    created_by: admin_id,
                    category_id: categories.get(*category).copied().flatten(),
                    created_at: now,
                })
                .await?;
            report.seminars += 1;
        }
    }

    // Only upcoming seminars take applications
    let upcoming: Vec<Seminar> = store
        .list_seminars(&SeminarFilter::default())
        .await?
        .into_iter()
        .filter(|s| s.date > now)
        .collect();

    for (i, seminar) in upcoming.iter().enumerate() {
        // users[1] applies everywhere, the others to a spread of seminars
        let applicants = users
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(u, _)| *u == 1 || (i + u) % 3 == 0);

        for (_, user) in applicants {
            if store.application_exists(user.id, seminar.id).await? {
                continue;
            }
            store
                .insert_application(Application {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    seminar_id: seminar.id,
                    applied_at: now,
                })
                .await?;
            report.applications += 1;
        }
    }

    info!(
        users = report.users,
        categories = report.categories,
        seminars = report.seminars,
        applications = report.applications,
        "Sample data seeded"
    );
    Ok(report)
}
