// Askama template definitions

use askama::Template;

use super::destinations::Destination;
use crate::db::{Activity, SessionUser, MONTHS};

/// Activity prepared for display (months joined, price formatted)
pub struct ActivityView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub months: String,
    pub price: String,
}

impl From<Activity> for ActivityView {
    fn from(activity: Activity) -> Self {
        let months = activity.months_display();
        let price = activity.price_display();
        Self {
            id: activity.id,
            name: activity.name,
            description: activity.description,
            location: activity.location,
            category: activity.category,
            months,
            price,
        }
    }
}

pub fn activity_views(activities: Vec<Activity>) -> Vec<ActivityView> {
    activities.into_iter().map(ActivityView::from).collect()
}

// Month dropdown entry
pub struct MonthOption {
    pub name: &'static str,
    pub selected: bool,
}

pub fn month_options(selected: &str) -> Vec<MonthOption> {
    MONTHS
        .iter()
        .map(|&name| MonthOption {
            name,
            selected: name == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
}

#[derive(Template)]
#[template(path = "destinations.html")]
pub struct DestinationsTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub query: String,
    pub destinations: Vec<&'static Destination>,
}

#[derive(Template)]
#[template(path = "destination.html")]
pub struct DestinationTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub destination: &'static Destination,
}

// Activity search page
#[derive(Template)]
#[template(path = "activities.html")]
pub struct ActivitiesTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub activities: Vec<ActivityView>,
    pub location: String,
    pub month: String,
    pub months: Vec<MonthOption>,
    pub search_performed: bool,
    pub no_results: bool,
}

// Admin panel
#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub activities: Vec<ActivityView>,
    pub message: String,
    pub error: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub message: String,
    pub error: String,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub error: String,
}

// 404 and 500 pages
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub page: &'static str,
    pub user: Option<SessionUser>,
    pub message: String,
}
