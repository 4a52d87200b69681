//! Activity models and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::db::StoreError;

/// Month names in calendar order, as stored in `seasonal_months`.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Raw `activities` row. `seasonal_months` is a JSON array stored as TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub seasonal_months: String,
    pub price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub seasonal_months: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let seasonal_months: Vec<String> = serde_json::from_str(&row.seasonal_months)?;
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            location: row.location,
            category: row.category,
            seasonal_months,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Activity {
    /// Months joined for display, `N/A` when the set is empty.
    pub fn months_display(&self) -> String {
        if self.seasonal_months.is_empty() {
            "N/A".to_string()
        } else {
            self.seasonal_months.join(", ")
        }
    }

    pub fn price_display(&self) -> String {
        match self.price {
            Some(p) if p.fract() == 0.0 => format!("${:.0}", p),
            Some(p) => format!("${:.2}", p),
            None => "-".to_string(),
        }
    }

    /// Merge a partial update into this activity.
    /// Returns whether any field actually changed.
    pub fn apply(&mut self, patch: &ActivityPatch) -> bool {
        let mut changed = false;

        fn set<T: PartialEq>(field: &mut T, value: T, changed: &mut bool) {
            if *field != value {
                *field = value;
                *changed = true;
            }
        }

        if let Some(ref name) = patch.name {
            set(&mut self.name, name.trim().to_string(), &mut changed);
        }
        if let Some(ref description) = patch.description {
            set(&mut self.description, description.trim().to_string(), &mut changed);
        }
        if let Some(ref location) = patch.location {
            set(&mut self.location, location.trim().to_string(), &mut changed);
        }
        if let Some(ref category) = patch.category {
            set(&mut self.category, category.trim().to_string(), &mut changed);
        }
        if let Some(ref months) = patch.seasonal_months {
            set(&mut self.seasonal_months, months.normalize(), &mut changed);
        }
        if let Some(price) = patch.price {
            set(&mut self.price, price, &mut changed);
        }

        changed
    }
}

/// Seasonal months as submitted: a JSON array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeasonalMonths {
    List(Vec<String>),
    Csv(String),
}

impl SeasonalMonths {
    pub fn normalize(&self) -> Vec<String> {
        match self {
            SeasonalMonths::List(items) => normalize_months(items.iter().map(String::as_str)),
            SeasonalMonths::Csv(csv) => normalize_months(csv.split(',')),
        }
    }
}

/// Trim, drop empties and de-duplicate while keeping first-seen order.
pub fn normalize_months<'a, I>(months: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for month in months {
        let month = month.trim();
        if !month.is_empty() && !out.iter().any(|m| m == month) {
            out.push(month.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewActivity {
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub seasonal_months: Option<SeasonalMonths>,
    pub price: Option<f64>,
}

/// Partial update: `None` leaves the stored value untouched.
///
/// `price` distinguishes an absent key (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored price.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub seasonal_months: Option<SeasonalMonths>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
}

fn present<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temple_tour() -> Activity {
        Activity {
            id: "a1".to_string(),
            name: "Temple Tour".to_string(),
            description: String::new(),
            location: "Ubud, Bali".to_string(),
            category: "Cultural".to_string(),
            seasonal_months: vec!["January".to_string(), "February".to_string()],
            price: Some(50.0),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_csv_months_are_trimmed_and_deduplicated() {
        let months = SeasonalMonths::Csv(" March, April ,,March, May ".to_string());
        assert_eq!(months.normalize(), vec!["March", "April", "May"]);
    }

    #[test]
    fn test_list_months_normalize_the_same_way() {
        let months = SeasonalMonths::List(vec![
            "June ".to_string(),
            "".to_string(),
            "July".to_string(),
            "June".to_string(),
        ]);
        assert_eq!(months.normalize(), vec!["June", "July"]);
    }

    #[test]
    fn test_months_deserialize_from_string_or_array() {
        let new: NewActivity =
            serde_json::from_str(r#"{"name":"x","seasonal_months":"May, June"}"#).unwrap();
        assert_eq!(
            new.seasonal_months,
            Some(SeasonalMonths::Csv("May, June".to_string()))
        );

        let new: NewActivity =
            serde_json::from_str(r#"{"name":"x","seasonal_months":["May"]}"#).unwrap();
        assert_eq!(
            new.seasonal_months,
            Some(SeasonalMonths::List(vec!["May".to_string()]))
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let new: NewActivity = serde_json::from_str(r#"{"location":"Paris"}"#).unwrap();
        assert!(new.name.is_empty());
        assert_eq!(new.location, "Paris");
        assert!(new.seasonal_months.is_none());
        assert!(new.price.is_none());
    }

    #[test]
    fn test_months_display() {
        let mut activity = temple_tour();
        assert_eq!(activity.months_display(), "January, February");
        activity.seasonal_months.clear();
        assert_eq!(activity.months_display(), "N/A");
    }

    #[test]
    fn test_price_display() {
        let mut activity = temple_tour();
        assert_eq!(activity.price_display(), "$50");
        activity.price = Some(12.5);
        assert_eq!(activity.price_display(), "$12.50");
        activity.price = None;
        assert_eq!(activity.price_display(), "-");
    }

    #[test]
    fn test_apply_changes_only_supplied_fields() {
        let mut activity = temple_tour();
        let patch = ActivityPatch {
            price: Some(Some(65.0)),
            seasonal_months: Some(SeasonalMonths::Csv("March".to_string())),
            ..Default::default()
        };

        assert!(activity.apply(&patch));
        assert_eq!(activity.price, Some(65.0));
        assert_eq!(activity.seasonal_months, vec!["March"]);
        assert_eq!(activity.name, "Temple Tour");
        assert_eq!(activity.location, "Ubud, Bali");
    }

    #[test]
    fn test_apply_identical_values_reports_no_change() {
        let mut activity = temple_tour();
        let patch = ActivityPatch {
            name: Some("  Temple Tour ".to_string()),
            price: Some(Some(50.0)),
            ..Default::default()
        };
        assert!(!activity.apply(&patch));
        assert_eq!(activity, temple_tour());
    }

    #[test]
    fn test_patch_null_price_clears_and_absent_price_keeps() {
        let clear: ActivityPatch = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(clear.price, Some(None));
        let mut activity = temple_tour();
        assert!(activity.apply(&clear));
        assert_eq!(activity.price, None);

        let untouched: ActivityPatch = serde_json::from_str(r#"{"name": "Temple Tour"}"#).unwrap();
        assert_eq!(untouched.price, None);
        let mut activity = temple_tour();
        assert!(!activity.apply(&untouched));
        assert_eq!(activity.price, Some(50.0));
    }

    #[test]
    fn test_row_with_bad_months_json_is_a_data_error() {
        let row = ActivityRow {
            id: "a1".to_string(),
            name: "n".to_string(),
            description: String::new(),
            location: "l".to_string(),
            category: "c".to_string(),
            seasonal_months: "not json".to_string(),
            price: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert!(matches!(Activity::try_from(row), Err(StoreError::Data(_))));
    }
}
