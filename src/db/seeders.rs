//! Database seeders for the sample activity catalog
//!
//! The catalog covers a handful of destinations so the search pages have
//! something to show on a fresh install.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{activities, NewActivity, SeasonalMonths, MONTHS};

const SPRING_TO_AUTUMN: &[&str] = &["April", "May", "June", "July", "August", "September"];
const APRIL_TO_OCTOBER: &[&str] = &[
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
];
const MARCH_TO_OCTOBER: &[&str] = &[
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
];
const OUTSIDE_SUMMER: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "September",
    "October",
    "November",
    "December",
];

/// How to seed when the activities table already has rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Only seed an empty table
    #[default]
    IfEmpty,
    /// Insert the samples alongside existing rows (may duplicate)
    Add,
    /// Delete every activity first
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub existing: i64,
    pub deleted: u64,
    pub inserted: usize,
}

/// The built-in sample catalog.
pub fn sample_activities() -> Vec<NewActivity> {
    // Format: (name, description, location, category, months, price)
    let samples: Vec<(&str, &str, &str, &str, &[&str], f64)> = vec![
        // ==================== BALI ====================
        (
            "Temple Tour",
            "Visit ancient Balinese temples including Tanah Lot and Uluwatu. Experience traditional ceremonies and stunning architecture.",
            "Ubud, Bali",
            "Cultural",
            &MONTHS[..],
            50.0,
        ),
        (
            "Rice Terrace Trek",
            "Hike through the famous Tegallalang rice terraces. Learn about traditional Balinese irrigation systems.",
            "Ubud, Bali",
            "Adventure",
            SPRING_TO_AUTUMN,
            35.0,
        ),
        (
            "Surfing Lessons",
            "Learn to surf at Kuta Beach with professional instructors. Perfect for beginners and intermediate surfers.",
            "Kuta, Bali",
            "Water Sports",
            APRIL_TO_OCTOBER,
            60.0,
        ),
        (
            "Traditional Cooking Class",
            "Learn to cook authentic Balinese dishes. Visit local markets and prepare a full traditional meal.",
            "Seminyak, Bali",
            "Culinary",
            &MONTHS[..],
            45.0,
        ),
        // ==================== PARIS ====================
        (
            "Eiffel Tower Visit",
            "Visit the iconic Eiffel Tower with skip-the-line tickets. Enjoy panoramic views of Paris from the top.",
            "Paris, France",
            "Sightseeing",
            MARCH_TO_OCTOBER,
            75.0,
        ),
        (
            "Louvre Museum Tour",
            "Explore the world's largest art museum. See the Mona Lisa and other masterpieces with an expert guide.",
            "Paris, France",
            "Cultural",
            OUTSIDE_SUMMER,
            65.0,
        ),
        (
            "Seine River Cruise",
            "Romantic evening cruise along the Seine River. See Paris's illuminated monuments from the water.",
            "Paris, France",
            "Romance",
            SPRING_TO_AUTUMN,
            55.0,
        ),
        // ==================== TOKYO ====================
        (
            "Shibuya Crossing Experience",
            "Visit the world's busiest intersection. Explore Shibuya district with its trendy shops and cafes.",
            "Tokyo, Japan",
            "Urban",
            &MONTHS[..],
            25.0,
        ),
        (
            "Mount Fuji Day Trip",
            "Full-day tour to Mount Fuji. Visit the 5th station and enjoy stunning views of Japan's iconic mountain.",
            "Tokyo, Japan",
            "Nature",
            APRIL_TO_OCTOBER,
            120.0,
        ),
        (
            "Tsukiji Fish Market Tour",
            "Early morning visit to Tsukiji Outer Market. Sample fresh sushi and learn about Japanese seafood culture.",
            "Tokyo, Japan",
            "Culinary",
            OUTSIDE_SUMMER,
            40.0,
        ),
        (
            "Cherry Blossom Viewing",
            "Experience hanami in Tokyo's beautiful parks. See cherry blossoms in full bloom.",
            "Tokyo, Japan",
            "Nature",
            &["March", "April"][..],
            30.0,
        ),
        // ==================== NEW YORK ====================
        (
            "Broadway Show",
            "Watch a spectacular Broadway musical. Choose from the latest hit shows on the Great White Way.",
            "New York, USA",
            "Entertainment",
            OUTSIDE_SUMMER,
            150.0,
        ),
        (
            "Statue of Liberty Tour",
            "Visit the iconic Statue of Liberty and Ellis Island. Learn about American immigration history.",
            "New York, USA",
            "Sightseeing",
            APRIL_TO_OCTOBER,
            85.0,
        ),
        (
            "Central Park Bike Tour",
            "Explore Central Park on a guided bike tour. See famous landmarks and hidden gems.",
            "New York, USA",
            "Adventure",
            APRIL_TO_OCTOBER,
            55.0,
        ),
        (
            "Metropolitan Museum Tour",
            "Discover world-class art at the Met. Guided tour through 5,000 years of artistic achievement.",
            "New York, USA",
            "Cultural",
            OUTSIDE_SUMMER,
            70.0,
        ),
        // ==================== SINGAPORE ====================
        (
            "Sentosa Island Adventure",
            "Full day at Sentosa Island. Enjoy beaches, attractions, and adventure activities.",
            "Singapore",
            "Entertainment",
            &[
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
            ][..],
            90.0,
        ),
        (
            "Gardens by the Bay",
            "Explore the futuristic gardens with giant Supertrees. Visit the Cloud Forest and Flower Dome.",
            "Singapore",
            "Nature",
            &MONTHS[..],
            45.0,
        ),
        (
            "Hawker Center Food Tour",
            "Taste authentic Singaporean cuisine at famous hawker centers. Try local favorites with a guide.",
            "Singapore",
            "Culinary",
            &MONTHS[..],
            50.0,
        ),
        // ==================== LONDON ====================
        (
            "Tower of London Tour",
            "Visit the historic Tower of London. See the Crown Jewels and learn about royal history.",
            "London, UK",
            "Cultural",
            MARCH_TO_OCTOBER,
            80.0,
        ),
        (
            "Thames River Cruise",
            "Sightseeing cruise along the Thames River. See London's famous landmarks from the water.",
            "London, UK",
            "Sightseeing",
            SPRING_TO_AUTUMN,
            40.0,
        ),
    ];

    samples
        .into_iter()
        .map(|(name, description, location, category, months, price)| NewActivity {
            name: name.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            seasonal_months: Some(SeasonalMonths::List(
                months.iter().map(|m| m.to_string()).collect(),
            )),
            price: Some(price),
        })
        .collect()
}

/// Seed the sample catalog according to `mode`.
pub async fn seed_activities(pool: &SqlitePool, mode: SeedMode) -> Result<SeedReport> {
    let existing = activities::count(pool).await?;
    let mut report = SeedReport {
        existing,
        ..Default::default()
    };

    if existing > 0 {
        match mode {
            SeedMode::IfEmpty => {
                warn!(
                    "Activities table already contains {} rows, skipping seed (use add or replace)",
                    existing
                );
                return Ok(report);
            }
            SeedMode::Add => {}
            SeedMode::Replace => {
                report.deleted = activities::delete_all(pool).await?;
                info!("Deleted {} existing activities", report.deleted);
            }
        }
    }

    info!("Seeding sample activities...");
    for sample in sample_activities() {
        activities::create(pool, &sample).await?;
        report.inserted += 1;
    }

    info!("Seeded {} sample activities", report.inserted);
    Ok(report)
}
