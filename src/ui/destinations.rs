//! Built-in destination catalogue for the destinations pages.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub details: &'static str,
    /// Location query that finds this destination's activities
    pub search: &'static str,
}

pub const DESTINATIONS: &[Destination] = &[
    Destination {
        id: "bali",
        name: "Bali, Indonesia",
        summary: "Temples, rice terraces and surf beaches.",
        details: "Ubud is the cultural heart of the island, with temple tours and the Tegallalang rice terraces. Kuta and Seminyak on the south coast offer surfing lessons and cooking classes. The dry season runs from April to October.",
        search: "Bali",
    },
    Destination {
        id: "paris",
        name: "Paris, France",
        summary: "Museums, monuments and river cruises.",
        details: "See the Eiffel Tower and the Louvre, then take an evening cruise along the Seine. Spring and early autumn are the most pleasant months to visit.",
        search: "Paris",
    },
    Destination {
        id: "tokyo",
        name: "Tokyo, Japan",
        summary: "Neon crossings, fish markets and cherry blossoms.",
        details: "Walk Shibuya Crossing, sample sushi at the Tsukiji Outer Market and take a day trip to Mount Fuji. Cherry blossom season peaks in March and April.",
        search: "Tokyo",
    },
    Destination {
        id: "new-york",
        name: "New York, USA",
        summary: "Broadway, museums and Central Park.",
        details: "Catch a Broadway show, tour the Metropolitan Museum of Art and visit the Statue of Liberty. Central Park bike tours run from April to October.",
        search: "New York",
    },
    Destination {
        id: "singapore",
        name: "Singapore",
        summary: "Futuristic gardens and hawker food.",
        details: "Explore Gardens by the Bay, spend a day on Sentosa Island and eat your way through the hawker centres. Warm all year round.",
        search: "Singapore",
    },
    Destination {
        id: "london",
        name: "London, UK",
        summary: "Royal history along the Thames.",
        details: "Visit the Tower of London and the Crown Jewels, then see the city's landmarks from a Thames river cruise.",
        search: "London",
    },
];

pub fn find(id: &str) -> Option<&'static Destination> {
    DESTINATIONS.iter().find(|d| d.id == id)
}

/// Destinations whose name, summary or details contain `term`,
/// case-insensitively. A blank term keeps everything.
pub fn search(term: &str) -> Vec<&'static Destination> {
    let term = term.trim().to_lowercase();
    DESTINATIONS
        .iter()
        .filter(|d| {
            term.is_empty()
                || d.name.to_lowercase().contains(&term)
                || d.summary.to_lowercase().contains(&term)
                || d.details.to_lowercase().contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("tokyo").map(|d| d.name), Some("Tokyo, Japan"));
        assert!(find("atlantis").is_none());
    }

    #[test]
    fn test_search_matches_any_text_field() {
        assert_eq!(search("").len(), DESTINATIONS.len());

        let ids: Vec<&str> = search("SUSHI").iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["tokyo"]);

        let ids: Vec<&str> = search("cruise").iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["paris", "london"]);

        assert!(search("moon base").is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in DESTINATIONS.iter().enumerate() {
            assert!(DESTINATIONS[i + 1..].iter().all(|b| b.id != a.id));
        }
    }
}
