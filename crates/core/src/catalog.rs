//! Fixed lookup tables for the synthesized itinerary. Order matters: the
//! synthesizer indexes these with modular offsets, so reordering an entry
//! changes which activity or venue lands on which day.

pub struct ThemeItem {
    pub activity: &'static str,
    pub description: &'static str,
    pub location: &'static str,
}

pub struct Theme {
    pub name: &'static str,
    pub items: [ThemeItem; 3],
}

pub struct MealVenues {
    pub breakfast: &'static str,
    pub lunch: &'static str,
    pub dinner: &'static str,
}

const fn item(
    activity: &'static str,
    description: &'static str,
    location: &'static str,
) -> ThemeItem {
    ThemeItem {
        activity,
        description,
        location,
    }
}

const fn venues(
    breakfast: &'static str,
    lunch: &'static str,
    dinner: &'static str,
) -> MealVenues {
    MealVenues {
        breakfast,
        lunch,
        dinner,
    }
}

pub static THEMES: [Theme; 6] = [
    Theme {
        name: "Culture",
        items: [
            item(
                "Museum & Gallery Visit",
                "Explore the rich history and art of the region.",
                "Historic District",
            ),
            item(
                "Traditional Workshop",
                "Participate in a local craft or art session.",
                "Artisan Quarter",
            ),
            item(
                "Temple/Cathedral Tour",
                "Visit iconic religious and architectural sites.",
                "Old Town",
            ),
        ],
    },
    Theme {
        name: "Nature",
        items: [
            item(
                "Park & Garden Stroll",
                "Enjoy the natural beauty and fresh air.",
                "City Parks",
            ),
            item(
                "Botanical Garden Visit",
                "Discover exotic plants and tranquil landscapes.",
                "Outer Suburbs",
            ),
            item(
                "Riverside/Coastal Walk",
                "Take a relaxing walk along the waterfront.",
                "Port Area",
            ),
        ],
    },
    Theme {
        name: "Food",
        items: [
            item(
                "Local Market Tour",
                "Taste authentic local flavors and shop for souvenirs.",
                "Central Market",
            ),
            item(
                "Street Food Crawl",
                "Experience the vibrant street food scene.",
                "Gourmet Street",
            ),
            item(
                "Cooking Masterclass",
                "Learn to prepare traditional local dishes.",
                "Culinary Institute",
            ),
        ],
    },
    Theme {
        name: "Landmark",
        items: [
            item(
                "Historic Site Visit",
                "Visit iconic monuments and architectural wonders.",
                "National Plaza",
            ),
            item(
                "Panoramic City View",
                "Get a bird's eye view of the entire city.",
                "Observation Tower",
            ),
            item(
                "Palace/Castle Tour",
                "Explore the former residence of royalty.",
                "High Ridge Area",
            ),
        ],
    },
    Theme {
        name: "Adventure",
        items: [
            item(
                "Local Neighborhood Hike",
                "Discover hidden streets and panoramic views.",
                "Northern Hills",
            ),
            item(
                "Cycling Tour",
                "Explore the city on two wheels.",
                "Bike Trails",
            ),
            item(
                "Nearby Village Day Trip",
                "Explore the outskirts for a rural experience.",
                "Country Side",
            ),
        ],
    },
    Theme {
        name: "Relaxation",
        items: [
            item(
                "Leisurely City Walk",
                "Soak in the local atmosphere at a steady pace.",
                "Pedestrian Zone",
            ),
            item(
                "Library/Bookshop Visit",
                "Browse local literature and quiet spaces.",
                "Literary Corner",
            ),
            item(
                "Spa & Wellness Session",
                "Unwind with traditional local treatments.",
                "Wellness Center",
            ),
        ],
    },
];

pub static MEAL_VENUES: [MealVenues; 8] = [
    venues("The Morning Nook", "Corner Bistro", "Starry Night Grill"),
    venues("Sunshine Cafe", "The Golden Plate", "Twilight Tavern"),
    venues("Baker's Street", "Street Side Eats", "Grand Harbor Dining"),
    venues("Garden Terrace", "Green Leaf Deli", "Oak & Iron Steakhouse"),
    venues("Mountain View Coffee", "Valley Kitchen", "Cliffside Lounge"),
    venues("Harbor Brews", "Oceanic Catch", "Coral Reef Dining"),
    venues("The Daily Grind", "Urban Sprout", "City Lights Bistro"),
    venues("Sunrise Bakery", "Local Harvest", "The Rustic Table"),
];

/// Lower-case fragments matched against either trip endpoint.
pub const ISLAND_DESTINATIONS: [&str; 3] = ["andaman", "nicobar", "lakshadweep"];

/// The island group with known sailing schedules and fares.
pub const KNOWN_ISLAND_GROUP: &str = "andaman";

pub const PACKING_TIPS: [&str; 4] = [
    "Pack comfortable walking shoes",
    "Bring weather-appropriate clothing",
    "Don't forget travel adapters",
    "Carry a reusable water bottle",
];

pub const LOCAL_TIPS: [&str; 4] = [
    "Learn a few local phrases",
    "Keep copies of important documents",
    "Stay hydrated and take breaks",
    "Respect local customs and traditions",
];
