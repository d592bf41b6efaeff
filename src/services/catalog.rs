use chrono::NaiveDate;
use rand::Rng;

use crate::models::{Category, Service};
use crate::services::availability::generate_availability;

struct Listing {
    id: &'static str,
    category: Category,
    title: &'static str,
    supplier: &'static str,
    location: &'static str,
    duration: &'static str,
    duration_days: u32,
    price: f64,
    original_price: Option<f64>,
    rating: f32,
    description: &'static str,
}

const LISTINGS: &[Listing] = &[
    Listing {
        id: "bear-hunt",
        category: Category::Hunting,
        title: "Brown bear hunt",
        supplier: "Taiga Outfitters",
        location: "Kamchatka",
        duration: "3 days",
        duration_days: 3,
        price: 500.0,
        original_price: Some(650.0),
        rating: 4.8,
        description: "Guided spring hunt with licensed rangers, lodging and transfers included.",
    },
    Listing {
        id: "duck-hunt-delta",
        category: Category::Hunting,
        title: "Waterfowl hunt in the delta",
        supplier: "Delta Hunting Club",
        location: "Astrakhan",
        duration: "1 day",
        duration_days: 1,
        price: 180.0,
        original_price: None,
        rating: 4.5,
        description: "Dawn blinds, decoys and a retriever team.",
    },
    Listing {
        id: "night-fishing-volga",
        category: Category::Fishing,
        title: "Night catfish fishing",
        supplier: "Volga Anglers",
        location: "Volgograd",
        duration: "8 hours",
        duration_days: 1,
        price: 120.0,
        original_price: Some(150.0),
        rating: 4.6,
        description: "Boat, tackle and bait provided. Catch and release.",
    },
    Listing {
        id: "salmon-river",
        category: Category::Fishing,
        title: "Salmon river expedition",
        supplier: "North Rivers",
        location: "Kola Peninsula",
        duration: "5 days",
        duration_days: 5,
        price: 1450.0,
        original_price: None,
        rating: 4.9,
        description: "Fly fishing camp on a private stretch of river.",
    },
    Listing {
        id: "lake-kayak",
        category: Category::Recreation,
        title: "Kayaking on the lake",
        supplier: "Blue Water",
        location: "Karelia",
        duration: "4 hours",
        duration_days: 1,
        price: 60.0,
        original_price: None,
        rating: 4.4,
        description: "Beginner friendly paddle with an instructor.",
    },
    Listing {
        id: "forest-banya",
        category: Category::Recreation,
        title: "Forest cabin and banya",
        supplier: "Pine Retreat",
        location: "Altai",
        duration: "2 days",
        duration_days: 2,
        price: 240.0,
        original_price: Some(280.0),
        rating: 4.7,
        description: "Wood-fired sauna, lake plunge and a cabin for up to six guests.",
    },
    Listing {
        id: "northern-lights-tour",
        category: Category::Tours,
        title: "Northern lights safari",
        supplier: "Arctic Trails",
        location: "Murmansk",
        duration: "6 hours",
        duration_days: 1,
        price: 95.0,
        original_price: None,
        rating: 4.6,
        description: "Chasing the aurora by snowmobile with hot tea stops.",
    },
    Listing {
        id: "baikal-ice-tour",
        category: Category::Tours,
        title: "Baikal ice trek",
        supplier: "Baikal Expeditions",
        location: "Irkutsk",
        duration: "4 days",
        duration_days: 4,
        price: 820.0,
        original_price: None,
        rating: 4.9,
        description: "Walking tour over clear ice with nights in village guesthouses.",
    },
];

/// Read-only list of services for the session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// The demo catalog with `days` of generated availability from `start`.
    pub fn demo<R: Rng + ?Sized>(start: NaiveDate, days: u32, rng: &mut R) -> Self {
        let services = LISTINGS
            .iter()
            .map(|l| Service {
                id: l.id.to_string(),
                category: l.category,
                title: l.title.to_string(),
                supplier: l.supplier.to_string(),
                location: l.location.to_string(),
                image: format!("/images/services/{}.jpg", l.id),
                description: l.description.to_string(),
                duration: l.duration.to_string(),
                duration_days: l.duration_days,
                price: l.price,
                original_price: l.original_price,
                rating: l.rating,
                availability: generate_availability(l.id, start, days, rng),
            })
            .collect();
        Self { services }
    }

    pub fn all(&self) -> &[Service] {
        &self.services
    }

    pub fn by_category(&self, category: Category) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}
