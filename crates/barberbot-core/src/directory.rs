//! In-memory business directory.
//!
//! Order matters: siblings are searched and alternatives reported in
//! directory order.

use crate::business::{Business, Category, Platform};

/// Businesses known without any external record store.
pub fn builtin_businesses() -> Vec<Business> {
    vec![
        Business::new(
            "ef525423-dabf-4750-bf11-dc5182d68695",
            "Rico Studio",
            Category::Barbershop,
            Platform::Reservio,
            "env::RESERVIO_TOKEN_RICO_STUDIO",
        )
        .as_default()
        .with_rating(4.8)
        .with_website("https://www.ricostudio.cz")
        .with_instagram("https://www.instagram.com/ricostudio_prague"),
        Business::new(
            "d709a085-8c00-4bea-af6c-438e5741521a",
            "Holičství 21",
            Category::Barbershop,
            Platform::Reservio,
            "env::RESERVIO_TOKEN_HOLICSTVI_21",
        )
        .with_rating(5.0)
        .with_website("https://holicstvi21.cz")
        .with_instagram("https://www.instagram.com/holicstvi21"),
        Business::new(
            "fc376586-8906-4c0a-8cd3-be382a3c4a89",
            "Anatomic Fitness",
            Category::Physiotherapy,
            Platform::Reservio,
            "env::RESERVIO_TOKEN_ANATOMIC_FITNESS",
        )
        .as_default()
        .with_rating(4.7)
        .with_website("https://www.anatomicfitness.cz")
        .with_instagram("https://www.instagram.com/anatomicfitness"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    businesses: Vec<Business>,
}

impl Directory {
    pub fn new(businesses: Vec<Business>) -> Self {
        Self { businesses }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_businesses())
    }

    pub fn all(&self) -> &[Business] {
        &self.businesses
    }

    pub fn len(&self) -> usize {
        self.businesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }

    /// Looks a business up by id or (case-insensitive) name.
    pub fn find(&self, key: &str) -> Option<&Business> {
        self.businesses.iter().find(|b| b.matches_key(key))
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Business> {
        self.businesses.iter().filter(move |b| b.category == category)
    }

    /// Same-category businesses other than `business`, in directory order.
    pub fn siblings_of<'a>(&'a self, business: &'a Business) -> impl Iterator<Item = &'a Business> {
        self.businesses.iter().filter(move |b| b.is_sibling_of(business))
    }

    /// The flagged default of a category, else its first business.
    pub fn default_for(&self, category: Category) -> Option<&Business> {
        self.in_category(category)
            .find(|b| b.is_default)
            .or_else(|| self.in_category(category).next())
    }
}

impl From<Vec<Business>> for Directory {
    fn from(businesses: Vec<Business>) -> Self {
        Self::new(businesses)
    }
}
