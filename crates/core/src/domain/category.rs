//! Category names, routing slugs and the single lookup table joining them.
//!
//! Products carry a [`CategoryName`]; routes carry a [`CategorySlug`]. Every
//! name maps to exactly one slug (Bracelets shares the `bangles` route), so a
//! product category can never fall through to an unroutable value.

use serde::{Deserialize, Serialize};

/// Sentinel slug meaning "no category filter".
pub const ALL_SLUG: &str = "all";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryName {
    Rings,
    Necklaces,
    Bangles,
    Earrings,
    Bracelets,
}

impl CategoryName {
    pub const ALL: [CategoryName; 5] =
        [Self::Rings, Self::Necklaces, Self::Bangles, Self::Earrings, Self::Bracelets];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rings => "Rings",
            Self::Necklaces => "Necklaces",
            Self::Bangles => "Bangles",
            Self::Earrings => "Earrings",
            Self::Bracelets => "Bracelets",
        }
    }

    /// Route a product of this category links back to.
    pub fn slug(&self) -> CategorySlug {
        match self {
            Self::Rings => CategorySlug::Rings,
            Self::Necklaces => CategorySlug::Necklaces,
            Self::Bangles | Self::Bracelets => CategorySlug::Bangles,
            Self::Earrings => CategorySlug::Earrings,
        }
    }

    pub fn material(&self) -> &'static str {
        match self {
            Self::Rings | Self::Bangles | Self::Bracelets => "18K Gold, Diamonds",
            Self::Necklaces => "14K Gold, Pearls",
            Self::Earrings => "14K Gold, Gemstones",
        }
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryName {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| UnknownCategory(value.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySlug {
    Rings,
    Necklaces,
    Bangles,
    Earrings,
}

impl CategorySlug {
    /// Display order of the routable categories.
    pub const ALL: [CategorySlug; 4] = [Self::Rings, Self::Necklaces, Self::Bangles, Self::Earrings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rings => "rings",
            Self::Necklaces => "necklaces",
            Self::Bangles => "bangles",
            Self::Earrings => "earrings",
        }
    }

    /// Resolves a route segment. Older links spelled two routes `necklace`
    /// and `earings`; those still resolve but are never emitted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rings" => Some(Self::Rings),
            "necklaces" | "necklace" => Some(Self::Necklaces),
            "bangles" => Some(Self::Bangles),
            "earrings" | "earings" => Some(Self::Earrings),
            _ => None,
        }
    }

    /// Display name whose products are listed under this slug.
    pub fn category_name(&self) -> CategoryName {
        match self {
            Self::Rings => CategoryName::Rings,
            Self::Necklaces => CategoryName::Necklaces,
            Self::Bangles => CategoryName::Bangles,
            Self::Earrings => CategoryName::Earrings,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rings => {
                "Discover our stunning collection of rings, from elegant engagement rings to statement pieces."
            }
            Self::Necklaces => {
                "Explore our exquisite necklaces, crafted with the finest materials to elevate any outfit."
            }
            Self::Bangles => {
                "Browse our beautiful bangles and bracelets, perfect for adding a touch of elegance to your wrist."
            }
            Self::Earrings => {
                "Find the perfect pair of earrings, from subtle studs to dramatic drops for any occasion."
            }
        }
    }

    pub fn cover_image(&self) -> &'static str {
        match self {
            Self::Rings => "/images/rings/50E4SRFBC2137_1.webp",
            Self::Necklaces => "/images/necklace/50O4SS2AYDBA32_1.webp",
            Self::Bangles => "/images/bangles/512216VJR1B00_1.webp",
            Self::Earrings => "/images/earings/510730VZA2B00_1.jpg",
        }
    }
}

impl std::fmt::Display for CategorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category metadata as served by `/api/categories`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: CategoryName,
    pub slug: CategorySlug,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub count: usize,
}

impl Category {
    pub fn for_slug(slug: CategorySlug, count: usize) -> Self {
        Self {
            name: slug.category_name(),
            slug,
            description: slug.description().to_owned(),
            cover_image: slug.cover_image().to_owned(),
            count,
        }
    }
}

/// A raw slug from a route or query string, classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(CategorySlug),
    Unknown(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_SLUG {
            return Self::All;
        }
        match CategorySlug::parse(value) {
            Some(slug) => Self::Category(slug),
            None => Self::Unknown(value.to_owned()),
        }
    }
}
