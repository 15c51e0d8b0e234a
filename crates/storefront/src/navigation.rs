//! Page-state navigation and URL slugs.
//!
//! The storefront front end tracks a single `current_page` string. Plain
//! names select a page; a value containing `/` is `categorySlug/productSlug`.
//! A bare slug that is not a page name selects that category, which means
//! page names are reserved and never used as category slugs.
//!
//! ```text
//! ""  | "home"                 -> Home
//! "cart"                      -> Cart
//! "bags"                      -> Category(bags)
//! "flowers/rose-bouquet"      -> Product { flowers, rose-bouquet }
//! "a/b/c" | "Not A Slug"      -> NotFound
//! ```

use std::fmt;

use piko_pearl_core::{Slug, slugify};

/// A storefront page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Shop,
    Category(Slug),
    Product { category: Slug, product: Slug },
    Cart,
    Checkout,
    Wishlist,
    Profile,
    Contact,
    About,
    Login,
    Signup,
    NotFound(String),
}

/// Names that always select a page rather than a category.
const NAMED_PAGES: &[(&str, Page)] = &[
    ("home", Page::Home),
    ("shop", Page::Shop),
    ("cart", Page::Cart),
    ("checkout", Page::Checkout),
    ("wishlist", Page::Wishlist),
    ("profile", Page::Profile),
    ("contact", Page::Contact),
    ("about", Page::About),
    ("login", Page::Login),
    ("signup", Page::Signup),
];

impl Page {
    /// Resolve a `current_page` value.
    #[must_use]
    pub fn parse(current_page: &str) -> Self {
        let value = current_page.trim().trim_matches('/');
        if value.is_empty() {
            return Self::Home;
        }

        if let Some((category, product)) = value.split_once('/') {
            return match (Slug::parse(category), Slug::parse(product)) {
                (Ok(category), Ok(product)) => Self::Product { category, product },
                _ => Self::NotFound(value.to_string()),
            };
        }

        if let Some((_, page)) = NAMED_PAGES.iter().find(|(name, _)| *name == value) {
            return page.clone();
        }

        Slug::parse(value).map_or_else(|_| Self::NotFound(value.to_string()), Self::Category)
    }

    /// The `current_page` value that selects this page.
    #[must_use]
    pub fn to_path(&self) -> String {
        match self {
            Self::Category(slug) => slug.to_string(),
            Self::Product { category, product } => format!("{category}/{product}"),
            Self::NotFound(path) => path.clone(),
            named => named.kind().to_string(),
        }
    }

    /// Short machine name for the page variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Shop => "shop",
            Self::Category(_) => "category",
            Self::Product { .. } => "product",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Wishlist => "wishlist",
            Self::Profile => "profile",
            Self::Contact => "contact",
            Self::About => "about",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::NotFound(_) => "not-found",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// URL slug for a product name.
#[must_use]
pub fn product_slug(name: &str) -> String {
    slugify(name)
}

/// URL slug for a category name.
#[must_use]
pub fn category_slug(name: &str) -> String {
    slugify(name)
}

/// URL slug for a category display name, using its full heading when the
/// category is known (`"Bags"` becomes `"handmade-crochet-bags"`).
#[must_use]
pub fn create_category_slug(display_name: &str) -> String {
    piko_pearl_core::catalog::create_category_slug(display_name)
}
