//! Built-in catalog data.
//!
//! Seeds the catalog API and backs review lookups. Review tables are keyed by
//! `"<category>-<productId>"`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{Price, ProductId, Rating, ReviewId, Slug};

use super::{Category, Product, Review};

const fn stars(n: u8) -> Rating {
    match Rating::new(n) {
        Ok(rating) => rating,
        Err(_) => panic!("fixture rating out of range"),
    }
}

/// Where product photos are served from.
const IMAGE_BASE: &str = "https://cdn.pikoandpearl.com/images";

const R3: Rating = stars(3);
const R4: Rating = stars(4);
const R5: Rating = stars(5);

/// (name, heading, image, meta description)
const CATEGORY_ROWS: &[(&str, &str, &str, &str)] = &[
    (
        "Flowers",
        "Handmade Crochet Flowers",
        "https://cdn.pikoandpearl.com/images/categories/flowers.jpg",
        "Everlasting crochet bouquets and single stems, made by hand.",
    ),
    (
        "Bags",
        "Handmade Crochet Bags",
        "https://cdn.pikoandpearl.com/images/categories/bags.jpg",
        "Totes, market bags and clutches crocheted from cotton yarn.",
    ),
    (
        "Keychains",
        "Crochet Keychains",
        "https://cdn.pikoandpearl.com/images/categories/keychains.jpg",
        "Tiny amigurumi keychains to clip on bags and keys.",
    ),
    (
        "Accessories",
        "Handmade Accessories",
        "https://cdn.pikoandpearl.com/images/categories/accessories.jpg",
        "Scrunchies, bucket hats and hair clips with a pearl finish.",
    ),
];

/// (category, id, name, price cents, original cents, badge, description)
type ProductRow = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    Option<u32>,
    Option<&'static str>,
    &'static str,
);

const PRODUCT_ROWS: &[ProductRow] = &[
    (
        "flowers",
        "1",
        "Rose Bouquet",
        3499,
        Some(3999),
        Some("Bestseller"),
        "Seven crochet roses wrapped in kraft paper. Never wilts.",
    ),
    (
        "flowers",
        "2",
        "Sunflower Stem",
        1299,
        None,
        None,
        "A single oversized sunflower on a wired stem.",
    ),
    (
        "flowers",
        "3",
        "Tulip Trio",
        2199,
        None,
        Some("New"),
        "Three tulips in pastel pink, lilac and cream.",
    ),
    (
        "flowers",
        "4",
        "Lavender Bundle",
        1899,
        None,
        None,
        "Five lavender sprigs tied with a satin ribbon.",
    ),
    (
        "bags",
        "1",
        "Pearl Market Tote",
        5800,
        Some(6500),
        Some("Sale"),
        "Roomy cotton tote with faux-pearl handles.",
    ),
    (
        "bags",
        "2",
        "Granny Square Shoulder Bag",
        4600,
        None,
        None,
        "Patchwork of granny squares in sunset colours.",
    ),
    (
        "bags",
        "3",
        "Mini Heart Clutch",
        2900,
        None,
        Some("New"),
        "Heart-shaped clutch with a magnetic clasp.",
    ),
    (
        "keychains",
        "1",
        "Strawberry Keychain",
        899,
        None,
        Some("Bestseller"),
        "Amigurumi strawberry on a gold-tone ring.",
    ),
    (
        "keychains",
        "2",
        "Daisy Keychain",
        799,
        None,
        None,
        "White daisy with a yellow centre.",
    ),
    (
        "keychains",
        "3",
        "Tiny Whale Keychain",
        999,
        None,
        None,
        "A blue whale small enough for any keyring.",
    ),
    (
        "accessories",
        "1",
        "Pearl Scrunchie Set",
        1500,
        None,
        None,
        "Three scrunchies trimmed with faux pearls.",
    ),
    (
        "accessories",
        "2",
        "Bucket Hat",
        3800,
        Some(4200),
        Some("Sale"),
        "Breathable cotton bucket hat with a wide brim.",
    ),
];

/// (key, [(author, rating, date, comment)])
type ReviewRow = (&'static str, Rating, &'static str, &'static str);

const REVIEW_ROWS: &[(&str, &[ReviewRow])] = &[
    (
        "flowers-1",
        &[
            ("Amara K.", R5, "2 weeks ago", "Looks real from across the room. Gorgeous."),
            ("Jun P.", R5, "1 month ago", "Bought it for my mum, she cried."),
            ("Sofia R.", R4, "1 month ago", "Beautiful, wrapping was a little crumpled."),
            ("Liam O.", R5, "2 months ago", "Anniversary gift that will last forever."),
            ("Noor H.", R4, "3 months ago", "Lovely colours, slightly smaller than expected."),
        ],
    ),
    (
        "flowers-2",
        &[
            ("Hana M.", R5, "1 week ago", "Brightens up my desk every day."),
            ("Theo B.", R4, "3 weeks ago", "Stem is sturdy and bendable."),
            ("Priya S.", R5, "2 months ago", "Perfect little gift."),
        ],
    ),
    (
        "flowers-3",
        &[
            ("Elena V.", R5, "5 days ago", "The pastel shades are so soft."),
            ("Marcus D.", R4, "1 month ago", "Nice, would love more colour options."),
        ],
    ),
    (
        "bags-1",
        &[
            ("Chloe T.", R5, "1 week ago", "Fits my laptop and groceries."),
            ("Aisha N.", R5, "2 weeks ago", "The pearl handles get so many compliments."),
            ("Ravi G.", R4, "1 month ago", "Strong and well made."),
            ("Mia L.", R3, "2 months ago", "Stretches a bit when full."),
        ],
    ),
    (
        "bags-2",
        &[
            ("Olive W.", R5, "3 weeks ago", "Every square is perfect."),
            ("Kenji Y.", R4, "2 months ago", "Great colours, strap could be longer."),
        ],
    ),
    (
        "keychains-1",
        &[
            ("Zara F.", R5, "4 days ago", "So cute, bought three."),
            ("Ben A.", R5, "2 weeks ago", "Held up fine after months on my keys."),
            ("Lucy C.", R4, "1 month ago", "Smaller than I imagined but adorable."),
        ],
    ),
    (
        "accessories-2",
        &[
            ("Ines Q.", R4, "2 weeks ago", "Comfortable and keeps the sun off."),
            ("Sam E.", R5, "1 month ago", "My favourite summer hat."),
        ],
    ),
];

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    CATEGORY_ROWS
        .iter()
        .filter_map(|(name, heading, image, description)| {
            let slug = Slug::from_name(heading).ok()?;
            Some(Category {
                name: (*name).to_string(),
                slug,
                image: Some((*image).to_string()),
                main_heading: Some((*heading).to_string()),
                meta_title: Some(format!("{heading} | Piko & Pearl")),
                meta_description: Some((*description).to_string()),
                content: None,
                keywords: Some(format!("crochet, handmade, {}", name.to_lowercase())),
            })
        })
        .collect()
});

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    PRODUCT_ROWS
        .iter()
        .map(
            |(category, id, name, cents, original, badge, description)| Product {
                id: ProductId::new(*id),
                name: (*name).to_string(),
                price: Price::from_cents(*cents),
                original_price: original.map(Price::from_cents),
                image: format!("{IMAGE_BASE}/{category}/{}.jpg", crate::slugify(name)),
                category: (*category).to_string(),
                badge: badge.map(str::to_string),
                description: (*description).to_string(),
            },
        )
        .collect()
});

static REVIEWS: LazyLock<HashMap<String, Vec<Review>>> = LazyLock::new(|| {
    REVIEW_ROWS
        .iter()
        .map(|(key, rows)| {
            let reviews = rows
                .iter()
                .enumerate()
                .map(|(i, (author, rating, date, comment))| Review {
                    id: ReviewId::new((i + 1).to_string()),
                    author: (*author).to_string(),
                    rating: *rating,
                    date: (*date).to_string(),
                    comment: (*comment).to_string(),
                })
                .collect();
            ((*key).to_string(), reviews)
        })
        .collect()
});

/// Built-in categories, in display order.
#[must_use]
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Built-in products, grouped by category.
#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

pub(super) fn reviews() -> &'static HashMap<String, Vec<Review>> {
    &REVIEWS
}
