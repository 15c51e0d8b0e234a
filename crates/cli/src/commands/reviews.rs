//! Review lookup.
//!
//! # Usage
//!
//! ```bash
//! pp-cli reviews flowers 1
//! ```

use std::fmt::Write;

use piko_pearl_core::catalog::{average_rating, product_reviews, review_count};

/// Rating summary followed by one line per review.
#[must_use]
pub fn run(category: &str, id: &str) -> String {
    let reviews = product_reviews(category, id);
    if reviews.is_empty() {
        return format!("No reviews for {category}-{id}");
    }

    let mut out = format!(
        "{:.1} average from {} reviews\n",
        average_rating(reviews),
        review_count(reviews)
    );
    for review in reviews {
        let _ = writeln!(
            out,
            "  {}/5  {} ({}): {}",
            review.rating.stars(),
            review.author,
            review.date,
            review.comment
        );
    }
    out
}
