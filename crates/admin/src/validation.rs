//! Category form validation.
//!
//! [`CategoryInput`] is the raw JSON body of the category endpoints. It is
//! checked field by field so a rejected form reports every problem at once.

use serde::Deserialize;
use url::Url;

use piko_pearl_core::catalog::Category;
use piko_pearl_core::{Slug, ValidationErrors, slugify};

const NAME_MAX: usize = 100;
const SLUG_MAX: usize = Slug::MAX_LENGTH;
const MAIN_HEADING_MAX: usize = 120;
const META_TITLE_MAX: usize = 60;
const META_DESCRIPTION_MAX: usize = 160;

/// Category form as submitted by an admin client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub main_heading: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub content: Option<String>,
    pub keywords: Option<String>,
}

impl CategoryInput {
    /// Validate the form and build a [`Category`].
    ///
    /// Text fields are trimmed and blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its messages.
    pub fn into_category(self) -> Result<Category, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim().to_string();
        errors.required("name", "Name", &name, NAME_MAX);

        let slug = self.slug.trim().to_string();
        errors.required("slug", "Slug", &slug, SLUG_MAX);
        let parsed_slug = if errors.field("slug").is_empty() {
            Slug::parse(&slug)
                .inspect_err(|_| {
                    errors.add(
                        "slug",
                        format!(
                            "Slug may only contain lowercase letters, digits and single hyphens (try \"{}\")",
                            slugify(&slug)
                        ),
                    );
                })
                .ok()
        } else {
            None
        };

        let image = non_blank(self.image);
        if let Some(image) = &image
            && !is_image_url(image)
        {
            errors.add("image", "Image must be a valid URL");
        }

        let main_heading = non_blank(self.main_heading);
        let meta_title = non_blank(self.meta_title);
        let meta_description = non_blank(self.meta_description);
        for (field, label, value, max) in [
            ("mainHeading", "Main heading", &main_heading, MAIN_HEADING_MAX),
            ("metaTitle", "Meta title", &meta_title, META_TITLE_MAX),
            (
                "metaDescription",
                "Meta description",
                &meta_description,
                META_DESCRIPTION_MAX,
            ),
        ] {
            if let Some(value) = value {
                errors.max_chars(field, label, value, max);
            }
        }

        errors.into_result()?;

        let slug = parsed_slug.ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("slug", "Slug is required");
            errors
        })?;

        Ok(Category {
            name,
            slug,
            image,
            main_heading,
            meta_title,
            meta_description,
            content: non_blank(self.content),
            keywords: non_blank(self.keywords),
        })
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.to_string(),
            image: category.image.clone(),
            main_heading: category.main_heading.clone(),
            meta_title: category.meta_title.clone(),
            meta_description: category.meta_description.clone(),
            content: category.content.clone(),
            keywords: category.keywords.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Absolute `http(s)` URL with a host.
fn is_image_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> CategoryInput {
        CategoryInput {
            name: "Hats".to_string(),
            slug: "crochet-hats".to_string(),
            image: Some("https://cdn.example.com/hats.jpg".to_string()),
            main_heading: Some("Crochet Hats".to_string()),
            meta_title: Some("Crochet Hats | Piko & Pearl".to_string()),
            meta_description: Some("Bucket hats and berets.".to_string()),
            content: None,
            keywords: Some("hats, crochet".to_string()),
        }
    }

    #[test]
    fn test_valid_input() {
        let category = valid().into_category().unwrap();
        assert_eq!(category.name, "Hats");
        assert_eq!(category.slug.as_str(), "crochet-hats");
        assert_eq!(category.main_heading.as_deref(), Some("Crochet Hats"));
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = CategoryInput::default().into_category().unwrap_err();
        assert_eq!(errors.field("name"), ["Name is required"]);
        assert_eq!(errors.field("slug"), ["Slug is required"]);
    }

    #[test]
    fn test_name_too_long() {
        let input = CategoryInput {
            name: "n".repeat(101),
            ..valid()
        };
        let errors = input.into_category().unwrap_err();
        assert_eq!(errors.field("name"), ["Name must be at most 100 characters"]);
    }

    #[test]
    fn test_non_canonical_slug() {
        let input = CategoryInput {
            slug: "Crochet Hats".to_string(),
            ..valid()
        };
        let errors = input.into_category().unwrap_err();
        assert_eq!(errors.field("slug").len(), 1);
        assert!(errors.field("slug")[0].contains("crochet-hats"));
    }

    #[test]
    fn test_image_urls() {
        assert!(is_image_url("https://cdn.example.com/a.jpg"));
        assert!(is_image_url("http://localhost:3001/a.jpg"));
        assert!(!is_image_url("/images/categories/bags.jpg"));
        assert!(!is_image_url("images/bags.jpg"));
        assert!(!is_image_url("//evil.example.com/a.jpg"));
        assert!(!is_image_url("javascript:alert(1)"));
        assert!(!is_image_url("not a url"));

        let input = CategoryInput {
            image: Some("ftp://files.example.com/a.jpg".to_string()),
            ..valid()
        };
        let errors = input.into_category().unwrap_err();
        assert_eq!(errors.field("image"), ["Image must be a valid URL"]);

        let relative = CategoryInput {
            image: Some("/images/categories/hats.jpg".to_string()),
            ..valid()
        };
        let errors = relative.into_category().unwrap_err();
        assert_eq!(errors.field("image"), ["Image must be a valid URL"]);
    }

    #[test]
    fn test_seo_field_limits() {
        let input = CategoryInput {
            main_heading: Some("h".repeat(121)),
            meta_title: Some("t".repeat(61)),
            meta_description: Some("d".repeat(161)),
            ..valid()
        };
        let errors = input.into_category().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, ["mainHeading", "metaDescription", "metaTitle"]);
    }

    #[test]
    fn test_limits_are_inclusive() {
        let input = CategoryInput {
            meta_title: Some("t".repeat(60)),
            meta_description: Some("d".repeat(160)),
            ..valid()
        };
        assert!(input.into_category().is_ok());
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let input = CategoryInput {
            image: Some("   ".to_string()),
            content: Some(String::new()),
            ..valid()
        };
        let category = input.into_category().unwrap();
        assert_eq!(category.image, None);
        assert_eq!(category.content, None);
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name":"Hats","slug":"hats","metaTitle":"Hats"}"#).unwrap();
        assert_eq!(input.meta_title.as_deref(), Some("Hats"));
        assert_eq!(input.image, None);
    }

    #[test]
    fn test_builtin_categories_pass() {
        for category in piko_pearl_core::catalog::categories() {
            let input = CategoryInput::from(category);
            assert_eq!(&input.into_category().unwrap(), category);
        }
    }
}
