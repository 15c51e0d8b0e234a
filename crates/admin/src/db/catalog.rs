//! Category and product repository.
//!
//! Records are held in memory behind an `RwLock` and written through to JSON
//! documents on every change. A change is committed in memory only after its
//! document has been written.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use piko_pearl_core::catalog::{self, Category, Product};

use super::RepositoryError;

const CATEGORIES_FILE: &str = "categories.json";
const PRODUCTS_FILE: &str = "products.json";

#[derive(Debug, Clone)]
struct CatalogData {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl CatalogData {
    fn seed() -> Self {
        Self {
            categories: catalog::categories().to_vec(),
            products: catalog::products().to_vec(),
        }
    }
}

/// Repository for catalog records.
#[derive(Debug)]
pub struct CatalogRepository {
    dir: Option<PathBuf>,
    data: RwLock<CatalogData>,
}

impl CatalogRepository {
    /// Open the documents under `dir`, seeding any that are missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be read or
    /// written, or `RepositoryError::DataCorruption` if a document does not
    /// parse.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let seed = CatalogData::seed();
        let categories = load_or_seed(&dir.join(CATEGORIES_FILE), seed.categories).await?;
        let products = load_or_seed(&dir.join(PRODUCTS_FILE), seed.products).await?;

        tracing::info!(
            dir = %dir.display(),
            categories = categories.len(),
            products = products.len(),
            "Catalog loaded"
        );

        Ok(Self {
            dir: Some(dir),
            data: RwLock::new(CatalogData {
                categories,
                products,
            }),
        })
    }

    /// Read the documents under `dir` without creating or seeding anything.
    ///
    /// Missing documents fall back to the built-in catalog. Writes through
    /// the returned repository are kept in memory only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if a document exists but cannot be read,
    /// or `RepositoryError::DataCorruption` if it does not parse.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref();
        let seed = CatalogData::seed();
        let data = CatalogData {
            categories: read_or(&dir.join(CATEGORIES_FILE), seed.categories).await?,
            products: read_or(&dir.join(PRODUCTS_FILE), seed.products).await?,
        };

        Ok(Self {
            dir: None,
            data: RwLock::new(data),
        })
    }

    /// Repository seeded from the built-in catalog that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            data: RwLock::new(CatalogData::seed()),
        }
    }

    /// All categories in display order.
    pub async fn categories(&self) -> Vec<Category> {
        self.data.read().await.categories.clone()
    }

    /// All products.
    pub async fn products(&self) -> Vec<Product> {
        self.data.read().await.products.clone()
    }

    /// Category with the given slug.
    pub async fn category(&self, slug: &str) -> Option<Category> {
        self.data
            .read()
            .await
            .categories
            .iter()
            .find(|c| c.slug.as_str() == slug)
            .cloned()
    }

    /// Append a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or name is already
    /// used, or an I/O error if the document cannot be written.
    pub async fn create_category(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut data = self.data.write().await;

        if data.categories.iter().any(|c| c.slug == category.slug) {
            return Err(RepositoryError::Conflict(format!(
                "A category with slug '{}' already exists",
                category.slug
            )));
        }
        if data.categories.iter().any(|c| c.key() == category.key()) {
            return Err(RepositoryError::Conflict(format!(
                "A category named '{}' already exists",
                category.name
            )));
        }

        let mut categories = data.categories.clone();
        categories.push(category.clone());
        self.write(CATEGORIES_FILE, &categories).await?;
        data.categories = categories;

        tracing::info!(slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Replace the category stored under `slug`.
    ///
    /// Renaming a category moves its products to the new key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has `slug`,
    /// `RepositoryError::Conflict` if the new slug or name belongs to another
    /// category, or an I/O error if a document cannot be written.
    pub async fn update_category(
        &self,
        slug: &str,
        category: Category,
    ) -> Result<Category, RepositoryError> {
        let mut data = self.data.write().await;

        let index = data
            .categories
            .iter()
            .position(|c| c.slug.as_str() == slug)
            .ok_or_else(|| RepositoryError::NotFound(format!("Category '{slug}'")))?;

        let taken = data.categories.iter().enumerate().any(|(i, c)| {
            i != index && (c.slug == category.slug || c.key() == category.key())
        });
        if taken {
            return Err(RepositoryError::Conflict(format!(
                "Another category already uses slug '{}' or name '{}'",
                category.slug, category.name
            )));
        }

        let mut categories = data.categories.clone();
        let Some(slot) = categories.get_mut(index) else {
            return Err(RepositoryError::NotFound(format!("Category '{slug}'")));
        };
        let old_key = std::mem::replace(slot, category.clone()).key();
        let new_key = category.key();

        if old_key == new_key {
            self.write(CATEGORIES_FILE, &categories).await?;
            data.categories = categories;
        } else {
            let mut products = data.products.clone();
            let mut moved = 0_usize;
            for product in products.iter_mut().filter(|p| p.category == old_key) {
                product.category.clone_from(&new_key);
                moved += 1;
            }

            self.write(CATEGORIES_FILE, &categories).await?;
            if let Err(e) = self.write(PRODUCTS_FILE, &products).await {
                self.restore(CATEGORIES_FILE, &data.categories).await;
                return Err(e);
            }
            data.products = products;
            data.categories = categories;
            tracing::info!(from = %old_key, to = %new_key, moved, "Products moved to renamed category");
        }

        tracing::info!(slug = %slug, new_slug = %category.slug, "Category updated");
        Ok(category)
    }

    async fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), RepositoryError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        write_document(&dir.join(file), records).await
    }

    /// Put back a document after a later write in the same change failed.
    async fn restore<T: Serialize>(&self, file: &str, records: &[T]) {
        if let Err(e) = self.write(file, records).await {
            tracing::error!(file, error = %e, "Failed to roll back catalog document, files on disk disagree");
        }
    }
}

async fn load_or_seed<T>(path: &Path, seed: Vec<T>) -> Result<Vec<T>, RepositoryError>
where
    T: Serialize + DeserializeOwned,
{
    match read_document(path).await? {
        Some(records) => Ok(records),
        None => {
            write_document(path, &seed).await?;
            tracing::info!(path = %path.display(), records = seed.len(), "Seeded catalog document");
            Ok(seed)
        }
    }
}

async fn read_or<T: DeserializeOwned>(path: &Path, seed: Vec<T>) -> Result<Vec<T>, RepositoryError> {
    Ok(read_document(path).await?.unwrap_or(seed))
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, RepositoryError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => serde_json::from_str(&contents).map(Some).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", path.display()))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_document<T: Serialize>(path: &Path, records: &[T]) -> Result<(), RepositoryError> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use piko_pearl_core::Slug;

    use super::*;

    fn category(name: &str, slug: &str) -> Category {
        Category {
            name: name.to_string(),
            slug: Slug::parse(slug).unwrap(),
            image: None,
            main_heading: None,
            meta_title: None,
            meta_description: None,
            content: None,
            keywords: None,
        }
    }

    #[tokio::test]
    async fn test_open_seeds_missing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CatalogRepository::open(dir.path()).await.unwrap();

        assert_eq!(repo.categories().await.len(), catalog::categories().len());
        assert_eq!(repo.products().await.len(), catalog::products().len());
        assert!(dir.path().join(CATEGORIES_FILE).exists());
        assert!(dir.path().join(PRODUCTS_FILE).exists());
    }

    #[tokio::test]
    async fn test_created_category_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CatalogRepository::open(dir.path()).await.unwrap();
        repo.create_category(category("Hats", "crochet-hats"))
            .await
            .unwrap();
        drop(repo);

        let reopened = CatalogRepository::open(dir.path()).await.unwrap();
        assert!(reopened.category("crochet-hats").await.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug_and_name() {
        let repo = CatalogRepository::in_memory();
        let existing = repo.categories().await.remove(0);

        let err = repo
            .create_category(category("Something New", existing.slug.as_str()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = repo
            .create_category(category(&existing.name.to_uppercase(), "fresh-slug"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let repo = CatalogRepository::in_memory();
        let err = repo
            .update_category("no-such-slug", category("Hats", "hats"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_slug_of_other_category() {
        let repo = CatalogRepository::in_memory();
        let categories = repo.categories().await;
        let (first, second) = (&categories[0], &categories[1]);

        let err = repo
            .update_category(
                first.slug.as_str(),
                category(&first.name, second.slug.as_str()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_same_slug_keeps_position() {
        let repo = CatalogRepository::in_memory();
        let first = repo.categories().await.remove(0);

        let mut edited = first.clone();
        edited.meta_title = Some("New title".to_string());
        repo.update_category(first.slug.as_str(), edited).await.unwrap();

        let stored = repo.categories().await.remove(0);
        assert_eq!(stored.meta_title.as_deref(), Some("New title"));
    }

    #[tokio::test]
    async fn test_rename_moves_products() {
        let repo = CatalogRepository::in_memory();
        let bags = repo
            .categories()
            .await
            .into_iter()
            .find(|c| c.key() == "bags")
            .unwrap();
        let before = repo
            .products()
            .await
            .iter()
            .filter(|p| p.category == "bags")
            .count();
        assert!(before > 0);

        repo.update_category(bags.slug.as_str(), category("Totes", "crochet-totes"))
            .await
            .unwrap();

        let products = repo.products().await;
        assert_eq!(products.iter().filter(|p| p.category == "totes").count(), before);
        assert!(!products.iter().any(|p| p.category == "bags"));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "{not json").unwrap();

        let err = CatalogRepository::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    fn bag_count(products: &[Product], key: &str) -> usize {
        products.iter().filter(|p| p.category == key).count()
    }

    async fn bags_slug(repo: &CatalogRepository) -> String {
        repo.categories()
            .await
            .into_iter()
            .find(|c| c.key() == "bags")
            .unwrap()
            .slug
            .to_string()
    }

    #[tokio::test]
    async fn test_failed_products_write_rolls_back_rename() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CatalogRepository::open(dir.path()).await.unwrap();
        let slug = bags_slug(&repo).await;
        let before = bag_count(&repo.products().await, "bags");

        let products_path = dir.path().join(PRODUCTS_FILE);
        let saved = std::fs::read_to_string(&products_path).unwrap();
        std::fs::remove_file(&products_path).unwrap();
        std::fs::create_dir(&products_path).unwrap();

        let result = repo
            .update_category(&slug, category("Totes", "crochet-totes"))
            .await;
        assert!(result.is_err());
        assert!(repo.category(&slug).await.is_some());
        assert_eq!(bag_count(&repo.products().await, "bags"), before);

        std::fs::remove_dir(&products_path).unwrap();
        std::fs::write(&products_path, saved).unwrap();
        drop(repo);

        let reopened = CatalogRepository::open(dir.path()).await.unwrap();
        assert!(reopened.category(&slug).await.is_some());
        assert!(reopened.category("crochet-totes").await.is_none());
        assert_eq!(bag_count(&reopened.products().await, "bags"), before);
    }

    #[tokio::test]
    async fn test_failed_categories_write_leaves_products_alone() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CatalogRepository::open(dir.path()).await.unwrap();
        let slug = bags_slug(&repo).await;
        let before = bag_count(&repo.products().await, "bags");

        let categories_path = dir.path().join(CATEGORIES_FILE);
        let saved = std::fs::read_to_string(&categories_path).unwrap();
        std::fs::remove_file(&categories_path).unwrap();
        std::fs::create_dir(&categories_path).unwrap();

        let result = repo
            .update_category(&slug, category("Totes", "crochet-totes"))
            .await;
        assert!(result.is_err());

        std::fs::remove_dir(&categories_path).unwrap();
        std::fs::write(&categories_path, saved).unwrap();
        drop(repo);

        let reopened = CatalogRepository::open(dir.path()).await.unwrap();
        assert_eq!(bag_count(&reopened.products().await, "bags"), before);
        assert_eq!(bag_count(&reopened.products().await, "totes"), 0);
    }

    #[tokio::test]
    async fn test_load_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-created");

        let repo = CatalogRepository::load(&missing).await.unwrap();
        assert_eq!(repo.categories().await.len(), catalog::categories().len());
        assert!(!missing.exists());

        repo.create_category(category("Hats", "crochet-hats"))
            .await
            .unwrap();
        assert!(!missing.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_load_reads_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CatalogRepository::open(dir.path()).await.unwrap();
        repo.create_category(category("Hats", "crochet-hats"))
            .await
            .unwrap();
        drop(repo);

        let loaded = CatalogRepository::load(dir.path()).await.unwrap();
        assert!(loaded.category("crochet-hats").await.is_some());

        std::fs::write(dir.path().join(PRODUCTS_FILE), "{not json").unwrap();
        let err = CatalogRepository::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
