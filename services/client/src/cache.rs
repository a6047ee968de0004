//! services/client/src/cache.rs
//!
//! Tag-invalidated response cache, wrapped around any `RecipeService`.
//!
//! Reads are keyed by (operation, parameters): an identical request is served
//! from cache without a network round-trip until a mutation invalidates one
//! of its tags. A listing entry carries the collection tag plus one tag per
//! returned recipe id; a single-recipe entry carries its id tag. Creating a
//! recipe invalidates the collection tag; updating or deleting invalidates
//! that id's tag only (which also catches any cached listing that contained
//! it). There is no time-based expiry, and failed mutations leave the prior
//! cache state intact.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recipe_browser_core::domain::{DeleteReceipt, Recipe, RecipeDraft, RecipePage, RecipeQuery};
use recipe_browser_core::ports::{ApiResult, RecipeService};
use tracing::debug;

//=========================================================================================
// Keys and Tags
//=========================================================================================

/// A cache-invalidation key. Invalidating a tag drops every entry that
/// carries it, forcing a refetch on the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Sentinel for the recipe collection as a whole.
    List,
    /// One recipe resource.
    Recipe(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    List(RecipeQuery),
    Recipe(u64),
}

#[derive(Clone)]
enum CachedValue {
    Page(RecipePage),
    Recipe(Recipe),
}

struct Entry {
    value: CachedValue,
    tags: Vec<Tag>,
}

//=========================================================================================
// The Caching Decorator
//=========================================================================================

/// A `RecipeService` decorator that answers repeated reads from cache and
/// keeps the cache honest across mutations.
pub struct CachedRecipeService {
    inner: Arc<dyn RecipeService>,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl CachedRecipeService {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: Arc<dyn RecipeService>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<CachedValue> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn store(&self, key: CacheKey, value: CachedValue, tags: Vec<Tag>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, Entry { value, tags });
    }

    /// Drops every entry carrying `tag`.
    pub fn invalidate(&self, tag: Tag) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.contains(&tag));
        debug!("Invalidated {tag:?}: dropped {} cached entries", before - entries.len());
    }

    /// Manual refetch escape hatch for one listing query: the next identical
    /// `list_recipes` call goes back to the network.
    pub fn evict_list(&self, query: &RecipeQuery) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&CacheKey::List(query.clone()));
    }

    /// Manual refetch escape hatch for one recipe.
    pub fn evict_recipe(&self, id: u64) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&CacheKey::Recipe(id));
    }
}

#[async_trait]
impl RecipeService for CachedRecipeService {
    async fn list_recipes(&self, query: &RecipeQuery) -> ApiResult<RecipePage> {
        let key = CacheKey::List(query.clone());
        if let Some(CachedValue::Page(page)) = self.lookup(&key) {
            debug!("Listing served from cache (skip={}, limit={})", query.skip, query.limit);
            return Ok(page);
        }

        let page = self.inner.list_recipes(query).await?;
        let mut tags = vec![Tag::List];
        tags.extend(page.recipes.iter().map(|r| Tag::Recipe(r.id)));
        self.store(key, CachedValue::Page(page.clone()), tags);
        Ok(page)
    }

    async fn get_recipe(&self, id: u64) -> ApiResult<Recipe> {
        let key = CacheKey::Recipe(id);
        if let Some(CachedValue::Recipe(recipe)) = self.lookup(&key) {
            debug!("Recipe {id} served from cache");
            return Ok(recipe);
        }

        let recipe = self.inner.get_recipe(id).await?;
        self.store(key, CachedValue::Recipe(recipe.clone()), vec![Tag::Recipe(id)]);
        Ok(recipe)
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe> {
        let recipe = self.inner.create_recipe(draft).await?;
        // New ids may land anywhere in the server-side order, so every
        // cached listing is suspect.
        self.invalidate(Tag::List);
        Ok(recipe)
    }

    async fn update_recipe(&self, id: u64, draft: &RecipeDraft) -> ApiResult<Recipe> {
        let recipe = self.inner.update_recipe(id, draft).await?;
        self.invalidate(Tag::Recipe(id));
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: u64) -> ApiResult<DeleteReceipt> {
        let receipt = self.inner.delete_recipe(id).await?;
        self.invalidate(Tag::Recipe(id));
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recipe_browser_core::domain::Difficulty;
    use recipe_browser_core::ports::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recipe(id: u64) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {id}"),
            ingredients: vec!["flour".to_string()],
            instructions: vec!["mix".to_string()],
            prep_time_minutes: 5,
            cook_time_minutes: 15,
            servings: 2,
            difficulty: Difficulty::Medium,
            cuisine: "Thai".to_string(),
            calories_per_serving: 250,
            tags: vec!["spicy".to_string()],
            user_id: 1,
            image: String::new(),
            rating: 4.0,
            review_count: None,
            meal_type: None,
        }
    }

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Pad Thai".to_string(),
            ingredients: vec!["noodles".to_string()],
            instructions: vec!["fry".to_string()],
            prep_time_minutes: 10,
            cook_time_minutes: 10,
            servings: 2,
            difficulty: Difficulty::Medium,
            cuisine: "Thai".to_string(),
            calories_per_serving: 400,
            tags: vec![],
            image: String::new(),
            rating: 4.5,
            user_id: 1,
        }
    }

    /// A fake upstream that counts calls and can be told to fail mutations.
    #[derive(Default)]
    struct CountingService {
        list_calls: AtomicUsize,
        get_calls: AtomicUsize,
        fail_mutations: bool,
    }

    #[async_trait]
    impl RecipeService for CountingService {
        async fn list_recipes(&self, query: &RecipeQuery) -> ApiResult<RecipePage> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(RecipePage {
                recipes: vec![recipe(5), recipe(6)],
                total: 2,
                skip: query.skip,
                limit: query.limit,
            })
        }

        async fn get_recipe(&self, id: u64) -> ApiResult<Recipe> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(recipe(id))
        }

        async fn create_recipe(&self, _draft: &RecipeDraft) -> ApiResult<Recipe> {
            if self.fail_mutations {
                return Err(ApiError::Http {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(recipe(100))
        }

        async fn update_recipe(&self, id: u64, _draft: &RecipeDraft) -> ApiResult<Recipe> {
            if self.fail_mutations {
                return Err(ApiError::Http {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(recipe(id))
        }

        async fn delete_recipe(&self, _id: u64) -> ApiResult<DeleteReceipt> {
            Ok(DeleteReceipt {
                is_deleted: true,
                deleted_on: Utc::now(),
            })
        }
    }

    fn cached(fail_mutations: bool) -> (Arc<CountingService>, CachedRecipeService) {
        let inner = Arc::new(CountingService {
            fail_mutations,
            ..CountingService::default()
        });
        let service = CachedRecipeService::new(inner.clone());
        (inner, service)
    }

    fn listing_query() -> RecipeQuery {
        RecipeQuery::for_page(1, 9)
    }

    #[tokio::test]
    async fn identical_listing_is_served_from_cache() {
        let (inner, service) = cached(false);
        let query = listing_query();

        service.list_recipes(&query).await.expect("first fetch");
        service.list_recipes(&query).await.expect("cached fetch");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 1);

        // A different page is a different key.
        service
            .list_recipes(&RecipeQuery::for_page(2, 9))
            .await
            .expect("second page");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn create_invalidates_every_cached_listing() {
        let (inner, service) = cached(false);
        let query = listing_query();

        service.list_recipes(&query).await.expect("first fetch");
        service.create_recipe(&draft()).await.expect("create");
        service.list_recipes(&query).await.expect("refetch");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn update_invalidates_only_that_recipe() {
        let (inner, service) = cached(false);

        service.get_recipe(5).await.expect("get 5");
        service.get_recipe(6).await.expect("get 6");
        service.update_recipe(5, &draft()).await.expect("update 5");

        service.get_recipe(5).await.expect("refetch 5");
        service.get_recipe(6).await.expect("cached 6");
        // Recipe 5 cost two upstream calls, recipe 6 only one.
        assert_eq!(inner.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn update_invalidates_listings_containing_that_recipe() {
        let (inner, service) = cached(false);
        let query = listing_query();

        // The fake listing contains recipes 5 and 6, so the entry is tagged
        // with both ids.
        service.list_recipes(&query).await.expect("first fetch");
        service.update_recipe(5, &draft()).await.expect("update 5");
        service.list_recipes(&query).await.expect("refetch");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delete_invalidates_only_that_recipe() {
        let (inner, service) = cached(false);

        service.get_recipe(5).await.expect("get 5");
        service.get_recipe(6).await.expect("get 6");
        service.delete_recipe(5).await.expect("delete 5");

        service.get_recipe(6).await.expect("cached 6");
        assert_eq!(inner.get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_intact() {
        let (inner, service) = cached(true);
        let query = listing_query();

        service.list_recipes(&query).await.expect("first fetch");
        service
            .create_recipe(&draft())
            .await
            .expect_err("mutation must fail");
        service.list_recipes(&query).await.expect("still cached");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn manual_eviction_forces_a_refetch() {
        let (inner, service) = cached(false);
        let query = listing_query();

        service.list_recipes(&query).await.expect("first fetch");
        service.evict_list(&query);
        service.list_recipes(&query).await.expect("refetch");
        assert_eq!(inner.list_calls.load(Ordering::SeqCst), 2);

        service.get_recipe(7).await.expect("get");
        service.evict_recipe(7);
        service.get_recipe(7).await.expect("refetch");
        assert_eq!(inner.get_calls.load(Ordering::SeqCst), 2);
    }
}
