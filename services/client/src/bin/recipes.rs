//! services/client/src/bin/recipes.rs
//!
//! Command-line driver for the recipe client: wires the credential file,
//! session store, HTTP adapter, and cache together, then dispatches one
//! subcommand per invocation.

use std::sync::Arc;

use client_lib::{
    adapters::{http::HttpApiAdapter, storage::FileCredentialStore},
    cache::CachedRecipeService,
    config::Config,
    error::ClientError,
    form::RecipeForm,
    listing::{ListingController, BROWSE_PAGE_SIZE, DASHBOARD_PAGE_SIZE},
    session::SessionStore,
};
use recipe_browser_core::domain::{LoginCredentials, Recipe};
use recipe_browser_core::ports::{AuthService, RecipeService};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage: recipes <command> [args]

Commands:
  list [--page N] [--search Q] [--sort FIELD] [--desc] [--dashboard]
  show <id>
  login <username> <password>
  me
  logout
  add <field=value>...
  update <id> <field=value>...
  delete <id>

Recipe fields: name, ingredients (comma-separated), instructions (one step
per line), prep, cook, servings, difficulty, cuisine, calories, tags
(comma-separated), image, rating.";

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- 2. Hydrate the Session from Durable Storage ---
    let storage = Arc::new(FileCredentialStore::open(&config.session_path));
    let session = Arc::new(SessionStore::hydrate(storage));

    // --- 3. Build the Data Layer: HTTP Adapter Behind the Cache ---
    let adapter = Arc::new(
        HttpApiAdapter::new(config.api_base_url.clone(), session.clone())
            .map_err(|e| ClientError::Internal(format!("failed to build HTTP client: {e}")))?,
    );
    let recipes = CachedRecipeService::new(adapter.clone());

    // --- 4. Dispatch the Subcommand ---
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("list") => cmd_list(&recipes, &args[1..]).await,
        Some("show") => cmd_show(&recipes, &args[1..]).await,
        Some("login") => cmd_login(adapter.as_ref(), &session, &config, &args[1..]).await,
        Some("me") => cmd_me(adapter.as_ref(), &session).await,
        Some("logout") => {
            session.logout();
            info!("Session cleared");
            println!("Logged out.");
            Ok(())
        }
        Some("add") => cmd_add(&recipes, &session, &args[1..]).await,
        Some("update") => cmd_update(&recipes, &session, &args[1..]).await,
        Some("delete") => cmd_delete(&recipes, &args[1..]).await,
        _ => {
            eprintln!("{USAGE}");
            Err(ClientError::Internal("unknown command".to_string()))
        }
    }
}

//=========================================================================================
// Subcommands
//=========================================================================================

async fn cmd_list(recipes: &CachedRecipeService, args: &[String]) -> Result<(), ClientError> {
    let mut page_size = BROWSE_PAGE_SIZE;
    let mut page = 1;
    let mut search = String::new();
    let mut sort: Option<String> = None;
    let mut descending = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ClientError::Internal("--page needs a number".to_string()))?;
                page = value.parse().map_err(|_| {
                    ClientError::Internal(format!("'{value}' is not a page number"))
                })?;
                if page < 1 {
                    return Err(ClientError::Internal("pages start at 1".to_string()));
                }
            }
            "--search" => {
                search = iter
                    .next()
                    .ok_or_else(|| ClientError::Internal("--search needs a term".to_string()))?
                    .clone();
            }
            "--sort" => {
                sort = Some(
                    iter.next()
                        .ok_or_else(|| ClientError::Internal("--sort needs a field".to_string()))?
                        .clone(),
                );
            }
            "--desc" => descending = true,
            "--dashboard" => page_size = DASHBOARD_PAGE_SIZE,
            other => {
                return Err(ClientError::Internal(format!("unknown flag '{other}'")));
            }
        }
    }

    let mut listing = ListingController::new(page_size);
    if !search.is_empty() {
        listing.submit_search(&search);
    }
    if let Some(field) = sort {
        listing.toggle_sort(&field);
        if descending {
            // A second toggle on the active field flips it to descending.
            listing.toggle_sort(&field);
        }
    }
    listing.set_page(page);

    let result = recipes.list_recipes(&listing.query()).await?;
    for recipe in &result.recipes {
        println!(
            "{:>5}  {:<40} {:<15} {:>4.1}★",
            recipe.id, recipe.name, recipe.cuisine, recipe.rating
        );
    }

    let total_pages = listing.total_pages(result.total);
    let window: Vec<String> = listing
        .page_window(total_pages)
        .into_iter()
        .map(|n| {
            if n == listing.page() {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect();
    println!(
        "\n{} recipes · page {} of {} · {}",
        result.total,
        listing.page(),
        total_pages,
        window.join(" ")
    );
    Ok(())
}

async fn cmd_show(recipes: &CachedRecipeService, args: &[String]) -> Result<(), ClientError> {
    let id = parse_id(args)?;
    let recipe = recipes.get_recipe(id).await?;
    print_recipe(&recipe);
    Ok(())
}

async fn cmd_login(
    auth: &dyn AuthService,
    session: &SessionStore,
    config: &Config,
    args: &[String],
) -> Result<(), ClientError> {
    let [username, password] = args else {
        return Err(ClientError::Internal(
            "usage: recipes login <username> <password>".to_string(),
        ));
    };

    let credentials = LoginCredentials {
        username: username.clone(),
        password: password.clone(),
        expires_in_mins: config.token_ttl_mins,
    };
    match auth.login(&credentials).await {
        Ok(auth_session) => {
            let name = auth_session.user.first_name.clone();
            session.set_credentials(
                auth_session.user,
                &auth_session.access_token,
                &auth_session.refresh_token,
            );
            println!("Welcome back, {name}!");
            Ok(())
        }
        Err(e) => {
            // Never reveal which field was wrong.
            error!("Login error: {e}");
            println!("Invalid credentials. Please try again.");
            Ok(())
        }
    }
}

async fn cmd_me(auth: &dyn AuthService, session: &SessionStore) -> Result<(), ClientError> {
    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    let user = auth.current_user().await?;
    println!("{} {} <{}>", user.first_name, user.last_name, user.email);
    println!("username: {}", user.username);
    if let Some(role) = &user.role {
        println!("role: {role}");
    }
    session.update_user(user);
    Ok(())
}

async fn cmd_add(
    recipes: &CachedRecipeService,
    session: &SessionStore,
    args: &[String],
) -> Result<(), ClientError> {
    let form = parse_form(args)?;
    let user_id = session.current_user().map(|u| u.id).unwrap_or(1);
    let draft = form.into_draft(user_id)?;

    match recipes.create_recipe(&draft).await {
        Ok(recipe) => {
            println!("Created recipe {}: {}", recipe.id, recipe.name);
            Ok(())
        }
        Err(e) => {
            error!("Failed to save recipe: {e}");
            println!("Failed to save recipe. Please try again.");
            Ok(())
        }
    }
}

async fn cmd_update(
    recipes: &CachedRecipeService,
    session: &SessionStore,
    args: &[String],
) -> Result<(), ClientError> {
    let (id_arg, fields) = args.split_first().ok_or_else(|| {
        ClientError::Internal("usage: recipes update <id> <field=value>...".to_string())
    })?;
    let id = id_arg
        .parse()
        .map_err(|_| ClientError::Internal(format!("'{id_arg}' is not a recipe id")))?;

    let form = parse_form(fields)?;
    let user_id = session.current_user().map(|u| u.id).unwrap_or(1);
    let draft = form.into_draft(user_id)?;

    match recipes.update_recipe(id, &draft).await {
        Ok(recipe) => {
            println!("Updated recipe {}: {}", recipe.id, recipe.name);
            Ok(())
        }
        Err(e) => {
            error!("Failed to save recipe: {e}");
            println!("Failed to save recipe. Please try again.");
            Ok(())
        }
    }
}

async fn cmd_delete(recipes: &CachedRecipeService, args: &[String]) -> Result<(), ClientError> {
    let id = parse_id(args)?;
    match recipes.delete_recipe(id).await {
        Ok(receipt) => {
            println!("Deleted recipe {id} at {}", receipt.deleted_on.to_rfc3339());
            Ok(())
        }
        Err(e) => {
            error!("Failed to delete recipe: {e}");
            println!("Failed to delete recipe. Please try again.");
            Ok(())
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_id(args: &[String]) -> Result<u64, ClientError> {
    let [raw] = args else {
        return Err(ClientError::Internal("expected exactly one recipe id".to_string()));
    };
    raw.parse()
        .map_err(|_| ClientError::Internal(format!("'{raw}' is not a recipe id")))
}

fn parse_form(args: &[String]) -> Result<RecipeForm, ClientError> {
    let mut form = RecipeForm::default();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(ClientError::Internal(format!(
                "expected field=value, got '{arg}'"
            )));
        };
        match key {
            "name" => form.name = value.to_string(),
            "ingredients" => form.ingredients = value.to_string(),
            "instructions" => form.instructions = value.to_string(),
            "prep" => form.prep_time_minutes = value.to_string(),
            "cook" => form.cook_time_minutes = value.to_string(),
            "servings" => form.servings = value.to_string(),
            "difficulty" => form.difficulty = value.to_string(),
            "cuisine" => form.cuisine = value.to_string(),
            "calories" => form.calories_per_serving = value.to_string(),
            "tags" => form.tags = value.to_string(),
            "image" => form.image = value.to_string(),
            "rating" => form.rating = value.to_string(),
            other => {
                return Err(ClientError::Internal(format!("unknown field '{other}'")));
            }
        }
    }
    Ok(form)
}

fn print_recipe(recipe: &Recipe) {
    println!("{} ({})", recipe.name, recipe.cuisine);
    println!(
        "difficulty: {:?} · prep {} min · cook {} min · serves {} · {} kcal · {:.1}★",
        recipe.difficulty,
        recipe.prep_time_minutes,
        recipe.cook_time_minutes,
        recipe.servings,
        recipe.calories_per_serving,
        recipe.rating
    );
    if !recipe.tags.is_empty() {
        println!("tags: {}", recipe.tags.join(", "));
    }
    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }
    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}
