//! Command implementations behind the `pdf-library` binary.

use crate::filter::{self, CategoryFilter};
use crate::models::CatalogId;
use crate::workflows::{
    CategoryOutcome, Navigation, RemovalOutcome, RemovalWorkflow, UploadWorkflow,
};
use crate::AppState;
use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Command {
    /// Show documents grouped by category (empty categories are hidden).
    Catalog,

    /// List all categories.
    Categories,

    /// List documents, optionally restricted to one category.
    List {
        /// `all` or a category id.
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Upload a PDF.
    Upload {
        /// Path of the PDF to upload.
        path: PathBuf,

        /// Display name; defaults to the file name.
        #[arg(long)]
        name: Option<String>,

        /// Id of an existing category.
        #[arg(long, conflicts_with = "new_category")]
        category: Option<String>,

        /// Create this category (if it does not exist yet) and file the PDF under it.
        #[arg(long)]
        new_category: Option<String>,
    },

    /// Create a category.
    AddCategory { name: String },

    /// Remove one or more PDFs by id.
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Only accept ids visible under this filter (`all` or a category id).
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Download a PDF.
    Download {
        id: String,

        /// Destination path; defaults to the served file name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(app: &AppState, command: Command, api_key: Option<String>) -> Result<()> {
    match command {
        Command::Catalog => show_catalog(app).await,
        Command::Categories => list_categories(app).await,
        Command::List { category } => list_documents(app, &category).await,
        Command::Upload {
            path,
            name,
            category,
            new_category,
        } => upload(app, path, name, category, new_category, api_key).await,
        Command::AddCategory { name } => add_category(app, &name).await,
        Command::Remove { ids, category } => remove(app, &ids, &category, api_key).await,
        Command::Download { id, output } => download(app, &id, output).await,
    }
}

async fn show_catalog(app: &AppState) -> Result<()> {
    let _ = app.store.refresh_all().await;
    let snapshot = app.store.snapshot().await;

    let orphaned = filter::orphaned_documents(snapshot.categories(), snapshot.documents());
    if !orphaned.is_empty() {
        tracing::debug!(count = orphaned.len(), "Documents without a known category hidden");
    }

    let groups = snapshot.grouped();
    if groups.is_empty() {
        println!("The library is empty.");
    }
    for group in groups {
        println!("{}", group.category.name);
        for document in group.documents {
            println!("  [{}] {}", document.id, document.name);
        }
    }

    Ok(())
}

async fn list_categories(app: &AppState) -> Result<()> {
    let _ = app.store.refresh_categories().await;
    for category in app.store.snapshot().await.categories() {
        println!("[{}] {}", category.id, category.name);
    }
    Ok(())
}

async fn list_documents(app: &AppState, category: &str) -> Result<()> {
    let selection: CategoryFilter = category
        .parse()
        .map_err(|e| anyhow!("Invalid category filter '{}': {}", category, e))?;

    let removal = RemovalWorkflow::new(app);
    removal.refresh().await;
    removal.set_filter(selection).await;

    for document in removal.visible().await {
        println!("[{}] {}", document.id, document.name);
    }
    Ok(())
}

async fn upload(
    app: &AppState,
    path: PathBuf,
    name: Option<String>,
    category: Option<String>,
    new_category: Option<String>,
    api_key: Option<String>,
) -> Result<()> {
    let mut form = UploadWorkflow::new(app);
    form.enter().await;

    form.select_file_from_path(&path)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    if let Some(name) = name {
        form.set_display_name(name);
    }
    if let Some(category) = category {
        let id = CatalogId::parse(&category)
            .map_err(|e| anyhow!("Invalid category id '{}': {}", category, e))?;
        form.select_category(Some(id));
    }
    if let Some(new_category) = new_category {
        let outcome = form
            .add_category(&new_category)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        match outcome {
            CategoryOutcome::Created(_) => {}
            CategoryOutcome::Pending { .. } => {
                return Err(anyhow!(form.message().unwrap_or_default().to_string()));
            }
            CategoryOutcome::Skipped => {
                // Already known: select the existing category of that name.
                let existing = form
                    .categories()
                    .iter()
                    .find(|c| c.name == new_category.trim())
                    .map(|c| c.id.clone());
                form.select_category(existing);
            }
        }
    }
    if let Some(api_key) = api_key {
        form.set_credential(&api_key);
    }

    match form.submit().await {
        Ok(outcome) => {
            println!("Uploaded [{}] {}", outcome.document.id, outcome.document.name);
            match outcome.navigate_to {
                Navigation::CatalogRoot => show_catalog(app).await,
            }
        }
        Err(e) => Err(anyhow!(e.user_message())),
    }
}

async fn add_category(app: &AppState, name: &str) -> Result<()> {
    match crate::workflows::add_category(&app.store, name)
        .await
        .map_err(|e| anyhow!(e.user_message()))?
    {
        CategoryOutcome::Created(category) => {
            println!("Created [{}] {}", category.id, category.name)
        }
        CategoryOutcome::Pending { name } => {
            println!("Created {} (id not available yet)", name)
        }
        CategoryOutcome::Skipped => println!("Nothing to create for '{}'", name.trim()),
    }
    Ok(())
}

async fn remove(
    app: &AppState,
    ids: &[String],
    category: &str,
    api_key: Option<String>,
) -> Result<()> {
    let selection: CategoryFilter = category
        .parse()
        .map_err(|e| anyhow!("Invalid category filter '{}': {}", category, e))?;

    let removal = RemovalWorkflow::new(app);
    removal.refresh().await;
    removal.set_filter(selection).await;

    let visible: HashSet<CatalogId> = removal
        .visible()
        .await
        .into_iter()
        .map(|document| document.id)
        .collect();
    for raw in ids {
        let id = CatalogId::parse(raw).map_err(|e| anyhow!("Invalid id '{}': {}", raw, e))?;
        if !visible.contains(&id) {
            eprintln!("Skipping unknown document {}", id);
            continue;
        }
        if !removal.selected().await.contains(&id) {
            removal.toggle(id).await;
        }
    }
    if let Some(api_key) = api_key {
        removal.set_credential(&api_key).await;
    }

    match removal
        .submit_removal()
        .await
        .map_err(|e| anyhow!(e.user_message()))?
    {
        RemovalOutcome::Removed(removed) => {
            println!("Removed {} PDF(s)", removed.len());
            Ok(())
        }
        RemovalOutcome::AlreadyInFlight => Err(anyhow!("A removal is already in progress")),
    }
}

async fn download(app: &AppState, id: &str, output: Option<PathBuf>) -> Result<()> {
    let id = CatalogId::parse(id).map_err(|e| anyhow!("Invalid id '{}': {}", id, e))?;
    let pdf = app
        .store
        .api()
        .download_document(&id)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    let destination = output.unwrap_or_else(|| PathBuf::from(&pdf.file_name));
    tokio::fs::write(&destination, &pdf.bytes)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    println!("Saved {} ({} bytes)", destination.display(), pdf.bytes.len());
    Ok(())
}
