//! Equipment catalog commands.

use std::path::PathBuf;

use thiserror::Error;

use toolcrib_client::api::types::{Equipment, EquipmentForm, ImageFile};
use toolcrib_client::services::CatalogError;
use toolcrib_client::{AccessPolicy, ApiError, AppState};
use toolcrib_core::EquipmentId;

use super::{GuardError, ensure_access};

/// Errors from equipment commands.
#[derive(Debug, Error)]
pub enum EquipmentCmdError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The image file could not be read.
    #[error("cannot read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scalar form arguments shared by create and update.
pub struct FormArgs {
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub description: Option<String>,
    pub available: bool,
    pub image: Option<PathBuf>,
}

/// List the catalog, optionally filtered by keyword.
///
/// # Errors
///
/// Returns `EquipmentCmdError` when the guard refuses or the call fails.
pub async fn list(state: &AppState, keyword: Option<&str>) -> Result<(), EquipmentCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let items = state.catalog().browse(keyword).await?;
    if items.is_empty() {
        tracing::info!("No equipment found");
        return Ok(());
    }

    for item in items {
        print_item(&item);
    }
    Ok(())
}

/// Show one catalog item.
///
/// # Errors
///
/// Returns `EquipmentCmdError` when the guard refuses or the call fails.
pub async fn show(state: &AppState, id: EquipmentId) -> Result<(), EquipmentCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let item = state.catalog().item(id).await?;
    print_item(&item);
    if let Some(description) = &item.description {
        tracing::info!("  {description}");
    }
    if let Some(url) = &item.image_url {
        tracing::info!("  image: {url}");
    }
    Ok(())
}

/// Create a catalog item (admin).
///
/// # Errors
///
/// Returns `EquipmentCmdError` when the guard refuses, the image cannot be
/// read, or the call fails.
pub async fn create(state: &AppState, args: FormArgs) -> Result<(), EquipmentCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    let (form, image) = build_form(args)?;
    let created = state.api().create_equipment(form, image).await?;

    tracing::info!("Created equipment {} ({})", created.id, created.name);
    Ok(())
}

/// Update a catalog item (admin).
///
/// # Errors
///
/// Returns `EquipmentCmdError` when the guard refuses, the image cannot be
/// read, or the call fails.
pub async fn update(
    state: &AppState,
    id: EquipmentId,
    args: FormArgs,
) -> Result<(), EquipmentCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    let (form, image) = build_form(args)?;
    let updated = state.api().update_equipment(id, form, image).await?;

    tracing::info!("Updated equipment {} ({})", updated.id, updated.name);
    Ok(())
}

/// Delete a catalog item (admin).
///
/// # Errors
///
/// Returns `EquipmentCmdError` when the guard refuses or the call fails.
pub async fn delete(state: &AppState, id: EquipmentId) -> Result<(), EquipmentCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    state.api().delete_equipment(id).await?;
    tracing::info!("Deleted equipment {id}");
    Ok(())
}

fn build_form(args: FormArgs) -> Result<(EquipmentForm, Option<ImageFile>), EquipmentCmdError> {
    let image = match args.image {
        Some(path) => {
            let bytes =
                std::fs::read(&path).map_err(|source| EquipmentCmdError::ImageRead {
                    path: path.clone(),
                    source,
                })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
            Some(ImageFile { file_name, bytes })
        }
        None => None,
    };

    Ok((
        EquipmentForm {
            name: args.name,
            description: args.description,
            category: args.category,
            stock: args.stock,
            available: args.available,
        },
        image,
    ))
}

fn print_item(item: &Equipment) {
    let availability = if item.available { "available" } else { "unavailable" };
    tracing::info!(
        "[{}] {} - {} - stock {} ({})",
        item.id,
        item.name,
        item.category,
        item.stock,
        availability
    );
}
