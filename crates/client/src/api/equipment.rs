//! Equipment catalog endpoints.
//!
//! Catalog reads are cached for five minutes; any mutation drops the whole
//! cache so admin edits become visible to the next read.

use reqwest::multipart::{Form, Part};
use toolcrib_core::EquipmentId;
use tracing::instrument;

use super::types::{Equipment, EquipmentForm, ImageFile};
use super::{ApiClient, ApiError, CacheKey, CacheValue};

impl ApiClient {
    /// List the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, ApiError> {
        if let Some(CacheValue::Catalog(items)) = self.catalog_cache().get(&CacheKey::Catalog).await
        {
            tracing::debug!("catalog cache hit");
            return Ok(items);
        }

        let items: Vec<Equipment> = self.get_json("/equipment").await?;
        self.catalog_cache()
            .insert(CacheKey::Catalog, CacheValue::Catalog(items.clone()))
            .await;
        Ok(items)
    }

    /// Fetch one catalog item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get_equipment(&self, id: EquipmentId) -> Result<Equipment, ApiError> {
        if let Some(CacheValue::Item(item)) = self.catalog_cache().get(&CacheKey::Item(id)).await {
            tracing::debug!("catalog cache hit");
            return Ok(*item);
        }

        let item: Equipment = self.get_json(&format!("/equipment/{id}")).await?;
        self.catalog_cache()
            .insert(CacheKey::Item(id), CacheValue::Item(Box::new(item.clone())))
            .await;
        Ok(item)
    }

    /// Search the catalog by keyword. Not cached: the keyword space is open.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn search_equipment(&self, keyword: &str) -> Result<Vec<Equipment>, ApiError> {
        self.get_json_with_query("/equipment/search", &[("keyword", keyword)])
            .await
    }

    /// Create a catalog item (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self, form, image), fields(name = %form.name))]
    pub async fn create_equipment(
        &self,
        form: EquipmentForm,
        image: Option<ImageFile>,
    ) -> Result<Equipment, ApiError> {
        let created = self
            .send_multipart(
                reqwest::Method::POST,
                "/equipment",
                build_equipment_form(form, image),
            )
            .await?;
        self.invalidate_catalog();
        Ok(created)
    }

    /// Update a catalog item (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self, form, image), fields(name = %form.name))]
    pub async fn update_equipment(
        &self,
        id: EquipmentId,
        form: EquipmentForm,
        image: Option<ImageFile>,
    ) -> Result<Equipment, ApiError> {
        let updated = self
            .send_multipart(
                reqwest::Method::PUT,
                &format!("/equipment/{id}"),
                build_equipment_form(form, image),
            )
            .await?;
        self.invalidate_catalog();
        Ok(updated)
    }

    /// Delete a catalog item (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn delete_equipment(&self, id: EquipmentId) -> Result<(), ApiError> {
        self.delete_unit(&format!("/equipment/{id}")).await?;
        self.invalidate_catalog();
        Ok(())
    }

    fn invalidate_catalog(&self) {
        self.catalog_cache().invalidate_all();
    }
}

/// Assemble the multipart form the backend expects for create/update.
fn build_equipment_form(form: EquipmentForm, image: Option<ImageFile>) -> Form {
    let mut multipart = Form::new()
        .text("name", form.name)
        .text("category", form.category)
        .text("stock", form.stock.to_string())
        .text("available", form.available.to_string());

    if let Some(description) = form.description {
        multipart = multipart.text("description", description);
    }

    if let Some(image) = image {
        multipart = multipart.part("image", Part::bytes(image.bytes).file_name(image.file_name));
    }

    multipart
}
