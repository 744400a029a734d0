//! Marketplace product routes.
//!
//! Listing management is a PRO farmer feature; browsing is open to everyone.

use crate::{
    api::{
        SharedState,
        extract::{Json, Query},
    },
    core::{
        plan::{self, FarmerFeature},
        product::{self, Listing, NewProduct, ProductUpdate},
        user,
    },
    entities::{UserRole, product::Model as ProductModel},
    errors::{Error, Result},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

/// `?q=` search term
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring; empty matches everything
    #[serde(default)]
    pub q: String,
}

async fn list_products(State(state): State<SharedState>) -> Result<Json<Vec<ProductModel>>> {
    Ok(Json(product::list_products(&state.database).await?))
}

async fn search_products(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductModel>>> {
    Ok(Json(product::search_products(&state.database, &query.q).await?))
}

async fn list_listings(State(state): State<SharedState>) -> Result<Json<Vec<Listing>>> {
    Ok(Json(product::list_listings(&state.database).await?))
}

/// `POST /products` - only farmers with listing access may list produce.
async fn create_product(
    State(state): State<SharedState>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductModel>)> {
    let farmer = user::require_user(&state.database, &request.farmer_id).await?;
    if farmer.role != UserRole::Farmer {
        return Err(Error::Forbidden {
            message: "Only farmers can list products".to_string(),
        });
    }
    plan::ensure_feature(&farmer, FarmerFeature::MarketplaceListings)?;

    let created = product::create_product(&state.database, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_product(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductModel>> {
    product::get_product_by_id(&state.database, &product_id)
        .await?
        .map(Json)
        .ok_or(Error::ProductNotFound { id: product_id })
}

async fn update_product(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<ProductModel>> {
    Ok(Json(
        product::update_product(&state.database, &product_id, update).await?,
    ))
}

async fn delete_product(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode> {
    product::delete_product(&state.database, &product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /farmers/{id}/products` - the farmer's own listings.
async fn farmer_products(
    State(state): State<SharedState>,
    Path(farmer_id): Path<String>,
) -> Result<Json<Vec<ProductModel>>> {
    let farmer = user::require_user(&state.database, &farmer_id).await?;
    plan::ensure_feature(&farmer, FarmerFeature::MarketplaceListings)?;
    Ok(Json(
        product::list_products_by_farmer(&state.database, &farmer_id).await?,
    ))
}

/// Product and listing routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/listings", get(list_listings))
        .route("/farmers/{id}/products", get(farmer_products))
}
