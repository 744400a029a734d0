//! Farm dashboard routes serving the static sample feeds.
//!
//! Weather, eco-score, irrigation and market data are open; the harvest prediction
//! and the detailed eco-score report are PRO features of a specific farmer.

use crate::{
    api::{
        SharedState,
        extract::{Json, Query},
    },
    core::{
        farm_data::{
            self, EcoScore, EcoScoreReport, HarvestPrediction, IrrigationLog, MarketPrice,
            WeatherReport,
        },
        plan::{self, FarmerFeature},
        user,
    },
    errors::Result,
};
use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

/// Eco-score with its weakest component
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScoreResponse {
    /// Score breakdown, flattened into the response
    #[serde(flatten)]
    pub score: EcoScore,
    /// Lowest-scoring component
    pub weakest_area: &'static str,
}

/// `?moisture=` reading in percent
#[derive(Debug, Deserialize)]
pub struct MoistureQuery {
    /// Soil moisture percentage
    pub moisture: f64,
}

/// Result of checking a moisture reading
#[derive(Debug, Serialize)]
pub struct MoistureAlert {
    /// Whether irrigation is needed
    pub low: bool,
    /// Threshold the reading was compared to
    pub threshold: f64,
}

async fn weather() -> Json<WeatherReport> {
    Json(farm_data::weather())
}

async fn eco_score() -> Json<EcoScoreResponse> {
    let score = farm_data::eco_score();
    Json(EcoScoreResponse {
        weakest_area: score.weakest_area(),
        score,
    })
}

async fn irrigation_logs() -> Json<Vec<IrrigationLog>> {
    Json(farm_data::irrigation_logs())
}

async fn market_prices() -> Json<Vec<MarketPrice>> {
    Json(farm_data::market_prices())
}

async fn moisture_alert(Query(query): Query<MoistureQuery>) -> Json<MoistureAlert> {
    Json(MoistureAlert {
        low: farm_data::is_moisture_low(query.moisture),
        threshold: farm_data::LOW_MOISTURE_THRESHOLD,
    })
}

/// `GET /farmers/{id}/harvest-prediction`
async fn harvest_prediction(
    State(state): State<SharedState>,
    Path(farmer_id): Path<String>,
) -> Result<Json<HarvestPrediction>> {
    let farmer = user::require_user(&state.database, &farmer_id).await?;
    plan::ensure_feature(&farmer, FarmerFeature::HarvestPredictions)?;
    Ok(Json(farm_data::harvest_prediction()))
}

/// `GET /farmers/{id}/eco-score-report`
async fn eco_score_report(
    State(state): State<SharedState>,
    Path(farmer_id): Path<String>,
) -> Result<Json<EcoScoreReport>> {
    let farmer = user::require_user(&state.database, &farmer_id).await?;
    plan::ensure_feature(&farmer, FarmerFeature::EcoScoreReport)?;
    Ok(Json(farm_data::eco_score_report()))
}

/// Farm dashboard routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/farm/weather", get(weather))
        .route("/farm/eco-score", get(eco_score))
        .route("/farm/irrigation-logs", get(irrigation_logs))
        .route("/farm/market-prices", get(market_prices))
        .route("/farm/moisture-alert", get(moisture_alert))
        .route("/farmers/{id}/harvest-prediction", get(harvest_prediction))
        .route("/farmers/{id}/eco-score-report", get(eco_score_report))
}
