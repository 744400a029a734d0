//! Subscription plan gating for farmer features.
//!
//! Farmers on the FREE plan see the monitoring dashboard only; everything listed in
//! [`FarmerFeature`] needs PRO. Buyers and admins are never gated.

use crate::{
    entities::{FarmerPlan, UserRole, user},
    errors::{Error, Result},
};
use serde::Serialize;
use std::fmt;

/// Farmer dashboard features that require the PRO plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FarmerFeature {
    /// Listing and managing products on the marketplace
    MarketplaceListings,
    /// Viewing orders placed for the farmer's products
    IncomingOrders,
    /// Chatting with buyers
    BuyerChats,
    /// Reading community articles
    CommunityArticles,
    /// Harvest yield predictions
    HarvestPredictions,
    /// Downloadable eco-score report and community benchmark
    EcoScoreReport,
}

impl FarmerFeature {
    /// Every gated feature
    pub const ALL: [Self; 6] = [
        Self::MarketplaceListings,
        Self::IncomingOrders,
        Self::BuyerChats,
        Self::CommunityArticles,
        Self::HarvestPredictions,
        Self::EcoScoreReport,
    ];
}

impl fmt::Display for FarmerFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MarketplaceListings => "marketplace listings",
            Self::IncomingOrders => "incoming orders",
            Self::BuyerChats => "buyer chats",
            Self::CommunityArticles => "community articles",
            Self::HarvestPredictions => "harvest predictions",
            Self::EcoScoreReport => "eco-score report",
        };
        f.write_str(name)
    }
}

/// Whether `plan` unlocks `feature`. A farmer without a plan counts as FREE.
#[must_use]
pub const fn is_unlocked(plan: Option<FarmerPlan>, _feature: FarmerFeature) -> bool {
    matches!(plan, Some(FarmerPlan::Pro))
}

/// Fails with [`Error::PlanRequired`] if `user` is a farmer whose plan does not unlock `feature`.
pub fn ensure_feature(user: &user::Model, feature: FarmerFeature) -> Result<()> {
    if user.role != UserRole::Farmer || is_unlocked(user.plan, feature) {
        return Ok(());
    }
    Err(Error::PlanRequired {
        feature: feature.to_string(),
    })
}

/// The features `user` can currently use.
#[must_use]
pub fn unlocked_features(user: &user::Model) -> Vec<FarmerFeature> {
    FarmerFeature::ALL
        .into_iter()
        .filter(|feature| ensure_feature(user, *feature).is_ok())
        .collect()
}
