//! Order business logic - buying produce and tracking order status.
//!
//! Placing an order decrements stock with a single conditional UPDATE that only
//! matches while enough units remain, in the same transaction as the order insert.
//! Concurrent orders therefore never oversell and stock never goes negative.
//! All functions are async and return Result types for proper error handling.

use crate::{
    entities::{Order, OrderStatus, Product, User, new_id, order, product, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// An order joined with the data the buyer and farmer dashboards show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// The stored order
    #[serde(flatten)]
    pub order: order::Model,
    /// `None` if the product was deleted after ordering
    pub product_name: Option<String>,
    /// `None` if the buyer account is gone
    pub buyer_name: Option<String>,
    /// Seller of the product, if it still exists
    pub farmer_id: Option<String>,
    /// Seller's display name
    pub farmer_name: Option<String>,
}

/// Adds `delta` units to a product's stock in a single UPDATE statement.
async fn adjust_stock<C>(db: &C, product_id: &str, delta: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(delta),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Places a `Pending` order for `quantity` units of a product.
///
/// The total price is computed from the product's current unit price.
///
/// # Errors
/// Returns an error if:
/// - The quantity is less than one
/// - The product does not exist
/// - The product has fewer than `quantity` units in stock
/// - A database operation fails (nothing is written in that case)
#[instrument(skip(db))]
pub async fn place_order(
    db: &DatabaseConnection,
    buyer_id: &str,
    product_id: &str,
    quantity: i32,
) -> Result<order::Model> {
    if quantity < 1 {
        return Err(Error::validation("Quantity must be at least 1"));
    }

    let txn = db.begin().await?;

    let reserved = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(&txn)
        .await?;

    if reserved.rows_affected == 0 {
        txn.rollback().await?;
        let product = Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                id: product_id.to_string(),
            })?;
        return Err(Error::InsufficientStock {
            available: product.stock,
            requested: quantity,
        });
    }

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })?;

    let order = order::ActiveModel {
        id: Set(new_id()),
        buyer_id: Set(buyer_id.to_string()),
        product_id: Set(product.id.clone()),
        quantity: Set(quantity),
        total_price: Set(f64::from(quantity) * product.price),
        order_date: Set(chrono::Utc::now()),
        status: Set(OrderStatus::Pending),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(order_id = %order.id, total = order.total_price, "Order placed");
    Ok(order)
}

/// Retrieves a specific order by its unique ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: &str,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Retrieves a buyer's orders, newest first.
pub async fn orders_by_buyer(db: &DatabaseConnection, buyer_id: &str) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::BuyerId.eq(buyer_id))
        .order_by_desc(order::Column::OrderDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the orders placed for any of a farmer's products, newest first.
///
/// Orders for products the farmer has since deleted are no longer attributable
/// and are not returned.
pub async fn orders_by_farmer(
    db: &DatabaseConnection,
    farmer_id: &str,
) -> Result<Vec<order::Model>> {
    let product_ids: Vec<String> = Product::find()
        .filter(product::Column::FarmerId.eq(farmer_id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if product_ids.is_empty() {
        return Ok(Vec::new());
    }

    Order::find()
        .filter(order::Column::ProductId.is_in(product_ids))
        .order_by_desc(order::Column::OrderDate)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn summarize(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderSummary>> {
    let products: HashMap<String, product::Model> = Product::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
    let names: HashMap<String, String> = User::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u: user::Model| (u.id, u.name))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let product = products.get(&order.product_id);
            let farmer_id = product.map(|p| p.farmer_id.clone());
            OrderSummary {
                product_name: product.map(|p| p.name.clone()),
                buyer_name: names.get(&order.buyer_id).cloned(),
                farmer_name: farmer_id.as_ref().and_then(|id| names.get(id).cloned()),
                farmer_id,
                order,
            }
        })
        .collect())
}

/// Buyer dashboard view: [`orders_by_buyer`] joined with product and farmer names.
pub async fn order_summaries_for_buyer(
    db: &DatabaseConnection,
    buyer_id: &str,
) -> Result<Vec<OrderSummary>> {
    let orders = orders_by_buyer(db, buyer_id).await?;
    summarize(db, orders).await
}

/// Farmer dashboard view: [`orders_by_farmer`] joined with product and buyer names.
pub async fn order_summaries_for_farmer(
    db: &DatabaseConnection,
    farmer_id: &str,
) -> Result<Vec<OrderSummary>> {
    let orders = orders_by_farmer(db, farmer_id).await?;
    summarize(db, orders).await
}

/// Moves a `Pending` order to `Completed` or `Cancelled`.
///
/// Cancelling returns the ordered quantity to the product's stock if the product
/// still exists.
///
/// # Errors
/// Returns an error if:
/// - The order does not exist
/// - The order is not `Pending`, or the target status is `Pending`
#[instrument(skip(db))]
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: &str,
    status: OrderStatus,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;

    if existing.status != OrderStatus::Pending || status == OrderStatus::Pending {
        return Err(Error::InvalidStatusTransition {
            from: existing.status.to_string(),
            to: status.to_string(),
        });
    }

    if status == OrderStatus::Cancelled {
        let product_exists = Product::find_by_id(existing.product_id.as_str())
            .one(&txn)
            .await?
            .is_some();
        if product_exists {
            adjust_stock(&txn, &existing.product_id, existing.quantity).await?;
        } else {
            warn!(product_id = %existing.product_id, "Cancelled order for deleted product");
        }
    }

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(status = %updated.status, "Order status updated");
    Ok(updated)
}
