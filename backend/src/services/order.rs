//! Order service
//!
//! Buyers (businesses and consumers) order against product listings. Stock is
//! decremented at creation and restored on cancellation, both inside a
//! transaction.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus, ProductStatus};

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: SqlitePool,
}

/// Input for placing an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub product_id: Uuid,
    pub quantity: f64,
    pub note: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    product_id: Uuid,
    buyer_id: Uuid,
    farmer_id: Uuid,
    quantity: f64,
    unit_price: f64,
    total_price: f64,
    status: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = OrderStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown order status in database: {}", self.status))
        })?;
        Ok(Order {
            id: self.id,
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            farmer_id: self.farmer_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.total_price,
            status,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = r#"
    id, product_id, buyer_id, farmer_id, quantity, unit_price, total_price,
    status, note, created_at, updated_at
"#;

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Place an order against a product listing
    pub async fn create_order(&self, buyer_id: Uuid, input: CreateOrderInput) -> AppResult<Order> {
        if !input.quantity.is_finite() || input.quantity <= 0.0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be a positive number".to_string(),
                message_vi: "Số lượng phải là số dương".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, (Uuid, f64, f64, String)>(
            "SELECT farmer_id, price, quantity, status FROM products WHERE id = ?",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let (farmer_id, unit_price, stock, status) = product;

        if farmer_id == buyer_id {
            return Err(AppError::Validation {
                field: "product_id".to_string(),
                message: "You cannot order your own product".to_string(),
                message_vi: "Bạn không thể đặt mua sản phẩm của chính mình".to_string(),
            });
        }
        if ProductStatus::parse(&status) != Some(ProductStatus::Available) {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "Product is not available for ordering".to_string(),
                message_vi: "Sản phẩm hiện không thể đặt mua".to_string(),
            });
        }
        if input.quantity > stock {
            return Err(AppError::InsufficientStock(format!(
                "requested {} but only {} in stock",
                input.quantity, stock
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let remaining = stock - input.quantity;

        sqlx::query(
            r#"
            INSERT INTO orders (id, product_id, buyer_id, farmer_id, quantity,
                                unit_price, total_price, status, note, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(input.product_id)
        .bind(buyer_id)
        .bind(farmer_id)
        .bind(input.quantity)
        .bind(unit_price)
        .bind(unit_price * input.quantity)
        .bind(&input.note)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let new_status = if remaining <= 0.0 {
            ProductStatus::SoldOut
        } else {
            ProductStatus::Available
        };
        sqlx::query("UPDATE products SET quantity = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(remaining)
            .bind(new_status.as_str())
            .bind(now)
            .bind(input.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_order_unchecked(id).await
    }

    /// Get an order; only its participants may read it
    pub async fn get_order(&self, caller_id: Uuid, order_id: Uuid) -> AppResult<Order> {
        let order = self.get_order_unchecked(order_id).await?;
        if order.buyer_id != caller_id && order.farmer_id != caller_id {
            return Err(AppError::InsufficientPermissions);
        }
        Ok(order)
    }

    /// List orders where the caller is either side
    pub async fn list_orders(&self, caller_id: Uuid) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {} FROM orders
            WHERE buyer_id = ? OR farmer_id = ?
            ORDER BY created_at DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(caller_id)
        .bind(caller_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Apply a lifecycle transition
    ///
    /// The farmer side may confirm, ship or cancel; the buyer side may mark
    /// delivered or cancel. Transition validity is checked against the order
    /// lifecycle; cancellation restores product stock.
    pub async fn change_status(
        &self,
        caller_id: Uuid,
        order_id: Uuid,
        next: OrderStatus,
    ) -> AppResult<Order> {
        let order = self.get_order_unchecked(order_id).await?;

        let allowed_for_caller = if caller_id == order.farmer_id {
            OrderStatus::farmer_may_set(next)
        } else if caller_id == order.buyer_id {
            OrderStatus::buyer_may_set(next)
        } else {
            false
        };
        if !allowed_for_caller {
            return Err(AppError::InsufficientPermissions);
        }

        if !order.status.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot move order from {} to {}",
                order.status, next
            )));
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(next.as_str())
            .bind(now)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        // Cancelled orders return their quantity to the listing
        if next == OrderStatus::Cancelled {
            sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity + ?, status = 'available', updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(order.quantity)
            .bind(now)
            .bind(order.product_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_order_unchecked(order_id).await
    }

    async fn get_order_unchecked(&self, order_id: Uuid) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = ?",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        row.into_order()
    }
}
