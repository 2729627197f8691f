use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    CustomerId, InventoryId, InventorySnapshot, NewInventorySnapshot, NewOrder, OrderId,
    OrderRecord, OrderSummary, Result, StoreError,
    store::{OrderStore, OrderTransaction},
};

const CUSTOMER_FK: &str = "customer_order_customer_id_fkey";

const SELECT_CURRENT_INVENTORY: &str = r#"
    SELECT inventory_id, total_quantity, price, last_updated
    FROM inventory_available
    ORDER BY last_updated DESC, inventory_id DESC
    LIMIT 1
"#;

const SELECT_ORDER_SUMMARIES: &str = r#"
    SELECT co.id, co.customer_id, co.num_gallons_order, co.date, co.date_created,
           co.total_price, co.status, a.firstname, a.lastname
    FROM customer_order co
    LEFT JOIN accounts a ON co.customer_id = a.id
"#;

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::debug!("order store migrations applied");
        Ok(())
    }

    fn row_to_snapshot(row: &PgRow) -> Result<InventorySnapshot> {
        Ok(InventorySnapshot {
            inventory_id: InventoryId::new(row.try_get("inventory_id")?),
            total_quantity: row.try_get("total_quantity")?,
            price: row.try_get("price")?,
            last_updated: row.try_get("last_updated")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<OrderRecord> {
        Ok(OrderRecord {
            id: OrderId::new(row.try_get("id")?),
            customer_id: CustomerId::new(row.try_get("customer_id")?),
            num_gallons_order: row.try_get("num_gallons_order")?,
            date: row.try_get("date")?,
            date_created: row.try_get("date_created")?,
            total_price: row.try_get("total_price")?,
            status: row.try_get("status")?,
        })
    }

    fn row_to_summary(row: PgRow) -> Result<OrderSummary> {
        Ok(OrderSummary {
            order: Self::row_to_order(&row)?,
            customer_first_name: row.try_get("firstname")?,
            customer_last_name: row.try_get("lastname")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }

    async fn current_inventory(&self) -> Result<Option<InventorySnapshot>> {
        let row = sqlx::query(SELECT_CURRENT_INVENTORY)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_snapshot).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn insert_inventory(&self, snapshot: NewInventorySnapshot) -> Result<InventorySnapshot> {
        snapshot.validate()?;

        let row = sqlx::query(
            r#"
            INSERT INTO inventory_available (total_quantity, price, last_updated)
            VALUES ($1, $2, clock_timestamp())
            RETURNING inventory_id, total_quantity, price, last_updated
            "#,
        )
        .bind(snapshot.total_quantity)
        .bind(snapshot.price)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_snapshot(&row)
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
        let sql = format!("{SELECT_ORDER_SUMMARIES} ORDER BY co.id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Self::row_to_summary).collect()
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderSummary>> {
        let sql = format!("{SELECT_ORDER_SUMMARIES} WHERE co.id = $1");
        let row = sqlx::query(&sql)
            .bind(order_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_summary).transpose()
    }
}

/// Transaction over a pooled PostgreSQL connection.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PostgresTransaction {
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderRecord> {
        order.validate()?;

        let customer_id = order.customer_id;
        let row = sqlx::query(
            r#"
            INSERT INTO customer_order
                (customer_id, num_gallons_order, date, date_created, total_price, status)
            VALUES ($1, $2, $3, NOW(), $4, $5)
            RETURNING id, customer_id, num_gallons_order, date, date_created, total_price, status
            "#,
        )
        .bind(customer_id.as_i64())
        .bind(order.num_gallons_order)
        .bind(order.date)
        .bind(order.total_price)
        .bind(&order.status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some(CUSTOMER_FK)
            {
                tracing::debug!(%customer_id, "order references unknown customer");
                return StoreError::CustomerNotFound(customer_id);
            }
            StoreError::Database(e)
        })?;

        PostgresOrderStore::row_to_order(&row)
    }

    async fn draw_down_inventory(&mut self, gallons: i64) -> Result<InventorySnapshot> {
        // The subquery locks the current row, so a concurrent draw-down waits
        // and then re-evaluates the stock guard against the committed value.
        let row = sqlx::query(
            r#"
            UPDATE inventory_available
            SET total_quantity = total_quantity - $1,
                last_updated = clock_timestamp()
            WHERE inventory_id = (
                SELECT inventory_id
                FROM inventory_available
                ORDER BY last_updated DESC, inventory_id DESC
                LIMIT 1
                FOR UPDATE
            )
            AND total_quantity >= $1
            RETURNING inventory_id, total_quantity, price, last_updated
            "#,
        )
        .bind(gallons)
        .fetch_optional(&mut *self.tx)
        .await?;

        if let Some(row) = row {
            return PostgresOrderStore::row_to_snapshot(&row);
        }

        let current = sqlx::query(SELECT_CURRENT_INVENTORY)
            .fetch_optional(&mut *self.tx)
            .await?;

        match current {
            Some(row) => {
                let available: i64 = row.try_get("total_quantity")?;
                tracing::debug!(requested = gallons, available, "draw-down refused");
                Err(StoreError::InsufficientStock {
                    requested: gallons,
                    available,
                })
            }
            None => {
                tracing::debug!("draw-down on empty inventory ledger");
                Err(StoreError::NoInventory)
            }
        }
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
