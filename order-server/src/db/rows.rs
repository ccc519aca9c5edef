//! Row types and SQL shared by the SQLite and PostgreSQL stores
//!
//! Both backends accept `$N` placeholders and `ON CONFLICT .. DO UPDATE`, so
//! the statements below are used verbatim by each adapter, through
//! `impl_order_repository!`.

use shared::order::{Delivery, Item, Order, Payment};

// =============================================================================
// Statements
// =============================================================================

pub(crate) const UPSERT_ORDER: &str = r#"
    INSERT INTO orders (
        order_uid, track_number, entry, locale, internal_signature,
        customer_id, delivery_service, shardkey, sm_id, date_created, oof_shard
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    ON CONFLICT (order_uid) DO UPDATE SET
        track_number = excluded.track_number,
        entry = excluded.entry,
        locale = excluded.locale,
        internal_signature = excluded.internal_signature,
        customer_id = excluded.customer_id,
        delivery_service = excluded.delivery_service,
        shardkey = excluded.shardkey,
        sm_id = excluded.sm_id,
        date_created = excluded.date_created,
        oof_shard = excluded.oof_shard"#;

pub(crate) const UPSERT_DELIVERY: &str = r#"
    INSERT INTO deliveries (
        order_uid, name, phone, zip, city, address, region, email
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (order_uid) DO UPDATE SET
        name = excluded.name,
        phone = excluded.phone,
        zip = excluded.zip,
        city = excluded.city,
        address = excluded.address,
        region = excluded.region,
        email = excluded.email"#;

pub(crate) const UPSERT_PAYMENT: &str = r#"
    INSERT INTO payments (
        order_uid, transaction_id, request_id, currency, provider,
        amount, payment_dt, bank, delivery_cost, goods_total, custom_fee
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    ON CONFLICT (order_uid) DO UPDATE SET
        transaction_id = excluded.transaction_id,
        request_id = excluded.request_id,
        currency = excluded.currency,
        provider = excluded.provider,
        amount = excluded.amount,
        payment_dt = excluded.payment_dt,
        bank = excluded.bank,
        delivery_cost = excluded.delivery_cost,
        goods_total = excluded.goods_total,
        custom_fee = excluded.custom_fee"#;

pub(crate) const DELETE_ITEMS: &str = "DELETE FROM items WHERE order_uid = $1";

pub(crate) const INSERT_ITEM: &str = r#"
    INSERT INTO items (
        order_uid, position, chrt_id, track_number, price, rid, name,
        sale, size, total_price, nm_id, brand, status
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#;

pub(crate) const SELECT_ORDER: &str = r#"
    SELECT order_uid, track_number, entry, locale, internal_signature,
           customer_id, delivery_service, shardkey, sm_id, date_created, oof_shard
    FROM orders WHERE order_uid = $1"#;

pub(crate) const SELECT_DELIVERY: &str = r#"
    SELECT name, phone, zip, city, address, region, email
    FROM deliveries WHERE order_uid = $1"#;

pub(crate) const SELECT_PAYMENT: &str = r#"
    SELECT transaction_id, request_id, currency, provider, amount,
           payment_dt, bank, delivery_cost, goods_total, custom_fee
    FROM payments WHERE order_uid = $1"#;

pub(crate) const SELECT_ITEMS: &str = r#"
    SELECT chrt_id, track_number, price, rid, name, sale,
           size, total_price, nm_id, brand, status
    FROM items WHERE order_uid = $1
    ORDER BY position"#;

pub(crate) const SELECT_ORDER_IDS: &str = "SELECT order_uid FROM orders ORDER BY order_uid";

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i64,
    pub date_created: String,
    pub oof_shard: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DeliveryRow {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaymentRow {
    pub transaction_id: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    pub name: String,
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    pub brand: String,
    pub status: i64,
}

impl From<DeliveryRow> for Delivery {
    fn from(row: DeliveryRow) -> Self {
        Self {
            name: row.name,
            phone: row.phone,
            zip: row.zip,
            city: row.city,
            address: row.address,
            region: row.region,
            email: row.email,
        }
    }
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            transaction: row.transaction_id,
            request_id: row.request_id,
            currency: row.currency,
            provider: row.provider,
            amount: row.amount,
            payment_dt: row.payment_dt,
            bank: row.bank,
            delivery_cost: row.delivery_cost,
            goods_total: row.goods_total,
            custom_fee: row.custom_fee,
        }
    }
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            chrt_id: row.chrt_id,
            track_number: row.track_number,
            price: row.price,
            rid: row.rid,
            name: row.name,
            sale: row.sale,
            size: row.size,
            total_price: row.total_price,
            nm_id: row.nm_id,
            brand: row.brand,
            status: row.status,
        }
    }
}

/// Rebuild an [`Order`] from its four row groups, items already in position order
pub(crate) fn assemble(
    header: OrderRow,
    delivery: DeliveryRow,
    payment: PaymentRow,
    items: Vec<ItemRow>,
) -> Order {
    Order {
        order_uid: header.order_uid,
        track_number: header.track_number,
        entry: header.entry,
        delivery: delivery.into(),
        payment: payment.into(),
        items: items.into_iter().map(Item::from).collect(),
        locale: header.locale,
        internal_signature: header.internal_signature,
        customer_id: header.customer_id,
        delivery_service: header.delivery_service,
        shardkey: header.shardkey,
        sm_id: header.sm_id,
        date_created: header.date_created,
        oof_shard: header.oof_shard,
    }
}

// =============================================================================
// Repository bodies
// =============================================================================

/// Implement [`OrderRepository`](crate::db::OrderRepository) for a store over
/// an sqlx pool
///
/// The store needs a `pool` field and an inherent `begin_read` returning a
/// transaction whose reads all see one snapshot.
macro_rules! impl_order_repository {
    ($store:ty) => {
        #[::async_trait::async_trait]
        impl $crate::db::OrderRepository for $store {
            async fn save_order(
                &self,
                order: &::shared::order::Order,
            ) -> $crate::db::StoreResult<()> {
                use $crate::db::rows;

                let mut tx = self.pool.begin().await?;

                ::sqlx::query(rows::UPSERT_ORDER)
                    .bind(&order.order_uid)
                    .bind(&order.track_number)
                    .bind(&order.entry)
                    .bind(&order.locale)
                    .bind(&order.internal_signature)
                    .bind(&order.customer_id)
                    .bind(&order.delivery_service)
                    .bind(&order.shardkey)
                    .bind(order.sm_id)
                    .bind(&order.date_created)
                    .bind(&order.oof_shard)
                    .execute(&mut *tx)
                    .await?;

                let delivery = &order.delivery;
                ::sqlx::query(rows::UPSERT_DELIVERY)
                    .bind(&order.order_uid)
                    .bind(&delivery.name)
                    .bind(&delivery.phone)
                    .bind(&delivery.zip)
                    .bind(&delivery.city)
                    .bind(&delivery.address)
                    .bind(&delivery.region)
                    .bind(&delivery.email)
                    .execute(&mut *tx)
                    .await?;

                let payment = &order.payment;
                ::sqlx::query(rows::UPSERT_PAYMENT)
                    .bind(&order.order_uid)
                    .bind(&payment.transaction)
                    .bind(&payment.request_id)
                    .bind(&payment.currency)
                    .bind(&payment.provider)
                    .bind(payment.amount)
                    .bind(payment.payment_dt)
                    .bind(&payment.bank)
                    .bind(payment.delivery_cost)
                    .bind(payment.goods_total)
                    .bind(payment.custom_fee)
                    .execute(&mut *tx)
                    .await?;

                ::sqlx::query(rows::DELETE_ITEMS)
                    .bind(&order.order_uid)
                    .execute(&mut *tx)
                    .await?;

                for (position, item) in (0_i64..).zip(&order.items) {
                    ::sqlx::query(rows::INSERT_ITEM)
                        .bind(&order.order_uid)
                        .bind(position)
                        .bind(item.chrt_id)
                        .bind(&item.track_number)
                        .bind(item.price)
                        .bind(&item.rid)
                        .bind(&item.name)
                        .bind(item.sale)
                        .bind(&item.size)
                        .bind(item.total_price)
                        .bind(item.nm_id)
                        .bind(&item.brand)
                        .bind(item.status)
                        .execute(&mut *tx)
                        .await?;
                }

                tx.commit().await?;
                Ok(())
            }

            async fn get_order_by_id(
                &self,
                order_uid: &str,
            ) -> $crate::db::StoreResult<::std::option::Option<::shared::order::Order>> {
                use $crate::db::StoreError;
                use $crate::db::rows::{self, DeliveryRow, ItemRow, OrderRow, PaymentRow};

                // All four reads on one snapshot so a concurrent save is seen whole or not at all
                let mut tx = self.begin_read().await?;

                let header: Option<OrderRow> = ::sqlx::query_as(rows::SELECT_ORDER)
                    .bind(order_uid)
                    .fetch_optional(&mut *tx)
                    .await?;
                let Some(header) = header else {
                    tx.commit().await?;
                    return Ok(None);
                };

                let delivery: DeliveryRow = ::sqlx::query_as(rows::SELECT_DELIVERY)
                    .bind(order_uid)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Inconsistent(format!("order {order_uid} has no delivery"))
                    })?;

                let payment: PaymentRow = ::sqlx::query_as(rows::SELECT_PAYMENT)
                    .bind(order_uid)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Inconsistent(format!("order {order_uid} has no payment"))
                    })?;

                let items: Vec<ItemRow> = ::sqlx::query_as(rows::SELECT_ITEMS)
                    .bind(order_uid)
                    .fetch_all(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok(Some(rows::assemble(header, delivery, payment, items)))
            }

            async fn list_order_ids(&self) -> $crate::db::StoreResult<Vec<String>> {
                let ids: Vec<String> = ::sqlx::query_scalar($crate::db::rows::SELECT_ORDER_IDS)
                    .fetch_all(&self.pool)
                    .await?;
                Ok(ids)
            }
        }
    };
}

pub(crate) use impl_order_repository;
