//! Row types mapping SQLite tables to the shared wire entities.
//!
//! Rows carry `owner_id`, which never leaves the server; the `From`/`TryFrom`
//! conversions strip it when producing wire types. Status columns hold the
//! enum wire strings, so the fallible conversions only fail on a corrupt row.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use shared::{
    Customer, DiningTable, Dish, DishIngredient, Ingredient, KitchenStatus, Order, OrderItem,
    OrderStatus, OrderType, PlatformAvailability, TableStatus,
};

use super::repository::RepoError;

fn corrupt(column: &str, value: &str) -> RepoError {
    RepoError::Database(format!("corrupt {column} value in database: {value}"))
}

#[derive(Debug, Clone, FromRow)]
pub struct DishRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub price_minor: i64,
    pub category: String,
    pub veg: bool,
    pub image: Option<String>,
    pub available: bool,
    pub on_restaurant: bool,
    pub on_zomato: bool,
    pub on_swiggy: bool,
    pub on_other: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DishRow {
    pub fn availability(&self) -> PlatformAvailability {
        PlatformAvailability {
            restaurant: self.on_restaurant,
            zomato: self.on_zomato,
            swiggy: self.on_swiggy,
            other: self.on_other,
        }
    }
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        let availability = row.availability();
        Dish {
            id: row.id,
            name: row.name,
            price_minor: row.price_minor,
            category: row.category,
            veg: row.veg,
            image: row.image,
            available: row.available,
            availability,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub owner_id: String,
    pub table_number: Option<String>,
    pub guests: i64,
    pub order_type: String,
    pub status: String,
    pub kitchen_status: Option<String>,
    pub total_minor: i64,
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_type: OrderType = row
            .order_type
            .parse()
            .map_err(|_| corrupt("order_type", &row.order_type))?;
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|_| corrupt("status", &row.status))?;
        let kitchen_status = row
            .kitchen_status
            .as_deref()
            .map(|s| s.parse::<KitchenStatus>().map_err(|_| corrupt("kitchen_status", s)))
            .transpose()?;
        Ok(Order {
            id: row.id,
            table_number: row.table_number,
            guests: row.guests,
            order_type,
            status,
            kitchen_status,
            total_minor: row.total_minor,
            customer_id: row.customer_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: String,
    pub order_id: String,
    pub dish_id: String,
    pub quantity: i64,
    pub price_minor: i64,
    pub notes: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            dish_id: row.dish_id,
            quantity: row.quantity,
            price_minor: row.price_minor,
            notes: row.notes,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub min_level: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            unit: row.unit,
            current_stock: row.current_stock,
            min_level: row.min_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DishIngredientRow {
    pub id: String,
    pub dish_id: String,
    pub ingredient_id: String,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
}

impl From<DishIngredientRow> for DishIngredient {
    fn from(row: DishIngredientRow) -> Self {
        DishIngredient {
            id: row.id,
            dish_id: row.dish_id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub phone: String,
    pub last_visit: Option<DateTime<Utc>>,
    pub lifetime_value_minor: i64,
    pub total_orders: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            last_visit: row.last_visit,
            lifetime_value_minor: row.lifetime_value_minor,
            total_orders: row.total_orders,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TableRow {
    pub id: String,
    pub owner_id: String,
    pub number: String,
    pub section: String,
    pub capacity: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TableRow> for DiningTable {
    type Error = RepoError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        let status: TableStatus = row
            .status
            .parse()
            .map_err(|_| corrupt("status", &row.status))?;
        Ok(DiningTable {
            id: row.id,
            number: row.number,
            section: row.section,
            capacity: row.capacity,
            status,
            created_at: row.created_at,
        })
    }
}
