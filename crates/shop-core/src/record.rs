//! # Transport Records
//!
//! Wire-format projections of stored entities. Each record is an explicit
//! allow-list: only the fields named in `FIELDS` ever leave the service,
//! and nested entities are embedded as read-only sub-records.
//!
//! ```text
//! OrderRecord
//!  ├── user: UserRecord
//!  └── items: [OrderItemRecord]
//!               └── product: ProductRecord
//!                             └── category: CategoryRecord
//! ```

use crate::order::{OrderLine, OrderStatus, OrderWithItems};
use crate::product::{Category, ProductWithCategory};
use crate::user::User;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A serializable projection with a fixed field list
pub trait Record: Serialize {
    /// Serialized field names, in wire order
    const FIELDS: &'static [&'static str];
}

/// Public view of a user. Credentials and role flags are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl Record for UserRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "first_name",
        "last_name",
        "phone",
        "address",
    ];
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl Record for CategoryRecord {
    const FIELDS: &'static [&'static str] = &["id", "name", "slug", "description"];
}

impl From<&Category> for CategoryRecord {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category: CategoryRecord,
    pub image: Option<String>,
    pub stock: u32,
    pub is_in_stock: bool,
}

impl Record for ProductRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "slug",
        "description",
        "price",
        "category",
        "image",
        "stock",
        "is_in_stock",
    ];
}

impl From<&ProductWithCategory> for ProductRecord {
    fn from(entry: &ProductWithCategory) -> Self {
        let product = &entry.product;
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            category: CategoryRecord::from(&entry.category),
            image: product.image.clone(),
            stock: product.stock,
            is_in_stock: product.is_in_stock(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemRecord {
    pub id: i64,
    pub product: ProductRecord,
    pub quantity: u32,
    pub price: Decimal,
    pub total_price: Decimal,
}

impl Record for OrderItemRecord {
    const FIELDS: &'static [&'static str] = &["id", "product", "quantity", "price", "total_price"];
}

impl From<&OrderLine> for OrderItemRecord {
    fn from(line: &OrderLine) -> Self {
        Self {
            id: line.item.id,
            product: ProductRecord::from(&line.product),
            quantity: line.item.quantity,
            price: line.item.price,
            total_price: line.item.total_price(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub id: i64,
    pub user: UserRecord,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub items: Vec<OrderItemRecord>,
    pub created_at: DateTime<Utc>,
}

impl Record for OrderRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "user",
        "status",
        "total_amount",
        "shipping_address",
        "items",
        "created_at",
    ];
}

impl From<&OrderWithItems> for OrderRecord {
    fn from(entry: &OrderWithItems) -> Self {
        Self {
            id: entry.order.id,
            user: UserRecord::from(&entry.user),
            status: entry.order.status,
            total_amount: entry.order.total_amount,
            shipping_address: entry.order.shipping_address.clone(),
            items: entry.lines.iter().map(OrderItemRecord::from).collect(),
            created_at: entry.order.created_at,
        }
    }
}

/// Project a slice of entities into records
pub fn project_all<'a, E: 'a, R>(entities: impl IntoIterator<Item = &'a E>) -> Vec<R>
where
    R: From<&'a E>,
{
    entities.into_iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Order, OrderItem};
    use crate::product::Product;
    use crate::user::NewUser;
    use serde_json::Value;
    use std::collections::BTreeSet;

    fn keys(value: &Value) -> BTreeSet<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    fn field_set<R: Record>() -> BTreeSet<String> {
        R::FIELDS.iter().map(|f| f.to_string()).collect()
    }

    fn red_phone(stock: u32) -> ProductWithCategory {
        ProductWithCategory {
            product: Product::new(1, "Red Phone", "red-phone", Decimal::new(19999, 2), 1)
                .with_stock(stock),
            category: Category::new(1, "Phones", "phones"),
        }
    }

    fn sample_order() -> OrderWithItems {
        let user = NewUser::customer("alice", "alice@example.com", "$argon2id$secret").into_user(1);
        OrderWithItems {
            order: Order {
                id: 10,
                user_id: 1,
                status: OrderStatus::Paid,
                total_amount: Decimal::new(39998, 2),
                shipping_address: "1 Main St".into(),
                created_at: Utc::now(),
            },
            user,
            lines: vec![OrderLine {
                item: OrderItem {
                    id: 100,
                    order_id: 10,
                    product_id: 1,
                    quantity: 2,
                    price: Decimal::new(19999, 2),
                },
                product: red_phone(0),
            }],
        }
    }

    #[test]
    fn test_stock_drives_is_in_stock() {
        assert!(!ProductRecord::from(&red_phone(0)).is_in_stock);
        assert!(ProductRecord::from(&red_phone(5)).is_in_stock);
    }

    #[test]
    fn test_price_serializes_as_string() {
        let json = serde_json::to_value(ProductRecord::from(&red_phone(1))).unwrap();
        assert_eq!(json["price"], "199.99");
        assert_eq!(json["category"]["slug"], "phones");
        assert_eq!(json["image"], Value::Null);
    }

    #[test]
    fn test_user_record_hides_credentials() {
        let user = NewUser::customer("alice", "alice@example.com", "$argon2id$secret")
            .staff()
            .into_user(1);
        let json = serde_json::to_string(&UserRecord::from(&user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("is_staff"));
    }

    #[test]
    fn test_order_record_nests_user_items_and_product() {
        let record = OrderRecord::from(&sample_order());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["user"]["username"], "alice");
        assert_eq!(json["status"], "paid");
        assert_eq!(json["items"][0]["total_price"], "399.98");
        assert_eq!(json["items"][0]["product"]["name"], "Red Phone");
    }

    #[test]
    fn test_serialized_keys_match_field_lists() {
        let order = serde_json::to_value(OrderRecord::from(&sample_order())).unwrap();
        assert_eq!(keys(&order), field_set::<OrderRecord>());
        assert_eq!(keys(&order["user"]), field_set::<UserRecord>());
        assert_eq!(keys(&order["items"][0]), field_set::<OrderItemRecord>());
        assert_eq!(keys(&order["items"][0]["product"]), field_set::<ProductRecord>());
        assert_eq!(
            keys(&order["items"][0]["product"]["category"]),
            field_set::<CategoryRecord>()
        );
    }

    #[test]
    fn test_project_all() {
        let categories = vec![
            Category::new(1, "Phones", "phones"),
            Category::new(2, "Laptops", "laptops"),
        ];
        let records: Vec<CategoryRecord> = project_all(&categories);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].slug, "laptops");
    }
}
