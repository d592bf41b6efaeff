use rusqlite::Connection;

use crate::db::kv;
use crate::errors::{AppError, AppResult};
use crate::models::{CartItem, CartItemPatch, StoredCart};

pub fn cart_key(user_id: &str) -> String {
    format!("cart:{user_id}")
}

pub fn get_cart(conn: &Connection, user_id: &str) -> AppResult<StoredCart> {
    let cart = kv::get_json::<Vec<CartItem>>(conn, &cart_key(user_id))?
        .map(|(items, version)| StoredCart { items, version })
        .unwrap_or_default();
    Ok(cart)
}

/// Append an item. An empty or already-used id is replaced with a fresh one.
pub fn add_item(
    conn: &Connection,
    user_id: &str,
    item: CartItem,
    expected_version: Option<i64>,
) -> AppResult<(CartItem, i64)> {
    let mut cart = get_cart(conn, user_id)?;
    check_version(&cart, expected_version)?;

    let mut item = item;
    if item.id.is_empty() || cart.items.iter().any(|i| i.id == item.id) {
        item.id = uuid::Uuid::new_v4().to_string();
    }
    let guests = item.guests;
    let item = item.with_guests(guests);

    cart.items.push(item.clone());
    let version = write(conn, user_id, &cart)?;

    tracing::info!(user_id, item_id = %item.id, service_id = %item.service_id, "cart item added");
    Ok((item, version))
}

/// Merge `patch` into the item with `item_id`. Missing items are left alone
/// and the current version is returned unchanged.
pub fn update_item(
    conn: &Connection,
    user_id: &str,
    item_id: &str,
    patch: &CartItemPatch,
    expected_version: Option<i64>,
) -> AppResult<i64> {
    let mut cart = get_cart(conn, user_id)?;
    check_version(&cart, expected_version)?;

    let Some(item) = cart.items.iter_mut().find(|i| i.id == item_id) else {
        tracing::debug!(user_id, item_id, "cart item not found, nothing to update");
        return Ok(cart.version);
    };
    item.apply_patch(patch);

    let version = write(conn, user_id, &cart)?;
    tracing::info!(user_id, item_id, "cart item updated");
    Ok(version)
}

pub fn remove_item(
    conn: &Connection,
    user_id: &str,
    item_id: &str,
    expected_version: Option<i64>,
) -> AppResult<i64> {
    let mut cart = get_cart(conn, user_id)?;
    check_version(&cart, expected_version)?;

    let before = cart.items.len();
    cart.items.retain(|i| i.id != item_id);
    if cart.items.len() == before {
        return Ok(cart.version);
    }

    let version = write(conn, user_id, &cart)?;
    tracing::info!(user_id, item_id, "cart item removed");
    Ok(version)
}

/// Empty the cart. Writes an empty list rather than dropping the row so the
/// version keeps increasing across clears.
pub fn clear(conn: &Connection, user_id: &str) -> AppResult<i64> {
    let version = kv::set_json::<Vec<CartItem>>(conn, &cart_key(user_id), &Vec::new())?;
    tracing::info!(user_id, "cart cleared");
    Ok(version)
}

fn check_version(cart: &StoredCart, expected: Option<i64>) -> AppResult<()> {
    match expected {
        Some(v) if v != cart.version => Err(AppError::Conflict(format!(
            "cart was modified elsewhere (expected version {v}, found {})",
            cart.version
        ))),
        _ => Ok(()),
    }
}

fn write(conn: &Connection, user_id: &str, cart: &StoredCart) -> AppResult<i64> {
    let key = cart_key(user_id);
    let value = serde_json::to_string(&cart.items)?;
    // The read above saw `cart.version`; only write if nobody got in between.
    kv::compare_and_set(conn, &key, &value, cart.version)?.ok_or_else(|| {
        AppError::Conflict("cart was modified concurrently, refresh and retry".to_string())
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::db;
    use crate::models::DateRange;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn item(id: &str, price: f64, guests: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            service_id: "bear-hunt".to_string(),
            title: "Brown bear hunt".to_string(),
            supplier: "Taiga Outfitters".to_string(),
            image: String::new(),
            location: "Kamchatka".to_string(),
            duration: "3 days".to_string(),
            dates: DateRange::for_duration(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 3),
            time_slot: Some("bear-hunt-2025-07-01-morning".to_string()),
            guests,
            price,
            total_price: 0.0,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_cart() {
        let conn = setup_db();
        let cart = get_cart(&conn, "u1").unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.version, 0);
    }

    #[test]
    fn test_add_assigns_id_and_prices() {
        let conn = setup_db();
        let (added, version) = add_item(&conn, "u1", item("", 500.0, 2), None).unwrap();
        assert!(!added.id.is_empty());
        assert_eq!(added.total_price, 1000.0);
        assert_eq!(version, 1);

        let cart = get_cart(&conn, "u1").unwrap();
        assert_eq!(cart.items, vec![added]);
        assert_eq!(cart.version, 1);
    }

    #[test]
    fn test_add_duplicate_id_gets_new_id() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 100.0, 1), None).unwrap();
        let (second, _) = add_item(&conn, "u1", item("a", 100.0, 1), None).unwrap();
        assert_ne!(second.id, "a");
        assert_eq!(get_cart(&conn, "u1").unwrap().items.len(), 2);
    }

    #[test]
    fn test_carts_are_per_user() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 100.0, 1), None).unwrap();
        assert!(get_cart(&conn, "u2").unwrap().items.is_empty());
    }

    #[test]
    fn test_update_guests_reprices() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 500.0, 2), None).unwrap();
        update_item(
            &conn,
            "u1",
            "a",
            &CartItemPatch {
                guests: Some(3),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        let cart = get_cart(&conn, "u1").unwrap();
        assert_eq!(cart.items[0].guests, 3);
        assert_eq!(cart.items[0].total_price, 1500.0);
    }

    #[test]
    fn test_update_missing_item_is_noop() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 500.0, 2), None).unwrap();
        let before = get_cart(&conn, "u1").unwrap();

        let version = update_item(
            &conn,
            "u1",
            "nonexistent-id",
            &CartItemPatch {
                guests: Some(9),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        assert_eq!(version, before.version);
        assert_eq!(get_cart(&conn, "u1").unwrap(), before);
    }

    #[test]
    fn test_remove_item() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 500.0, 3), None).unwrap();
        add_item(&conn, "u1", item("b", 100.0, 1), None).unwrap();

        remove_item(&conn, "u1", "a", None).unwrap();
        let cart = get_cart(&conn, "u1").unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_amount(), 100.0);

        // Removing again changes nothing
        let version = remove_item(&conn, "u1", "a", None).unwrap();
        assert_eq!(version, cart.version);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 500.0, 1), None).unwrap();

        clear(&conn, "u1").unwrap();
        assert!(get_cart(&conn, "u1").unwrap().items.is_empty());
        clear(&conn, "u1").unwrap();
        assert!(get_cart(&conn, "u1").unwrap().items.is_empty());
    }

    #[test]
    fn test_clear_keeps_version_increasing() {
        let conn = setup_db();
        let (_, v1) = add_item(&conn, "u1", item("a", 500.0, 1), None).unwrap();
        let v2 = clear(&conn, "u1").unwrap();
        assert!(v2 > v1);

        // A writer still holding the pre-clear version is rejected
        let stale = add_item(&conn, "u1", item("b", 100.0, 1), Some(v1));
        assert!(matches!(stale, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_stale_version_conflicts() {
        let conn = setup_db();
        let (_, v1) = add_item(&conn, "u1", item("a", 500.0, 1), Some(0)).unwrap();
        add_item(&conn, "u1", item("b", 100.0, 1), Some(v1)).unwrap();

        // Second tab still on v1
        let result = update_item(
            &conn,
            "u1",
            "a",
            &CartItemPatch {
                guests: Some(2),
                ..Default::default()
            },
            Some(v1),
        );
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(get_cart(&conn, "u1").unwrap().items[0].guests, 1);
    }

    #[test]
    fn test_total_additivity() {
        let conn = setup_db();
        add_item(&conn, "u1", item("a", 500.0, 2), None).unwrap();
        add_item(&conn, "u1", item("b", 75.5, 4), None).unwrap();
        add_item(&conn, "u1", item("c", 20.0, 1), None).unwrap();
        update_item(
            &conn,
            "u1",
            "b",
            &CartItemPatch {
                guests: Some(2),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        remove_item(&conn, "u1", "c", None).unwrap();

        let cart = get_cart(&conn, "u1").unwrap();
        let expected: f64 = cart.items.iter().map(|i| i.total_price).sum();
        assert_eq!(cart.total_amount(), expected);
        assert_eq!(cart.total_amount(), 1000.0 + 151.0);
    }
}
