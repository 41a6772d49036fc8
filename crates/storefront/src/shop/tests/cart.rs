use rust_decimal::Decimal;

use super::common::*;
use crate::shop::cart::{Cart, CartError, SMALL_ORDER_FEE};

fn cart_with(prices: &[i64]) -> Cart {
    let mut cart = Cart::default();
    for (index, cents) in prices.iter().enumerate() {
        cart.add(item(&format!("item-{index}"), *cents));
    }
    cart
}

#[test]
fn small_order_pays_fee() {
    let mut cart = Cart::default();
    cart.add(item("A", 1200));
    cart.add(item("B", 500));

    assert_eq!(cart.subtotal(), Decimal::new(1700, 2));
    assert_eq!(Cart::delivery_fee(cart.subtotal()), Decimal::new(299, 2));
    assert_eq!(cart.total(), Decimal::new(1999, 2));
}

#[test]
fn threshold_order_ships_free() {
    let cart = cart_with(&[2500]);
    assert_eq!(Cart::delivery_fee(cart.subtotal()), Decimal::ZERO);
    assert_eq!(cart.total(), Decimal::new(2500, 2));

    let exactly_twenty = cart_with(&[1000, 1000]);
    assert_eq!(Cart::delivery_fee(exactly_twenty.subtotal()), Decimal::ZERO);

    let just_below = cart_with(&[1999]);
    assert_eq!(Cart::delivery_fee(just_below.subtotal()), SMALL_ORDER_FEE);
}

#[test]
fn total_is_subtotal_plus_fee() {
    for prices in [&[][..], &[150][..], &[999, 1001][..], &[450, 450, 450, 450, 450][..]] {
        let cart = cart_with(prices);
        let subtotal = cart.subtotal();
        assert_eq!(cart.total(), subtotal + Cart::delivery_fee(subtotal));
    }
}

#[test]
fn duplicates_are_kept_in_order() {
    let mut cart = Cart::default();
    let burger = item("Burger", 1290);
    cart.add(burger.clone());
    cart.add(item("Fries", 350));
    cart.add(burger.clone());

    assert_eq!(cart.len(), 3);
    assert_eq!(cart.entries()[0], burger);
    assert_eq!(cart.entries()[2], burger);
}

#[test]
fn remove_at_keeps_relative_order() {
    let mut cart = Cart::default();
    cart.add(item("first", 100));
    cart.add(item("second", 200));
    cart.add(item("third", 300));

    let removed = cart.remove_at(1).expect("position exists");
    assert_eq!(removed.name, "second");
    let names: Vec<&str> = cart.entries().iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["first", "third"]);
}

#[test]
fn remove_at_rejects_invalid_positions() {
    let mut cart = cart_with(&[100, 200]);
    assert_eq!(
        cart.remove_at(2),
        Err(CartError::IndexOutOfRange { position: 2, len: 2 })
    );
    assert_eq!(cart.len(), 2);

    let mut empty = Cart::default();
    assert!(empty.remove_at(0).is_err());
}

#[test]
fn summary_reports_positions_and_remaining_spend() {
    let cart = cart_with(&[1200, 500]);
    let summary = cart.summary();

    assert_eq!(summary.entries.len(), 2);
    assert_eq!(summary.entries[1].position, 1);
    assert_eq!(summary.total, Decimal::new(1999, 2));
    assert_eq!(summary.until_free_delivery, Decimal::new(300, 2));

    let free = cart_with(&[2600]).summary();
    assert_eq!(free.until_free_delivery, Decimal::ZERO);
    assert_eq!(free.delivery_fee, Decimal::ZERO);
}
