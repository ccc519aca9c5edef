//! Fixtures and behaviour checks shared by the store adapter tests

use super::repository::OrderRepository;
use shared::order::{Delivery, Item, Order, Payment};
use std::sync::Arc;

pub(crate) fn item(chrt_id: i64, name: &str) -> Item {
    Item {
        chrt_id,
        track_number: "WBILMTESTTRACK".into(),
        price: 453,
        rid: format!("rid-{chrt_id}"),
        name: name.into(),
        sale: 30,
        size: "0".into(),
        total_price: 317,
        nm_id: 2389212,
        brand: "Vivienne Sabo".into(),
        status: 202,
    }
}

pub(crate) fn order(uid: &str, items: Vec<Item>) -> Order {
    Order {
        order_uid: uid.into(),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        delivery: Delivery {
            name: "Test Testov".into(),
            city: "Kiryat Mozkin".into(),
            ..Default::default()
        },
        payment: Payment {
            transaction: uid.into(),
            currency: "USD".into(),
            amount: 1817,
            ..Default::default()
        },
        items,
        locale: "en".into(),
        customer_id: "test".into(),
        sm_id: 99,
        date_created: "2021-11-26T06:22:19Z".into(),
        ..Default::default()
    }
}

/// Save, read back, then resave with a new header and fewer items
pub(crate) async fn check_save_and_resave(store: &dyn OrderRepository) {
    let first = order("o1", vec![item(1, "a"), item(2, "b"), item(3, "c")]);
    store.save_order(&first).await.unwrap();
    assert_eq!(store.get_order_by_id("o1").await.unwrap().unwrap(), first);

    let mut updated = order("o1", vec![item(9, "z")]);
    updated.track_number = "NEWTRACK".into();
    updated.payment.amount = 42;
    updated.delivery.city = "Haifa".into();
    store.save_order(&updated).await.unwrap();

    assert_eq!(store.get_order_by_id("o1").await.unwrap().unwrap(), updated);
    assert!(store.get_order_by_id("missing").await.unwrap().is_none());
    assert_eq!(store.list_order_ids().await.unwrap(), vec!["o1"]);
}

/// Reads racing saves of one id return a saved version, never a mix of two
pub(crate) async fn check_reads_during_saves(store: Arc<dyn OrderRepository>, saves: usize) {
    let mut a = order("o1", vec![item(1, "a")]);
    a.payment.transaction = "A".into();
    let mut b = order("o1", vec![item(2, "b"), item(3, "c")]);
    b.payment.transaction = "B".into();
    b.track_number = "TRACK-B".into();
    store.save_order(&a).await.unwrap();

    let writer = {
        let store = store.clone();
        let (a, b) = (a.clone(), b.clone());
        tokio::spawn(async move {
            for round in 0..saves {
                let version = if round % 2 == 0 { &b } else { &a };
                store.save_order(version).await.unwrap();
            }
        })
    };

    loop {
        let got = store.get_order_by_id("o1").await.unwrap().unwrap();
        assert!(
            got == a || got == b,
            "read mixed versions: transaction={} items={:?}",
            got.payment.transaction,
            got.items.iter().map(|i| i.chrt_id).collect::<Vec<_>>()
        );
        if writer.is_finished() {
            break;
        }
    }
    writer.await.unwrap();
}
