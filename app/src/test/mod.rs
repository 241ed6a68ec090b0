//! Guarded with `#[cfg(test)]` from `lib.rs`

use anyhow::Result;

use infra::persistence::{SledStorage, Storage};
use infra::store::Store;

use crate::auth::{CurrentCollege, Login};
use crate::cart::{CartCount, SetQuantity, ShowCart};
use crate::keys::Key;
use crate::menu::{Category, LookupItem, ShowMenu};
use crate::orders::{PlaceOrder, SetStatus, ShowHistory, Status};
use crate::ratings::{Averages, HasRating, ShowAverages, SubmitRating};
use crate::services::{Commandable, Queryable};
use crate::students::{CurrentStudent, SelectStudent};
use crate::Canteen;


#[test]
fn trivial_order_workflow_as_transaction_script() -> Result<()> {
    let canteen = junk_drawer::canteen();

    canteen.auth().execute(Login {
        college_name: "XYZ College".to_string(),
        password: "demo".to_string(),
    })?;
    let anita = canteen.students().execute(SelectStudent {
        student_id: "S2025001".to_string(),
    })?;

    let menu = canteen.menu().query(ShowMenu {
        category: Category::Vegetarian,
    })?;
    let dosa = menu
        .into_iter()
        .find(|i| i.name == "Masala Dosa")
        .expect("dosa on the menu");
    canteen.cart().execute(SetQuantity {
        item: dosa,
        quantity: 2,
    })?;
    let brownie = canteen
        .menu()
        .query(LookupItem {
            item_id: "des01".to_string(),
        })?
        .expect("brownie on the menu");
    canteen.cart().execute(SetQuantity {
        item: brownie,
        quantity: 1,
    })?;
    assert_eq!(canteen.cart().query(CartCount)?, 3);

    let order = canteen.orders().execute(PlaceOrder)?;
    assert_eq!(order.student_name, anita.name);
    assert_eq!(order.total, 2 * 60 + 40);

    canteen.orders().execute(SetStatus {
        entry_id: order.entry_id.clone(),
        status: Status::Completed,
    })?;
    canteen.ratings().execute(SubmitRating {
        entry_id: Some(order.entry_id),
        service_rating: 4,
        taste_rating: 5,
        comments: Some("Crispy".to_string()),
    })?;

    assert_eq!(
        canteen.ratings().query(ShowAverages)?,
        Averages {
            service: 4.0,
            taste: 5.0
        }
    );
    assert_eq!(canteen.cart().query(CartCount)?, 0);
    Ok(())
}

#[test]
fn state_survives_reopening_the_database() -> Result<()> {
    let storage = SledStorage::temporary()?;
    {
        let canteen = Canteen::new(Store::new(storage.clone()));
        canteen.setup();
        canteen.auth().execute(Login {
            college_name: "xyz college".to_string(),
            password: "demo".to_string(),
        })?;
        canteen.students().execute(SelectStudent {
            student_id: "S2025001".to_string(),
        })?;
        let wrap = canteen
            .menu()
            .query(LookupItem {
                item_id: "veg01".to_string(),
            })?
            .expect("wrap");
        canteen.cart().execute(SetQuantity {
            item: wrap,
            quantity: 1,
        })?;
        canteen.orders().execute(PlaceOrder)?;
    }

    let canteen = Canteen::new(Store::new(storage));
    canteen.setup();
    assert_eq!(
        canteen.auth().query(CurrentCollege)?,
        Some("XYZ College".to_string())
    );
    assert_eq!(
        canteen
            .students()
            .query(CurrentStudent)?
            .map(|s| s.student_id),
        Some("S2025001".to_string())
    );
    assert!(canteen.cart().query(ShowCart)?.is_empty());
    assert_eq!(canteen.orders().query(ShowHistory)?.len(), 1);
    Ok(())
}

#[test]
fn earlier_history_survives_a_new_order() -> Result<()> {
    let canteen = junk_drawer::canteen();
    canteen.store().storage().set(
        &Key::History.name(),
        r#"[{"entryId":"ORD1700000000000","timestamp":"2023-11-14T22:13:20.000Z",
            "type":"order","studentId":"S2025001","studentName":"Anita Rao",
            "items":[{"itemId":"veg03","name":"Masala Dosa","price":60,"quantity":1}],
            "status":"completed","total":60}]"#,
    )?;
    canteen.students().execute(SelectStudent {
        student_id: "S2025001".to_string(),
    })?;
    canteen.cart().execute(SetQuantity {
        item: junk_drawer::menu_item("veg01"),
        quantity: 1,
    })?;

    let placed = canteen.orders().execute(PlaceOrder)?;

    let ids = canteen
        .orders()
        .query(ShowHistory)?
        .into_iter()
        .map(|e| e.entry_id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![placed.entry_id, "ORD1700000000000".to_string()]);
    assert!(!canteen.ratings().query(HasRating {
        entry_id: "ORD1700000000000".to_string()
    })?);
    Ok(())
}

#[test]
fn corrupt_history_reads_as_empty() -> Result<()> {
    let canteen = junk_drawer::canteen();
    canteen
        .store()
        .storage()
        .set(&Key::History.name(), "[{\"entryId\": ")?;

    assert!(canteen.orders().query(ShowHistory)?.is_empty());
    Ok(())
}
