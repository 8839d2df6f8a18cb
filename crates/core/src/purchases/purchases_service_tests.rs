#[cfg(test)]
mod tests {
    use crate::purchases::{
        NewVirtualPurchase, PurchaseServiceTrait, VirtualPurchaseUpdate,
    };
    use crate::test_support::{quote, ymd, Fixture};

    fn fixture_with_price(price: f64) -> Fixture {
        Fixture::new(
            vec![
                quote("ANZ", ymd(2024, 5, 1), 25.0, 5.0, 0.1),
                quote("ANZ", ymd(2024, 5, 2), 25.5, 5.0, 0.2),
                quote("XYZ", ymd(2024, 5, 2), price, 0.0, 0.0),
            ],
            vec![],
        )
    }

    fn new_purchase(code: &str) -> NewVirtualPurchase {
        NewVirtualPurchase {
            asx_code: code.to_string(),
            buy_date: ymd(2024, 5, 2),
            price_at_buy_date: 10.0,
            amount: 5000.0,
            n: None,
        }
    }

    #[test]
    fn defaults_use_latest_price_and_default_amount() {
        let service = fixture_with_price(10.0).purchase_service();
        let defaults = service.purchase_defaults("XYZ", None).unwrap().unwrap();
        assert_eq!(defaults.amount, 5000.0);
        assert_eq!(defaults.n, 500);
        assert_eq!(defaults.buy_date, ymd(2024, 5, 2));
        assert_eq!(defaults.price_at_buy_date, 10.0);

        let custom = service.purchase_defaults("XYZ", Some(1234.0)).unwrap().unwrap();
        assert_eq!(custom.n, 123);
    }

    #[test]
    fn zero_price_yields_no_defaults() {
        let service = fixture_with_price(0.0).purchase_service();
        assert!(service.purchase_defaults("XYZ", None).unwrap().is_none());
        assert!(service.purchase_defaults("NOPE", None).unwrap().is_none());
    }

    #[tokio::test]
    async fn create_derives_share_count_and_groups_by_code() {
        let service = fixture_with_price(10.0).purchase_service();
        let created = service.create_purchase("u1", new_purchase("xyz")).await.unwrap();
        assert_eq!(created.asx_code, "XYZ");
        assert_eq!(created.n, 500);
        assert_eq!(created.user_id, "u1");
        assert!(uuid::Uuid::parse_str(&created.id).is_ok());

        let grouped = service.user_purchases("u1").unwrap();
        assert_eq!(grouped.get("XYZ").map(Vec::len), Some(1));
        assert!(service.user_purchases("u2").unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_purchase_is_not_found() {
        let service = fixture_with_price(10.0).purchase_service();
        let created = service.create_purchase("u1", new_purchase("XYZ")).await.unwrap();

        assert!(service.get_purchase("u2", &created.id).unwrap_err().is_not_found());
        let changes = VirtualPurchaseUpdate {
            buy_date: ymd(2024, 5, 1),
            price_at_buy_date: 9.0,
            amount: 900.0,
            n: 100,
        };
        let err = service
            .update_purchase("u2", &created.id, changes.clone())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(service
            .delete_purchase("u2", &created.id)
            .await
            .unwrap_err()
            .is_not_found());

        let updated = service
            .update_purchase("u1", &created.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.asx_code, "XYZ");
        assert_eq!(updated.n, 100);

        service.delete_purchase("u1", &created.id).await.unwrap();
        assert!(service.get_purchase("u1", &created.id).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn mismatching_share_count_is_rejected() {
        let service = fixture_with_price(10.0).purchase_service();
        let mut purchase = new_purchase("XYZ");
        purchase.n = Some(7);
        let err = service.create_purchase("u1", purchase).await.unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
    }
}
