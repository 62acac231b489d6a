//! Binding through the facade crate only.

use daedalus::prelude::*;
use http::{Method, Uri};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
struct Money {
    cents: i64,
}

impl UnmarshalParam for Money {
    fn unmarshal_param(param: &str) -> Result<Self, BoxError> {
        let (whole, frac) = param.split_once('.').unwrap_or((param, "0"));
        let cents = whole.parse::<i64>()? * 100 + frac.parse::<i64>()?;
        Ok(Self { cents })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Record)]
#[bind(crate = "daedalus::core")]
struct Order {
    #[bind(query = "sku", form = "sku")]
    skus: Vec<String>,
    quantity: u16,
    price: Option<Money>,
}

// A hand-written record, registered without the derive.
#[derive(Debug, Default, Deserialize, Serialize)]
struct Coupon {
    code: String,
}

impl daedalus::core::Record for Coupon {
    fn descriptor(&self) -> &'static daedalus::core::RecordDescriptor {
        static FIELDS: [daedalus::core::FieldDescriptor; 1] =
            [daedalus::core::FieldDescriptor::new("code").query("coupon")];
        static DESCRIPTOR: daedalus::core::RecordDescriptor =
            daedalus::core::RecordDescriptor::new("Coupon", &FIELDS);
        &DESCRIPTOR
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField> {
        match index {
            0 => Some(&mut self.code),
            _ => None,
        }
    }
}

record_field!(Coupon);

#[test]
fn test_derived_record_through_facade() {
    let ctx = RequestContextBuilder::new()
        .method(Method::GET)
        .uri(Uri::from_static("/orders?sku=a1&sku=b2&Quantity=3&price=12.50"))
        .build();

    let Bound(order) = Bound::<Order>::from_request(&ctx).unwrap();

    assert_eq!(order.skus, vec!["a1", "b2"]);
    assert_eq!(order.quantity, 3);
    assert_eq!(order.price, Some(Money { cents: 1250 }));
}

#[test]
fn test_manual_record_through_facade() {
    let ctx = RequestContextBuilder::new()
        .method(Method::DELETE)
        .uri(Uri::from_static("/coupons?coupon=SPRING"))
        .build();

    let mut coupon = Coupon::default();
    DefaultBinder::default().bind(&mut coupon, &ctx).unwrap();

    assert_eq!(coupon.code, "SPRING");
}

#[test]
fn test_walk_with_explicit_map() {
    let mut data = ParamMap::new();
    data.push("quantity", "70000");

    let mut order = Order::default();
    let err = walk(&mut order, &data, BindMode::Query).unwrap_err();

    assert!(matches!(
        err,
        BindError::Field {
            source: ConvertError::IntegerOverflow(_),
            ..
        }
    ));
}

#[test]
fn test_configured_binder() {
    let config = ConfigLoader::new()
        .with_string("[limits]\nmax_body_size = 16", "toml")
        .unwrap()
        .load()
        .unwrap();
    let binder = DefaultBinder::new(config.binder_limits());
    let ctx = RequestContextBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/orders"))
        .content_type("application/x-www-form-urlencoded")
        .body("sku=a1&sku=b2&quantity=3")
        .build();

    let mut order = Order::default();
    let err = binder.bind(&mut order, &ctx).unwrap_err();

    assert!(matches!(
        err,
        BindError::PayloadTooLarge {
            limit: 16,
            actual: 24
        }
    ));
}
