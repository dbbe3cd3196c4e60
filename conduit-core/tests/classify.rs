#[cfg(test)]
mod tests {
    use conduit_core::{BindType, BoundParameter, Value, classify, coerce, error_kind};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn classification() {
        assert_eq!(classify(&Value::Null), BindType::Null);
        assert_eq!(classify(&Value::Varchar(None)), BindType::Null);
        assert_eq!(classify(&Value::Int64(None)), BindType::Null);
        assert_eq!(classify(&true.into()), BindType::Boolean);
        assert_eq!(classify(&false.into()), BindType::Boolean);
        assert_eq!(classify(&42.into()), BindType::Integer);
        assert_eq!(classify(&3.14.into()), BindType::Integer);
        assert_eq!(classify(&u64::MAX.into()), BindType::Integer);
        assert_eq!(
            classify(&Decimal::from_str("63.245").unwrap().into()),
            BindType::Integer
        );
        assert_eq!(classify(&"abc".into()), BindType::String);
        assert_eq!(classify(&"42".into()), BindType::Integer);
        assert_eq!(classify(&" -1.5e3 ".into()), BindType::Integer);
        assert_eq!(classify(&"".into()), BindType::String);
        assert_eq!(classify(&"0x1A".into()), BindType::String);
        assert_eq!(classify(&vec![1u8, 2, 3].into()), BindType::String);
        assert_eq!(classify(&Uuid::nil().into()), BindType::String);
        assert_eq!(classify(&Option::<i32>::None.into()), BindType::Null);
    }

    #[test]
    fn codes() {
        assert_eq!(BindType::Null.code(), 0);
        assert_eq!(BindType::Integer.code(), 1);
        assert_eq!(BindType::String.code(), 2);
        assert_eq!(BindType::Boolean.code(), 5);
        assert_eq!(BindType::Integer.to_string(), "integer");
    }

    #[test]
    fn coercion() {
        assert_eq!(
            coerce(&3.99.into(), BindType::Integer).unwrap(),
            Value::Int64(Some(3))
        );
        assert_eq!(
            coerce(&(-3.99).into(), BindType::Integer).unwrap(),
            Value::Int64(Some(-3))
        );
        assert_eq!(
            coerce(&"42".into(), BindType::Integer).unwrap(),
            Value::Int64(Some(42))
        );
        assert_eq!(
            coerce(&Decimal::from_str("63.245").unwrap().into(), BindType::Integer).unwrap(),
            Value::Int64(Some(63))
        );
        assert!(coerce(&u64::MAX.into(), BindType::Integer).is_err());
        assert!(coerce(&f64::NAN.into(), BindType::Integer).is_err());
        assert_eq!(
            coerce(&"John".into(), BindType::String).unwrap(),
            Value::Varchar(Some("John".into()))
        );
        assert_eq!(
            coerce(&7.into(), BindType::String).unwrap(),
            Value::Varchar(Some("7".into()))
        );
        assert_eq!(
            coerce(&Uuid::nil().into(), BindType::String).unwrap(),
            Value::Uuid(Some(Uuid::nil()))
        );
        assert_eq!(
            coerce(&Value::Varchar(None), BindType::Null).unwrap(),
            Value::Null
        );
        assert_eq!(
            coerce(&true.into(), BindType::Boolean).unwrap(),
            Value::Boolean(Some(true))
        );
    }

    #[test]
    fn bound_parameter() {
        let parameter = BoundParameter::new(":name", "John");
        assert_eq!(parameter.name(), "name");
        assert_eq!(parameter.bind_type(), BindType::String);
        assert_eq!(parameter.value(), &Value::Varchar(Some("John".into())));

        let parameter = BoundParameter::new("weight", "63.245");
        assert_eq!(parameter.bind_type(), BindType::Integer);
        assert_eq!(parameter.coerced().unwrap(), Value::Int64(Some(63)));

        let error = BoundParameter::new("big", u64::MAX)
            .coerced()
            .expect_err("Out of range");
        let kind = error_kind(&error).expect("Classified error");
        assert!(kind.is_bind());
        assert_eq!(kind.to_string(), "cannot bind the parameter `:big`");
    }
}
