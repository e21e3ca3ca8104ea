#[cfg(test)]
mod tests {
    use quill_core::{AsValue, KeyValue, QueryError, Value};
    use rust_decimal::Decimal;
    use std::borrow::Cow;
    use time::{Date, Month, PrimitiveDateTime, Time};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::default(), Value::Null);
        assert!(Value::Null.is_null());
        assert_ne!(Value::Int32(0), Value::Null);
        let v: Option<i32> = AsValue::try_from_value(Value::Null).unwrap();
        assert_eq!(v, None);
        assert_eq!(None::<String>.as_value(), Value::Null);
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(true));
        assert_ne!(val, Value::Varchar("true".into()));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::Int32(0)).unwrap(), false);
        assert_eq!(bool::try_from_value(Value::Int64(5)).unwrap(), true);
        assert!(bool::try_from_value(Value::Float64(0.5)).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(Value::from(127i8), Value::Int32(127));
        assert_eq!(Value::from(-32768i16), Value::Int32(-32768));
        assert_eq!(Value::from(u32::MAX), Value::Int64(u32::MAX as i64));
        assert_eq!(Value::from(i64::MIN), Value::Int64(i64::MIN));
        assert_eq!(i8::try_from_value(Value::Int64(-128)).unwrap(), -128);
        assert!(i8::try_from_value(Value::Int64(128)).is_err());
        assert!(u8::try_from_value(Value::Int32(-1)).is_err());
        assert_eq!(i32::try_from_value(Value::Int64(77)).unwrap(), 77);
        assert_eq!(i64::try_from_value(Value::Varchar(" 42 ".into())).unwrap(), 42);
        assert_eq!(
            i64::try_from_value(Value::Decimal(Decimal::new(300, 1))).unwrap(),
            30
        );
        assert!(i64::try_from_value(Value::Decimal(Decimal::new(305, 1))).is_err());
        assert!(i32::try_from_value(Value::Varchar("forty".into())).is_err());
        assert!(i32::try_from_value(Value::Null).is_err());
    }

    #[test]
    fn value_float_decimal() {
        assert_eq!(Value::from(1.5), Value::Float64(1.5));
        assert_eq!(f64::try_from_value(Value::Int32(3)).unwrap(), 3.0);
        let decimal = Decimal::new(12345, 2);
        assert_eq!(decimal.as_value(), Value::Decimal(decimal));
        assert_eq!(
            Decimal::try_from_value(Value::Varchar("123.45".into())).unwrap(),
            decimal
        );
        assert_eq!(Decimal::try_from_value(Value::Int64(7)).unwrap(), Decimal::from(7));
    }

    #[test]
    fn value_strings() {
        assert_eq!(Value::from("hello"), Value::Varchar("hello".into()));
        assert_eq!(
            Value::from(String::from("world")),
            Value::Varchar("world".into())
        );
        let cow: Cow<'static, str> = AsValue::try_from_value(Value::Varchar("x".into())).unwrap();
        assert_eq!(cow, "x");
        let id = Uuid::new_v4();
        assert_eq!(String::try_from_value(Value::Uuid(id)).unwrap(), id.to_string());
        assert!(String::try_from_value(Value::Int32(1)).is_err());
    }

    #[test]
    fn value_uuid() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(Value::from(id), Value::Uuid(id));
        assert_eq!(
            Uuid::try_from_value(Value::Varchar("67e55044-10b1-426f-9247-bb680e5fe0c8".into()))
                .unwrap(),
            id
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(id.as_bytes().to_vec().into())).unwrap(),
            id
        );
        assert!(Uuid::try_from_value(Value::Varchar("not a uuid".into())).is_err());
    }

    #[test]
    fn value_temporal() {
        let date = Date::from_calendar_date(2025, Month::March, 14).unwrap();
        let time = Time::from_hms(9, 26, 53).unwrap();
        let timestamp = PrimitiveDateTime::new(date, time);
        assert_eq!(date.as_value(), Value::Date(date));
        assert_eq!(time.as_value(), Value::Time(time));
        assert_eq!(timestamp.as_value(), Value::Timestamp(timestamp));
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Timestamp(timestamp)).unwrap(),
            timestamp
        );
        assert!(Date::try_from_value(Value::Time(time)).is_err());
    }

    #[test]
    fn value_list() {
        let val = vec![1, 2, 3].as_value();
        assert!(val.is_list());
        assert_eq!(
            val,
            Value::List(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
        );
        let back: Vec<i64> = AsValue::try_from_value(val).unwrap();
        assert_eq!(back, vec![1i64, 2, 3]);
        assert_eq!(
            Value::List(vec![Value::Null, Value::Varchar("a".into())]).to_string(),
            "[NULL, 'a']"
        );
    }

    #[test]
    fn value_as_i64() {
        assert_eq!(Value::Int32(5).as_i64(), Some(5));
        assert_eq!(Value::Float64(8.0).as_i64(), Some(8));
        assert_eq!(Value::Float64(8.5).as_i64(), None);
        assert_eq!(Value::Varchar("12".into()).as_i64(), Some(12));
        assert_eq!(Value::Boolean(true).as_i64(), None);
    }

    #[test]
    fn key_value() {
        assert_eq!(KeyValue::from(5), KeyValue::Int64(5));
        assert_eq!(
            KeyValue::try_from(Value::Int32(9)).unwrap(),
            KeyValue::Int64(9)
        );
        assert_eq!(
            KeyValue::try_from(Value::Varchar("AB-1".into())).unwrap(),
            KeyValue::Varchar("AB-1".into())
        );
        assert!(KeyValue::try_from(Value::Float64(1.5)).is_err());
        assert!(KeyValue::try_from(Value::Null).is_err());
        let key = KeyValue::composite([("a", KeyValue::Int64(1)), ("b", "x".into())]);
        assert!(key.is_composite());
        assert_eq!(key.part("b"), Some(&KeyValue::Varchar("x".into())));
        assert_eq!(key.part("c"), None);
        assert_eq!(key.to_string(), "{a: 1, b: x}");
        let error = Value::try_from(key).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<QueryError>(),
            Some(QueryError::Unsupported(..))
        ));
        assert_eq!(Value::try_from(KeyValue::Int64(3)).unwrap(), Value::Int64(3));
    }
}
