use lamden_types::values::VALUES_CONTRACT;
use lamden_types::{test_values, ContractValue, Hash, MemoryDriver, StateDriver, StateError, ValueType, ValuesArgs};
use serde_json::json;
use std::sync::Arc;

fn your_state(driver: Arc<MemoryDriver>) -> Hash {
    Hash::new(driver, VALUES_CONTRACT, "yourState", ContractValue::from(""))
}

#[test]
fn test_values_writes_every_field_under_uid() {
    let driver = Arc::new(MemoryDriver::new());
    let state = your_state(driver.clone());
    let args = ValuesArgs::sample("lamden-rs-testing").unwrap();

    test_values(&state, &args).unwrap();

    let keys = driver.keys_with_prefix("con_values_testing.yourState:lamden-rs-testing:").unwrap();
    assert_eq!(keys.len(), 9);
    assert_eq!(
        state.get(&["lamden-rs-testing", "Float"]).unwrap().to_wire(),
        json!({"__fixed__": "1.01"})
    );
    assert_eq!(
        state.get(&["lamden-rs-testing", "DateTime"]).unwrap().to_wire(),
        json!({"__time__": [2020, 7, 28, 19, 16, 35, 59000]})
    );
    assert_eq!(
        state.get(&["lamden-rs-testing", "TimeDelta"]).unwrap().to_wire(),
        json!({"__delta__": [0, 1]})
    );
}

#[test]
fn test_nested_decimals_survive_storage() {
    let state = your_state(Arc::new(MemoryDriver::new()));
    let args = ValuesArgs::sample("uid").unwrap();
    test_values(&state, &args).unwrap();

    let dict = state.get(&["uid", "Dict"]).unwrap();
    assert_eq!(dict, args.dict_value);
    assert_eq!(
        dict.to_wire()["d"]["l"],
        json!([1, {"__fixed__": "1.1"}])
    );
}

#[test]
fn test_mismatch_stops_at_first_bad_field() {
    let driver = Arc::new(MemoryDriver::new());
    let state = your_state(driver.clone());
    let mut args = ValuesArgs::sample("uid").unwrap();
    args.list_value = ContractValue::from(3);

    match test_values(&state, &args) {
        Err(StateError::TypeMismatch { field, expected, found }) => {
            assert_eq!(field, "List");
            assert_eq!(expected, ValueType::List);
            assert_eq!(found, ValueType::Int);
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(!state.contains(&["uid", "ANY"]).unwrap());
    assert_eq!(driver.len(), 6);
}

#[test]
fn test_kwargs_round_trip() {
    let args = ValuesArgs::sample("uid").unwrap();
    let again = ValuesArgs::from_kwargs(&args.to_kwargs()).unwrap();
    assert_eq!(again, args);

    let mut kwargs = args.to_kwargs();
    kwargs.remove("TimeDelta");
    assert!(ValuesArgs::from_kwargs(&kwargs).is_err());
}

#[test]
fn test_clear_by_uid() {
    let state = your_state(Arc::new(MemoryDriver::new()));
    test_values(&state, &ValuesArgs::sample("a").unwrap()).unwrap();
    test_values(&state, &ValuesArgs::sample("b").unwrap()).unwrap();

    assert_eq!(state.all(&["a"]).unwrap().len(), 9);
    assert_eq!(state.clear(&["a"]).unwrap(), 9);
    assert_eq!(state.get(&["a", "Str"]).unwrap(), ContractValue::from(""));
    assert_eq!(state.get(&["b", "Str"]).unwrap(), ContractValue::from("test string"));
}
