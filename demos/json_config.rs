//! JSON Configuration
//!
//! This example loads a transition table from JSON.
//!
//! Key concepts:
//! - String state tokens and a free-form JSON payload
//! - Named actions resolved through an `ActionRegistry`
//! - Validation that reports every configuration problem at once
//!
//! Run with: cargo run --example json_config

use serde_json::{json, Map, Value};
use stillwater::validation::Validation;
use transys::config::{ActionRegistry, TransitionConfig};
use transys::core::Event;
use transys::{enhance, Store};

type Payload = Map<String, Value>;

fn registry() -> ActionRegistry<String, Payload> {
    ActionRegistry::<String, Payload>::new().register("countOn", |record, _| {
        record.map_payload(|mut payload| {
            let count = payload.get("onCounter").and_then(Value::as_u64).unwrap_or(0);
            payload.insert("onCounter".into(), json!(count + 1));
            payload
        })
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,transys=debug".into()),
        )
        .init();

    println!("=== JSON Configuration ===\n");

    let broken = TransitionConfig::from_value(json!({
        "states": "ON",
        "transitionMatrix": [{"to": "ON", "do": "explode"}, {"to": "OFF", "do": 3}]
    }))
    .unwrap();

    println!("Validating a broken table:");
    if let Validation::Failure(errors) = broken.validate(&registry()) {
        for error in errors.iter() {
            println!("  - {error}");
        }
    }

    let config = TransitionConfig::from_json_str(
        r#"{
            "states": ["ON", "OFF"],
            "transitionMatrix": [
                {"to": "ON", "do": "countOn"},
                {"to": "OFF"}
            ],
            "initialState": {"systemState": "ON", "onCounter": 0}
        }"#,
    )
    .unwrap();

    let store = enhance(Store::new(config.compile(&registry()).unwrap()));

    println!("\nDispatching OFF, ON, ON, OFF, ON:");
    for kind in ["OFF", "ON", "ON", "OFF", "ON"] {
        let record = store.dispatch(&Event::new(kind.to_string()));
        println!("  {}", serde_json::to_string(&record).unwrap());
    }

    println!("\nDispatching an event that is not a state changes nothing:");
    let record = store.dispatch(&Event::new("TOGGLE".to_string()));
    println!("  {}", serde_json::to_string(&record).unwrap());

    println!("\n=== Example Complete ===");
}
