//! On/Off Switch
//!
//! This example demonstrates a two-state system with chained rules.
//!
//! Key concepts:
//! - A wildcard rule that runs on every switch-on
//! - Transition requests that succeed or are rejected
//! - Transition subscriptions with `from`/`to` guards
//!
//! Run with: RUST_LOG=transys=debug cargo run --example on_off_switch

use transys::builder::{edge, on_enter, TransitionSystemBuilder};
use transys::core::{Event, SystemRecord, TransitionGuard};
use transys::state_enum;

state_enum! {
    enum Switch {
        On,
        Off,
    }
}

#[derive(Clone, Debug, Default)]
struct Lamp {
    text: String,
    on_counter: u32,
}

type Record = SystemRecord<Switch, Lamp>;

fn switch_on(record: Record, _: &Event<Switch>) -> Record {
    record.map_payload(|lamp| Lamp {
        text: "the light is on".into(),
        on_counter: lamp.on_counter + 1,
    })
}

fn switch_off(record: Record, _: &Event<Switch>) -> Record {
    record.map_payload(|lamp| Lamp {
        text: "the light is off".into(),
        ..lamp
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,transys=debug".into()),
        )
        .init();

    println!("=== On/Off Switch ===\n");

    let store = TransitionSystemBuilder::<Switch, Lamp>::default()
        .states(Switch::all())
        .initial(Switch::Off)
        .rule(on_enter(Switch::On, switch_on))
        .rule(edge(Switch::On, Switch::Off).action(switch_off))
        .into_store()
        .unwrap();

    store.subscribe_to_transition(TransitionGuard::any().to(Switch::On), |t| {
        println!("  [to On]     {:?} -> {:?}", t.from, t.to);
    });
    store.subscribe_to_transition(
        TransitionGuard::new(Some(Switch::On), Some(Switch::Off)),
        |t| println!("  [On -> Off] after {} rule(s)", t.rules_fired),
    );

    println!("transition_to(On):");
    store.transition_to(Switch::On).unwrap();

    println!("transition_to(On) again, the wildcard rule runs again:");
    store.transition_to(Switch::On).unwrap();

    println!("transition_from_to(Off, On):");
    match store.transition_from_to(Switch::Off, Switch::On) {
        Ok(_) => println!("  unexpected success"),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("transition_from_to(On, Off):");
    store.transition_from_to(Switch::On, Switch::Off).unwrap();

    let record = store.get_state();
    println!(
        "\nFinal state: {:?}, text: {:?}, switched on {} time(s)",
        record.system_state, record.payload.text, record.payload.on_counter
    );

    let history = store.history();
    println!("\nHistory:");
    for transition in history.transitions() {
        println!("  {:?} -> {:?}", transition.from, transition.to);
    }
    if let Some(elapsed) = history.duration() {
        println!("  {} transition(s) in {elapsed:?}", history.transitions().len());
    }

    println!("\n=== Example Complete ===");
}
