//! Declarative transition tables.
//!
//! A transition system can be described as JSON:
//!
//! ```json
//! {
//!   "states": ["ON", "OFF"],
//!   "transitionMatrix": [
//!     {"to": "ON", "do": "countOn"},
//!     {"from": "ON", "to": "OFF"}
//!   ],
//!   "initialState": {"systemState": "ON", "onCounter": 0}
//! }
//! ```
//!
//! `from` and `to` are decoded as state tokens, `do` (or `action`) names an
//! entry of an [`ActionRegistry`]. A missing `from` or `to` matches any
//! state. One set to `null` matches none, so that rule never fires.
//! `transitions` is accepted as an alias for `transitionMatrix`. Everything in
//! `initialState` besides `systemState` is decoded as the payload.
//!
//! [`TransitionConfig::compile`] stops at the first problem, in the same
//! order [`compile`](crate::compile) checks them. [`TransitionConfig::validate`]
//! reports every problem at once.

mod registry;

pub use registry::ActionRegistry;

use crate::compiler::{self, TransitionReducer, TransitionRule};
use crate::core::{InitialRecord, State, TransitionGuard};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace};

/// One rule of a declarative transition table.
///
/// `None` means the key was absent; a key set to `null` is kept as
/// `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,

    /// Name of a registered action
    #[serde(
        rename = "do",
        alias = "action",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<Value>,
}

impl RuleConfig {
    /// Decode `from` and `to` into state tokens.
    ///
    /// Returns `Ok(None)` when either side is `null`: no state matches it.
    pub fn guard<S: State>(
        &self,
        index: usize,
    ) -> Result<Option<TransitionGuard<S>>, ConfigError> {
        if self.never_matches() {
            return Ok(None);
        }
        Ok(Some(TransitionGuard {
            from: decode_side(self.from.as_ref(), "from", index)?,
            to: decode_side(self.to.as_ref(), "to", index)?,
        }))
    }

    fn never_matches(&self) -> bool {
        matches!(self.from, Some(Value::Null)) || matches!(self.to, Some(Value::Null))
    }

    /// Look the action up in `registry`.
    ///
    /// Fails with [`ConfigError::InvalidActionType`] when the action is not a
    /// string or names nothing registered.
    pub fn resolve_action<S: State, P, D>(
        &self,
        index: usize,
        registry: &ActionRegistry<S, P, D>,
    ) -> Result<Option<compiler::RuleAction<S, P, D>>, ConfigError> {
        let name = match &self.action {
            None => return Ok(None),
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(ConfigError::InvalidActionType {
                    index,
                    reason: format!("expected an action name, found {}", kind_of(other)),
                })
            }
        };

        registry
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidActionType {
                index,
                reason: format!("no action registered as '{name}'"),
            })
    }

    /// Build the rule, or `Ok(None)` for a rule that can never fire.
    ///
    /// The action is resolved either way, so a bad action is reported even on
    /// a dead rule.
    pub fn resolve<S: State, P, D>(
        &self,
        index: usize,
        registry: &ActionRegistry<S, P, D>,
    ) -> Result<Option<TransitionRule<S, P, D>>, ConfigError> {
        let guard = self.guard(index)?;
        let action = self.resolve_action(index, registry)?;
        match guard {
            Some(guard) => Ok(Some(TransitionRule { guard, action })),
            None => {
                trace!(index, "rule has a null guard and is left out");
                Ok(None)
            }
        }
    }
}

/// A transition system described as data.
///
/// The fields are kept as raw JSON until compilation so that a `states`
/// value that is not an array can be reported as
/// [`ConfigError::InvalidStatesType`] instead of a decoding error.
///
/// # Example
///
/// ```rust
/// use transys::config::{ActionRegistry, TransitionConfig};
/// use transys::core::Event;
/// use serde::Deserialize;
///
/// #[derive(Clone, Debug, PartialEq, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Lamp {
///     on_counter: u32,
/// }
///
/// let config = TransitionConfig::from_json_str(r#"{
///     "states": ["ON", "OFF"],
///     "transitionMatrix": [{"to": "ON", "do": "countOn"}, {"to": "OFF"}],
///     "initialState": {"systemState": "OFF", "onCounter": 0}
/// }"#).unwrap();
///
/// let registry = ActionRegistry::<String, Lamp>::new().register("countOn", |record, _| {
///     record.map_payload(|lamp| Lamp { on_counter: lamp.on_counter + 1 })
/// });
///
/// let reducer = config.compile(&registry).unwrap();
/// let record = reducer.reduce_record(None, &Event::new("ON".to_string()));
/// assert_eq!(record.payload.on_counter, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default)]
    pub states: Value,

    #[serde(rename = "transitionMatrix", alias = "transitions", default)]
    pub transitions: Vec<RuleConfig>,

    #[serde(rename = "initialState", default)]
    pub initial_state: Value,
}

impl TransitionConfig {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(ConfigError::malformed)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::malformed)
    }

    /// Decode `states` into tokens.
    pub fn decode_states<S: State>(&self) -> Result<Vec<S>, ConfigError> {
        let Value::Array(items) = &self.states else {
            return Err(ConfigError::InvalidStatesType);
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item.clone()).map_err(|err| ConfigError::Malformed {
                    reason: format!("states[{index}]: {err}"),
                })
            })
            .collect()
    }

    /// Decode `initialState`. A missing `initialState` decodes as an empty
    /// object, which leaves `systemState` unset.
    pub fn decode_initial<S, P>(&self) -> Result<InitialRecord<S, P>, ConfigError>
    where
        S: State,
        P: DeserializeOwned,
    {
        let value = match &self.initial_state {
            Value::Null => Value::Object(Map::new()),
            value => value.clone(),
        };
        serde_json::from_value(value).map_err(|err| ConfigError::Malformed {
            reason: format!("initialState: {err}"),
        })
    }

    /// Decode and compile, stopping at the first problem.
    pub fn compile<S, P, D>(
        &self,
        registry: &ActionRegistry<S, P, D>,
    ) -> Result<TransitionReducer<S, P, D>, ConfigError>
    where
        S: State,
        P: DeserializeOwned,
    {
        let states = self.decode_states::<S>()?;
        compiler::check_states(&states)?;

        let initial = self.decode_initial::<S, P>()?;
        compiler::check_initial(&states, initial.system_state.clone())?;

        let rules = self
            .transitions
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| rule.resolve(index, registry).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            rules = rules.len(),
            actions = registry.len(),
            "loaded declarative transition table"
        );
        compiler::compile(states, rules, initial)
    }

    /// Check the whole configuration, accumulating ALL problems.
    ///
    /// Returns `Validation::Success(())` when [`compile`](Self::compile)
    /// would succeed.
    pub fn validate<S, P, D>(
        &self,
        registry: &ActionRegistry<S, P, D>,
    ) -> Validation<(), NonEmptyVec<ConfigError>>
    where
        S: State,
        P: DeserializeOwned,
    {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigError>>> = Vec::new();

        let states = self.decode_states::<S>();
        checks.push(check(
            states
                .as_ref()
                .map_err(Clone::clone)
                .and_then(|states| compiler::check_states(states)),
        ));

        match (self.decode_initial::<S, P>(), &states) {
            (Err(err), _) => checks.push(Validation::fail(err)),
            (Ok(initial), Ok(states)) => checks.push(check(
                compiler::check_initial(states, initial.system_state).map(|_| ()),
            )),
            // Membership can't be checked without states; presence still can.
            (Ok(initial), Err(_)) => {
                if initial.system_state.is_none() {
                    checks.push(Validation::fail(ConfigError::MissingInitialState));
                }
            }
        }

        for (index, rule) in self.transitions.iter().enumerate() {
            checks.push(check(rule.guard::<S>(index).map(|_| ())));
            checks.push(check(rule.resolve_action(index, registry).map(|_| ())));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

fn check(result: Result<(), ConfigError>) -> Validation<(), NonEmptyVec<ConfigError>> {
    match result {
        Ok(()) => Validation::success(()),
        Err(err) => Validation::fail(err),
    }
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn decode_side<S: State>(
    value: Option<&Value>,
    side: &str,
    index: usize,
) -> Result<Option<S>, ConfigError> {
    value
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|err| ConfigError::Malformed {
                reason: format!("rule {index} `{side}`: {err}"),
            })
        })
        .transpose()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, SystemRecord};
    use serde_json::json;

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Lamp {
        text: String,
        on_counter: u32,
    }

    fn lamp_actions() -> ActionRegistry<String, Lamp> {
        ActionRegistry::<String, Lamp>::new()
            .register("switchOn", |record, _| {
                record.map_payload(|lamp| Lamp {
                    text: "on".into(),
                    on_counter: lamp.on_counter + 1,
                })
            })
            .register("switchOff", |record, _| {
                record.map_payload(|lamp| Lamp {
                    text: "off".into(),
                    ..lamp
                })
            })
    }

    fn on_off() -> Value {
        json!({
            "states": ["ON", "OFF"],
            "transitionMatrix": [
                {"to": "ON", "do": "switchOn"},
                {"from": "ON", "to": "OFF", "do": "switchOff"}
            ],
            "initialState": {"systemState": "OFF", "text": "off", "onCounter": 0}
        })
    }

    fn errors(validation: Validation<(), NonEmptyVec<ConfigError>>) -> Vec<ConfigError> {
        match validation {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn json_table_reproduces_on_off_switch() {
        let reducer = TransitionConfig::from_value(on_off())
            .unwrap()
            .compile(&lamp_actions())
            .unwrap();

        let mut record = reducer.initial_record();
        let mut counters = Vec::new();
        for kind in ["ON", "OFF", "OFF", "ON"] {
            record = reducer.reduce_record(Some(record), &Event::new(kind.to_string()));
            counters.push(record.payload.on_counter);
        }

        assert_eq!(counters, vec![1, 1, 1, 2]);
        assert_eq!(record.system_state, "ON");
        assert_eq!(record.payload.text, "on");
    }

    #[test]
    fn transitions_alias_and_action_alias_are_accepted() {
        let config = TransitionConfig::from_value(json!({
            "states": ["ON", "OFF"],
            "transitions": [{"to": "ON", "action": "switchOn"}],
            "initialState": {"systemState": "OFF", "text": "", "onCounter": 0}
        }))
        .unwrap();

        assert_eq!(config.transitions.len(), 1);
        let reducer = config.compile(&lamp_actions()).unwrap();
        let record = reducer.reduce_record(None, &Event::new("ON".to_string()));
        assert_eq!(record.payload.on_counter, 1);
    }

    #[test]
    fn states_must_be_an_array() {
        let mut value = on_off();
        value["states"] = json!("ON");
        let config = TransitionConfig::from_value(value).unwrap();

        let result = config.compile(&lamp_actions());
        assert_eq!(result.unwrap_err(), ConfigError::InvalidStatesType);
    }

    #[test]
    fn missing_states_is_not_an_array() {
        let config = TransitionConfig::from_value(json!({
            "initialState": {"systemState": "ON", "text": "", "onCounter": 0}
        }))
        .unwrap();

        let result = config.compile(&lamp_actions());
        assert_eq!(result.unwrap_err(), ConfigError::InvalidStatesType);
    }

    #[test]
    fn compile_checks_in_order() {
        let mut value = on_off();
        value["states"] = json!([]);
        value["transitionMatrix"] = json!([{"do": 7}]);
        let config = TransitionConfig::from_value(value).unwrap();

        let result = config.compile(&lamp_actions());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyStatesSet);
    }

    #[test]
    fn missing_system_state() {
        let mut value = on_off();
        value["initialState"] = json!({"text": "", "onCounter": 0});
        let config = TransitionConfig::from_value(value).unwrap();

        let result = config.compile(&lamp_actions());
        assert_eq!(result.unwrap_err(), ConfigError::MissingInitialState);
    }

    #[test]
    fn action_must_be_a_name() {
        let mut value = on_off();
        value["transitionMatrix"][1]["do"] = json!(true);
        let config = TransitionConfig::from_value(value).unwrap();

        match config.compile(&lamp_actions()) {
            Err(ConfigError::InvalidActionType { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("a boolean"));
            }
            other => panic!("expected InvalidActionType, got {other:?}"),
        }
    }

    #[test]
    fn action_must_be_registered() {
        let mut value = on_off();
        value["transitionMatrix"][0]["do"] = json!("explode");
        let config = TransitionConfig::from_value(value).unwrap();

        match config.compile(&lamp_actions()) {
            Err(ConfigError::InvalidActionType { index, reason }) => {
                assert_eq!(index, 0);
                assert!(reason.contains("'explode'"));
            }
            other => panic!("expected InvalidActionType, got {other:?}"),
        }
    }

    #[test]
    fn null_keys_are_kept_apart_from_missing_ones() {
        let absent: RuleConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent, RuleConfig::default());

        let nulls: RuleConfig =
            serde_json::from_value(json!({"from": null, "to": null, "action": null})).unwrap();
        assert_eq!(nulls.from, Some(Value::Null));
        assert_eq!(nulls.to, Some(Value::Null));
        assert_eq!(nulls.action, Some(Value::Null));
    }

    #[test]
    fn null_action_is_rejected() {
        for key in ["do", "action"] {
            let mut value = on_off();
            value["transitionMatrix"][0] = json!({"to": "ON"});
            value["transitionMatrix"][0][key] = Value::Null;
            let config = TransitionConfig::from_value(value).unwrap();

            assert_eq!(
                config.compile(&lamp_actions()).unwrap_err(),
                ConfigError::InvalidActionType {
                    index: 0,
                    reason: "expected an action name, found null".into(),
                }
            );
        }
    }

    #[test]
    fn null_guard_never_matches() {
        let config = TransitionConfig::from_value(json!({
            "states": ["ON", "OFF"],
            "transitionMatrix": [
                {"from": null, "to": "ON", "do": "switchOn"},
                {"to": null, "do": "switchOff"}
            ],
            "initialState": {"systemState": "OFF", "text": "off", "onCounter": 0}
        }))
        .unwrap();
        assert!(config.validate(&lamp_actions()).is_success());

        let reducer = config.compile(&lamp_actions()).unwrap();
        assert!(reducer.rules().is_empty());
        let record = reducer.reduce_record(None, &Event::new("ON".to_string()));
        assert_eq!(record.system_state, "OFF");
        assert_eq!(record.payload.on_counter, 0);
    }

    #[test]
    fn null_guard_still_checks_its_action() {
        let mut value = on_off();
        value["transitionMatrix"][1]["from"] = Value::Null;
        value["transitionMatrix"][1]["do"] = json!("explode");
        let config = TransitionConfig::from_value(value).unwrap();

        assert!(matches!(
            config.compile(&lamp_actions()),
            Err(ConfigError::InvalidActionType { index: 1, .. })
        ));
        assert_eq!(errors(config.validate(&lamp_actions())).len(), 1);
    }

    #[test]
    fn undecodable_payload_is_malformed() {
        let mut value = on_off();
        value["initialState"] = json!({"systemState": "ON", "text": 3, "onCounter": 0});
        let config = TransitionConfig::from_value(value).unwrap();

        assert!(matches!(
            config.compile(&lamp_actions()),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn non_object_config_is_malformed() {
        assert!(matches!(
            TransitionConfig::from_json_str("[1, 2]"),
            Err(ConfigError::Malformed { .. })
        ));
        assert!(matches!(
            TransitionConfig::from_json_str("{"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn validate_accepts_good_config() {
        let config = TransitionConfig::from_value(on_off()).unwrap();
        assert!(config.validate(&lamp_actions()).is_success());
    }

    #[test]
    fn validate_accumulates_all_errors() {
        let config = TransitionConfig::from_value(json!({
            "states": {"ON": true},
            "transitionMatrix": [
                {"to": "ON", "do": 1},
                {"from": "ON", "do": "missing"}
            ],
            "initialState": {"text": "", "onCounter": 0}
        }))
        .unwrap();

        let validation = config.validate(&lamp_actions());
        assert!(validation.is_failure());
        assert_eq!(
            errors(validation),
            vec![
                ConfigError::InvalidStatesType,
                ConfigError::MissingInitialState,
                ConfigError::InvalidActionType {
                    index: 0,
                    reason: "expected an action name, found a number".into(),
                },
                ConfigError::InvalidActionType {
                    index: 1,
                    reason: "no action registered as 'missing'".into(),
                },
            ]
        );
    }

    #[test]
    fn validate_reports_empty_states_and_unknown_initial_together() {
        let mut value = on_off();
        value["states"] = json!([]);
        let config = TransitionConfig::from_value(value).unwrap();

        assert_eq!(
            errors(config.validate(&lamp_actions())),
            vec![
                ConfigError::EmptyStatesSet,
                ConfigError::UnknownInitialState {
                    state: "OFF".into()
                },
            ]
        );
    }

    #[test]
    fn enum_tokens_decode_from_json() {
        #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
        enum Door {
            Open,
            Closed,
        }

        impl State for Door {
            fn name(&self) -> &str {
                match self {
                    Self::Open => "Open",
                    Self::Closed => "Closed",
                }
            }
        }

        let config = TransitionConfig::from_value(json!({
            "states": ["Open", "Closed"],
            "transitionMatrix": [{"from": "Open", "to": "Closed"}, {"from": "Ajar"}],
            "initialState": {"systemState": "Open"}
        }))
        .unwrap();
        let registry = ActionRegistry::<Door, Map<String, Value>>::new();

        let errors = errors(config.validate(&registry));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ConfigError::Malformed { reason } if reason.contains("rule 1")
        ));

        let mut fixed = config.clone();
        fixed.transitions.pop();
        let reducer = fixed.compile(&registry).unwrap();
        let record = reducer.reduce_record(None, &Event::new(Door::Closed));
        assert_eq!(record, SystemRecord::new(Door::Closed, Map::new()));
    }
}
