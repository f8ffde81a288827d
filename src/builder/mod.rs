//! Builder API for ergonomic transition system construction.
//!
//! This module provides a fluent builder, shorthand rule constructors and the
//! [`state_enum!`](crate::state_enum) macro, so small systems can be declared
//! without spelling out guards by hand.

pub mod macros;
mod system;

pub use system::TransitionSystemBuilder;

use crate::compiler::TransitionRule;
use crate::core::{Event, State, SystemRecord};

/// A rule moving from `from` to `to` with no action.
///
/// # Example
///
/// ```
/// use transys::builder::edge;
/// use transys::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// let rule = edge::<Door, (), ()>(Door::Open, Door::Closed);
/// assert!(rule.applies_to(&Door::Open, &Door::Closed));
/// assert!(!rule.applies_to(&Door::Closed, &Door::Closed));
/// ```
pub fn edge<S: State, P, D>(from: S, to: S) -> TransitionRule<S, P, D> {
    TransitionRule::any().from(from).to(to)
}

/// A rule running `action` whenever the system enters `to`, from anywhere.
///
/// # Example
///
/// ```
/// use transys::builder::on_enter;
/// use transys::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// let rule = on_enter(Door::Open, |record, _| record.map_payload(|opened: u32| opened + 1));
/// assert!(rule.applies_to(&Door::Closed, &Door::Open));
/// assert!(rule.applies_to(&Door::Open, &Door::Open));
/// # let _: transys::compiler::TransitionRule<Door, u32> = rule;
/// ```
pub fn on_enter<S, P, D, F>(to: S, action: F) -> TransitionRule<S, P, D>
where
    S: State,
    F: Fn(SystemRecord<S, P>, &Event<S, D>) -> SystemRecord<S, P> + Send + Sync + 'static,
{
    TransitionRule::any().to(to).action(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum Door {
            Open,
            Closed,
            Locked,
        }
    }

    #[test]
    fn edge_matches_only_its_pair() {
        let rule = edge::<Door, (), ()>(Door::Closed, Door::Locked);

        assert!(rule.applies_to(&Door::Closed, &Door::Locked));
        assert!(!rule.applies_to(&Door::Open, &Door::Locked));
        assert!(!rule.applies_to(&Door::Closed, &Door::Open));
        assert!(rule.action.is_none());
    }

    #[test]
    fn on_enter_is_a_source_wildcard() {
        type Log = SystemRecord<Door, Vec<&'static str>>;
        let rule = on_enter(Door::Locked, |record: Log, _: &Event<Door>| {
            record.map_payload(|mut log| {
                log.push("locked");
                log
            })
        });

        assert!(rule.guard.from.is_none());
        assert!(rule.applies_to(&Door::Open, &Door::Locked));
        assert!(rule.applies_to(&Door::Closed, &Door::Locked));
        assert!(!rule.applies_to(&Door::Closed, &Door::Open));
        assert!(rule.action.is_some());
    }
}
