//! Plan modifiers
//!
//! A plan modifier adjusts a single planned attribute value after the host
//! has computed the proposed plan. The only modifier shipped here keeps a
//! computed attribute stable across updates by carrying the prior state
//! value forward instead of planning it as unknown.

use crate::value::Value;

/// Inputs for a single attribute's plan modification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest<'a, T> {
    /// Whether the resource has any prior state (false while creating)
    pub has_prior_state: bool,
    /// The attribute value recorded in prior state
    pub state_value: &'a Value<T>,
    /// The attribute value proposed by the plan
    pub plan_value: &'a Value<T>,
    /// The attribute value as written in configuration
    pub config_value: &'a Value<T>,
}

/// Adjusts a planned attribute value
pub trait PlanModifier<T>: Send + Sync {
    /// Human-readable description of the modifier
    fn description(&self) -> &'static str;

    /// Return the resolved planned value
    fn modify(&self, req: &ModifyRequest<'_, T>) -> Value<T>;
}

/// Copies a known prior state value into an unknown planned value.
///
/// Use this for computed attributes whose value does not change once set,
/// such as server-assigned identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseStateForUnknown;

impl<T: Clone + Send + Sync> PlanModifier<T> for UseStateForUnknown {
    fn description(&self) -> &'static str {
        "Once set, the value of this attribute in state will not change."
    }

    fn modify(&self, req: &ModifyRequest<'_, T>) -> Value<T> {
        resolve(
            req.has_prior_state,
            req.state_value,
            req.plan_value,
            req.config_value,
        )
    }
}

/// Resolve a planned value against prior state.
///
/// The planned value is returned unchanged when the resource is being
/// created, when the prior state value is null, when the plan already holds
/// a concrete value, or when configuration is itself unknown (resolving now
/// would break interpolation once the dependency is applied). Otherwise the
/// prior state value replaces the unknown planned value.
pub fn resolve<T: Clone>(
    has_prior_state: bool,
    state_value: &Value<T>,
    plan_value: &Value<T>,
    config_value: &Value<T>,
) -> Value<T> {
    if !has_prior_state || state_value.is_null() {
        return plan_value.clone();
    }
    if !plan_value.is_unknown() {
        return plan_value.clone();
    }
    if config_value.is_unknown() {
        return plan_value.clone();
    }
    state_value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn all_values() -> Vec<Value<String>> {
        vec![
            Value::Null,
            Value::Unknown,
            Value::Known("a".to_string()),
            Value::Known("b".to_string()),
        ]
    }

    #[test]
    fn test_create_leaves_plan_unknown() {
        for state in all_values() {
            for config in all_values() {
                let out = resolve(false, &state, &Value::Unknown, &config);
                assert_eq!(out, Value::Unknown);
            }
        }
    }

    #[test]
    fn test_null_state_leaves_plan() {
        let out = resolve(true, &Value::<String>::Null, &Value::Unknown, &Value::Null);
        assert_eq!(out, Value::Unknown);
    }

    #[test]
    fn test_known_plan_wins() {
        let out = resolve(
            true,
            &Value::Known("old".to_string()),
            &Value::Known("new".to_string()),
            &Value::Null,
        );
        assert_eq!(out, Value::Known("new".to_string()));
    }

    #[test]
    fn test_unknown_config_is_not_resolved() {
        let out = resolve(
            true,
            &Value::Known("old".to_string()),
            &Value::Unknown,
            &Value::Unknown,
        );
        assert_eq!(out, Value::Unknown);
    }

    #[test]
    fn test_unknown_plan_takes_state() {
        let state = Value::Known("abc-123".to_string());
        for config in [Value::Null, Value::Known("abc-123".to_string())] {
            let out = resolve(true, &state, &Value::Unknown, &config);
            assert_eq!(out, state);
        }
    }

    #[test]
    fn test_preservation_for_other_types() {
        let flag = resolve(true, &Value::Known(false), &Value::Unknown, &Value::Null);
        assert_eq!(flag, Value::Known(false));

        let map = BTreeMap::from([("hello".to_string(), "world".to_string())]);
        let headers = resolve(true, &Value::Known(map.clone()), &Value::Unknown, &Value::Null);
        assert_eq!(headers, Value::Known(map));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for has_prior in [false, true] {
            for state in all_values() {
                for plan in all_values() {
                    for config in all_values() {
                        let once = resolve(has_prior, &state, &plan, &config);
                        let twice = resolve(has_prior, &state, &once, &config);
                        assert_eq!(once, twice);
                    }
                }
            }
        }
    }

    #[test]
    fn test_modifier_delegates_to_resolve() {
        let modifier = UseStateForUnknown;
        let state = Value::Known("id-1".to_string());
        let req = ModifyRequest {
            has_prior_state: true,
            state_value: &state,
            plan_value: &Value::Unknown,
            config_value: &Value::Null,
        };
        assert_eq!(modifier.modify(&req), state);
        assert!(!PlanModifier::<String>::description(&modifier).is_empty());
    }
}
