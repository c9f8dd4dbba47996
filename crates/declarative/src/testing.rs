//! In-memory resource used by engine tests

use crate::context::CycleContext;
use crate::diff::Attributes;
use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::types::{Operation, ReadOutcome};
use crate::value::Value;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeState {
    pub id: String,
    pub name: String,
}

impl Attributes for FakeState {
    fn attributes(&self) -> Vec<(&'static str, Value<String>)> {
        vec![
            ("id", Value::Known(self.id.clone())),
            ("name", Value::Known(self.name.clone())),
        ]
    }
}

pub struct FakePlan {
    pub id: Value<String>,
    pub name: String,
}

impl Attributes for FakePlan {
    fn attributes(&self) -> Vec<(&'static str, Value<String>)> {
        vec![("id", self.id.clone()), ("name", Value::Known(self.name.clone()))]
    }
}

#[derive(Default)]
struct Inner {
    calls: usize,
    next_id: usize,
    gone: HashSet<String>,
}

/// Resource whose "remote" is a counter and a set of vanished ids
#[derive(Default)]
pub struct FakeResource {
    inner: Mutex<Inner>,
    fail_on: Option<String>,
}

impl FakeResource {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn forget(&self, id: &str) {
        self.inner.lock().unwrap().gone.insert(id.to_string());
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    fn call(&self, operation: Operation, name: &str) -> Result<()> {
        self.inner.lock().unwrap().calls += 1;
        if self.fail_on.as_deref() == Some(name) {
            return Err(Error::transport(operation, "boom", Some(500)));
        }
        Ok(())
    }
}

impl Resource for FakeResource {
    type Config = String;
    type Plan = FakePlan;
    type State = FakeState;

    fn resource_type(&self) -> &'static str {
        "fake"
    }

    fn identity<'s>(&self, state: &'s FakeState) -> &'s str {
        &state.id
    }

    fn plan(&self, config: &String, prior: Option<&FakeState>, _ctx: &CycleContext<'_>) -> Result<FakePlan> {
        Ok(FakePlan {
            id: prior.map_or(Value::Unknown, |p| Value::Known(p.id.clone())),
            name: config.clone(),
        })
    }

    fn create(&self, plan: &FakePlan, _ctx: &CycleContext<'_>) -> Result<FakeState> {
        self.call(Operation::Create, &plan.name)?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        Ok(FakeState {
            id: format!("id-{}", inner.next_id),
            name: plan.name.clone(),
        })
    }

    fn read(&self, state: &FakeState, _ctx: &CycleContext<'_>) -> Result<ReadOutcome<FakeState>> {
        self.call(Operation::Get, &state.name)?;
        if self.inner.lock().unwrap().gone.contains(&state.id) {
            return Ok(ReadOutcome::Removed);
        }
        Ok(ReadOutcome::Present(state.clone()))
    }

    fn update(&self, plan: &FakePlan, _ctx: &CycleContext<'_>) -> Result<FakeState> {
        self.call(Operation::Update, &plan.name)?;
        let id = plan
            .id
            .as_known()
            .cloned()
            .ok_or_else(|| Error::invariant("update without id"))?;
        Ok(FakeState {
            id,
            name: plan.name.clone(),
        })
    }

    fn delete(&self, identity: &str, _ctx: &CycleContext<'_>) -> Result<()> {
        self.call(Operation::Delete, identity)
    }

    fn import(&self, identity: &str, ctx: &CycleContext<'_>) -> Result<ReadOutcome<FakeState>> {
        self.read(
            &FakeState {
                id: identity.to_string(),
                name: String::new(),
            },
            ctx,
        )
    }
}
