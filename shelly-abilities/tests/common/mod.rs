//! Shared fixtures for the ability integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hap_model::{CharacteristicType, CharacteristicValue, MemoryAccessory, MemoryService, PositionState};
use serde_json::Value;
use shelly_abilities::{Ability, CoverAbility, CoverKind};
use shelly_device::testing::RecordingTransport;
use shelly_device::{ComponentError, Cover, CoverStatus, RpcTransport};
use tokio::sync::Semaphore;

/// A cover bound to a window service on an in-memory accessory
pub struct CoverFixture {
    pub cover: Arc<Cover>,
    pub accessory: MemoryAccessory,
    pub ability: CoverAbility,
}

impl CoverFixture {
    /// Set up with a recording transport
    pub fn new(status: CoverStatus) -> (Self, Arc<RecordingTransport>) {
        let transport = RecordingTransport::new();
        let fixture = Self::with_transport(status, transport.clone());
        (fixture, transport)
    }

    pub fn with_transport(status: CoverStatus, transport: Arc<dyn RpcTransport>) -> Self {
        let cover = Arc::new(Cover::with_status(0, transport, status));
        let accessory = MemoryAccessory::new();
        let mut ability = CoverAbility::new(cover.clone(), CoverKind::Window);
        ability.setup(&accessory);

        Self {
            cover,
            accessory,
            ability,
        }
    }

    pub fn service(&self) -> Arc<MemoryService> {
        self.accessory
            .memory_service(self.ability.key())
            .expect("service is added by setup")
    }

    /// (position state, current position, target position) as shown to controllers
    pub fn visible(&self) -> Visible {
        let service = self.service();
        (
            service.value(CharacteristicType::PositionState),
            service.value(CharacteristicType::CurrentPosition),
            service.value(CharacteristicType::TargetPosition),
        )
    }

    pub fn pushes(&self) -> usize {
        self.service().total_pushes()
    }
}

pub type Visible = (
    Option<CharacteristicValue>,
    Option<CharacteristicValue>,
    Option<CharacteristicValue>,
);

pub fn shown(state: PositionState, current: u8, target: u8) -> Visible {
    (Some(state.into()), Some(current.into()), Some(target.into()))
}

/// A calibrated, idle cover at `pos`
pub fn idle_at(pos: u8) -> CoverStatus {
    CoverStatus::state("idle")
        .with_current_pos(Some(pos))
        .with_target_pos(Some(pos))
        .with_pos_control(true)
}

/// Transport whose calls block until [`release`](Self::release) is called
#[derive(Debug)]
pub struct GatedTransport {
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Let one pending call complete
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub async fn wait_for_call(&self) {
        while self.call_count() == 0 {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl RpcTransport for GatedTransport {
    async fn call(&self, _method: &str, _params: Value) -> shelly_device::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ComponentError::Transport(e.to_string()))?;
        permit.forget();
        Ok(Value::Null)
    }
}
