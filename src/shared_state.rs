use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::services::irradiance_service::IrradianceResolver;
use crate::services::lead_store::LeadStore;

#[derive(Clone)]
pub struct AppState {
    pub resolver: IrradianceResolver,
    pub leads: Arc<dyn LeadStore>,
    /// Offline mode flag — toggled at runtime via API
    pub offline_mode: Arc<AtomicBool>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(resolver: IrradianceResolver, leads: Arc<dyn LeadStore>, offline_mode_default: bool) -> Self {
        Self {
            resolver,
            leads,
            offline_mode: Arc::new(AtomicBool::new(offline_mode_default)),
            started_at: Instant::now(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline_mode.load(Ordering::Relaxed)
    }

    pub fn set_offline(&self, value: bool) {
        self.offline_mode.store(value, Ordering::Relaxed);
    }
}
